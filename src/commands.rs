use anyhow::{bail, Context, Result};
use tracing::info;

use btksorgu_core::AppConfig;
use btksorgu_client::run_batch;

use crate::cli::Cli;
use crate::output;

pub async fn run(cli: Cli, config: AppConfig, api_key: String) -> Result<()> {
    let mut domains = Vec::new();

    if let Some(path) = &cli.list_file {
        domains.extend(
            read_domain_list(path).with_context(|| format!("liste dosyası okunamadı: {path}"))?,
        );
    }
    domains.extend(cli.domains.iter().cloned());

    if domains.is_empty() {
        bail!("sorgulanacak domain belirtilmedi");
    }

    info!(count = domains.len(), model = %config.gemini_model, "starting lookups");

    let json = cli.json;
    let outcome = run_batch(&domains, &api_key, &config, |result| {
        if json {
            output::print_json(result);
        } else {
            output::print_result(result);
        }
    })
    .await;

    if outcome.results.is_empty() {
        bail!("geçerli domain bulunamadı");
    }

    if !json && outcome.results.len() > 1 {
        output::print_summary(&outcome.summary);
    }

    Ok(())
}

/// One domain per line; blank lines and `#` comments are skipped.
fn read_domain_list(path: &str) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_domain_list_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# engelli olabilecekler").unwrap();
        writeln!(file, "discord.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  twitter.com  ").unwrap();

        let domains = read_domain_list(file.path().to_str().unwrap()).unwrap();
        assert_eq!(domains, vec!["discord.com", "twitter.com"]);
    }

    #[test]
    fn test_missing_list_file_errors() {
        assert!(read_domain_list("/nonexistent/sites.txt").is_err());
    }
}
