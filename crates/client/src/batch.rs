//! Sequential batch runner: one domain at a time, fixed pacing between
//! lookups, results in input order.

use tracing::warn;

use btksorgu_core::{is_valid_domain, AppConfig, BatchSummary, QueryResult};

use crate::query::{execute_with, HttpPipeline, QueryPipeline};

pub struct BatchOutcome {
    pub results: Vec<QueryResult>,
    pub summary: BatchSummary,
}

/// Run every valid domain through the retry coordinator. Invalid domains are
/// skipped up front and counted, never submitted. `on_result` fires as each
/// lookup completes so callers can stream output.
pub async fn run_batch<F>(
    domains: &[String],
    api_key: &str,
    config: &AppConfig,
    on_result: F,
) -> BatchOutcome
where
    F: FnMut(&QueryResult),
{
    let mut pipeline = HttpPipeline { api_key, config };
    run_batch_with(&mut pipeline, domains, config, on_result).await
}

pub async fn run_batch_with<F>(
    pipeline: &mut dyn QueryPipeline,
    domains: &[String],
    config: &AppConfig,
    mut on_result: F,
) -> BatchOutcome
where
    F: FnMut(&QueryResult),
{
    let mut summary = BatchSummary::default();
    let mut results = Vec::new();

    let valid: Vec<&str> = domains
        .iter()
        .map(String::as_str)
        .filter(|domain| {
            if is_valid_domain(domain) {
                true
            } else {
                warn!(domain, "invalid domain skipped");
                summary.skipped += 1;
                false
            }
        })
        .collect();

    for (i, domain) in valid.iter().enumerate() {
        // Pacing between lookups, not before the first or after the last.
        if i > 0 {
            tokio::time::sleep(config.batch_delay).await;
        }

        let result = execute_with(pipeline, domain, config).await;
        summary.record(&result);
        on_result(&result);
        results.push(result);
    }

    BatchOutcome { results, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use btksorgu_core::QueryError;
    use btksorgu_parser::Classification;
    use std::time::Duration;

    struct PerDomainPipeline;

    #[async_trait]
    impl QueryPipeline for PerDomainPipeline {
        async fn run_attempt(&mut self, domain: &str) -> Result<Classification, QueryError> {
            match domain {
                "blocked.com" => Ok(Classification {
                    blocked: true,
                    ..Default::default()
                }),
                "broken.com" => Err(QueryError::SolverQuota),
                _ => Ok(Classification::default()),
            }
        }
    }

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.retry_delay = Duration::ZERO;
        config.batch_delay = Duration::ZERO;
        config
    }

    #[tokio::test]
    async fn test_batch_counts_and_preserves_order() {
        let domains: Vec<String> = ["blocked.com", "-bad-.com", "discord.com", "broken.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = fast_config();
        let mut seen = Vec::new();

        let outcome = run_batch_with(&mut PerDomainPipeline, &domains, &config, |r| {
            seen.push(r.domain.clone());
        })
        .await;

        // Invalid domain never entered the pipeline; the rest kept order.
        assert_eq!(seen, vec!["blocked.com", "discord.com", "broken.com"]);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.summary.blocked, 1);
        assert_eq!(outcome.summary.accessible, 1);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(outcome.summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let domains: Vec<String> = ["broken.com", "discord.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = fast_config();

        let outcome = run_batch_with(&mut PerDomainPipeline, &domains, &config, |_| {}).await;

        assert!(!outcome.results[0].status);
        assert!(outcome.results[1].status);
    }
}
