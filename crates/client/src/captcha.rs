use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use url::Url;

use btksorgu_core::{AppConfig, QueryError};

use crate::session::Session;

/// Download the CAPTCHA image bound to the current session.
///
/// The `t` parameter is a cache buster regenerated on every call; reusing one
/// across retries could serve a cached image from a previous session. gzip
/// bodies are decompressed transparently by the HTTP client.
pub async fn fetch_captcha(session: &Session, config: &AppConfig) -> Result<Vec<u8>, QueryError> {
    let mut url = Url::parse(&config.captcha_url())
        .map_err(|e| QueryError::CaptchaDownload(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("_CAPTCHA", "")
        .append_pair("t", &cache_buster());

    debug!(url = %url, "downloading captcha");

    let resp = session
        .client()
        .get(url)
        .header("User-Agent", session.user_agent())
        .header(
            "Accept",
            "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
        )
        .header("Referer", format!("{}/", session.base_url()))
        .send()
        .await
        .map_err(|e| QueryError::network("CAPTCHA indirilemedi", e))?;

    let status = resp.status().as_u16();
    if status != 200 {
        return Err(QueryError::CaptchaDownload(format!("HTTP {}", status)));
    }

    let image = resp
        .bytes()
        .await
        .map_err(|e| QueryError::network("CAPTCHA indirilemedi", e))?;

    if image.is_empty() {
        return Err(QueryError::CaptchaEmpty);
    }

    debug!(bytes = image.len(), "captcha downloaded");
    Ok(image.to_vec())
}

/// Matches the format the registry's own frontend sends: a pseudo-random
/// fraction plus the current unix time.
fn cache_buster() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("0.{:08} {}", now.subsec_nanos() % 100_000_000, now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_buster_shape() {
        let buster = cache_buster();
        let (frac, secs) = buster.split_once(' ').expect("space separated");
        assert!(frac.starts_with("0."));
        assert_eq!(frac.len(), 10);
        assert!(frac[2..].chars().all(|c| c.is_ascii_digit()));
        assert!(secs.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_cache_buster_is_url_encoded_into_query() {
        let mut url = Url::parse("https://internet.btk.gov.tr/sitesorgu/secureimage/captcha.php")
            .unwrap();
        url.query_pairs_mut()
            .append_pair("_CAPTCHA", "")
            .append_pair("t", "0.12345678 1700000000");
        let query = url.query().unwrap();
        assert!(query.starts_with("_CAPTCHA=&t=0.12345678"));
        assert!(!query.contains(' '));
    }
}
