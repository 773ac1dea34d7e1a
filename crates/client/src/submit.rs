use tracing::debug;
use url::Url;

use btksorgu_core::{AppConfig, QueryError};

use crate::session::Session;

/// POST the lookup form under the session's cookies.
///
/// The field set mirrors the registry's own form: the domain under `deger`,
/// the solved code under `security_code`, plus the empty placeholder fields
/// the backend insists on. Returns the raw body; classification is the
/// parser's job.
pub async fn submit_query(
    session: &Session,
    domain: &str,
    code: &str,
    config: &AppConfig,
) -> Result<String, QueryError> {
    debug!(domain, "submitting lookup form");

    let form: [(&str, &str); 8] = [
        ("deger", domain),
        ("ipw", ""),
        ("kat", ""),
        ("tr", ""),
        ("eg", ""),
        ("ayrintili", "0"),
        ("submit", "Sorgula"),
        ("security_code", code),
    ];

    let resp = session
        .client()
        .post(format!("{}/", config.base_url))
        .header("User-Agent", session.user_agent())
        .header("Origin", origin_of(&config.base_url))
        .header("Referer", format!("{}/", config.base_url))
        .form(&form)
        .send()
        .await
        .map_err(|e| QueryError::network("sorgu başarısız", e))?;

    let status = resp.status().as_u16();
    if status != 200 {
        return Err(QueryError::HttpStatus {
            context: "sorgu başarısız".to_string(),
            status,
        });
    }

    resp.text()
        .await
        .map_err(|e| QueryError::network("sorgu başarısız", e))
}

fn origin_of(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|host| format!("{}://{}", u.scheme(), host))
        })
        .unwrap_or_else(|| base_url.to_string())
}
