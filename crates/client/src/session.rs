use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;

use btksorgu_core::{AppConfig, QueryError};

/// One registry session: a cookie jar plus a configured HTTP client.
///
/// Created fresh at the start of every attempt and dropped with it; a failed
/// session is discarded, never repaired. The registry binds the CAPTCHA to
/// the session cookies, so the bootstrap GET must run before anything else.
pub struct Session {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl Session {
    pub fn new(config: &AppConfig) -> Result<Self, QueryError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| QueryError::Session(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// GET the form page so the server hands us session cookies.
    pub async fn bootstrap(&self) -> Result<(), QueryError> {
        debug!(url = %self.base_url, "establishing session");

        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .header("User-Agent", &self.user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7")
            .send()
            .await
            .map_err(|e| QueryError::network("session başlatılamadı", e))?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(QueryError::HttpStatus {
                context: "session başlatılamadı".to_string(),
                status,
            });
        }

        debug!("session established");
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
