use std::time::Duration;

/// Runtime configuration for the lookup pipeline.
///
/// Defaults match the live BTK endpoint; `GEMINI_MODEL` and `USER_AGENT`
/// can be overridden from the environment (see [`AppConfig::from_env`]).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub captcha_path: String,
    pub gemini_model: String,
    pub gemini_prompt: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub batch_delay: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://internet.btk.gov.tr/sitesorgu".to_string(),
            captcha_path: "/secureimage/captcha.php".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_prompt: "Read the CAPTCHA text. Reply with ONLY the characters, nothing else."
                .to_string(),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            batch_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            max_redirects: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                config.gemini_model = model;
            }
        }
        if let Ok(agent) = std::env::var("USER_AGENT") {
            if !agent.is_empty() {
                config.user_agent = agent;
            }
        }
        config
    }

    pub fn gemini_url(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.gemini_model
        )
    }

    pub fn captcha_url(&self) -> String {
        format!("{}{}", self.base_url, self.captcha_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_url_uses_model() {
        let mut config = AppConfig::default();
        config.gemini_model = "gemini-x".to_string();
        assert_eq!(
            config.gemini_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-x:generateContent"
        );
    }
}
