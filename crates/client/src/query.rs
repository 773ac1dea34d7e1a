//! Retry coordinator: drives one domain through
//! session → captcha → solve → submit → classify, retrying with a fresh
//! session only when the registry rejected the security code.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use btksorgu_core::{now_rfc3339, AppConfig, QueryError, QueryResult};
use btksorgu_parser::Classification;

use crate::captcha::fetch_captcha;
use crate::gemini::solve;
use crate::session::Session;
use crate::submit::submit_query;

/// One full attempt for one domain. Seam for tests: the coordinator's retry
/// policy is exercised against stub pipelines without any network.
#[async_trait]
pub trait QueryPipeline: Send {
    async fn run_attempt(&mut self, domain: &str) -> Result<Classification, QueryError>;
}

/// The real pipeline. Every attempt builds its own [`Session`]; the session
/// is dropped with the attempt, success or not.
pub struct HttpPipeline<'a> {
    pub api_key: &'a str,
    pub config: &'a AppConfig,
}

#[async_trait]
impl QueryPipeline for HttpPipeline<'_> {
    async fn run_attempt(&mut self, domain: &str) -> Result<Classification, QueryError> {
        let session = Session::new(self.config)?;
        session.bootstrap().await?;

        let image = fetch_captcha(&session, self.config).await?;
        let code = solve(&session, &image, self.api_key, self.config).await?;
        let html = submit_query(&session, domain, &code, self.config).await?;

        if btksorgu_parser::is_captcha_rejected(&html) {
            return Err(QueryError::CaptchaRejected);
        }

        Ok(btksorgu_parser::classify(&html))
    }
}

/// Look up one domain. Never fails: callers always receive a complete
/// [`QueryResult`], with `status = false` carrying the terminating error.
pub async fn execute_query(domain: &str, api_key: &str, config: &AppConfig) -> QueryResult {
    let mut pipeline = HttpPipeline { api_key, config };
    execute_with(&mut pipeline, domain, config).await
}

/// Retry loop over a pipeline. Only [`QueryError::CaptchaRejected`] earns
/// another attempt; every other failure class is surfaced immediately.
pub async fn execute_with(
    pipeline: &mut dyn QueryPipeline,
    domain: &str,
    config: &AppConfig,
) -> QueryResult {
    let start = Instant::now();
    let mut last_err: Option<QueryError> = None;

    for attempt in 0..config.max_retries.max(1) {
        if attempt > 0 {
            info!(attempt = attempt + 1, max = config.max_retries, domain, "retrying with a fresh session");
            tokio::time::sleep(config.retry_delay).await;
        }

        match pipeline.run_attempt(domain).await {
            Ok(classification) => {
                let mut result = merge(domain, classification);
                result.set_duration(start.elapsed().as_millis() as u64);
                info!(domain, blocked = result.blocked, "query completed");
                return result;
            }
            Err(err) => {
                let retryable = err.is_retryable();
                warn!(domain, error = %err, retryable, "attempt failed");
                last_err = Some(err);
                if !retryable {
                    break;
                }
            }
        }
    }

    let message = last_err
        .map(|e| e.to_string())
        .unwrap_or_else(|| "sorgu başarısız".to_string());
    QueryResult::failure(domain, message)
}

fn merge(domain: &str, classification: Classification) -> QueryResult {
    QueryResult {
        domain: domain.to_string(),
        timestamp: now_rfc3339(),
        status: true,
        blocked: classification.blocked,
        decision_date: classification.decision_date,
        case_number: classification.case_number,
        file_number: classification.file_number,
        file_type: classification.file_type,
        court: classification.court,
        description_local: classification.description_tr,
        description_foreign: classification.description_en,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.retry_delay = Duration::ZERO;
        config
    }

    /// Stub pipeline with a scripted outcome per attempt. Each call stands
    /// for one fresh session, mirroring the real pipeline.
    struct ScriptedPipeline {
        attempts: usize,
        script: Vec<Result<Classification, QueryError>>,
    }

    #[async_trait]
    impl QueryPipeline for ScriptedPipeline {
        async fn run_attempt(&mut self, _domain: &str) -> Result<Classification, QueryError> {
            let outcome = self.script.remove(0);
            self.attempts += 1;
            outcome
        }
    }

    #[tokio::test]
    async fn test_captcha_rejection_retries_until_exhausted() {
        let mut pipeline = ScriptedPipeline {
            attempts: 0,
            script: vec![
                Err(QueryError::CaptchaRejected),
                Err(QueryError::CaptchaRejected),
                Err(QueryError::CaptchaRejected),
            ],
        };
        let config = fast_config();

        let result = execute_with(&mut pipeline, "example.com", &config).await;

        assert_eq!(pipeline.attempts, 3);
        assert!(!result.status);
        assert!(!result.blocked);
        assert!(result.error.contains("CAPTCHA"));
    }

    #[tokio::test]
    async fn test_network_error_is_not_retried() {
        let mut pipeline = ScriptedPipeline {
            attempts: 0,
            script: vec![
                Err(QueryError::network("sorgu başarısız", "connection reset")),
                Ok(Classification::default()),
                Ok(Classification::default()),
            ],
        };
        let config = fast_config();

        let result = execute_with(&mut pipeline, "example.com", &config).await;

        assert_eq!(pipeline.attempts, 1);
        assert!(!result.status);
        assert!(result.error.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_rejection_then_success() {
        let blocked = Classification {
            blocked: true,
            decision_date: "01/02/2019".to_string(),
            court: "Ankara 1. Sulh Ceza Hakimliği".to_string(),
            ..Default::default()
        };
        let mut pipeline = ScriptedPipeline {
            attempts: 0,
            script: vec![Err(QueryError::CaptchaRejected), Ok(blocked)],
        };
        let config = fast_config();

        let result = execute_with(&mut pipeline, "example.com", &config).await;

        assert_eq!(pipeline.attempts, 2);
        assert!(result.status);
        assert!(result.blocked);
        assert_eq!(result.decision_date, "01/02/2019");
        assert!(!result.timestamp.is_empty());
    }

    // Stages stubbed at the HTML boundary: a fixed solver reply and a canned
    // registry response, with the real rejection check and parser in between.
    #[tokio::test]
    async fn test_end_to_end_with_stubbed_solver_and_registry() {
        struct Fixture {
            code: &'static str,
            html: &'static str,
        }

        #[async_trait]
        impl QueryPipeline for Fixture {
            async fn run_attempt(&mut self, _domain: &str) -> Result<Classification, QueryError> {
                assert_eq!(self.code.len(), 5);
                if btksorgu_parser::is_captcha_rejected(self.html) {
                    return Err(QueryError::CaptchaRejected);
                }
                Ok(btksorgu_parser::classify(self.html))
            }
        }

        let mut pipeline = Fixture {
            code: "XK3F9",
            html: r#"<span class="yazi2_2">Bu site hakkında uygulanan bir karar bulunamadı.</span>"#,
        };
        let config = fast_config();

        let result = execute_with(&mut pipeline, "discord.com", &config).await;

        assert_eq!(result.domain, "discord.com");
        assert!(result.status);
        assert!(!result.blocked);
        assert!(result.description_local.contains("engel kararı bulunmamaktadır"));
    }

    #[tokio::test]
    async fn test_success_result_carries_duration_and_empty_error() {
        let mut pipeline = ScriptedPipeline {
            attempts: 0,
            script: vec![Ok(Classification::default())],
        };
        let config = fast_config();

        let result = execute_with(&mut pipeline, "discord.com", &config).await;

        assert!(result.status);
        assert!(!result.blocked);
        assert!(result.error.is_empty());
        assert_eq!(result.query_duration_formatted, btksorgu_core::format::format_duration(result.query_duration_ms));
    }
}
