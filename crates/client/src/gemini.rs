//! CAPTCHA recognition through the Gemini `generateContent` API.
//!
//! The request is deterministic (temperature 0, bounded output) and the reply
//! is reduced to its alphanumeric characters. The 5–6 character length check
//! is the only defense against the model hallucinating garbage, so it is a
//! hard post-condition.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use btksorgu_core::{AppConfig, QueryError};

use crate::session::Session;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(rename = "finishReason", default)]
    finish_reason: String,
}

#[derive(Deserialize, Default)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: String,
}

/// Send the CAPTCHA image to Gemini and recover the code from its reply.
pub async fn solve(
    session: &Session,
    image: &[u8],
    api_key: &str,
    config: &AppConfig,
) -> Result<String, QueryError> {
    debug!(model = %config.gemini_model, "solving captcha via gemini");

    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: Some(config.gemini_prompt.clone()),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".to_string(),
                        data: BASE64.encode(image),
                    }),
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.0,
            max_output_tokens: 256,
        },
    };

    let resp = session
        .client()
        .post(config.gemini_url())
        .header("x-goog-api-key", api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| QueryError::network("Gemini API isteği başarısız", e))?;

    let status = resp.status().as_u16();
    match status {
        200 => {}
        429 => return Err(QueryError::SolverQuota),
        401 | 403 => return Err(QueryError::SolverAuth),
        other => return Err(QueryError::SolverHttp(other)),
    }

    let body: GenerateResponse = resp
        .json()
        .await
        .map_err(|e| QueryError::network("Gemini yanıtı çözümlenemedi", e))?;

    let text = extract_text(body)?;
    let code = extract_code(&text)?;

    info!(code = %code, "captcha solved");
    Ok(code)
}

/// Pull the reply text out of a `generateContent` response, surfacing
/// safety blocks, truncation, and empty replies as distinct errors.
fn extract_text(body: GenerateResponse) -> Result<String, QueryError> {
    if let Some(feedback) = &body.prompt_feedback {
        if !feedback.block_reason.is_empty() {
            return Err(QueryError::SolverSafetyBlocked(feedback.block_reason.clone()));
        }
    }

    let candidate = body.candidates.into_iter().next().ok_or(QueryError::SolverEmpty)?;

    if !candidate.finish_reason.is_empty() && candidate.finish_reason != "STOP" {
        return Err(QueryError::SolverIncomplete(candidate.finish_reason));
    }

    candidate
        .content
        .parts
        .into_iter()
        .find_map(|part| part.text)
        .ok_or(QueryError::SolverEmpty)
}

/// Strip everything that is not alphanumeric; the remainder must be exactly
/// 5 or 6 characters to count as a CAPTCHA code.
pub fn extract_code(text: &str) -> Result<String, QueryError> {
    let filtered: String = text.chars().filter(char::is_ascii_alphanumeric).collect();

    if filtered.len() < 5 || filtered.len() > 6 {
        return Err(QueryError::CaptchaFormat {
            raw: text.to_string(),
            filtered,
        });
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_text(text: &str, finish_reason: &str) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Content {
                    parts: vec![Part {
                        text: Some(text.to_string()),
                        inline_data: None,
                    }],
                },
                finish_reason: finish_reason.to_string(),
            }],
            prompt_feedback: None,
        }
    }

    #[test]
    fn test_extract_code_filters_noise() {
        assert_eq!(extract_code("The code is: AB12C!").unwrap(), "AB12C");
        assert_eq!(extract_code("xk3f9q\n").unwrap(), "xk3f9q");
    }

    #[test]
    fn test_extract_code_rejects_wrong_length() {
        let err = extract_code("A1").unwrap_err();
        match err {
            QueryError::CaptchaFormat { raw, filtered } => {
                assert_eq!(raw, "A1");
                assert_eq!(filtered, "A1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(extract_code("ABCDEFG1234").is_err());
        assert!(extract_code("!!!").is_err());
    }

    #[test]
    fn test_extract_text_happy_path() {
        let body = response_with_text("AB12C", "STOP");
        assert_eq!(extract_text(body).unwrap(), "AB12C");
        // Some responses omit finishReason entirely.
        let body = response_with_text("AB12C", "");
        assert_eq!(extract_text(body).unwrap(), "AB12C");
    }

    #[test]
    fn test_extract_text_surfaces_safety_block() {
        let body = GenerateResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: "SAFETY".to_string(),
            }),
        };
        assert!(matches!(
            extract_text(body),
            Err(QueryError::SolverSafetyBlocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_extract_text_empty_and_incomplete() {
        let empty = GenerateResponse {
            candidates: vec![],
            prompt_feedback: None,
        };
        assert!(matches!(extract_text(empty), Err(QueryError::SolverEmpty)));

        let truncated = response_with_text("AB", "MAX_TOKENS");
        assert!(matches!(
            extract_text(truncated),
            Err(QueryError::SolverIncomplete(reason)) if reason == "MAX_TOKENS"
        ));

        let no_parts = GenerateResponse {
            candidates: vec![Candidate::default()],
            prompt_feedback: None,
        };
        assert!(matches!(extract_text(no_parts), Err(QueryError::SolverEmpty)));
    }

    #[test]
    fn test_request_serialization_matches_wire_format() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some("prompt".to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_string(),
                            data: "AAAA".to_string(),
                        }),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 256,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert!(json["contents"][0]["parts"][0].get("inline_data").is_none());
    }
}
