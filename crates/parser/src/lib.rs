//! Classification of the registry's lookup response.
//!
//! The response is semi-structured HTML; the interesting content lives in two
//! styled spans (Turkish and English descriptions). Block status and decision
//! metadata are recovered from the Turkish text with the patterns in
//! [`patterns`].

pub mod patterns;

use tracing::debug;

use crate::patterns::*;

/// Parsed fragment of a lookup response. The retry coordinator merges this
/// into the final `QueryResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub blocked: bool,
    pub decision_date: String,
    pub case_number: String,
    pub file_number: String,
    pub file_type: String,
    pub court: String,
    pub description_tr: String,
    pub description_en: String,
}

/// True when the registry bounced the submission because the security code
/// was wrong. Policy (retry or give up) belongs to the coordinator.
pub fn is_captcha_rejected(html: &str) -> bool {
    CAPTCHA_REJECTED_MARKERS
        .iter()
        .any(|marker| html.contains(marker))
}

/// Classify a lookup response body.
///
/// The "no decision" markers take precedence over a positive block marker
/// when both appear in the same body. A blocked verdict with a decision
/// sentence the pattern cannot parse keeps `blocked = true` with empty
/// metadata; partial extraction never fails the classification.
pub fn classify(html: &str) -> Classification {
    let mut result = Classification::default();

    if let Some(caps) = DESCRIPTION_TR_RE.captures(html) {
        result.description_tr = clean_html(&caps[1]);
    }
    if let Some(caps) = DESCRIPTION_EN_RE.captures(html) {
        result.description_en = clean_html(&caps[1]);
    }

    if !result.description_tr.is_empty() && result.description_tr.contains(BLOCKED_MARKER) {
        result.blocked = true;

        if let Some(caps) = DECISION_RE.captures(&result.description_tr) {
            result.decision_date = caps[1].to_string();
            result.case_number = caps[2].trim().to_string();
            result.file_number = caps[3].to_string();
            result.file_type = caps[4].trim().to_string();
            result.court = caps[5].to_string();
        } else {
            debug!("blocked verdict without a parseable decision sentence");
        }
    }

    let lower = html.to_lowercase();
    if NO_DECISION_MARKERS.iter().any(|m| lower.contains(m)) {
        result.blocked = false;
        result.description_tr = NO_DECISION_DESCRIPTION.to_string();
    }

    result
}

/// Strip tags, decode `&nbsp;`, collapse the surrounding whitespace.
pub fn clean_html(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, "");
    text.replace("&nbsp;", " ").trim().to_string()
}
