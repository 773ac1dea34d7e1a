//! Extraction patterns for the registry's response markup.
//!
//! The BTK response page is semi-structured HTML; everything we pull out of
//! it is pinned here as data so fixture tests can track markup drift in one
//! place.

use once_cell::sync::Lazy;
use regex::Regex;

/// Phrases the registry emits when the submitted security code was wrong.
pub const CAPTCHA_REJECTED_MARKERS: &[&str] =
    &["Güvenlik kodu hatalı", "security code", "Doğrulama kodu"];

/// Phrases (lowercase) meaning no block decision exists for the domain.
pub const NO_DECISION_MARKERS: &[&str] = &[
    "herhangi bir idari karar",
    "herhangi bir yargı karar",
    "uygulanan bir karar bulunamadı",
    "karar bulunamadı",
];

/// Marker inside the Turkish description that flags a block decision.
pub const BLOCKED_MARKER: &str = "engellenmiştir";

/// Canned description used when the registry reports no decision.
pub const NO_DECISION_DESCRIPTION: &str =
    "Bu site hakkında herhangi bir engel kararı bulunmamaktadır.";

/// Turkish description span.
pub static DESCRIPTION_TR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<span class="yazi2_2">(.*?)</span>"#).expect("tr span regex"));

/// English description span.
pub static DESCRIPTION_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<span class="yazi3_1">(.*?)</span>"#).expect("en span regex"));

/// Decision sentence: date, case/file number, file type, court.
/// Example: "01/02/2019 tarihli ve 2019/123 D.İş sayılı Ankara 1. Sulh Ceza
/// Hakimliği kararıyla ... engellenmiştir."
pub static DECISION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{2}/\d{2}/\d{4}) tarihli ve ((\d+/\d+)\s+([A-Za-zİıÜüÖöÇçŞşĞğ.\s]+?)) sayılı (.+?) kararıyla",
    )
    .expect("decision regex")
});

/// Markup stripper for description spans.
pub static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
