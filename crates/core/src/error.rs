use thiserror::Error;

/// Typed failure taxonomy for the lookup pipeline.
///
/// The retry coordinator dispatches on variant, never on message text:
/// only [`QueryError::CaptchaRejected`] is worth a fresh session.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("HTTP istemcisi oluşturulamadı: {0}")]
    Session(String),

    #[error("{context}: {message}")]
    Network { context: String, message: String },

    #[error("{context}: HTTP {status}")]
    HttpStatus { context: String, status: u16 },

    #[error("CAPTCHA indirilemedi: {0}")]
    CaptchaDownload(String),

    #[error("CAPTCHA resmi boş döndü")]
    CaptchaEmpty,

    #[error("Gemini API hatası: HTTP {0}")]
    SolverHttp(u16),

    #[error("Gemini API kota aşıldı")]
    SolverQuota,

    #[error("Gemini API yetkilendirme hatası")]
    SolverAuth,

    #[error("Gemini güvenlik filtresi: {0}")]
    SolverSafetyBlocked(String),

    #[error("Gemini API boş yanıt döndü")]
    SolverEmpty,

    #[error("Gemini yanıt tamamlanamadı: {0}")]
    SolverIncomplete(String),

    #[error("geçersiz CAPTCHA çıktısı: \"{raw}\" -> \"{filtered}\" ({} karakter)", filtered.chars().count())]
    CaptchaFormat { raw: String, filtered: String },

    #[error("CAPTCHA kodu hatalı")]
    CaptchaRejected,

    #[error("geçersiz domain: {0}")]
    InvalidDomain(String),
}

impl QueryError {
    /// A fresh session plus a new CAPTCHA may succeed; nothing else will
    /// self-resolve within the same process run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueryError::CaptchaRejected)
    }

    pub fn network(context: impl Into<String>, message: impl ToString) -> Self {
        QueryError::Network {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
