pub mod config;
pub mod error;
pub mod format;
pub mod types;
pub mod validate;

pub use config::AppConfig;
pub use error::QueryError;
pub use types::*;
pub use validate::is_valid_domain;
