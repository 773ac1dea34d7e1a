//! HTTP pipeline against the BTK lookup form: session bootstrap, CAPTCHA
//! retrieval, Gemini-backed CAPTCHA solving, form submission, and the retry
//! coordination that ties the stages together.

pub mod batch;
pub mod captcha;
pub mod gemini;
pub mod query;
pub mod session;
pub mod submit;

pub use batch::{run_batch, run_batch_with, BatchOutcome};
pub use query::{execute_query, execute_with, HttpPipeline, QueryPipeline};
pub use session::Session;
