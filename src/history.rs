//! On-disk history of TUI queries: `history.json` in the working directory,
//! an ordered list of prior results. The lookup core never touches this.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use btksorgu_core::QueryResult;

const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    queries: Vec<QueryResult>,
}

pub fn default_path() -> PathBuf {
    PathBuf::from(HISTORY_FILE)
}

/// Missing or unreadable history is an empty history, never an error.
pub fn load(path: &Path) -> Vec<QueryResult> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str::<HistoryFile>(&data) {
        Ok(history) => history.queries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt history file ignored");
            Vec::new()
        }
    }
}

pub fn save(path: &Path, results: &[QueryResult]) -> Result<()> {
    let history = HistoryFile {
        queries: results.to_vec(),
    };
    let data = serde_json::to_string_pretty(&history)?;
    std::fs::write(path, data)?;
    Ok(())
}
