use crate::error::Result;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One file of persisted session or knowledge state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub last_modified: DateTime<Utc>,
    /// Raw value of the embedded timestamp tag, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_timestamp: Option<String>,
    pub size_bytes: u64,
}

impl Artifact {
    /// Stat and read `path`, pulling the first configured timestamp tag out of
    /// its text. Non-UTF-8 content is read lossily.
    pub fn load(path: &Path, timestamp_tags: &[String]) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self {
            path: path.to_path_buf(),
            last_modified: DateTime::<Utc>::from(meta.modified()?),
            embedded_timestamp: timestamp::extract_embedded(&text, timestamp_tags),
            size_bytes: meta.len(),
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
