use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StalenessReason
// ---------------------------------------------------------------------------

/// Which timestamp source decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessReason {
    EmbeddedTimestamp,
    FilesystemMtime,
}

impl StalenessReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StalenessReason::EmbeddedTimestamp => "embedded-timestamp",
            StalenessReason::FilesystemMtime => "filesystem-mtime",
        }
    }
}

impl fmt::Display for StalenessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ArchiveAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveAction {
    Moved,
    WouldMove,
}

impl ArchiveAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveAction::Moved => "moved",
            ArchiveAction::WouldMove => "would-move",
        }
    }
}

impl fmt::Display for ArchiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

/// Result class of a completed run. A run that could not start is an `Err`
/// from `sweep::run`, not a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    PartialSuccess,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunOutcome::Success => "success",
            RunOutcome::PartialSuccess => "partial_success",
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
