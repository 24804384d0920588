use crate::artifact::Artifact;
use crate::timestamp::parse_timestamp;
use crate::types::StalenessReason;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ClassificationResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub artifact: Artifact,
    pub is_stale: bool,
    pub reason: StalenessReason,
    /// The timestamp that was compared against the cutoff.
    pub effective_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// `now - age_threshold_days`, clamped to the earliest representable instant.
/// A threshold that reaches past that point makes nothing stale.
pub fn cutoff(now: DateTime<Utc>, age_threshold_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(age_threshold_days))
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decide whether `artifact` is older than `cutoff`.
///
/// A parseable embedded timestamp always decides. An absent or unparseable one
/// falls back to the filesystem mtime.
pub fn classify(artifact: &Artifact, cutoff: DateTime<Utc>) -> ClassificationResult {
    let embedded = artifact
        .embedded_timestamp
        .as_deref()
        .and_then(parse_timestamp);

    let (effective_at, reason) = match embedded {
        Some(ts) => (ts, StalenessReason::EmbeddedTimestamp),
        None => (artifact.last_modified, StalenessReason::FilesystemMtime),
    };

    ClassificationResult {
        artifact: artifact.clone(),
        is_stale: effective_at < cutoff,
        reason,
        effective_at,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
