use crate::error::{Result, SweepError};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MEMORIES_DIR: &str = "memories";
pub const CONFIG_FILE: &str = ".memsweep.yaml";

pub const KNOWLEDGE_DIR: &str = "project-knowledge";
pub const ARCHIVE_DIR: &str = ".archive";

pub const REPORT_PREFIX: &str = "sweep-report-";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn archive_root(root: &Path, archive_dir: &str) -> PathBuf {
    root.join(archive_dir)
}

/// `<root>/<archive_dir>/<YYYY-MM-DD>`: where one run's artifacts land.
pub fn dated_archive_dir(root: &Path, archive_dir: &str, started_at: DateTime<Utc>) -> PathBuf {
    archive_root(root, archive_dir).join(started_at.format("%Y-%m-%d").to_string())
}

/// `<root>/<archive_dir>/sweep-report-<YYYYMMDD-HHMMSS>.md`.
pub fn report_path(root: &Path, archive_dir: &str, started_at: DateTime<Utc>) -> PathBuf {
    archive_root(root, archive_dir).join(format!(
        "{REPORT_PREFIX}{}.md",
        started_at.format("%Y%m%d-%H%M%S")
    ))
}

/// `path` relative to `root` for display, or `path` itself when outside it.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ---------------------------------------------------------------------------
// Memory path validation
// ---------------------------------------------------------------------------

const TRAVERSAL_PATTERNS: &[&str] = &[
    "../", "..\\", "%2e%2e%2f", "%2e%2e%5c", "..%2f", "..%5c", "%00",
];

static PARENT_COMPONENT_RE: OnceLock<Regex> = OnceLock::new();

fn parent_component_re() -> &'static Regex {
    PARENT_COMPONENT_RE.get_or_init(|| Regex::new(r"(^|[/\\])\.\.([/\\]|$)").unwrap())
}

/// Check that a path handed to a memory tool stays inside `memories/`.
pub fn validate_memory_path(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();

    if !trimmed.starts_with("/memories/") && !trimmed.starts_with("memories/") {
        return Err(SweepError::InvalidMemoryPath(format!(
            "must start with /memories/ (got: {trimmed})"
        )));
    }
    if trimmed.contains('\0') {
        return Err(SweepError::InvalidMemoryPath(
            "null byte in path".to_string(),
        ));
    }

    let lower = trimmed.to_lowercase();
    if let Some(pattern) = TRAVERSAL_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(SweepError::InvalidMemoryPath(format!(
            "path traversal detected: {pattern} found in {trimmed}"
        )));
    }
    if parent_component_re().is_match(trimmed) {
        return Err(SweepError::InvalidMemoryPath(format!(
            "path traversal detected: '..' component in {trimmed}"
        )));
    }

    Ok(PathBuf::from(trimmed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
