//! One maintenance pass over a memory tree.
//!
//! scan -> classify -> (optional) duplicate analysis -> archive -> RunResult.
//! Everything here runs sequentially in listing order; per-file failures are
//! collected into the result and never abort the pass.

use crate::archive::{ArchiveOutcome, Archiver};
use crate::artifact::Artifact;
use crate::classifier::{self, ClassificationResult};
use crate::config::{Config, SweepOptions};
use crate::duplicates::{find_duplicates_with, DuplicateCandidate};
use crate::error::{Result, SweepError};
use crate::paths;
use crate::types::RunOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RunResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub scanned: usize,
    pub stale_removed: usize,
    pub patterns_flagged: usize,
    pub bytes_freed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleEntry {
    pub classification: ClassificationResult,
    pub outcome: ArchiveOutcome,
}

/// A duplicate pair together with the knowledge document it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateFinding {
    pub document: PathBuf,
    pub candidate: DuplicateCandidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub file: PathBuf,
    pub message: String,
}

impl RunError {
    pub fn new(file: &Path, err: impl std::fmt::Display) -> Self {
        Self {
            file: file.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Everything one run did or would do. Built once at the end of `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub started_at: DateTime<Utc>,
    pub root: PathBuf,
    pub archive_dir: PathBuf,
    pub options: SweepOptions,
    pub stats: RunStats,
    pub stale: Vec<StaleEntry>,
    pub duplicates: Vec<DuplicateFinding>,
    pub errors: Vec<RunError>,
}

impl RunResult {
    pub fn outcome(&self) -> RunOutcome {
        if self.errors.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::PartialSuccess
        }
    }
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

/// Classification of every artifact under a root, without side effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Listing order: names sorted within a directory, depth-first.
    pub classifications: Vec<ClassificationResult>,
    pub knowledge_documents: Vec<PathBuf>,
    pub errors: Vec<RunError>,
}

/// Walk `root` and classify every artifact against `now - age_threshold_days`.
///
/// Fails only when `root` itself cannot be listed.
pub fn scan(
    root: &Path,
    cfg: &Config,
    age_threshold_days: u32,
    now: DateTime<Utc>,
) -> Result<ScanResult> {
    let entries = sorted_entries(root).map_err(|source| SweepError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })?;

    let mut walk = Walk {
        root,
        cfg,
        cutoff: classifier::cutoff(now, age_threshold_days),
        result: ScanResult::default(),
    };
    walk.visit_entries(entries, false);
    Ok(walk.result)
}

struct Walk<'a> {
    root: &'a Path,
    cfg: &'a Config,
    cutoff: DateTime<Utc>,
    result: ScanResult,
}

impl Walk<'_> {
    fn visit_entries(&mut self, entries: Vec<(PathBuf, std::fs::FileType)>, in_knowledge: bool) {
        for (path, file_type) in entries {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if name.starts_with('.') {
                continue;
            }

            if file_type.is_dir() {
                if path == paths::archive_root(self.root, &self.cfg.archive_dir) {
                    continue;
                }
                let knowledge =
                    in_knowledge || path == self.root.join(&self.cfg.knowledge_dir);
                match sorted_entries(&path) {
                    Ok(children) => self.visit_entries(children, knowledge),
                    Err(e) => self.record_error(&path, e),
                }
            } else if file_type.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());
                if !self.cfg.accepts_extension(ext) {
                    continue;
                }
                if in_knowledge {
                    self.result.knowledge_documents.push(path);
                } else {
                    self.classify(&path);
                }
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular entry");
            }
        }
    }

    fn classify(&mut self, path: &Path) {
        match Artifact::load(path, &self.cfg.timestamp_tags) {
            Ok(artifact) => {
                let c = classifier::classify(&artifact, self.cutoff);
                tracing::debug!(
                    path = %path.display(),
                    stale = c.is_stale,
                    reason = %c.reason,
                    "classified"
                );
                self.result.classifications.push(c);
            }
            Err(e) => self.record_error(path, e),
        }
    }

    fn record_error(&mut self, path: &Path, err: impl std::fmt::Display) {
        tracing::warn!(path = %path.display(), error = %err, "skipping");
        self.result.errors.push(RunError::new(path, err));
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<(PathBuf, std::fs::FileType)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        entries.push((entry.path(), entry.file_type()?));
    }
    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run one sweep over `root`. `now` is the run start and names the archive.
///
/// Errors only for invalid options (before any I/O) or an unlistable root.
pub fn run(
    root: &Path,
    cfg: &Config,
    opts: &SweepOptions,
    now: DateTime<Utc>,
) -> Result<RunResult> {
    opts.validate()?;

    let mut scanned = scan(root, cfg, opts.age_threshold_days, now)?;
    let duplicates = if opts.consolidate {
        consolidate(cfg, opts.similarity_threshold, &mut scanned)
    } else {
        Vec::new()
    };
    Ok(archive_stale(root, cfg, opts, now, scanned, duplicates))
}

/// Duplicate candidates across every knowledge document found by the scan.
/// Unreadable documents are recorded in `scanned.errors`.
fn consolidate(cfg: &Config, threshold: f64, scanned: &mut ScanResult) -> Vec<DuplicateFinding> {
    let mut duplicates = Vec::new();
    for doc in &scanned.knowledge_documents {
        match std::fs::read_to_string(doc) {
            Ok(text) => duplicates.extend(
                find_duplicates_with(&text, &cfg.records, threshold)
                    .into_iter()
                    .map(|candidate| DuplicateFinding {
                        document: doc.clone(),
                        candidate,
                    }),
            ),
            Err(e) => {
                tracing::warn!(path = %doc.display(), error = %e, "cannot read knowledge document");
                scanned.errors.push(RunError::new(doc, e));
            }
        }
    }
    duplicates
}

/// Archive every stale classification in listing order and assemble the
/// result. A failed move is recorded against the artifact and the loop goes on.
fn archive_stale(
    root: &Path,
    cfg: &Config,
    opts: &SweepOptions,
    now: DateTime<Utc>,
    scanned: ScanResult,
    duplicates: Vec<DuplicateFinding>,
) -> RunResult {
    let mut errors = scanned.errors;
    let archive_dir = paths::dated_archive_dir(root, &cfg.archive_dir, now);
    let mut archiver = Archiver::new(&archive_dir, opts.dry_run);
    let mut stale = Vec::new();
    for classification in scanned.classifications.iter().filter(|c| c.is_stale) {
        match archiver.archive(&classification.artifact) {
            Ok(outcome) => stale.push(StaleEntry {
                classification: classification.clone(),
                outcome,
            }),
            Err(e) => {
                let path = &classification.artifact.path;
                tracing::warn!(path = %path.display(), error = %e, "archive failed");
                errors.push(RunError::new(path, e));
            }
        }
    }

    let stats = RunStats {
        scanned: scanned.classifications.len(),
        stale_removed: stale.len(),
        patterns_flagged: duplicates.len(),
        bytes_freed: stale.iter().map(|s| s.outcome.size_bytes).sum(),
    };

    RunResult {
        started_at: now,
        root: root.to_path_buf(),
        archive_dir,
        options: opts.clone(),
        stats,
        stale,
        duplicates,
        errors,
    }
}

/// Persist the rendered report under the archive root. Dry runs and configs
/// with `write_report: false` write nothing and return `None`.
///
/// A failed write is recorded in `result.errors`, keyed by the report path, so
/// the files already archived are still accounted for by the caller.
pub fn write_report(cfg: &Config, result: &mut RunResult) -> Option<PathBuf> {
    if result.options.dry_run || !cfg.write_report {
        return None;
    }
    let path = paths::report_path(&result.root, &cfg.archive_dir, result.started_at);
    match crate::io::atomic_write(&path, crate::report::render(result).as_bytes()) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "wrote sweep report");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot write sweep report");
            result.errors.push(RunError::new(&path, e));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
