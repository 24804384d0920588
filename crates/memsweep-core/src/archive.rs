use crate::artifact::Artifact;
use crate::error::Result;
use crate::io;
use crate::types::ArchiveAction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ArchiveOutcome
// ---------------------------------------------------------------------------

/// What happened (or would happen) to one stale artifact. Dry and live runs
/// produce the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// File name actually used in the archive, after collision handling.
    pub file_name: String,
    pub size_bytes: u64,
    pub action: ArchiveAction,
}

// ---------------------------------------------------------------------------
// Archiver
// ---------------------------------------------------------------------------

/// Moves stale artifacts into one destination directory.
///
/// Names handed out are remembered for the life of the archiver, so a dry run
/// disambiguates colliding names exactly as a live run would.
pub struct Archiver {
    destination: PathBuf,
    dry_run: bool,
    claimed: HashSet<PathBuf>,
}

impl Archiver {
    pub fn new(destination: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            destination: destination.into(),
            dry_run,
            claimed: HashSet::new(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn archive(&mut self, artifact: &Artifact) -> Result<ArchiveOutcome> {
        let target = self.next_free_name(&artifact.file_name());
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let action = if self.dry_run {
            ArchiveAction::WouldMove
        } else {
            io::ensure_dir(&self.destination)?;
            io::move_file(&artifact.path, &target)?;
            tracing::info!(
                from = %artifact.path.display(),
                to = %target.display(),
                "archived"
            );
            ArchiveAction::Moved
        };

        self.claimed.insert(target.clone());
        Ok(ArchiveOutcome {
            source: artifact.path.clone(),
            destination: target,
            file_name,
            size_bytes: artifact.size_bytes,
            action,
        })
    }

    /// `name.ext`, else `name-1.ext`, `name-2.ext`, ...
    fn next_free_name(&self, file_name: &str) -> PathBuf {
        let (stem, ext) = split_name(file_name);
        let mut candidate = self.destination.join(file_name);
        let mut n = 1u32;
        while candidate.exists() || self.claimed.contains(&candidate) {
            candidate = self.destination.join(format!("{stem}-{n}{ext}"));
            n += 1;
        }
        candidate
    }
}

/// Archive one artifact into `destination` with a fresh archiver.
pub fn archive(artifact: &Artifact, destination: &Path, dry_run: bool) -> Result<ArchiveOutcome> {
    Archiver::new(destination, dry_run).archive(artifact)
}

/// Split at the last dot, keeping dotfiles whole: `a.tar.xml` -> (`a.tar`, `.xml`).
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
