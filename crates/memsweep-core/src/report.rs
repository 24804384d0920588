//! Plain-text rendering of a `RunResult`.
//!
//! Output depends only on the result value: the one timestamp printed is the
//! run start carried inside it, and paths are shown relative to the root.

use crate::paths::display_relative;
use crate::sweep::RunResult;
use chrono::SecondsFormat;

/// Sections, in order: header, statistics, stale entries, duplicate
/// candidates, errors.
pub fn render(result: &RunResult) -> String {
    let mut out = String::new();
    let root = result.root.as_path();
    let opts = &result.options;

    out.push_str("# Memory Sweep Report\n\n");
    out.push_str(&format!(
        "- Started: {}\n",
        result.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out.push_str(&format!("- Root: {}\n", root.display()));
    out.push_str(&format!(
        "- Mode: {}\n",
        if opts.dry_run {
            "dry-run (no files moved)"
        } else {
            "live"
        }
    ));
    out.push_str(&format!("- Age threshold: {} days\n", opts.age_threshold_days));
    if opts.consolidate {
        out.push_str(&format!(
            "- Consolidation: enabled (similarity >= {:.2})\n",
            opts.similarity_threshold
        ));
    } else {
        out.push_str("- Consolidation: disabled\n");
    }
    out.push_str(&format!("- Archive: {}\n", display_relative(root, &result.archive_dir)));

    let stats = &result.stats;
    out.push_str("\n## Statistics\n\n");
    out.push_str(&format!("- Artifacts scanned: {}\n", stats.scanned));
    out.push_str(&format!("- Stale entries removed: {}\n", stats.stale_removed));
    out.push_str(&format!("- Patterns flagged: {}\n", stats.patterns_flagged));
    out.push_str(&format!(
        "- Bytes freed: {} ({} bytes)\n",
        format_bytes(stats.bytes_freed),
        stats.bytes_freed
    ));
    out.push_str(&format!("- Errors: {}\n", result.errors.len()));

    out.push_str("\n## Stale Entries Removed\n\n");
    if result.stale.is_empty() {
        out.push_str("_None._\n");
    }
    for entry in &result.stale {
        let c = &entry.classification;
        out.push_str(&format!(
            "- {} -> {} ({}, {} {}, {})\n",
            display_relative(root, &entry.outcome.source),
            display_relative(root, &entry.outcome.destination),
            format_bytes(entry.outcome.size_bytes),
            c.reason,
            c.effective_at.format("%Y-%m-%d"),
            entry.outcome.action,
        ));
    }

    out.push_str("\n## Duplicate Candidates\n\n");
    if result.duplicates.is_empty() {
        out.push_str(if opts.consolidate {
            "_None._\n"
        } else {
            "_Skipped (consolidation disabled)._\n"
        });
    } else {
        out.push_str("Flagged for manual review; nothing was merged.\n\n");
    }
    for finding in &result.duplicates {
        let c = &finding.candidate;
        out.push_str(&format!(
            "- {} [{}] {} <-> {} (similarity {:.2})\n",
            display_relative(root, &finding.document),
            c.record_a.category,
            c.record_a.id,
            c.record_b.id,
            c.similarity
        ));
        out.push_str(&format!("  - {}: {}\n", c.record_a.id, c.record_a.description));
        out.push_str(&format!("  - {}: {}\n", c.record_b.id, c.record_b.description));
    }

    out.push_str("\n## Errors\n\n");
    if result.errors.is_empty() {
        out.push_str("_None._\n");
    }
    for err in &result.errors {
        out.push_str(&format!("- {}: {}\n", display_relative(root, &err.file), err.message));
    }

    out
}

/// `512 B`, `1.5 KiB`, `3.0 MiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveOutcome;
    use crate::artifact::Artifact;
    use crate::classifier::ClassificationResult;
    use crate::config::SweepOptions;
    use crate::duplicates::{DuplicateCandidate, SolutionRecord};
    use crate::sweep::{DuplicateFinding, RunError, RunStats, StaleEntry};
    use crate::types::{ArchiveAction, StalenessReason};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn record(id: &str, description: &str) -> SolutionRecord {
        SolutionRecord {
            id: id.to_string(),
            category: "debugging".to_string(),
            description: description.to_string(),
            raw_block: String::new(),
        }
    }

    fn sample(consolidate: bool) -> RunResult {
        let root = PathBuf::from("/work/memories");
        let started_at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let source = root.join("session-context/old.xml");
        let artifact = Artifact {
            path: source.clone(),
            last_modified: started_at,
            embedded_timestamp: Some("2026-10-06".to_string()),
            size_bytes: 2048,
        };
        RunResult {
            started_at,
            root: root.clone(),
            archive_dir: root.join(".archive/2026-10-16"),
            options: SweepOptions {
                consolidate,
                ..SweepOptions::default()
            },
            stats: RunStats {
                scanned: 3,
                stale_removed: 1,
                patterns_flagged: usize::from(consolidate),
                bytes_freed: 2048,
            },
            stale: vec![StaleEntry {
                classification: ClassificationResult {
                    artifact,
                    is_stale: true,
                    reason: StalenessReason::EmbeddedTimestamp,
                    effective_at: Utc.with_ymd_and_hms(2026, 10, 6, 0, 0, 0).unwrap(),
                },
                outcome: ArchiveOutcome {
                    source,
                    destination: root.join(".archive/2026-10-16/old.xml"),
                    file_name: "old.xml".to_string(),
                    size_bytes: 2048,
                    action: ArchiveAction::Moved,
                },
            }],
            duplicates: if consolidate {
                vec![DuplicateFinding {
                    document: root.join("project-knowledge/common-solutions.xml"),
                    candidate: DuplicateCandidate {
                        record_a: record("s1", "null pointer in parser"),
                        record_b: record("s2", "null pointer in parser module"),
                        similarity: 22.0 / 29.0,
                    },
                }]
            } else {
                vec![]
            },
            errors: vec![RunError {
                file: root.join("agent-coordination/locked.xml"),
                message: "Permission denied (os error 13)".to_string(),
            }],
        }
    }

    #[test]
    fn renders_sections_in_fixed_order() {
        let text = render(&sample(true));
        let order = [
            "# Memory Sweep Report",
            "## Statistics",
            "## Stale Entries Removed",
            "## Duplicate Candidates",
            "## Errors",
        ];
        let positions: Vec<usize> = order.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn renders_entries_relative_to_root() {
        let text = render(&sample(true));
        assert!(text.contains("- Started: 2026-10-16T12:00:00Z"));
        assert!(text.contains("- Archive: .archive/2026-10-16"));
        assert!(text.contains("- Stale entries removed: 1"));
        assert!(text.contains("- Bytes freed: 2.0 KiB (2048 bytes)"));
        assert!(text.contains(
            "- session-context/old.xml -> .archive/2026-10-16/old.xml \
             (2.0 KiB, embedded-timestamp 2026-10-06, moved)"
        ));
        assert!(text.contains(
            "- project-knowledge/common-solutions.xml [debugging] s1 <-> s2 (similarity 0.76)"
        ));
        assert!(text.contains("- agent-coordination/locked.xml: Permission denied (os error 13)"));
    }

    #[test]
    fn blank_lines_frame_each_section() {
        let text = render(&sample(false));
        assert!(text.starts_with("# Memory Sweep Report\n\n- Started: "));
        assert!(text.contains("\n\n## Statistics\n\n- Artifacts scanned: 3\n"));
        assert!(text.ends_with(
            "\n\n## Errors\n\n- agent-coordination/locked.xml: Permission denied (os error 13)\n"
        ));
    }

    #[test]
    fn render_is_deterministic() {
        let result = sample(true);
        assert_eq!(render(&result), render(&result.clone()));
    }

    #[test]
    fn disabled_consolidation_says_skipped() {
        let text = render(&sample(false));
        assert!(text.contains("- Consolidation: disabled"));
        assert!(text.contains("_Skipped (consolidation disabled)._"));
    }

    #[test]
    fn byte_formatting() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
