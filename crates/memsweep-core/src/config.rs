use crate::duplicates::{RecordFields, DEFAULT_SIMILARITY_THRESHOLD};
use crate::error::{Result, SweepError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_AGE_THRESHOLD_DAYS: u32 = 7;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Contents of `<root>/.memsweep.yaml`. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_age_threshold_days")]
    pub age_threshold_days: u32,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Archive root, relative to the memory root. Never scanned.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    /// Knowledge documents live here. Scanned for duplicates, never archived.
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: String,
    /// Extensions treated as artifacts; empty accepts every file.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_timestamp_tags")]
    pub timestamp_tags: Vec<String>,
    #[serde(default)]
    pub records: RecordFields,
    #[serde(default = "default_write_report")]
    pub write_report: bool,
}

fn default_version() -> u32 {
    1
}

fn default_age_threshold_days() -> u32 {
    DEFAULT_AGE_THRESHOLD_DAYS
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_archive_dir() -> String {
    paths::ARCHIVE_DIR.to_string()
}

fn default_knowledge_dir() -> String {
    paths::KNOWLEDGE_DIR.to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["xml".to_string(), "md".to_string()]
}

fn default_timestamp_tags() -> Vec<String> {
    vec!["timestamp".to_string(), "last-updated".to_string()]
}

fn default_write_report() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            age_threshold_days: default_age_threshold_days(),
            similarity_threshold: default_similarity_threshold(),
            archive_dir: default_archive_dir(),
            knowledge_dir: default_knowledge_dir(),
            extensions: default_extensions(),
            timestamp_tags: default_timestamp_tags(),
            records: RecordFields::default(),
            write_report: default_write_report(),
        }
    }
}

impl Config {
    /// Load `<root>/.memsweep.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Whether `ext` (without the dot) names an artifact file.
    pub fn accepts_extension(&self, ext: Option<&str>) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match ext {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.age_threshold_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "age_threshold_days must be at least 1".to_string(),
            });
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "similarity_threshold={} is outside (0, 1]",
                    self.similarity_threshold
                ),
            });
        } else if self.similarity_threshold < 0.5 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "similarity_threshold={} is low and will flag loosely related solutions",
                    self.similarity_threshold
                ),
            });
        }

        if self.archive_dir.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "archive_dir is empty".to_string(),
            });
        } else if !self.archive_dir.starts_with('.') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "archive_dir '{}' is not hidden; other memory tools may index archived files",
                    self.archive_dir
                ),
            });
        }

        if self.archive_dir == self.knowledge_dir {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "archive_dir and knowledge_dir are the same directory".to_string(),
            });
        }

        if self.timestamp_tags.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no timestamp_tags configured; staleness will use mtime only"
                    .to_string(),
            });
        }

        for (name, value) in [
            ("records.block", &self.records.block),
            ("records.id_field", &self.records.id_field),
            ("records.category_field", &self.records.category_field),
            ("records.description_field", &self.records.description_field),
        ] {
            if value.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name} is empty"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// SweepOptions
// ---------------------------------------------------------------------------

/// Per-run switches: config defaults, overridden from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOptions {
    pub age_threshold_days: u32,
    pub similarity_threshold: f64,
    pub consolidate: bool,
    pub dry_run: bool,
}

impl SweepOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            age_threshold_days: cfg.age_threshold_days,
            similarity_threshold: cfg.similarity_threshold,
            consolidate: false,
            dry_run: false,
        }
    }

    /// Reject values that would make the run meaningless. Called before any I/O.
    pub fn validate(&self) -> Result<()> {
        if self.age_threshold_days == 0 {
            return Err(SweepError::InvalidConfig(
                "age threshold must be a positive number of days".to_string(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(SweepError::InvalidConfig(format!(
                "similarity threshold {} is outside (0, 1]",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.age_threshold_days, 7);
        assert_eq!(cfg.similarity_threshold, 0.7);
        assert_eq!(cfg.archive_dir, ".archive");
        assert_eq!(cfg.records.block, "solution");
        assert!(cfg.write_report);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".memsweep.yaml"),
            "age_threshold_days: 14\nrecords:\n  block: pattern\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.age_threshold_days, 14);
        assert_eq!(cfg.records.block, "pattern");
        assert_eq!(cfg.records.id_field, "id");
        assert_eq!(cfg.extensions, vec!["xml", "md"]);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".memsweep.yaml"), "age_threshold_days: [").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(SweepError::Yaml(_))));
    }

    #[test]
    fn default_config_is_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let cfg = Config {
            age_threshold_days: 0,
            similarity_threshold: 1.5,
            archive_dir: "kb".to_string(),
            knowledge_dir: "kb".to_string(),
            ..Config::default()
        };
        let warnings = cfg.validate();
        let errors = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 3);
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Warning && w.message.contains("not hidden")));
    }

    #[test]
    fn extension_filter() {
        let cfg = Config::default();
        assert!(cfg.accepts_extension(Some("xml")));
        assert!(cfg.accepts_extension(Some("MD")));
        assert!(!cfg.accepts_extension(Some("yaml")));
        assert!(!cfg.accepts_extension(None));

        let open = Config {
            extensions: vec![],
            ..Config::default()
        };
        assert!(open.accepts_extension(None));
    }

    #[test]
    fn options_reject_non_positive_age_and_bad_threshold() {
        let mut opts = SweepOptions::default();
        assert!(opts.validate().is_ok());

        opts.age_threshold_days = 0;
        assert!(matches!(opts.validate(), Err(SweepError::InvalidConfig(_))));

        opts.age_threshold_days = 7;
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            opts.similarity_threshold = bad;
            assert!(opts.validate().is_err(), "expected rejection of {bad}");
        }
        opts.similarity_threshold = 1.0;
        assert!(opts.validate().is_ok());
    }
}
