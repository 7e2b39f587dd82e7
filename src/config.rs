//! rankdrill configuration (`rankdrill.toml`).
//!
//! Defines where the scenario catalog and attempt history live, and the
//! defaults for a test run. Every field is optional.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rankdrill_core::history::DEFAULT_EXCERPT_CHARS;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "rankdrill.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Missing fields use defaults. Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankdrillConfig {
    /// Scenario catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Test run settings.
    #[serde(default)]
    pub test: TestConfig,

    /// Attempt history settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

// ---------------------------------------------------------------------------
// CatalogConfig
// ---------------------------------------------------------------------------

/// Where the scenario catalog is read from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// JSON catalog path (default: `"scenarios.json"`).
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("scenarios.json")
}

// ---------------------------------------------------------------------------
// TestConfig
// ---------------------------------------------------------------------------

/// Defaults for `rankdrill take`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Questions per test (default: 10).
    #[serde(default = "default_question_count")]
    pub question_count: usize,

    /// Fixed RNG seed. Set it to replay the same selection and option order.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            seed: None,
        }
    }
}

const fn default_question_count() -> usize {
    10
}

// ---------------------------------------------------------------------------
// HistoryConfig
// ---------------------------------------------------------------------------

/// Where attempts are stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// History file (default: `".rankdrill/history.json"`).
    #[serde(default = "default_history_path")]
    pub path: PathBuf,

    /// Scenario text is cut to this many characters in stored entries.
    #[serde(default = "default_excerpt_chars")]
    pub scenario_excerpt_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            scenario_excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_history_path() -> PathBuf {
    PathBuf::from(".rankdrill").join("history.json")
}

const fn default_excerpt_chars() -> usize {
    DEFAULT_EXCERPT_CHARS
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl RankdrillConfig {
    /// Load configuration from a TOML file.
    ///
    /// - If the file does not exist, returns all defaults (not an error).
    /// - If the file exists but contains invalid TOML or unknown fields,
    ///   returns a [`ConfigError`] with line-level detail.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML, unknown fields, or a zero
    /// question count.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })?;
        if cfg.test.question_count == 0 {
            return Err(ConfigError {
                path: None,
                message: "test.question_count must be at least 1".to_owned(),
            });
        }
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_all_fields() {
        let cfg = RankdrillConfig::default();
        assert_eq!(cfg.catalog.path, PathBuf::from("scenarios.json"));
        assert_eq!(cfg.test.question_count, 10);
        assert_eq!(cfg.test.seed, None);
        assert_eq!(cfg.history.path, PathBuf::from(".rankdrill/history.json"));
        assert_eq!(cfg.history.scenario_excerpt_chars, 100);
    }

    #[test]
    fn parse_empty_string() {
        let cfg = RankdrillConfig::parse("").unwrap();
        assert_eq!(cfg, RankdrillConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[catalog]
path = "data/sjt.json"

[test]
question_count = 20
seed = 1234

[history]
path = "/tmp/rd/history.json"
scenario_excerpt_chars = 60
"#;
        let cfg = RankdrillConfig::parse(toml).unwrap();
        assert_eq!(cfg.catalog.path, PathBuf::from("data/sjt.json"));
        assert_eq!(cfg.test.question_count, 20);
        assert_eq!(cfg.test.seed, Some(1234));
        assert_eq!(cfg.history.path, PathBuf::from("/tmp/rd/history.json"));
        assert_eq!(cfg.history.scenario_excerpt_chars, 60);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml = r"
[test]
seed = 7
";
        let cfg = RankdrillConfig::parse(toml).unwrap();
        assert_eq!(cfg.test.seed, Some(7));
        assert_eq!(cfg.test.question_count, 10);
        assert_eq!(cfg.catalog, CatalogConfig::default());
    }

    #[test]
    fn parse_rejects_unknown_nested_field() {
        let toml = r"
[test]
time_limit = 30
";
        let err = RankdrillConfig::parse(toml).unwrap_err();
        assert!(
            err.message.contains("unknown field"),
            "error should mention unknown field: {}",
            err.message
        );
    }

    #[test]
    fn parse_rejects_zero_question_count() {
        let err = RankdrillConfig::parse("[test]\nquestion_count = 0\n").unwrap_err();
        assert!(err.message.contains("question_count"));
    }

    #[test]
    fn parse_includes_line_number_on_error() {
        let toml = "[catalog]\npath = \"x\"\n[test]\nquestion_count = \"many\"\n";
        let err = RankdrillConfig::parse(toml).unwrap_err();
        assert!(
            err.message.contains("line "),
            "error should include line number: {}",
            err.message
        );
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let cfg = RankdrillConfig::load(Path::new("/nonexistent/rankdrill.toml")).unwrap();
        assert_eq!(cfg, RankdrillConfig::default());
    }

    #[test]
    fn load_invalid_file_shows_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid [[[toml").unwrap();
        let err = RankdrillConfig::load(&path).unwrap_err();
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
        assert!(format!("{err}").contains("bad.toml"));
    }
}
