//! TOML configuration for a scan.
//!
//! All configuration is passed explicitly per scan; the core keeps no
//! process-wide state.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Options controlling ingestion and classification for one scan.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanOptions {
    /// Root-relative path anchoring logical-path computation.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory names skipped during traversal.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Exact file names or glob patterns skipped during traversal.
    #[serde(default)]
    pub ignore_files: Vec<String>,

    /// Files larger than this are skipped.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Extensions skipped outright (dot included, e.g. `.pyc`).
    #[serde(default = "default_binary_extensions")]
    pub binary_extensions: Vec<String>,

    /// Explicit macro-zone mapping: zone tag -> physical folder name.
    /// Used to normalize nested macro-context paths before classification.
    #[serde(default)]
    pub macro_contexts: HashMap<String, String>,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_exclude_dirs() -> Vec<String> {
    ["__pycache__", ".git", ".venv", "venv", "node_modules"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_max_file_size() -> u64 {
    1_048_576
}

fn default_binary_extensions() -> Vec<String> {
    [".pyc", ".pyd", ".so", ".egg"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            exclude_dirs: default_exclude_dirs(),
            ignore_files: Vec::new(),
            max_file_size_bytes: default_max_file_size(),
            binary_extensions: default_binary_extensions(),
            macro_contexts: HashMap::new(),
        }
    }
}

/// Errors when loading scan options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Failed to read the options file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid options: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// Options are structurally invalid.
    #[error("options validation: {0}")]
    Validation(String),
}

impl ScanOptions {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(|e| OptionsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, OptionsError> {
        toml::from_str(content).map_err(|e| OptionsError::Parse {
            message: e.to_string(),
        })
    }

    /// Validate option consistency.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.source_dir.is_absolute() {
            return Err(OptionsError::Validation(format!(
                "source_dir must be root-relative, got '{}'",
                self.source_dir.display()
            )));
        }

        for pattern in &self.ignore_files {
            if pattern.contains(['*', '?', '[']) {
                glob::Pattern::new(pattern).map_err(|e| {
                    OptionsError::Validation(format!("ignore_files '{pattern}': {e}"))
                })?;
            }
        }

        for ext in &self.binary_extensions {
            if !ext.starts_with('.') {
                return Err(OptionsError::Validation(format!(
                    "binary_extensions entry '{ext}' must start with a dot"
                )));
            }
        }

        for (tag, folder) in &self.macro_contexts {
            if tag.is_empty() || folder.is_empty() {
                return Err(OptionsError::Validation(
                    "macro_contexts entries must be non-empty".into(),
                ));
            }
        }

        Ok(())
    }
}
