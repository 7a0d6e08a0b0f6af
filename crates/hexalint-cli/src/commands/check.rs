//! Check command: scan a project and validate every import edge.

use anyhow::{Context, Result};
use std::path::Path;

use hexalint_core::ScanOptions;
use hexalint_scan::ScanPipeline;

use crate::OutputFormat;

/// Runs the check command.
pub fn run(path: &Path, format: OutputFormat, config: Option<&Path>) -> Result<()> {
    let options = resolve_options(path, config)?;
    options.validate().context("Config validation failed")?;

    let pipeline = ScanPipeline::new(path, options);
    let outcome = pipeline.run().context("Scan failed")?;

    super::output::print(&outcome, format)?;

    if outcome.report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Explicit `--config` wins; otherwise `hexalint.toml` next to the scanned
/// root when present; otherwise built-in defaults.
fn resolve_options(path: &Path, config: Option<&Path>) -> Result<ScanOptions> {
    if let Some(explicit) = config {
        return ScanOptions::from_file(explicit)
            .with_context(|| format!("Failed to load {}", explicit.display()));
    }

    let local = path.join("hexalint.toml");
    if local.is_file() {
        tracing::info!("Using config: {}", local.display());
        return ScanOptions::from_file(&local)
            .with_context(|| format!("Failed to load {}", local.display()));
    }

    Ok(ScanOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_config_present() {
        let dir = tempfile::tempdir().unwrap();
        let options = resolve_options(dir.path(), None).unwrap();
        assert_eq!(options.source_dir, std::path::PathBuf::from("src"));
    }

    #[test]
    fn local_config_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hexalint.toml"), "source_dir = \"app\"\n").unwrap();
        let options = resolve_options(dir.path(), None).unwrap();
        assert_eq!(options.source_dir, std::path::PathBuf::from("app"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_options(dir.path(), Some(&missing)).is_err());
    }
}
