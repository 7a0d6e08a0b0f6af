//! Init command: write a starter configuration file.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# hexalint configuration
#
# All keys are optional; the values below are the built-in defaults.

# Directory (relative to the project root) that anchors logical module
# paths. `src/billing/domain/order.py` becomes `billing.domain.order`.
source_dir = "src"

# Directory names skipped during traversal.
exclude_dirs = ["__pycache__", ".git", ".venv", "venv", "node_modules"]

# Exact file names or glob patterns to skip.
# ignore_files = ["conftest.py", "test_*.py"]

# Files larger than this are skipped.
max_file_size_bytes = 1048576

# Extensions skipped outright.
binary_extensions = [".pyc", ".pyd", ".so", ".egg"]

# Macro-zone mapping: zone tag -> physical folder name. Modules under a
# mapped folder are classified with that macro zone.
# [macro_contexts]
# core = "contexts"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("hexalint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, CONFIG_TEMPLATE)?;

    println!("Created hexalint.toml");
    println!();
    println!("Next steps:");
    println!("  1. Point source_dir at your Python source root");
    println!("  2. Run: hexalint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use hexalint_core::ScanOptions;

    #[test]
    fn template_parses_and_validates() {
        let options = ScanOptions::parse(super::CONFIG_TEMPLATE).unwrap();
        assert!(options.validate().is_ok());
        assert_eq!(options.source_dir, std::path::PathBuf::from("src"));
    }
}
