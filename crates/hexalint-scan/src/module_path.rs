//! Conversion between physical file paths and logical dotted module paths.

use std::path::{Component, Path};

/// Converts a physical file path to a logical dotted module path, relative
/// to the source root.
///
/// The extension is stripped and a trailing `__init__` collapses onto its
/// containing directory, so `src/pkg/__init__.py` and the directory
/// `src/pkg` name the same module `pkg`. Returns `None` for files outside
/// the source root; an `__init__.py` directly at the root maps to the
/// synthetic root module `""`.
#[must_use]
pub fn physical_to_logical(path: &Path, source_root: &Path) -> Option<String> {
    let rel = path.strip_prefix(source_root).ok()?;

    let mut parts: Vec<&str> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(os) => parts.push(os.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let last = parts.pop()?;
    let stem = Path::new(last).file_stem()?.to_str()?;
    if stem != "__init__" {
        parts.push(stem);
    }

    Some(parts.join("."))
}

/// Dotted form of the source-dir path, used to strip a literal root prefix
/// that import statements sometimes still carry.
#[must_use]
pub fn dotted_prefix(source_dir: &Path) -> String {
    source_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(os) => os.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}
