//! Source ingestion: walks the source tree and reads file text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hexalint_core::ScanOptions;
use tracing::debug;

use crate::pipeline::ScanError;

/// File contents, or a marker for files that could not be read as text.
#[derive(Debug, Clone)]
pub enum FileContents {
    /// UTF-8 source text.
    Text(String),
    /// Binary or otherwise unreadable file.
    Unreadable,
}

/// One discovered source file. Ephemeral: produced here, consumed once by
/// the import extractor.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Physical path.
    pub path: PathBuf,
    /// File text or unreadable marker.
    pub contents: FileContents,
}

/// Result of walking the source tree.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Discovered Python files, sorted by path.
    pub files: Vec<SourceFile>,
    /// Files skipped by ignore patterns or the size limit.
    pub skipped: usize,
}

/// Walks a directory tree applying exclusion, ignore and size filters.
pub struct SourceIngestor {
    source_root: PathBuf,
    options: ScanOptions,
}

impl SourceIngestor {
    /// Creates an ingestor rooted at `project_root/options.source_dir`.
    #[must_use]
    pub fn new(project_root: &Path, options: ScanOptions) -> Self {
        let source_root = project_root.join(&options.source_dir);
        Self {
            source_root,
            options,
        }
    }

    /// The directory logical paths are computed against.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Walks the tree and reads every Python file that passes the filters.
    ///
    /// Unreadable files are kept with an [`FileContents::Unreadable`] marker;
    /// only a failure to walk the root itself is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] when the source root cannot be traversed.
    pub fn ingest(&self) -> Result<IngestOutcome, ScanError> {
        let exclude: HashSet<String> = self.options.exclude_dirs.iter().cloned().collect();

        let mut builder = ignore::WalkBuilder::new(&self.source_root);
        builder.hidden(false).git_ignore(true);
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && exclude.contains(entry.file_name().to_string_lossy().as_ref()))
        });

        let mut files = Vec::new();
        let mut skipped = 0usize;

        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();

            if self.options.binary_extensions.iter().any(|b| b == &ext) {
                continue;
            }
            if ext != ".py" {
                continue;
            }

            if self.is_ignored(path) {
                debug!("Ignoring: {}", path.display());
                skipped += 1;
                continue;
            }

            if let Ok(meta) = entry.metadata() {
                if meta.len() > self.options.max_file_size_bytes {
                    debug!("Skipping oversized file: {}", path.display());
                    skipped += 1;
                    continue;
                }
            }

            let contents = match std::fs::read_to_string(path) {
                Ok(text) => FileContents::Text(text),
                Err(_) => FileContents::Unreadable,
            };

            files.push(SourceFile {
                path: path.to_path_buf(),
                contents,
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(IngestOutcome { files, skipped })
    }

    /// Exact-name or glob match against `ignore_files`.
    fn is_ignored(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        self.options.ignore_files.iter().any(|pattern| {
            if pattern.contains(['*', '?', '[']) {
                glob::Pattern::new(pattern).is_ok_and(|p| p.matches(name))
            } else {
                pattern == name
            }
        })
    }
}
