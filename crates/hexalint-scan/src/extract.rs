//! Python import extraction using Tree-sitter.
//!
//! Walks the syntax tree for `import_statement` and `import_from_statement`
//! nodes at any nesting depth and produces [`RawImport`]s. Relative imports
//! are resolved against the importing module's *logical* path, not its file
//! path: a package's `__init__.py` parses in the context
//! `<package>.__init__`, so `from .` inside it names the package itself.

use std::path::{Path, PathBuf};

use hexalint_core::RawImport;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

/// Errors from parsing a single file. Non-fatal to a scan: the pipeline
/// registers the module with zero imports and keeps going.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file's syntax could not be parsed.
    #[error("syntax error in {path}")]
    Syntax {
        /// File that failed.
        path: PathBuf,
    },

    /// The grammar could not be loaded into the parser.
    #[error("tree-sitter language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser produced no tree (cancellation or grammar mismatch).
    #[error("no parse tree for {path}")]
    NoTree {
        /// File that failed.
        path: PathBuf,
    },
}

/// Extracts raw import statements from Python source.
pub struct PythonExtractor {
    language: Language,
}

impl PythonExtractor {
    /// Creates a new Python extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Extracts every import statement from `source`.
    ///
    /// `logical_path` is the importing module's dotted path; `file_path` is
    /// only used for error reporting and for the package check.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] when the tree contains syntax errors.
    pub fn extract(
        &self,
        source: &str,
        file_path: &Path,
        logical_path: &str,
    ) -> Result<Vec<RawImport>, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or_else(|| ParseError::NoTree {
            path: file_path.to_path_buf(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(ParseError::Syntax {
                path: file_path.to_path_buf(),
            });
        }

        let context = parsing_context(file_path, logical_path);

        let mut statements = Vec::new();
        collect_imports(root, &mut statements);

        let mut imports = Vec::new();
        for node in statements {
            match node.kind() {
                "import_statement" => extract_plain(&node, src, &mut imports),
                "import_from_statement" => extract_from(&node, src, &context, &mut imports),
                _ => {}
            }
        }

        Ok(imports)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Packages declare imports "from themselves": their relative imports
/// resolve as if written in `<package>.__init__`.
fn parsing_context(file_path: &Path, logical_path: &str) -> String {
    let is_init = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s == "__init__");

    if is_init {
        if logical_path.is_empty() {
            "__init__".to_string()
        } else {
            format!("{logical_path}.__init__")
        }
    } else {
        logical_path.to_string()
    }
}

fn collect_imports<'a>(node: Node<'a>, acc: &mut Vec<Node<'a>>) {
    match node.kind() {
        "import_statement" | "import_from_statement" => acc.push(node),
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_imports(child, acc);
            }
        }
    }
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// `import a.b, c as d` produces one [`RawImport`] per dotted name.
fn extract_plain(node: &Node<'_>, src: &[u8], acc: &mut Vec<RawImport>) {
    let line = node.start_position().row + 1;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => acc.push(RawImport::module(text(&child, src), line)),
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    acc.push(RawImport::module(text(&name, src), line));
                }
            }
            _ => {}
        }
    }
}

/// `from x import a, b` / `from ..pkg import c` / `from . import d`.
fn extract_from(node: &Node<'_>, src: &[u8], context: &str, acc: &mut Vec<RawImport>) {
    let line = node.start_position().row + 1;

    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };

    let (target, level) = match module_node.kind() {
        "dotted_name" => (text(&module_node, src).to_string(), 0),
        "relative_import" => resolve_relative(&module_node, src, context),
        _ => return,
    };

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        // Skip the module_name field itself; the rest of the dotted_name /
        // aliased_import children are the imported symbols.
        if Some(child) == node.child_by_field_name("module_name") {
            continue;
        }
        match child.kind() {
            "dotted_name" => names.push(text(&child, src).to_string()),
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    names.push(text(&name, src).to_string());
                }
            }
            "wildcard_import" => names.push("*".to_string()),
            _ => {}
        }
    }

    acc.push(RawImport {
        target,
        names,
        level,
        line,
    });
}

/// Resolve a `relative_import` node against the parsing context: strip
/// `level` trailing components from the context's dotted path, then append
/// the stated module name, if any.
fn resolve_relative(node: &Node<'_>, src: &[u8], context: &str) -> (String, u32) {
    let mut level = 0u32;
    let mut stated = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_prefix" => {
                level = u32::try_from(text(&child, src).matches('.').count()).unwrap_or(0);
            }
            "dotted_name" => stated = text(&child, src).to_string(),
            _ => {}
        }
    }

    let mut base: Vec<&str> = context.split('.').filter(|s| !s.is_empty()).collect();
    let strip = (level as usize).min(base.len());
    base.truncate(base.len() - strip);

    if !stated.is_empty() {
        base.push(&stated);
    }

    (base.join("."), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str, file: &str, logical: &str) -> Vec<RawImport> {
        PythonExtractor::new()
            .extract(source, Path::new(file), logical)
            .unwrap()
    }

    #[test]
    fn plain_import() {
        let imports = extract("import os\n", "src/m.py", "m");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].target, "os");
        assert!(imports[0].names.is_empty());
        assert_eq!(imports[0].line, 1);
    }

    #[test]
    fn plain_import_multiple_and_aliased() {
        let imports = extract("import a.b, c as d\n", "src/m.py", "m");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].target, "a.b");
        assert_eq!(imports[1].target, "c");
    }

    #[test]
    fn from_import_names() {
        let imports = extract(
            "from billing.domain import Order, Invoice as Inv\n",
            "src/m.py",
            "m",
        );
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].target, "billing.domain");
        assert_eq!(imports[0].names, vec!["Order", "Invoice"]);
    }

    #[test]
    fn wildcard_import() {
        let imports = extract("from billing.domain import *\n", "src/m.py", "m");
        assert_eq!(imports[0].names, vec!["*"]);
    }

    #[test]
    fn relative_import_in_module() {
        let imports = extract(
            "from . import order\n",
            "src/billing/domain/pricing.py",
            "billing.domain.pricing",
        );
        assert_eq!(imports[0].target, "billing.domain");
        assert_eq!(imports[0].names, vec!["order"]);
        assert_eq!(imports[0].level, 1);
    }

    #[test]
    fn relative_import_two_levels_with_module() {
        let imports = extract(
            "from ..app import handlers\n",
            "src/billing/domain/pricing.py",
            "billing.domain.pricing",
        );
        assert_eq!(imports[0].target, "billing.app");
        assert_eq!(imports[0].level, 2);
    }

    #[test]
    fn relative_import_in_package_resolves_to_itself() {
        // pkg/__init__.py parses in context pkg.__init__, so `from .`
        // names pkg, not pkg's parent.
        let imports = extract(
            "from .sub import Thing\n",
            "src/pkg/__init__.py",
            "pkg",
        );
        assert_eq!(imports[0].target, "pkg.sub");
        assert_eq!(imports[0].names, vec!["Thing"]);
    }

    #[test]
    fn nested_imports_are_found() {
        let source = "def f():\n    import json\n    from a.b import c\n";
        let imports = extract(source, "src/m.py", "m");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].target, "json");
        assert_eq!(imports[1].target, "a.b");
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = PythonExtractor::new()
            .extract("def broken(:\n", Path::new("src/m.py"), "m")
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn line_numbers_are_one_indexed() {
        let imports = extract("x = 1\nimport os\n", "src/m.py", "m");
        assert_eq!(imports[0].line, 2);
    }
}
