//! Dependency graph: module nodes, their lifecycle, and resolved edges.
//!
//! Nodes are owned by the [`DependencyGraph`] aggregate and addressed by
//! logical dotted path. Edges are stored as target path strings, never as
//! node references, so the graph can be rebuilt or serialized without
//! aliasing concerns.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::passport::Passport;

/// A raw import statement as extracted from source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImport {
    /// Target module as written in source (already absolute for relative
    /// imports: the extractor resolves the dot level against the importing
    /// module's logical path).
    pub target: String,
    /// Imported symbol names, in source order. Empty for `import x`.
    pub names: Vec<String>,
    /// Relative-import level as written (`from ..x` has level 2).
    pub level: u32,
    /// Line number (1-indexed).
    pub line: usize,
}

impl RawImport {
    /// Creates a plain `import target` statement.
    #[must_use]
    pub fn module(target: impl Into<String>, line: usize) -> Self {
        Self {
            target: target.into(),
            names: Vec::new(),
            level: 0,
            line,
        }
    }

    /// Creates a `from target import names` statement.
    #[must_use]
    pub fn symbols<I, S>(target: impl Into<String>, names: I, line: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target: target.into(),
            names: names.into_iter().map(Into::into).collect(),
            level: 0,
            line,
        }
    }
}

/// Lifecycle state of a module node.
///
/// Transitions are strictly monotonic: `Detected → Linked → Classified →
/// Finalized`, no skips, no reversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Created during ingestion; raw imports attached.
    Detected,
    /// Resolved import edges attached.
    Linked,
    /// Passport assigned.
    Classified,
    /// Marked visible by a downstream reporting filter.
    Finalized,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Detected => "detected",
            Self::Linked => "linked",
            Self::Classified => "classified",
            Self::Finalized => "finalized",
        };
        write!(f, "{s}")
    }
}

/// Errors raised by illegal node lifecycle transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// A transition was attempted out of order.
    #[error("module '{module}': cannot move from {from} to {to}")]
    InvalidTransition {
        /// Module identity.
        module: String,
        /// Current status.
        from: NodeStatus,
        /// Requested status.
        to: NodeStatus,
    },

    /// `finalize()` was called on a node without a passport.
    #[error("module '{module}': cannot finalize without a passport")]
    MissingPassport {
        /// Module identity.
        module: String,
    },
}

/// A source module in the dependency graph.
///
/// Identity is the logical dotted path, unique within a graph. The node is
/// mutated in place by each pipeline phase, advancing its status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Logical dotted path, e.g. `billing.domain.order`.
    pub path: String,
    /// Physical location. Absent for synthetic nodes.
    pub file_path: Option<PathBuf>,
    /// Lifecycle state.
    pub status: NodeStatus,
    /// Raw import statements as extracted from source.
    pub raw_imports: Vec<RawImport>,
    /// Resolved target logical paths. Populated at `Linked`.
    pub imports: BTreeSet<String>,
    /// Architectural classification. Populated at `Classified`.
    pub passport: Option<Passport>,
}

impl ModuleNode {
    /// Creates a detected node with no imports yet.
    #[must_use]
    pub fn detected(path: impl Into<String>, file_path: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_path: file_path.map(PathBuf::from),
            status: NodeStatus::Detected,
            raw_imports: Vec::new(),
            imports: BTreeSet::new(),
            passport: None,
        }
    }

    /// Attaches resolved import edges and advances to `Linked`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] unless the node is
    /// currently `Detected`.
    pub fn link_imports(&mut self, targets: BTreeSet<String>) -> Result<(), LifecycleError> {
        self.transition_guard(NodeStatus::Detected, NodeStatus::Linked)?;
        self.imports = targets;
        self.status = NodeStatus::Linked;
        Ok(())
    }

    /// Attaches a passport and advances to `Classified`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] unless the node is
    /// currently `Linked`.
    pub fn classify(&mut self, passport: Passport) -> Result<(), LifecycleError> {
        self.transition_guard(NodeStatus::Linked, NodeStatus::Classified)?;
        self.passport = Some(passport);
        self.status = NodeStatus::Classified;
        Ok(())
    }

    /// Marks the node visible for reporting.
    ///
    /// This is a precondition check only: the node must be `Classified` and
    /// must carry a passport. An unclassified node can never be finalized.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::MissingPassport`] if no passport is set,
    /// or [`LifecycleError::InvalidTransition`] when called out of order.
    pub fn finalize(&mut self) -> Result<(), LifecycleError> {
        self.transition_guard(NodeStatus::Classified, NodeStatus::Finalized)?;
        if self.passport.is_none() {
            return Err(LifecycleError::MissingPassport {
                module: self.path.clone(),
            });
        }
        self.status = NodeStatus::Finalized;
        Ok(())
    }

    fn transition_guard(&self, expected: NodeStatus, to: NodeStatus) -> Result<(), LifecycleError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                module: self.path.clone(),
                from: self.status,
                to,
            })
        }
    }

    /// Whether this node represents a package (`__init__`-backed directory).
    #[must_use]
    pub fn is_package(&self) -> bool {
        self.file_path
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .is_some_and(|s| s == "__init__")
    }
}

/// Aggregate root owning all module nodes.
///
/// `BTreeMap` keeps iteration order deterministic, which makes repeated
/// scans of an unchanged tree produce identical output.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, ModuleNode>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, keyed by its logical path. An existing node with the
    /// same identity is replaced.
    pub fn add_node(&mut self, node: ModuleNode) {
        self.nodes.insert(node.path.clone(), node);
    }

    /// Looks up a node by logical path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ModuleNode> {
        self.nodes.get(path)
    }

    /// Mutable lookup by logical path.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut ModuleNode> {
        self.nodes.get_mut(path)
    }

    /// Whether a module with this logical path is registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read-only iteration over nodes in path order.
    pub fn nodes(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.values()
    }

    /// Mutable iteration over nodes in path order.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut ModuleNode> {
        self.nodes.values_mut()
    }

    /// All resolved edges as `(source_path, target_path)` pairs, in
    /// deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.values().flat_map(|n| {
            n.imports
                .iter()
                .map(move |t| (n.path.as_str(), t.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passport::{ComponentType, Direction, Layer, MatchMethod, Passport, Scope};

    fn test_passport() -> Passport {
        Passport {
            scope: Scope::Context,
            context: Some("billing".into()),
            macro_zone: None,
            layer: Layer::Domain,
            direction: Direction::None,
            component: ComponentType::Unknown,
            match_method: MatchMethod::Unknown,
        }
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut node = ModuleNode::detected("billing.domain.order", None);
        assert_eq!(node.status, NodeStatus::Detected);

        node.link_imports(BTreeSet::new()).unwrap();
        assert_eq!(node.status, NodeStatus::Linked);

        node.classify(test_passport()).unwrap();
        assert_eq!(node.status, NodeStatus::Classified);

        node.finalize().unwrap();
        assert_eq!(node.status, NodeStatus::Finalized);
    }

    #[test]
    fn finalize_before_classify_fails() {
        let mut node = ModuleNode::detected("billing.domain.order", None);
        node.link_imports(BTreeSet::new()).unwrap();

        let err = node.finalize().unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn classify_before_link_fails() {
        let mut node = ModuleNode::detected("billing.domain.order", None);
        let err = node.classify(test_passport()).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn no_transition_is_reversible() {
        let mut node = ModuleNode::detected("billing.domain.order", None);
        node.link_imports(BTreeSet::new()).unwrap();
        assert!(node.link_imports(BTreeSet::new()).is_err());

        node.classify(test_passport()).unwrap();
        assert!(node.classify(test_passport()).is_err());
    }

    #[test]
    fn statuses_are_ordered() {
        assert!(NodeStatus::Detected < NodeStatus::Linked);
        assert!(NodeStatus::Linked < NodeStatus::Classified);
        assert!(NodeStatus::Classified < NodeStatus::Finalized);
    }

    #[test]
    fn graph_identity_is_unique() {
        let mut graph = DependencyGraph::new();
        graph.add_node(ModuleNode::detected("a.b", None));
        graph.add_node(ModuleNode::detected("a.b", None));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn edges_reference_identities() {
        let mut graph = DependencyGraph::new();
        let mut node = ModuleNode::detected("a", None);
        node.link_imports(["b".to_string(), "c".to_string()].into())
            .unwrap();
        graph.add_node(node);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![("a", "b"), ("a", "c")]);
    }

    #[test]
    fn package_detection_uses_file_stem() {
        let node = ModuleNode::detected("pkg", Some(PathBuf::from("src/pkg/__init__.py")));
        assert!(node.is_package());

        let node = ModuleNode::detected("pkg.mod", Some(PathBuf::from("src/pkg/mod.py")));
        assert!(!node.is_package());
    }
}
