//! The scan pipeline: ingest, link, classify, validate.
//!
//! Four phases with a barrier between each. Work inside a phase is
//! parallel (rayon); merging into the graph is single-writer. A cancel
//! flag is checked at every barrier so long scans can be interrupted
//! between phases.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hexalint_core::{
    DependencyGraph, LifecycleError, ModuleNode, Passport, RawImport, ScanOptions, ScanReport,
    Violation,
};
use hexalint_rules::{Classifier, RuleEngine};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::extract::PythonExtractor;
use crate::ingest::{FileContents, SourceIngestor};
use crate::module_path::{dotted_prefix, physical_to_logical};
use crate::reexport::{ReexportResolver, ResolveCache};

/// Fatal scan errors. Per-file problems (parse errors, unreadable files,
/// unresolvable imports) never surface here; they degrade to counters in
/// the report.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The source root could not be traversed.
    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// The scan was cancelled between phases.
    #[error("scan interrupted")]
    Interrupted,

    /// A node lifecycle invariant was broken. Indicates a pipeline bug.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Everything one scan produces.
#[derive(Debug)]
pub struct ScanOutcome {
    /// The classified dependency graph.
    pub graph: DependencyGraph,
    /// Violations and file counters.
    pub report: ScanReport,
}

/// Per-file result of the parallel extraction phase.
enum Extraction {
    Parsed {
        logical: String,
        path: PathBuf,
        imports: Vec<RawImport>,
    },
    ParseFailed {
        logical: String,
        path: PathBuf,
    },
    Skipped,
}

/// Orchestrates a whole-project scan.
pub struct ScanPipeline {
    root: PathBuf,
    options: ScanOptions,
    cancel: Arc<AtomicBool>,
}

impl ScanPipeline {
    /// Creates a pipeline for the project at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that interrupts the scan at the next phase barrier when set.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs all four phases and returns the classified graph plus report.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only for cross-cutting failures: an
    /// untraversable source root, interruption, or a broken lifecycle
    /// invariant. Single-file problems degrade to report counters.
    pub fn run(&self) -> Result<ScanOutcome, ScanError> {
        info!("Starting scan at {:?}", self.root);

        let ingestor = SourceIngestor::new(&self.root, self.options.clone());
        let source_root = ingestor.source_root().to_path_buf();
        let ingested = ingestor.ingest()?;

        let mut report = ScanReport::new();
        report.files_skipped = ingested.skipped;

        info!("Found {} files to scan", ingested.files.len());
        self.checkpoint()?;

        // Phase A: extraction, parallel per file, merged single-writer.
        let extractor = PythonExtractor::new();
        let extractions: Vec<Extraction> = ingested
            .files
            .par_iter()
            .map(|file| {
                let FileContents::Text(text) = &file.contents else {
                    return Extraction::Skipped;
                };
                let Some(logical) = physical_to_logical(&file.path, &source_root) else {
                    return Extraction::Skipped;
                };
                match extractor.extract(text, &file.path, &logical) {
                    Ok(imports) => Extraction::Parsed {
                        logical,
                        path: file.path.clone(),
                        imports,
                    },
                    Err(e) => {
                        warn!("Failed to parse {}: {}", file.path.display(), e);
                        Extraction::ParseFailed {
                            logical,
                            path: file.path.clone(),
                        }
                    }
                }
            })
            .collect();

        let mut graph = DependencyGraph::new();
        for extraction in extractions {
            match extraction {
                Extraction::Parsed {
                    logical,
                    path,
                    imports,
                } => {
                    let mut node = ModuleNode::detected(logical, Some(path));
                    node.raw_imports = imports;
                    graph.add_node(node);
                    report.files_scanned += 1;
                }
                Extraction::ParseFailed { logical, path } => {
                    // A bad file never aborts the run: register the module
                    // with zero imports and keep scanning.
                    graph.add_node(ModuleNode::detected(logical, Some(path)));
                    report.files_scanned += 1;
                    report.parse_failures += 1;
                }
                Extraction::Skipped => report.files_skipped += 1,
            }
        }

        self.checkpoint()?;

        // Phase B: link imports against the complete, read-only registry.
        let linked: Vec<(String, BTreeSet<String>)> = {
            let prefix = dotted_prefix(&self.options.source_dir);
            let resolver = ReexportResolver::new(&graph, Some(prefix));
            let nodes: Vec<&ModuleNode> = graph.nodes().collect();
            nodes
                .par_iter()
                .map_init(ResolveCache::new, |cache, node| {
                    (node.path.clone(), link_node(node, &graph, &resolver, cache))
                })
                .collect()
        };
        for (path, targets) in linked {
            if let Some(node) = graph.get_mut(&path) {
                node.link_imports(targets)?;
            }
        }

        self.checkpoint()?;

        // Phase C: classification, a pure function of each node.
        let classifier = Classifier::new(&self.options);
        let passports: Vec<(String, Passport)> = {
            let nodes: Vec<&ModuleNode> = graph.nodes().collect();
            nodes
                .par_iter()
                .map(|node| (node.path.clone(), classifier.classify(node)))
                .collect()
        };
        for (path, passport) in passports {
            if let Some(node) = graph.get_mut(&path) {
                node.classify(passport)?;
            }
        }

        self.checkpoint()?;

        // Phase D: validate every edge against the static rule matrix.
        let edges: Vec<(String, String)> = graph
            .edges()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        let engine = RuleEngine::new();
        let mut violations: Vec<Violation> = edges
            .par_iter()
            .flat_map_iter(|(source, target)| match (graph.get(source), graph.get(target)) {
                (Some(s), Some(t)) => engine.evaluate(s, t),
                _ => Vec::new(),
            })
            .collect();

        violations.sort_by(|a, b| {
            a.source_module
                .cmp(&b.source_module)
                .then_with(|| a.rule.cmp(&b.rule))
                .then_with(|| a.target_module.cmp(&b.target_module))
        });
        report.violations = violations;

        info!(
            "Scan complete: {} violations across {} modules",
            report.violations.len(),
            graph.len()
        );

        Ok(ScanOutcome { graph, report })
    }

    fn checkpoint(&self) -> Result<(), ScanError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(ScanError::Interrupted);
        }
        Ok(())
    }
}

/// Resolve one node's raw imports to registered target modules.
///
/// Resolution misses (external dependencies, typos) simply create no edge.
/// Self-edges are dropped.
fn link_node(
    node: &ModuleNode,
    graph: &DependencyGraph,
    resolver: &ReexportResolver<'_>,
    cache: &mut ResolveCache,
) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();

    for raw in &node.raw_imports {
        if raw.names.is_empty() {
            let target = resolver.normalize(&raw.target);
            if graph.contains(&target) && target != node.path {
                targets.insert(target);
            }
            continue;
        }

        for name in &raw.names {
            let resolved = if name == "*" {
                resolver.normalize(&raw.target)
            } else {
                resolver.resolve(&raw.target, name, cache)
            };
            if graph.contains(&resolved) && resolved != node.path {
                targets.insert(resolved);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_interrupts_at_barrier() {
        let pipeline = ScanPipeline::new("/nonexistent-but-unreached", ScanOptions::default());
        pipeline.cancel_flag().store(true, Ordering::Relaxed);
        // The walk error for the missing root fires first; force a direct
        // checkpoint check instead.
        assert!(matches!(
            pipeline.checkpoint(),
            Err(ScanError::Interrupted)
        ));
    }

    #[test]
    fn link_node_drops_unresolved_targets() {
        let mut graph = DependencyGraph::new();
        let mut node = ModuleNode::detected("a", None);
        node.raw_imports = vec![
            RawImport::module("requests", 1),
            RawImport::module("b", 2),
        ];
        graph.add_node(node);
        graph.add_node(ModuleNode::detected("b", None));

        let resolver = ReexportResolver::new(&graph, None);
        let mut cache = ResolveCache::new();
        let source = graph.get("a").unwrap();
        let targets = link_node(source, &graph, &resolver, &mut cache);
        assert_eq!(targets, BTreeSet::from(["b".to_string()]));
    }
}
