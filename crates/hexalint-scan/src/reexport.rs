//! Symbol-level re-export resolution.
//!
//! `from pkg import Thing` may name `pkg.thing`, a symbol defined in
//! `pkg/__init__.py`, or a symbol forwarded N hops deep through nested
//! `__init__` chains. The resolver traces a `(module, name)` pair to the
//! module that actually defines the symbol.
//!
//! The walk is an explicit iterative loop carrying a visited set, so
//! re-export cycles terminate deterministically instead of recursing
//! forever. Cost is linear in chain depth, never in graph size.

use std::collections::{HashMap, HashSet};

use hexalint_core::DependencyGraph;

/// Per-worker memoization of `(module, name) -> resolved module`.
pub type ResolveCache = HashMap<(String, String), String>;

/// Resolves imported symbols to their defining modules against a complete,
/// read-only module registry.
pub struct ReexportResolver<'g> {
    graph: &'g DependencyGraph,
    root_prefix: Option<String>,
}

impl<'g> ReexportResolver<'g> {
    /// Creates a resolver over a fully ingested graph. `root_prefix` is the
    /// dotted source-dir prefix (e.g. `"src"`) stripped from import targets
    /// that still carry it literally.
    #[must_use]
    pub fn new(graph: &'g DependencyGraph, root_prefix: Option<String>) -> Self {
        Self { graph, root_prefix }
    }

    /// Strips the source-root prefix when the raw target still carries it
    /// and the stripped path is a registered module.
    #[must_use]
    pub fn normalize(&self, module: &str) -> String {
        if self.graph.contains(module) {
            return module.to_string();
        }
        if let Some(prefix) = &self.root_prefix {
            if let Some(stripped) = module.strip_prefix(&format!("{prefix}.")) {
                if self.graph.contains(stripped) {
                    return stripped.to_string();
                }
            }
        }
        module.to_string()
    }

    /// Traces `(start_module, name)` to the module defining `name`.
    ///
    /// Steps, in order: normalize the start module; cycle guard (a cycle
    /// resolves to its smallest member, the same answer for every entry
    /// point); submodule check (`module.name` registered as a module wins
    /// over a symbol lookup); unknown-container terminal case (external
    /// dependency or the synthetic root); re-export scan over the
    /// container's raw imports; local-definition fallback.
    #[must_use]
    pub fn resolve(&self, start_module: &str, name: &str, cache: &mut ResolveCache) -> String {
        let mut module = self.normalize(start_module);
        let mut visited: HashSet<(String, String)> = HashSet::new();
        let mut chain: Vec<(String, String)> = Vec::new();

        let result = loop {
            let key = (module.clone(), name.to_string());
            if let Some(hit) = cache.get(&key) {
                break hit.clone();
            }
            if !visited.insert(key.clone()) {
                // Re-export cycle. Every member of the cycle must resolve
                // to the same module, whichever one the walk entered at;
                // otherwise memoized chains would give answers that depend
                // on query order. The smallest member is the canonical one.
                let pos = chain.iter().position(|k| *k == key).unwrap_or(0);
                let canonical = chain[pos..]
                    .iter()
                    .map(|(m, _)| m.as_str())
                    .min()
                    .unwrap_or(module.as_str());
                break canonical.to_string();
            }
            chain.push(key);

            // The import may name a submodule, not a symbol.
            let candidate = if module.is_empty() {
                name.to_string()
            } else {
                format!("{module}.{name}")
            };
            if self.graph.contains(&candidate) {
                break candidate;
            }

            // Unknown container: external dependency or synthetic root.
            let Some(node) = self.graph.get(&module) else {
                break module;
            };

            // Re-export scan: does the container forward this name?
            match node
                .raw_imports
                .iter()
                .find(|ri| ri.names.iter().any(|n| n == name || n == "*"))
            {
                Some(forwarding) => module = self.normalize(&forwarding.target),
                // Defined locally in the container.
                None => break module,
            }
        };

        for key in chain {
            cache.insert(key, result.clone());
        }
        result
    }
}
