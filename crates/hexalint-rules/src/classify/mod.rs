//! Classification engine: assigns an architectural passport to a module
//! from its logical path and filename, in four ordered stages.
//!
//! - Stage 0, boundary discovery: find the layer token and derive context,
//!   macro zone and scope from the segments before it.
//! - Stage 1, coordinate definition: find the direction token and strip both
//!   token segments, leaving searchable tokens.
//! - Stage 2, rule prioritization: filter and order the component pattern
//!   table for the node's coordinates.
//! - Stage 3/4, matching: folder tokens first (structural), filename stem
//!   second (name), first hit wins.
//!
//! Classification is a pure function of one node; it reads no other node.

mod tables;
mod tokens;

use std::collections::HashMap;

use hexalint_core::{
    ComponentType, Direction, Layer, MatchMethod, ModuleNode, Passport, ScanOptions, Scope,
};
use tracing::trace;

use tables::prioritized_candidates;
use tokens::{match_direction, match_layer, DUNDER, ROOT_SCOPE, SHARED_SCOPE};

/// Assigns passports to module nodes.
///
/// Holds only the macro-context normalization map; all pattern tables are
/// static. Cheap to share across parallel workers.
pub struct Classifier {
    /// Physical folder name -> zone tag, inverted from the options map.
    folder_to_zone: HashMap<String, String>,
}

impl Classifier {
    /// Builds a classifier from scan options.
    #[must_use]
    pub fn new(options: &ScanOptions) -> Self {
        let folder_to_zone = options
            .macro_contexts
            .iter()
            .map(|(tag, folder)| (folder.clone(), tag.clone()))
            .collect();
        Self { folder_to_zone }
    }

    /// Classifies one node. Never fails: unmatched nodes get an `Unknown`
    /// component with `match_method = Unknown`.
    #[must_use]
    pub fn classify(&self, node: &ModuleNode) -> Passport {
        let segments = self.normalized_segments(&node.path);
        let stem = file_stem(node);

        // Stage 0: boundary discovery.
        let boundary = discover_boundary(&segments, stem);

        // Stage 1: coordinate definition.
        let (layer, direction, scope, searchable) = define_coordinates(&segments, &boundary);

        trace!(
            path = %node.path,
            ?scope,
            ?layer,
            ?direction,
            "classified boundary"
        );

        // Dunder marker interception: stages 2-4 do not run.
        if DUNDER.is_match(stem) {
            return Passport {
                scope,
                context: boundary.context,
                macro_zone: boundary.macro_zone,
                layer,
                direction,
                component: ComponentType::Marker,
                match_method: MatchMethod::Name,
            };
        }

        // Stage 2: rule prioritization.
        let candidates = prioritized_candidates(layer, direction);

        // Stage 3: structural match against searchable folder tokens.
        for candidate in &candidates {
            if searchable.iter().any(|tok| candidate.regex.is_match(tok)) {
                return Passport {
                    scope,
                    context: boundary.context,
                    macro_zone: boundary.macro_zone,
                    layer,
                    direction,
                    component: candidate.component,
                    match_method: MatchMethod::Structural,
                };
            }
        }

        // Stage 4: name match against the filename stem and its parts.
        for candidate in &candidates {
            let hit = candidate.regex.is_match(stem)
                || stem.split('_').any(|part| candidate.regex.is_match(part));
            if hit {
                return Passport {
                    scope,
                    context: boundary.context,
                    macro_zone: boundary.macro_zone,
                    layer,
                    direction,
                    component: candidate.component,
                    match_method: MatchMethod::Name,
                };
            }
        }

        Passport::unmatched(scope, boundary.context, boundary.macro_zone, layer, direction)
    }

    /// Split the dotted path and map a leading macro-context folder to its
    /// configured zone tag.
    fn normalized_segments(&self, path: &str) -> Vec<String> {
        path.split('.')
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, seg)| {
                if i == 0 {
                    if let Some(tag) = self.folder_to_zone.get(seg) {
                        return tag.clone();
                    }
                }
                seg.to_string()
            })
            .collect()
    }
}

/// Stage 0 output.
struct Boundary {
    /// Index of the layer-token segment, when one was found.
    layer_idx: Option<usize>,
    layer: Layer,
    context: Option<String>,
    macro_zone: Option<String>,
}

/// The filename stem used for dunder interception and name matching.
/// Falls back to the last path segment for synthetic nodes.
fn file_stem(node: &ModuleNode) -> &str {
    node.file_path
        .as_deref()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or_else(|| node.path.rsplit('.').next().unwrap_or(""))
}

fn discover_boundary(segments: &[String], stem: &str) -> Boundary {
    // First segment naming a layer, scanning left to right.
    if let Some((idx, layer)) = segments
        .iter()
        .enumerate()
        .find_map(|(i, s)| match_layer(s).map(|l| (i, l)))
    {
        let context = idx.checked_sub(1).map(|i| segments[i].clone());
        let macro_zone = idx.checked_sub(2).map(|i| segments[i].clone());
        return Boundary {
            layer_idx: Some(idx),
            layer,
            context,
            macro_zone,
        };
    }

    // Fallback: the filename itself may name the layer.
    if let Some(layer) = match_layer(stem) {
        let context = if segments.len() > 1 {
            Some(segments[0].clone())
        } else {
            None
        };
        return Boundary {
            layer_idx: None,
            layer,
            context,
            macro_zone: None,
        };
    }

    // Generic rule: top folder is the context; layer stays undefined.
    let context = if segments.len() > 1 {
        Some(segments[0].clone())
    } else {
        None
    };
    Boundary {
        layer_idx: None,
        layer: Layer::Undefined,
        context,
        macro_zone: None,
    }
}

fn define_coordinates(
    segments: &[String],
    boundary: &Boundary,
) -> (Layer, Direction, Scope, Vec<String>) {
    let scope = infer_scope(segments, boundary);

    // Root scope with no explicit layer defaults to the composition shell.
    let layer = if scope == Scope::Root && boundary.layer == Layer::Undefined {
        Layer::Composition
    } else {
        boundary.layer
    };

    // Segments after the layer token, minus the module name itself, are the
    // direction candidates and searchable tokens.
    let after: &[String] = match boundary.layer_idx {
        Some(idx) => &segments[idx + 1..],
        None => {
            if segments.len() > 1 {
                &segments[1..]
            } else {
                &[]
            }
        }
    };
    let middle = if after.is_empty() {
        &[] as &[String]
    } else {
        &after[..after.len() - 1]
    };

    let direction_hit = middle
        .iter()
        .enumerate()
        .find_map(|(i, s)| match_direction(s).map(|d| (i, d)));

    let direction = match direction_hit {
        Some((_, d)) => d,
        None if matches!(layer, Layer::Ports | Layer::Adapters) => Direction::Undefined,
        None => Direction::None,
    };

    let searchable: Vec<String> = middle
        .iter()
        .enumerate()
        .filter(|(i, _)| direction_hit.map_or(true, |(di, _)| *i != di))
        .map(|(_, s)| s.clone())
        .collect();

    (layer, direction, scope, searchable)
}

fn infer_scope(segments: &[String], boundary: &Boundary) -> Scope {
    if let Some(context) = &boundary.context {
        if SHARED_SCOPE.is_match(context) {
            return Scope::Shared;
        }
        if ROOT_SCOPE.is_match(context) {
            return Scope::Root;
        }
        return Scope::Context;
    }

    // No context segment. A module directly at the source root belongs to
    // the composition shell unless its own name marks it shared.
    match segments.first() {
        Some(first) if SHARED_SCOPE.is_match(first) => Scope::Shared,
        Some(_) if segments.len() == 1 => Scope::Root,
        _ => Scope::Context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexalint_core::{AdapterComponent, DomainComponent, PortComponent};
    use std::path::PathBuf;

    fn classify(path: &str) -> Passport {
        classify_with(path, &ScanOptions::default())
    }

    fn classify_with(path: &str, options: &ScanOptions) -> Passport {
        let file = format!("src/{}.py", path.replace('.', "/"));
        let node = ModuleNode::detected(path, Some(PathBuf::from(file)));
        Classifier::new(options).classify(&node)
    }

    #[test]
    fn structural_match_in_domain() {
        let p = classify("billing.domain.entities.order");
        assert_eq!(p.scope, Scope::Context);
        assert_eq!(p.context.as_deref(), Some("billing"));
        assert_eq!(p.layer, Layer::Domain);
        assert_eq!(p.direction, Direction::None);
        assert_eq!(p.component, ComponentType::Domain(DomainComponent::Entity));
        assert_eq!(p.match_method, MatchMethod::Structural);
    }

    #[test]
    fn name_match_falls_back_to_stem() {
        let p = classify("billing.domain.order_service");
        assert_eq!(p.layer, Layer::Domain);
        assert_eq!(
            p.component,
            ComponentType::Domain(DomainComponent::DomainService)
        );
        assert_eq!(p.match_method, MatchMethod::Name);
    }

    #[test]
    fn adapter_direction_from_path() {
        let p = classify("billing.adapters.driven.db_repo");
        assert_eq!(p.layer, Layer::Adapters);
        assert_eq!(p.direction, Direction::Driven);
        assert_eq!(
            p.component,
            ComponentType::Adapters(AdapterComponent::Repository)
        );
    }

    #[test]
    fn driving_port_facade() {
        let p = classify("scanner.detection.ports.driving.facade");
        assert_eq!(p.context.as_deref(), Some("detection"));
        assert_eq!(p.macro_zone.as_deref(), Some("scanner"));
        assert_eq!(p.layer, Layer::Ports);
        assert_eq!(p.direction, Direction::Driving);
        assert_eq!(p.component, ComponentType::Ports(PortComponent::Facade));
    }

    #[test]
    fn shared_scope_without_layer_token() {
        let p = classify("shared.helpers.util");
        assert_eq!(p.scope, Scope::Shared);
        assert_eq!(p.context.as_deref(), Some("shared"));
        assert_eq!(p.layer, Layer::Undefined);
    }

    #[test]
    fn root_module_defaults_to_composition() {
        let p = classify("main");
        assert_eq!(p.scope, Scope::Root);
        assert_eq!(p.layer, Layer::Composition);
    }

    #[test]
    fn dunder_marker_short_circuits() {
        let node = ModuleNode::detected("billing.domain", Some(PathBuf::from("src/billing/domain/__init__.py")));
        let p = Classifier::new(&ScanOptions::default()).classify(&node);
        assert_eq!(p.component, ComponentType::Marker);
        assert_eq!(p.layer, Layer::Domain);
        assert_eq!(p.context.as_deref(), Some("billing"));
    }

    #[test]
    fn unknown_when_nothing_matches() {
        let p = classify("billing.domain.xyzzy");
        assert_eq!(p.component, ComponentType::Unknown);
        assert_eq!(p.match_method, MatchMethod::Unknown);
        assert_eq!(p.layer, Layer::Domain);
    }

    #[test]
    fn macro_context_folder_is_normalized() {
        let mut options = ScanOptions::default();
        options
            .macro_contexts
            .insert("root".into(), "contexts".into());
        let p = classify_with("contexts.billing.domain.order", &options);
        assert_eq!(p.macro_zone.as_deref(), Some("root"));
        assert_eq!(p.context.as_deref(), Some("billing"));
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify("billing.adapters.driving.api");
        let b = classify("billing.adapters.driving.api");
        assert_eq!(a, b);
    }
}
