//! Boundary tokens: the path vocabulary the classifier recognizes.
//!
//! Every regex here full-matches a single path segment, case-insensitively.
//! The tables are compiled once at first use and shared read-only across
//! all classification workers.

use hexalint_core::{Direction, Layer};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Compile a case-insensitive full-match regex for one path segment.
pub(crate) fn segment_regex(pattern: &str) -> Regex {
    #[allow(clippy::expect_used)] // patterns are static and covered by tests
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .expect("invalid builtin segment pattern")
}

/// Layer tokens, scanned left to right during boundary discovery.
pub(crate) static LAYER_TOKENS: Lazy<Vec<(Regex, Layer)>> = Lazy::new(|| {
    vec![
        (segment_regex("domain"), Layer::Domain),
        (segment_regex("app|application|usecases?"), Layer::App),
        (segment_regex("ports?"), Layer::Ports),
        (
            segment_regex("adapters?|infrastructure|infra"),
            Layer::Adapters,
        ),
        (segment_regex("composition|bootstrap|di"), Layer::Composition),
        (segment_regex("global|kernel"), Layer::Global),
    ]
});

/// Direction tokens, scanned among the segments after the layer token.
pub(crate) static DIRECTION_TOKENS: Lazy<Vec<(Regex, Direction)>> = Lazy::new(|| {
    vec![
        (
            segment_regex("driving|inbound|primary|incoming"),
            Direction::Driving,
        ),
        (
            segment_regex("driven|outbound|secondary|outgoing"),
            Direction::Driven,
        ),
    ]
});

/// Folder names that mark the shared kernel.
pub(crate) static SHARED_SCOPE: Lazy<Regex> =
    Lazy::new(|| segment_regex("shared|shared_kernel|sharedkernel|common"));

/// Folder names that mark the root composition shell.
pub(crate) static ROOT_SCOPE: Lazy<Regex> = Lazy::new(|| segment_regex("root|main|runtime"));

/// Dunder marker form: `__init__`, `__main__`, ...
pub(crate) static DUNDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^__\w+__$").expect("invalid dunder pattern")
});

/// Find the layer a single path segment names, if any.
pub(crate) fn match_layer(segment: &str) -> Option<Layer> {
    LAYER_TOKENS
        .iter()
        .find(|(re, _)| re.is_match(segment))
        .map(|&(_, layer)| layer)
}

/// Find the direction a single path segment names, if any.
pub(crate) fn match_direction(segment: &str) -> Option<Direction> {
    DIRECTION_TOKENS
        .iter()
        .find(|(re, _)| re.is_match(segment))
        .map(|&(_, direction)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_tokens_full_match_only() {
        assert_eq!(match_layer("domain"), Some(Layer::Domain));
        assert_eq!(match_layer("DOMAIN"), Some(Layer::Domain));
        assert_eq!(match_layer("domains"), None);
        assert_eq!(match_layer("subdomain"), None);
    }

    #[test]
    fn layer_token_synonyms() {
        assert_eq!(match_layer("application"), Some(Layer::App));
        assert_eq!(match_layer("usecases"), Some(Layer::App));
        assert_eq!(match_layer("infra"), Some(Layer::Adapters));
        assert_eq!(match_layer("port"), Some(Layer::Ports));
    }

    #[test]
    fn direction_tokens() {
        assert_eq!(match_direction("driving"), Some(Direction::Driving));
        assert_eq!(match_direction("inbound"), Some(Direction::Driving));
        assert_eq!(match_direction("driven"), Some(Direction::Driven));
        assert_eq!(match_direction("outbound"), Some(Direction::Driven));
        assert_eq!(match_direction("sideways"), None);
    }

    #[test]
    fn scope_patterns() {
        assert!(SHARED_SCOPE.is_match("shared"));
        assert!(SHARED_SCOPE.is_match("shared_kernel"));
        assert!(!SHARED_SCOPE.is_match("sharedstuff"));
        assert!(ROOT_SCOPE.is_match("root"));
        assert!(!ROOT_SCOPE.is_match("rooting"));
    }

    #[test]
    fn dunder_marker_form() {
        assert!(DUNDER.is_match("__init__"));
        assert!(DUNDER.is_match("__main__"));
        assert!(!DUNDER.is_match("__init"));
        assert!(!DUNDER.is_match("init"));
    }
}
