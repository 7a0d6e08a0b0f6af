//! Component pattern table: the classifier's knowledge base.
//!
//! One flat table of `(layer, direction, component, regex)` entries, compiled
//! once at first use. Stage 2 filters and orders it per node; stages 3/4 run
//! the regexes against folder tokens and the filename stem.

use hexalint_core::{
    AdapterComponent, AppComponent, ComponentType, CompositionComponent, Direction,
    DomainComponent, GlobalComponent, Layer, PortComponent,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::segment_regex;

/// One classification rule: pattern plus the coordinates it applies to.
#[derive(Debug)]
pub(crate) struct ComponentPattern {
    /// Layer this pattern belongs to.
    pub layer: Layer,
    /// Direction this pattern applies to. `Any`/`None` act as wildcards.
    pub direction: Direction,
    /// Component assigned on match.
    pub component: ComponentType,
    /// Compiled full-match regex.
    pub regex: Regex,
    /// Raw pattern length, used as a specificity tiebreaker.
    pub pattern_len: usize,
}

fn entry(
    layer: Layer,
    direction: Direction,
    component: ComponentType,
    pattern: &str,
) -> ComponentPattern {
    ComponentPattern {
        layer,
        direction,
        component,
        regex: segment_regex(pattern),
        pattern_len: pattern.len(),
    }
}

/// The full pattern table. Immutable, shared across workers.
pub(crate) static COMPONENT_PATTERNS: Lazy<Vec<ComponentPattern>> = Lazy::new(|| {
    use ComponentType as C;
    use Direction as D;
    use Layer as L;

    vec![
        // Domain
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::AggregateRoot),
            "aggregates?|aggregate_roots?",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::Entity),
            "entit(?:y|ies)|models?",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::ValueObject),
            "value_objects?|values?|vo",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::DomainService),
            "services?",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::DomainEvent),
            "events?",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::Factory),
            "factor(?:y|ies)",
        ),
        entry(
            L::Domain,
            D::None,
            C::Domain(DomainComponent::Policy),
            "polic(?:y|ies)|specifications?",
        ),
        // App
        entry(
            L::App,
            D::None,
            C::App(AppComponent::UseCase),
            "use_cases?|usecases?|interactors?",
        ),
        entry(
            L::App,
            D::None,
            C::App(AppComponent::ApplicationService),
            "services?",
        ),
        entry(
            L::App,
            D::None,
            C::App(AppComponent::CommandHandler),
            "commands?|command_handlers?",
        ),
        entry(
            L::App,
            D::None,
            C::App(AppComponent::QueryHandler),
            "quer(?:y|ies)|query_handlers?",
        ),
        entry(L::App, D::None, C::App(AppComponent::Dto), "dtos?"),
        // Ports
        entry(
            L::Ports,
            D::Driving,
            C::Ports(PortComponent::Facade),
            "facades?|api",
        ),
        entry(
            L::Ports,
            D::Driven,
            C::Ports(PortComponent::Contract),
            "contracts?|spi",
        ),
        entry(
            L::Ports,
            D::Any,
            C::Ports(PortComponent::Schema),
            "schemas?|messages?|dtos?",
        ),
        // Adapters
        entry(
            L::Adapters,
            D::Driving,
            C::Adapters(AdapterComponent::Controller),
            "controllers?|routes?|views?|handlers?|rest",
        ),
        entry(
            L::Adapters,
            D::Driving,
            C::Adapters(AdapterComponent::Consumer),
            "consumers?|listeners?|subscribers?",
        ),
        entry(
            L::Adapters,
            D::Driving,
            C::Adapters(AdapterComponent::Scheduler),
            "schedulers?|jobs?|cron",
        ),
        entry(
            L::Adapters,
            D::Driving,
            C::Adapters(AdapterComponent::Presenter),
            "presenters?|serializers?",
        ),
        entry(
            L::Adapters,
            D::Driven,
            C::Adapters(AdapterComponent::Repository),
            "repositor(?:y|ies)|repos?|dao",
        ),
        entry(
            L::Adapters,
            D::Driven,
            C::Adapters(AdapterComponent::Gateway),
            "gateways?|clients?|brokers?|publishers?",
        ),
        // Composition
        entry(
            L::Composition,
            D::None,
            C::Composition(CompositionComponent::Container),
            "containers?|di|wiring",
        ),
        entry(
            L::Composition,
            D::None,
            C::Composition(CompositionComponent::Bootstrap),
            "bootstrap|main|entrypoints?",
        ),
        entry(
            L::Composition,
            D::None,
            C::Composition(CompositionComponent::Settings),
            "settings?|config|configuration",
        ),
        // Global
        entry(
            L::Global,
            D::Any,
            C::Global(GlobalComponent::Types),
            "types?|base",
        ),
        entry(
            L::Global,
            D::Any,
            C::Global(GlobalComponent::Utility),
            "utils?|utilit(?:y|ies)|helpers?",
        ),
        entry(
            L::Global,
            D::Any,
            C::Global(GlobalComponent::Constants),
            "constants?|consts?",
        ),
        entry(
            L::Global,
            D::Any,
            C::Global(GlobalComponent::Errors),
            "errors?|exceptions?",
        ),
    ]
});

/// Stage 2: candidates for a node's coordinates, in priority order.
///
/// Filtered to the node's layer plus the universal `Global` fallback, and to
/// the node's direction plus the `Any`/`None` wildcards; ordered by layer
/// weight ascending then pattern length descending.
pub(crate) fn prioritized_candidates(
    layer: Layer,
    direction: Direction,
) -> Vec<&'static ComponentPattern> {
    let mut candidates: Vec<&ComponentPattern> = COMPONENT_PATTERNS
        .iter()
        .filter(|p| p.layer == layer || p.layer == Layer::Global)
        .filter(|p| {
            matches!(p.direction, Direction::Any | Direction::None) || p.direction == direction
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.layer
            .weight()
            .cmp(&b.layer.weight())
            .then(b.pattern_len.cmp(&a.pattern_len))
    });

    candidates
}
