//! Architectural passports: the classification assigned to one module.
//!
//! A [`Passport`] is an immutable value object produced by the classification
//! engine. It records where a module sits in the architecture (scope, context,
//! macro zone), which horizontal layer it belongs to, which direction it faces
//! and what kind of component it is.

use serde::{Deserialize, Serialize};

/// Vertical placement of a module within the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Composition/wiring shell at the project root.
    Root,
    /// Cross-cutting shared kernel, importable from anywhere.
    Shared,
    /// A bounded business context.
    Context,
}

/// Horizontal slice within a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Pure business model.
    Domain,
    /// Use cases / application services.
    App,
    /// Port interfaces (driving and driven).
    Ports,
    /// Infrastructure adapters.
    Adapters,
    /// Dependency wiring.
    Composition,
    /// Shared kernel code visible to every layer.
    Global,
    /// No layer could be determined.
    Undefined,
}

impl Layer {
    /// Priority weight used when ordering classification candidates.
    /// Lower weight sorts first.
    #[must_use]
    pub fn weight(self) -> u8 {
        match self {
            Self::Composition => 0,
            Self::Domain => 1,
            Self::App => 2,
            Self::Adapters => 3,
            Self::Ports => 4,
            Self::Global => 5,
            Self::Undefined => 6,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Domain => "domain",
            Self::App => "app",
            Self::Ports => "ports",
            Self::Adapters => "adapters",
            Self::Composition => "composition",
            Self::Global => "global",
            Self::Undefined => "undefined",
        };
        write!(f, "{s}")
    }
}

/// Which side of the hexagon a ports/adapters module faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Inbound-facing (controllers, facades, inbound ports).
    Driving,
    /// Outbound-facing (repositories, gateways, outbound ports).
    Driven,
    /// Direction does not apply to this layer.
    None,
    /// Wildcard used in rule tables: matches any direction.
    Any,
    /// Direction could not be determined.
    Undefined,
}

impl Direction {
    /// Whether `self` (a concrete node direction) satisfies `pattern`
    /// (a rule-table entry, possibly a wildcard).
    #[must_use]
    pub fn satisfies(self, pattern: Direction) -> bool {
        matches!(pattern, Direction::Any) || self == pattern
    }
}

/// Which classification stage produced the component match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Matched against a folder token in the module path.
    Structural,
    /// Matched against the filename stem.
    Name,
    /// No pattern matched.
    Unknown,
}

/// Component kinds within the domain layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainComponent {
    /// Identity-bearing business object.
    Entity,
    /// Immutable value type.
    ValueObject,
    /// Consistency boundary root.
    AggregateRoot,
    /// Stateless domain operation.
    DomainService,
    /// Business fact.
    DomainEvent,
    /// Object construction logic.
    Factory,
    /// Reusable business rule.
    Policy,
}

/// Component kinds within the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppComponent {
    /// Single application operation.
    UseCase,
    /// Orchestrating application service.
    ApplicationService,
    /// Command-side handler.
    CommandHandler,
    /// Query-side handler.
    QueryHandler,
    /// Data transfer object.
    Dto,
}

/// Component kinds within the ports layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortComponent {
    /// Inbound entry-point interface for a context.
    Facade,
    /// Outbound dependency interface.
    Contract,
    /// Port-level data shape.
    Schema,
}

/// Component kinds within the adapters layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterComponent {
    /// HTTP/RPC request handler.
    Controller,
    /// Message/event consumer.
    Consumer,
    /// Persistence implementation.
    Repository,
    /// Outbound client for another system.
    Gateway,
    /// Response shaping.
    Presenter,
    /// Time-triggered entry point.
    Scheduler,
}

/// Component kinds within the composition layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionComponent {
    /// Dependency-injection container.
    Container,
    /// Process entry point.
    Bootstrap,
    /// Runtime settings.
    Settings,
}

/// Component kinds within the global (shared kernel) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalComponent {
    /// Shared base types.
    Types,
    /// Shared helper code.
    Utility,
    /// Shared constants.
    Constants,
    /// Shared error definitions.
    Errors,
}

/// Component kind, tagged by the layer whose vocabulary it belongs to.
///
/// The variant payload is the per-layer enum, so a `Domain` passport can
/// never carry an adapter component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "layer", content = "kind")]
pub enum ComponentType {
    /// Domain-layer component.
    Domain(DomainComponent),
    /// Application-layer component.
    App(AppComponent),
    /// Ports-layer component.
    Ports(PortComponent),
    /// Adapters-layer component.
    Adapters(AdapterComponent),
    /// Composition-layer component.
    Composition(CompositionComponent),
    /// Global-layer component.
    Global(GlobalComponent),
    /// Dunder marker file (`__init__`, `__main__`, ...).
    Marker,
    /// No rule matched.
    Unknown,
}

/// Immutable architectural classification of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    /// Vertical scope.
    pub scope: Scope,
    /// Bounded-context name, when the module belongs to one.
    pub context: Option<String>,
    /// Parent macro zone, when the context is nested under one.
    pub macro_zone: Option<String>,
    /// Horizontal layer.
    pub layer: Layer,
    /// Hexagon direction.
    pub direction: Direction,
    /// Component kind.
    pub component: ComponentType,
    /// Which stage produced the component match.
    pub match_method: MatchMethod,
}

impl Passport {
    /// Passport for a module the classifier could place in a layer but
    /// not match to a component kind.
    #[must_use]
    pub fn unmatched(
        scope: Scope,
        context: Option<String>,
        macro_zone: Option<String>,
        layer: Layer,
        direction: Direction,
    ) -> Self {
        Self {
            scope,
            context,
            macro_zone,
            layer,
            direction,
            component: ComponentType::Unknown,
            match_method: MatchMethod::Unknown,
        }
    }
}
