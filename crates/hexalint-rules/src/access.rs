//! Access-policy rule engine: validates one import edge against the
//! passport-based rule matrix.
//!
//! Thirteen rules in four ordered groups:
//!
//! 1. same-context internal rules (7, keyed by the source's layer/direction)
//! 2. fractal rules (2, parent/child contexts via macro zones)
//! 3. cross-context rules (2, outbound and inbound, independently checked)
//! 4. scope isolation (Shared Independence, plus the Root Isolation no-op)
//!
//! A bypass runs before everything: shared-kernel targets are always
//! allowed, and composition/global sources are exempt wiring layers.
//! Edges with a passport-less endpoint are skipped entirely.

use hexalint_core::{
    Direction, Layer, ModuleNode, Passport, Scope, Severity, Violation,
};
use tracing::trace;

/// One same-context rule: which targets a source at these coordinates
/// may depend on.
struct InternalRule {
    source: (Layer, Direction),
    rule: &'static str,
    message: &'static str,
    allowed: &'static [(Layer, Direction)],
}

/// Group 1: the internal access matrix, keyed by source coordinates.
/// A missing key means validation is silently skipped for that edge
/// (conservative default, kept intentionally).
static INTERNAL_MATRIX: &[InternalRule] = &[
    InternalRule {
        source: (Layer::Domain, Direction::None),
        rule: "Domain Purity",
        message: "domain modules may depend only on their own domain",
        allowed: &[(Layer::Domain, Direction::Any)],
    },
    InternalRule {
        source: (Layer::App, Direction::None),
        rule: "App Isolation",
        message: "application modules may depend only on domain and ports",
        allowed: &[
            (Layer::Domain, Direction::Any),
            (Layer::App, Direction::Any),
            (Layer::Ports, Direction::Any),
        ],
    },
    InternalRule {
        source: (Layer::Ports, Direction::Driving),
        rule: "Driving Port Boundary",
        message: "driving ports may depend only on domain and other driving ports",
        allowed: &[
            (Layer::Domain, Direction::Any),
            (Layer::Ports, Direction::Driving),
        ],
    },
    InternalRule {
        source: (Layer::Ports, Direction::Driven),
        rule: "Driven Port Boundary",
        message: "driven ports may depend only on domain and other driven ports",
        allowed: &[
            (Layer::Domain, Direction::Any),
            (Layer::Ports, Direction::Driven),
        ],
    },
    InternalRule {
        source: (Layer::Adapters, Direction::Driving),
        rule: "Driving Adapter Boundary",
        message: "driving adapters may depend on driving ports, app and domain",
        allowed: &[
            (Layer::Ports, Direction::Driving),
            (Layer::App, Direction::Any),
            (Layer::Domain, Direction::Any),
            (Layer::Adapters, Direction::Driving),
        ],
    },
    InternalRule {
        source: (Layer::Adapters, Direction::Driven),
        rule: "Driven Adapter Boundary",
        message: "driven adapters may depend on driven ports and domain",
        allowed: &[
            (Layer::Ports, Direction::Driven),
            (Layer::Domain, Direction::Any),
            (Layer::Adapters, Direction::Driven),
        ],
    },
    InternalRule {
        source: (Layer::Adapters, Direction::Undefined),
        rule: "Adapter Boundary",
        message: "adapters may depend on ports, app and domain",
        allowed: &[
            (Layer::Ports, Direction::Any),
            (Layer::App, Direction::Any),
            (Layer::Domain, Direction::Any),
            (Layer::Adapters, Direction::Any),
        ],
    },
];

/// Group 2 upstream rule: targets a child context may reach in its parent.
static FRACTAL_UPSTREAM_ALLOWED: &[(Layer, Direction)] = &[
    (Layer::Domain, Direction::Any),
    (Layer::App, Direction::Any),
    (Layer::Ports, Direction::Driven),
];

/// Group 2 downstream rule: a parent may enter a child only via its facade.
static FRACTAL_DOWNSTREAM_ALLOWED: &[(Layer, Direction)] =
    &[(Layer::Ports, Direction::Driving)];

/// Group 3: source coordinates allowed to initiate cross-context calls.
/// Only the anti-corruption side of a context may call out.
static OUTBOUND_ALLOWED: &[(Layer, Direction)] = &[(Layer::Adapters, Direction::Driven)];

/// Group 3: target coordinates visible to other contexts.
/// Only driving ports (facades) are public.
static INBOUND_ALLOWED: &[(Layer, Direction)] = &[(Layer::Ports, Direction::Driving)];

fn pair_allowed(passport: &Passport, allowed: &[(Layer, Direction)]) -> bool {
    allowed
        .iter()
        .any(|&(layer, dir)| passport.layer == layer && passport.direction.satisfies(dir))
}

/// Validates edges between classified module nodes.
#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    /// Creates a rule engine. All rule tables are static.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Evaluates one import edge and returns every violation it produces.
    ///
    /// Evaluation stops at the first violation per category, but independent
    /// categories (cross-context outbound and inbound) can both fire on the
    /// same edge. Passport-less endpoints skip validation entirely.
    #[must_use]
    pub fn evaluate(&self, source: &ModuleNode, target: &ModuleNode) -> Vec<Violation> {
        let (Some(sp), Some(tp)) = (&source.passport, &target.passport) else {
            trace!(source = %source.path, target = %target.path, "skipping unclassified edge");
            return Vec::new();
        };

        // Bypass: shared-kernel targets are importable from anywhere;
        // composition and global sources are exempt wiring layers.
        if tp.scope == Scope::Shared {
            return Vec::new();
        }
        if matches!(sp.layer, Layer::Composition | Layer::Global) {
            return Vec::new();
        }

        // Group 4: scope isolation. A shared-kernel source may depend only
        // on shared or global targets. Root-scope isolation (rule 13) is a
        // structural convention and is intentionally not enforced here.
        if sp.scope == Scope::Shared {
            if tp.layer == Layer::Global {
                return Vec::new();
            }
            return vec![self.violation(
                "Shared Independence",
                "shared kernel modules must not depend on contexts",
                source,
                sp,
                target,
                tp,
            )];
        }

        // Group 1: same-context internal rules.
        if sp.scope == Scope::Context && tp.scope == Scope::Context && sp.context == tp.context
        {
            return self.check_internal(source, sp, target, tp);
        }

        // Group 2: fractal (parent/child) rules.
        if zones_match(&sp.macro_zone, &tp.context) {
            // Child reaching up into its parent context.
            if pair_allowed(tp, FRACTAL_UPSTREAM_ALLOWED) {
                return Vec::new();
            }
            return vec![self.violation(
                "Fractal Upstream Access",
                "a child context may reach its parent only through domain, app or driven ports",
                source,
                sp,
                target,
                tp,
            )];
        }
        if zones_match(&tp.macro_zone, &sp.context) {
            // Parent reaching down into a child context.
            if pair_allowed(tp, FRACTAL_DOWNSTREAM_ALLOWED) {
                return Vec::new();
            }
            return vec![self.violation(
                "Fractal Downstream Access",
                "a parent context may enter a child only through its driving-port facade",
                source,
                sp,
                target,
                tp,
            )];
        }

        // Group 3: cross-context rules. Outbound and inbound are independent
        // categories; both can fire on one edge.
        let mut violations = Vec::new();
        if !pair_allowed(sp, OUTBOUND_ALLOWED) {
            violations.push(self.violation(
                "Cross-Context Outbound",
                "only driven adapters may initiate cross-context calls",
                source,
                sp,
                target,
                tp,
            ));
        }
        if !pair_allowed(tp, INBOUND_ALLOWED) {
            violations.push(self.violation(
                "Cross-Context Inbound",
                "only driving-port facades are visible to other contexts",
                source,
                sp,
                target,
                tp,
            ));
        }
        violations
    }

    fn check_internal(
        &self,
        source: &ModuleNode,
        sp: &Passport,
        target: &ModuleNode,
        tp: &Passport,
    ) -> Vec<Violation> {
        // The global layer is visible to every layer of its context.
        if tp.layer == Layer::Global {
            return Vec::new();
        }

        let Some(rule) = INTERNAL_MATRIX
            .iter()
            .find(|r| r.source == (sp.layer, sp.direction))
        else {
            // No matrix entry for these coordinates: validation is skipped,
            // not flagged. See the access-policy notes in DESIGN.md.
            trace!(
                source = %source.path,
                layer = %sp.layer,
                "no internal rule for source coordinates, skipping"
            );
            return Vec::new();
        };

        if pair_allowed(tp, rule.allowed) {
            return Vec::new();
        }

        vec![self.violation(rule.rule, rule.message, source, sp, target, tp)]
    }

    #[allow(clippy::unused_self)]
    fn violation(
        &self,
        rule: &str,
        message: &str,
        source: &ModuleNode,
        sp: &Passport,
        target: &ModuleNode,
        tp: &Passport,
    ) -> Violation {
        Violation::new(
            rule,
            Severity::Error,
            format!(
                "{message}: {} ({}) imports {} ({})",
                source.path, sp.layer, target.path, tp.layer
            ),
            source.path.clone(),
            sp.layer,
            target.path.clone(),
            tp.layer,
            tp.context.clone(),
        )
    }
}

/// Both sides present and equal.
fn zones_match(zone: &Option<String>, context: &Option<String>) -> bool {
    matches!((zone, context), (Some(z), Some(c)) if z == c)
}
