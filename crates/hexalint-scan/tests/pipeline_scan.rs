//! End-to-end pipeline tests over a real temporary source tree.

use std::fs;
use std::path::Path;

use hexalint_core::{NodeStatus, Passport, ScanOptions, Severity};
use hexalint_scan::{ScanOutcome, ScanPipeline};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A small two-context project with one violation of each major kind.
fn fixture_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "src/main.py", "from billing import Order\n");

    write(
        root,
        "src/billing/__init__.py",
        "from billing.domain.order import Order\n",
    );
    write(root, "src/billing/domain/__init__.py", "");
    write(root, "src/billing/domain/order.py", "class Order:\n    pass\n");
    write(
        root,
        "src/billing/domain/order_service.py",
        "from billing.adapters.driven.db_repo import DbRepo\n",
    );
    write(root, "src/billing/adapters/__init__.py", "");
    write(root, "src/billing/adapters/driven/__init__.py", "");
    write(
        root,
        "src/billing/adapters/driven/db_repo.py",
        "from billing.domain.order import Order\n",
    );
    write(root, "src/billing/adapters/driving/__init__.py", "");
    write(
        root,
        "src/billing/adapters/driving/api.py",
        "from invoicing.adapters.driven.repo import Repo\n",
    );

    write(root, "src/invoicing/__init__.py", "");
    write(root, "src/invoicing/adapters/__init__.py", "");
    write(root, "src/invoicing/adapters/driven/__init__.py", "");
    write(root, "src/invoicing/adapters/driven/repo.py", "class Repo:\n    pass\n");

    write(root, "src/shared/__init__.py", "");
    write(root, "src/shared/helpers/__init__.py", "");
    write(
        root,
        "src/shared/helpers/util.py",
        "from billing.domain.order import Order\n",
    );

    dir
}

fn scan(root: &Path) -> ScanOutcome {
    ScanPipeline::new(root, ScanOptions::default())
        .run()
        .unwrap()
}

#[test]
fn finds_expected_violations() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    let rules: Vec<&str> = outcome
        .report
        .violations
        .iter()
        .map(|v| v.rule.as_str())
        .collect();

    assert!(rules.contains(&"Domain Purity"));
    assert!(rules.contains(&"Shared Independence"));
    assert!(rules.contains(&"Cross-Context Outbound"));
    assert!(rules.contains(&"Cross-Context Inbound"));
    assert!(outcome.report.has_errors());
}

#[test]
fn domain_purity_edge_is_reported_once() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    let purity: Vec<_> = outcome
        .report
        .violations
        .iter()
        .filter(|v| v.rule == "Domain Purity")
        .collect();

    assert_eq!(purity.len(), 1);
    assert_eq!(purity[0].severity, Severity::Error);
    assert_eq!(purity[0].source_module, "billing.domain.order_service");
    assert_eq!(purity[0].target_module, "billing.adapters.driven.db_repo");
}

#[test]
fn cross_context_edge_accumulates_both_violations() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    let cross: Vec<&str> = outcome
        .report
        .violations
        .iter()
        .filter(|v| v.source_module == "billing.adapters.driving.api")
        .map(|v| v.rule.as_str())
        .collect();

    assert_eq!(cross, vec!["Cross-Context Inbound", "Cross-Context Outbound"]);
}

#[test]
fn driven_adapter_importing_domain_is_clean() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    assert!(!outcome
        .report
        .violations
        .iter()
        .any(|v| v.source_module == "billing.adapters.driven.db_repo"));
}

#[test]
fn reexport_resolves_through_package_init() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    // main.py imports Order from the billing package; the edge lands on
    // the defining module, not the package.
    let main = outcome.graph.get("main").unwrap();
    assert!(main.imports.contains("billing.domain.order"));
}

#[test]
fn all_nodes_end_classified() {
    let dir = fixture_project();
    let outcome = scan(dir.path());

    assert!(outcome.graph.len() >= 10);
    for node in outcome.graph.nodes() {
        assert_eq!(node.status, NodeStatus::Classified, "{}", node.path);
        assert!(node.passport.is_some(), "{}", node.path);
    }
}

#[test]
fn scanning_twice_is_idempotent() {
    let dir = fixture_project();
    let first = scan(dir.path());
    let second = scan(dir.path());

    let snapshot = |o: &ScanOutcome| -> Vec<(String, Option<Passport>)> {
        o.graph
            .nodes()
            .map(|n| (n.path.clone(), n.passport.clone()))
            .collect()
    };

    assert_eq!(first.report.violations, second.report.violations);
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(
        first.graph.edges().collect::<Vec<_>>(),
        second.graph.edges().collect::<Vec<_>>()
    );
}

#[test]
fn parse_failure_degrades_to_counter() {
    let dir = fixture_project();
    write(dir.path(), "src/broken.py", "def broken(:\n");

    let outcome = scan(dir.path());
    assert_eq!(outcome.report.parse_failures, 1);

    // The module is still registered, with zero imports.
    let node = outcome.graph.get("broken").unwrap();
    assert!(node.imports.is_empty());
    assert_eq!(node.status, NodeStatus::Classified);
}

#[test]
fn ignore_files_are_counted_as_skipped() {
    let dir = fixture_project();
    write(dir.path(), "src/conftest.py", "import billing\n");

    let mut options = ScanOptions::default();
    options.ignore_files = vec!["conftest.py".into()];

    let outcome = ScanPipeline::new(dir.path(), options).run().unwrap();
    assert_eq!(outcome.report.files_skipped, 1);
    assert!(outcome.graph.get("conftest").is_none());
}

#[test]
fn external_imports_create_no_edges() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/app_module.py", "import requests\nimport os\n");

    let outcome = scan(dir.path());
    let node = outcome.graph.get("app_module").unwrap();
    assert!(node.imports.is_empty());
}
