//! Shared output formatting for scan results.

use anyhow::Result;
use hexalint_core::Severity;
use hexalint_scan::ScanOutcome;

use crate::OutputFormat;

/// Print a scan outcome in the specified format.
pub fn print(outcome: &ScanOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(outcome),
        OutputFormat::Json => return print_json(outcome),
        OutputFormat::Compact => print_compact(outcome),
    }
    Ok(())
}

fn print_text(outcome: &ScanOutcome) {
    let report = &outcome.report;
    let (errors, warnings, infos) = report.count_by_severity();

    for violation in &report.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} ({} -> {})",
            violation.rule, violation.source_module, violation.target_module
        );
        println!("  {}: {}", severity_indicator, violation.message);
        println!(
            "  = layers: {} -> {}",
            violation.source_layer, violation.target_layer
        );
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s) ({} skipped, {} unparseable)\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        report.files_scanned,
        report.files_skipped,
        report.parse_failures,
    );
}

fn print_json(outcome: &ScanOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(&outcome.report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(outcome: &ScanOutcome) {
    for violation in &outcome.report.violations {
        println!("{violation}");
    }
}
