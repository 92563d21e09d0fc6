//! Shared output formatting for check results.

use anyhow::Result;
use miette::NamedSource;
use theme_check_core::{OffenseDiagnostic, Report, Severity, Theme};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, theme: &Theme, format: OutputFormat, fail_level: Severity) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, fail_level),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Pretty => print_pretty(report, theme),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Suggestion => "\x1b[33msuggestion\x1b[0m",
        Severity::Style => "\x1b[34mstyle\x1b[0m",
    }
}

fn print_text(report: &Report, fail_level: Severity) {
    let (errors, suggestions, style) = report.count_by_severity();

    for offense in &report.offenses {
        println!(
            "{} at {}:{}:{}",
            offense.check,
            offense.location.path.display(),
            offense.location.line,
            offense.location.column,
        );
        println!("  {}: {}", severity_indicator(offense.severity), offense.message);
        if offense.is_correctable() {
            println!("  = help: run with --auto-correct to fix");
        }
        println!();
    }

    let summary_color = if report.has_offenses_at(fail_level) {
        "\x1b[31m"
    } else if report.offenses.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };

    println!(
        "{}{} template(s) inspected, {} error(s), {} suggestion(s), {} style offense(s)\x1b[0m",
        summary_color, report.templates_checked, errors, suggestions, style
    );
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for offense in &report.offenses {
        println!("{offense}");
    }
}

fn print_pretty(report: &Report, theme: &Theme) {
    for offense in &report.offenses {
        let source = theme
            .file(&offense.location.path)
            .map(|f| f.source().to_string())
            .unwrap_or_default();
        let diagnostic = miette::Report::new(OffenseDiagnostic::from(offense)).with_source_code(
            NamedSource::new(offense.location.path.display().to_string(), source),
        );
        println!("{diagnostic:?}");
    }

    let (errors, suggestions, style) = report.count_by_severity();
    println!(
        "{} template(s) inspected, {} error(s), {} suggestion(s), {} style offense(s)",
        report.templates_checked, errors, suggestions, style
    );
}
