//! Output formatting for aggregated grades and distribution stats.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::aggregate::AggregateResult;
use crate::aggregate::summary::semester_label;
use crate::stats::DistributionStats;

/// Prints any serializable result as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders the aggregate view as a plain-text dashboard.
pub fn render_aggregate(result: &AggregateResult) -> String {
    let mut out = String::new();

    for section in &result.semesters {
        let _ = writeln!(out, "{}", semester_label(section.semester));
        for course in &section.courses {
            let current = course.current();
            let grade = current
                .grade
                .map(|g| format!("{g:>4.1}"))
                .unwrap_or_else(|| "  --".to_string());
            let badge = if course.passed { "passed" } else { "failed" };
            let attempts = if course.attempts.len() > 1 {
                format!("  ({} attempts)", course.attempts.len())
            } else {
                String::new()
            };

            let _ = writeln!(
                out,
                "  {:<10} {:<40} {}  {}{}",
                course.code.as_deref().unwrap_or("-"),
                course.name,
                grade,
                badge,
                attempts
            );
        }
        let _ = writeln!(out);
    }

    let summary = &result.summary;
    let _ = writeln!(
        out,
        "Passed {} courses ({} failed), {:.1} ECTS ({}% of the degree)",
        summary.passed_count, summary.failed_count, summary.passed_ects, summary.ects_percent
    );

    let average = summary
        .average
        .map(|a| format!("{a:.2}"))
        .unwrap_or_else(|| "--".to_string());
    let _ = writeln!(out, "Average grade: {average}");

    if let Some(best) = &summary.best {
        let _ = writeln!(out, "Best course: {} ({:.1})", best.name, best.grade);
    }

    if !summary.trend.is_empty() {
        let _ = writeln!(out, "\nGPA by semester:");
        for point in &summary.trend {
            let _ = writeln!(
                out,
                "  {:<12} {:>5.2}  ({} passed)",
                point.label, point.gpa, point.passed_count
            );
        }
    }

    out
}

/// Renders a cohort distribution with a text histogram.
pub fn render_distribution(stats: &DistributionStats) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} samples: mean {:.2}, stddev {:.2}, min {:.1}, max {:.1}, {:.0}% passing",
        stats.count, stats.mean, stats.stddev, stats.min, stats.max, stats.pass_percent
    );

    let peak = stats.histogram.iter().copied().max().unwrap_or(0).max(1);
    for (band, &count) in stats.histogram.iter().enumerate() {
        let bar = "#".repeat(count * 40 / peak);
        let _ = writeln!(out, "  {:>2}-{:<2} {:>4}  {}", band, band + 1, count, bar);
    }

    out
}
