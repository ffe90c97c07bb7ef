//! Text output formatter

use std::collections::HashMap;
use std::time::Duration;

use trivialint_core::{LintResult, LintSummary, Severity, Violation};

pub fn output_text(results: &[LintResult], timings: bool) {
    for result in results {
        for violation in &result.violations {
            println!("{}:{}", result.path.display(), format_violation(violation));
        }
    }

    let summary = LintSummary::from_results(results);

    println!();
    println!(
        "Checked {} files, found {} issues in {} files",
        summary.files_checked, summary.total_violations, summary.files_with_violations
    );

    if timings {
        output_timings(results);
    }
}

/// `line:col rule-id: message`, with a 1-based column. Non-error
/// severities are tagged after the message.
fn format_violation(violation: &Violation) -> String {
    let (line, column) = violation
        .loc
        .map_or((0, 0), |loc| (loc.start.line, loc.start.column + 1));
    let tag = match violation.severity {
        Severity::Error => "",
        Severity::Warning => " (warning)",
        Severity::Info => " (info)",
    };
    format!(
        "{}:{} {}: {}{}",
        line, column, violation.rule_id, violation.message, tag
    )
}

fn output_timings(results: &[LintResult]) {
    let mut total_duration = Duration::new(0, 0);
    let mut rule_timings: HashMap<String, Duration> = HashMap::new();

    for result in results {
        for (rule, duration) in &result.timings {
            *rule_timings.entry(rule.clone()).or_default() += *duration;
            total_duration += *duration;
        }
    }

    if !rule_timings.is_empty() {
        println!("\nPerformance Timings:");
        println!("{:<32} | {:<15} | {:<10}", "Rule", "Duration", "%");
        println!("{:-<32}-+-{:-<15}-+-{:-<10}", "", "", "");

        let mut sorted_timings: Vec<_> = rule_timings.into_iter().collect();
        sorted_timings.sort_by(|a, b| b.1.cmp(&a.1));

        for (rule, duration) in sorted_timings {
            let percentage = if total_duration.as_secs_f64() > 0.0 {
                (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            println!("{:<32} | {:<15?} | {:<10.1}%", rule, duration, percentage);
        }
        println!("{:-<32}-+-{:-<15}-+-{:-<10}", "", "", "");
        println!("{:<32} | {:<15?}", "Total", total_duration);
    }
}

