//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{ForecastRun, Preview};
use crate::domain::ForecastConfig;

/// Header block: file, detected columns, row accounting.
pub fn format_run_summary(preview: &Preview, config: &ForecastConfig) -> String {
    let mut out = String::new();
    let stats = &preview.stats;

    out.push_str("=== salescast - Weekly Sales Forecast ===\n");
    out.push_str(&format!("File: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Columns: date=\"{}\" value=\"{}\" ({})\n",
        preview.binding.date_column,
        preview.binding.value_column,
        if preview.binding.is_quantity { "quantity" } else { "sales" },
    ));
    out.push_str(&format!(
        "Rows: read={} used={} dropped={}",
        stats.rows_read, stats.rows_used, stats.rows_dropped
    ));
    out.push('\n');

    if let (Some(first), Some(last)) = (preview.series.first(), preview.series.last()) {
        out.push_str(&format!(
            "Weeks: n={} | {} .. {}\n",
            preview.series.len(),
            first.week_start,
            last.week_start
        ));
    }
    out.push('\n');
    out
}

/// Trailing weekly totals.
pub fn format_preview(preview: &Preview) -> String {
    let label = preview.binding.value_label();
    let mut out = String::new();

    out.push_str(&format!("Last {} week(s):\n", preview.tail.len()));
    push_row(&mut out, &format!("{:<12} {:>14}", "week", label));
    push_row(&mut out, &format!("{:-<12} {:-<14}", "", ""));
    for p in &preview.tail {
        push_row(&mut out, &format!("{:<12} {:>14.2}", p.week_start.to_string(), p.value));
    }
    out
}

/// Forecast table (week, estimate, lower, upper).
pub fn format_forecast(run: &ForecastRun, value_label: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Forecast ({}, next {} weeks, {value_label}):\n",
        run.method.display_name(),
        run.points.len()
    ));
    push_row(
        &mut out,
        &format!("{:<12} {:>14} {:>14} {:>14}", "week", "estimate", "lower", "upper"),
    );
    push_row(&mut out, &format!("{:-<12} {:-<14} {:-<14} {:-<14}", "", "", "", ""));
    for p in &run.points {
        push_row(
            &mut out,
            &format!(
                "{:<12} {:>14.2} {:>14} {:>14}",
                p.period_start.to_string(),
                p.estimate,
                fmt_bound(p.lower),
                fmt_bound(p.upper),
            ),
        );
    }
    out
}

fn fmt_bound(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn push_row(out: &mut String, row: &str) {
    out.push_str(row.trim_end());
    out.push('\n');
}
