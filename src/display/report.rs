//! Report formatting utilities for terminal output

use crate::models::Report;
use crate::reports::Breakdown;

const BAR_WIDTH: usize = 20;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a share breakdown as a horizontal bar chart
pub fn format_breakdown(title: &str, breakdown: &Breakdown) -> String {
    if breakdown.is_empty() {
        return format!("{}\n  No shares to chart.\n", title);
    }

    let label_width = breakdown
        .entries
        .iter()
        .map(|e| e.label.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let max = breakdown
        .entries
        .iter()
        .map(|e| e.total.cents())
        .max()
        .unwrap_or(0) as f64;

    let mut output = format!("{}\n", title);
    for entry in &breakdown.entries {
        output.push_str(&format!(
            "  {:<label_width$}  {}  {:>10}  {:>5}\n",
            entry.label,
            format_bar(entry.total.cents() as f64, max, BAR_WIDTH),
            entry.total.to_string(),
            format_percentage(entry.percentage),
            label_width = label_width,
        ));
    }
    output.push_str(&format!(
        "  {:<label_width$}  {}  {:>10}\n",
        "Total",
        " ".repeat(BAR_WIDTH),
        breakdown.total().to_string(),
        label_width = label_width,
    ));
    output
}

/// Format the caller's generated reports, newest first
pub fn format_report_list(reports: &[Report]) -> String {
    if reports.is_empty() {
        return "No reports generated yet.".to_string();
    }

    let mut output = String::new();
    for report in reports {
        output.push_str(&format!(
            "  {}  {} - {}  {:>10}  {:<6}  {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M"),
            report.start_date().format("%d.%m.%Y"),
            report.end_date().format("%d.%m.%Y"),
            report.total.to_string(),
            report.payment_status.as_str(),
            report.file_name,
        ));
    }
    output
}

pub fn format_report_details(report: &Report, currency_symbol: &str) -> String {
    let mut output = String::from("Generated report\n");
    output.push_str(&format!(
        "  Period: {} - {}\n",
        report.start_date().format("%d.%m.%Y"),
        report.end_date().format("%d.%m.%Y")
    ));
    output.push_str(&format!(
        "  Total:  {}\n",
        report.total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Status: {}\n", report.payment_status));
    output.push_str(&format!("  File:   {}\n", report.file_name));
    output
}
