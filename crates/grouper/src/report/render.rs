//! Render — text layout grouped by calendar day, and pretty JSON.
//!
//! The footer names the output zone by its numeric offset only (`-0700`);
//! the local zone carries no abbreviation to print next to it.

use std::io::{self, Write};

use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;

use super::GroupingReport;
use crate::aggregate::{GroupCount, WindowSnapshot};
use crate::conf::format_interval;
use crate::metrics::MetricsSnapshot;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Max keys per window; 0 prints none.
    pub limit: usize,
    /// Include the unmatched lines.
    pub verbose: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { limit: 20, verbose: false }
    }
}

fn window_end(report: &GroupingReport, start: DateTime<Local>) -> DateTime<Local> {
    match TimeDelta::from_std(report.interval) {
        Ok(width) => start.checked_add_signed(width).unwrap_or(start),
        Err(_) => start,
    }
}

/// Write the report in the fixed-width column layout:
///
/// ```text
/// 2000-10-10 Tue
///        13:45:00 - 14:00:00                                                                                     1
///           GET /apache_pb.gif                                                                                   1
/// ```
pub fn render_text<W: Write>(report: &GroupingReport, options: ReportOptions, out: &mut W) -> io::Result<()> {
    let mut current_day = None;

    for window in &report.snapshot.windows {
        let day = window.start.date_naive();
        if current_day != Some(day) {
            current_day = Some(day);
            writeln!(out, "{}", window.start.format("%Y-%m-%d %a"))?;
        }

        writeln!(
            out,
            "{:>15} - {:<15}{:>87}",
            window.start.format("%H:%M:%S").to_string(),
            window_end(report, window.start).format("%H:%M:%S").to_string(),
            window.total
        )?;

        for group in window.top(options.limit) {
            writeln!(out, "{:10}{:<100}{:>10}", "", group.key, group.count)?;
        }
    }

    // Offset of the last day printed, or of "now" for an empty report.
    let zone = report
        .snapshot
        .windows
        .last()
        .map(|w| w.start)
        .unwrap_or_else(Local::now)
        .format("%z");

    write!(out, "\n\n")?;
    writeln!(
        out,
        "Interval: {}, Output timezone: {}, Unmatched Lines: {}",
        format_interval(report.interval),
        zone,
        report.unmatched.len()
    )?;

    if options.verbose {
        writeln!(out, "Unmatched lines:")?;
        for line in &report.unmatched {
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonWindow<'a> {
    start: DateTime<Local>,
    end: DateTime<Local>,
    total: u64,
    distinct_groups: usize,
    groups: &'a [GroupCount],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    interval: String,
    windows: Vec<JsonWindow<'a>>,
    metrics: MetricsSnapshot,
    unmatched_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    unmatched: Option<&'a [String]>,
}

fn json_window<'a>(report: &GroupingReport, window: &'a WindowSnapshot, limit: usize) -> JsonWindow<'a> {
    JsonWindow {
        start: window.start,
        end: window_end(report, window.start),
        total: window.total,
        distinct_groups: window.groups.len(),
        groups: window.top(limit),
    }
}

/// Pretty JSON with the same window and key selection as the text layout.
pub fn render_json<W: Write>(report: &GroupingReport, options: ReportOptions, out: &mut W) -> io::Result<()> {
    let doc = JsonReport {
        interval: format_interval(report.interval),
        windows: report
            .snapshot
            .windows
            .iter()
            .map(|w| json_window(report, w, options.limit))
            .collect(),
        metrics: report.metrics,
        unmatched_count: report.unmatched.len(),
        unmatched: options.verbose.then_some(report.unmatched.as_slice()),
    };

    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}
