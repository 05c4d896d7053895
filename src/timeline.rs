//! Time axis helpers: series for the charts and the selected time range.

use chrono::{DateTime, Local, TimeZone};
use color_eyre::{Result, eyre::eyre};

use crate::dump::ProcessSummary;

/// Inclusive span of epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// The span between the snapshots at two indices, in either order.
    pub fn from_indices(summaries: &[ProcessSummary], a: usize, b: usize) -> Option<TimeRange> {
        let a = summaries.get(a)?.timestamp;
        let b = summaries.get(b)?.timestamp;
        Some(TimeRange::new(a, b))
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

pub fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_millis_opt(timestamp).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Read a CLI time argument: epoch milliseconds or RFC 3339.
pub fn parse_instant(input: &str) -> Result<i64> {
    let input = input.trim();
    if let Ok(millis) = input.parse::<i64>() {
        return Ok(millis);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|t| t.timestamp_millis())
        .map_err(|e| eyre!("'{}' is neither epoch millis nor RFC 3339: {}", input, e))
}

/// Clock time only, for axis labels.
pub fn format_clock(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// (timestamp ms, process cpu %) per snapshot.
pub fn cpu_series(summaries: &[ProcessSummary]) -> Vec<(f64, f64)> {
    summaries
        .iter()
        .map(|s| (s.timestamp as f64, s.cpu_usage))
        .collect()
}

/// (timestamp ms, heap allocation MB/s) per snapshot.
pub fn heap_series(summaries: &[ProcessSummary]) -> Vec<(f64, f64)> {
    summaries
        .iter()
        .map(|s| (s.timestamp as f64, s.heap_alloc_mb()))
        .collect()
}

/// Axis bounds of a series, `([x_min, x_max], [y_min, y_max])`.
///
/// Flat series get some room so the chart has a visible height and width.
pub fn bounds(series: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    if series.is_empty() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
    let mut y_max = f64::MIN;
    let mut y_min: f64 = 0.0;
    for (x, y) in series {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    ([x_min, x_max], [y_min, y_max * 1.1])
}

/// Cursor and brush over snapshot indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cursor: usize,
    anchor: Option<usize>,
    range: Option<TimeRange>,
}

impl Selection {
    pub fn range(&self) -> Option<&TimeRange> {
        self.range.as_ref()
    }

    pub fn is_selecting(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    /// First press drops the anchor at the cursor, the second closes the range.
    pub fn toggle(&mut self, summaries: &[ProcessSummary]) -> Option<TimeRange> {
        match self.anchor.take() {
            None => {
                if self.cursor < summaries.len() {
                    self.anchor = Some(self.cursor);
                }
                None
            }
            Some(anchor) => {
                self.range = TimeRange::from_indices(summaries, anchor, self.cursor);
                self.range
            }
        }
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.range = None;
    }

    /// Forget everything, used when a new document is loaded.
    pub fn reset(&mut self, len: usize) {
        self.clear();
        self.end(len);
    }

    /// Indices currently covered, by the finished range or the open brush.
    pub fn covers(&self, summaries: &[ProcessSummary], index: usize) -> bool {
        if let Some(anchor) = self.anchor {
            let (lo, hi) = (anchor.min(self.cursor), anchor.max(self.cursor));
            return lo <= index && index <= hi;
        }
        match (self.range, summaries.get(index)) {
            (Some(range), Some(s)) => range.contains(s.timestamp),
            _ => false,
        }
    }
}
