//! Flattened, sortable, paginated thread rows.

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    dump::{ProcessSummary, ThreadStats},
    timeline::{TimeRange, format_timestamp},
};

/// A thread as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadRow<'a> {
    pub timestamp: i64,
    #[serde(flatten)]
    pub thread: &'a ThreadStats,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Timestamp,
    Id,
    Name,
    State,
    #[default]
    CpuUsage,
    AllocRate,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Timestamp,
        SortField::Id,
        SortField::Name,
        SortField::State,
        SortField::CpuUsage,
        SortField::AllocRate,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SortField::Timestamp => "Timestamp",
            SortField::Id => "Thread ID",
            SortField::Name => "Name",
            SortField::State => "State",
            SortField::CpuUsage => "CPU Usage",
            SortField::AllocRate => "Allocation Rate",
        }
    }

    fn compare(&self, a: &ThreadRow, b: &ThreadRow) -> Ordering {
        match self {
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::CpuUsage => a.thread.cpu_usage.total_cmp(&b.thread.cpu_usage),
            SortField::AllocRate => a.thread.alloc_rate.total_cmp(&b.thread.alloc_rate),
            SortField::Id => caseless(&a.thread.id, &b.thread.id),
            SortField::Name => caseless(&a.thread.name, &b.thread.name),
            SortField::State => caseless(a.thread.state.as_str(), b.thread.state.as_str()),
        }
    }
}

fn caseless(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Same field flips the direction, a new field starts descending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flip();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    /// Stable sort, so equal keys keep document order.
    pub fn sort(&self, rows: &mut [ThreadRow]) {
        rows.sort_by(|a, b| {
            let ord = self.field.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

/// Threads of the last snapshot, or of every snapshot inside `range`.
pub fn rows_for<'a>(summaries: &'a [ProcessSummary], range: Option<&TimeRange>) -> Vec<ThreadRow<'a>> {
    let selected: &[ProcessSummary] = match range {
        Some(_) => summaries,
        None => match summaries.last() {
            Some(last) => std::slice::from_ref(last),
            None => &[],
        },
    };
    selected
        .iter()
        .filter(|s| range.is_none_or(|r| r.contains(s.timestamp)))
        .flat_map(|s| {
            s.threads.iter().map(|thread| ThreadRow {
                timestamp: s.timestamp,
                thread,
            })
        })
        .collect()
}

/// What the table is showing, as a human readable time or time span.
pub fn range_label(summaries: &[ProcessSummary], range: Option<&TimeRange>) -> String {
    match range {
        None => summaries
            .last()
            .map(|s| format_timestamp(s.timestamp))
            .unwrap_or_default(),
        Some(range) => {
            let mut matched = summaries.iter().filter(|s| range.contains(s.timestamp));
            match (matched.next(), matched.last()) {
                (Some(first), Some(last)) => format!(
                    "{} to {}",
                    format_timestamp(first.timestamp),
                    format_timestamp(last.timestamp)
                ),
                (Some(only), None) => format!(
                    "{} to {}",
                    format_timestamp(only.timestamp),
                    format_timestamp(only.timestamp)
                ),
                _ => String::new(),
            }
        }
    }
}

/// 1-based page cursor over a row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size)
    }

    /// Move to `page` if it exists, otherwise stay put.
    pub fn goto(&mut self, page: usize, rows: usize) -> bool {
        if page >= 1 && page <= self.total_pages(rows) {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self, rows: usize) -> bool {
        self.goto(self.page + 1, rows)
    }

    pub fn prev(&mut self, rows: usize) -> bool {
        self.goto(self.page.saturating_sub(1), rows)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn slice<'r, T>(&self, rows: &'r [T]) -> &'r [T] {
        let start = ((self.page - 1) * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}
