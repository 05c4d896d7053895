//! Bodies of the non-interactive commands, writing to any `Write`.

use std::{fs, io::Write, path::Path};

use clap::Args;
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};

use crate::{
    config::ViewerConfig,
    dump::{ParseReport, ProcessSummary, parse_document},
    report::{self, OutputFormat},
    table::{Pager, SortDirection, SortField, SortOrder, range_label, rows_for},
    timeline::{TimeRange, parse_instant},
};

/// Which threads to print and how.
#[derive(Args, Debug, Clone)]
pub struct ThreadQuery {
    /// Range start, RFC 3339 or epoch milliseconds
    #[arg(long)]
    pub from: Option<String>,
    /// Range end, RFC 3339 or epoch milliseconds
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long, value_enum)]
    pub sort: Option<SortField>,
    #[arg(long, value_enum)]
    pub direction: Option<SortDirection>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl Default for ThreadQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            sort: None,
            direction: None,
            page: 1,
            format: OutputFormat::default(),
        }
    }
}

impl ThreadQuery {
    /// `None` without bounds; a missing bound leaves that side open.
    pub fn range(&self) -> Result<Option<TimeRange>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let start = self.from.as_deref().map(parse_instant).transpose()?;
        let end = self.to.as_deref().map(parse_instant).transpose()?;
        Ok(Some(TimeRange::new(
            start.unwrap_or(i64::MIN),
            end.unwrap_or(i64::MAX),
        )))
    }
}

pub fn summary<W: Write>(out: &mut W, file: &Path, format: OutputFormat) -> Result<()> {
    let content =
        fs::read_to_string(file).wrap_err_with(|| format!("reading {}", file.display()))?;
    report::write_summaries(out, &parse_document(&content), format)
}

/// Print the diagnostics; a document that yields nothing is an error.
pub fn validate<W: Write>(
    out: &mut W,
    report: &ParseReport,
    file: &Path,
    format: OutputFormat,
) -> Result<()> {
    report::write_diagnostics(out, report, format)?;
    if report.summaries.is_empty() {
        return Err(eyre!("no snapshots in {}", file.display()));
    }
    Ok(())
}

/// One page of threads. Page 1 always exists, even for an empty table.
pub fn threads<W: Write>(
    out: &mut W,
    summaries: &[ProcessSummary],
    query: &ThreadQuery,
    config: &ViewerConfig,
) -> Result<()> {
    let range = query.range()?;
    let rows = rows_for(summaries, range.as_ref());
    let mut pager = Pager::new(config.page_size);
    if !pager.goto(query.page, rows.len()) && query.page != 1 {
        return Err(eyre!(
            "page {} out of range, {} rows make {} pages",
            query.page,
            rows.len(),
            pager.total_pages(rows.len())
        ));
    }
    let order = SortOrder {
        field: query.sort.unwrap_or(config.sort_field),
        direction: query.direction.unwrap_or(config.sort_direction),
    };
    let label = range_label(summaries, range.as_ref());
    report::write_threads(out, rows, order, pager, &label, query.format)
}
