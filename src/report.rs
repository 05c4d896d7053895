//! Plain-text and JSON output for the non-interactive commands.

use std::io::Write;

use clap::ValueEnum;
use color_eyre::Result;
use serde::Serialize;

use crate::{
    dump::{ParseReport, ProcessSummary, rate::BYTES_PER_MB},
    table::{Pager, SortOrder, ThreadRow},
    timeline::format_timestamp,
};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text columns (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One line per snapshot, or the full records as JSON.
pub fn write_summaries<W: Write>(
    out: &mut W,
    summaries: &[ProcessSummary],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &summaries)?,
        OutputFormat::Table => {
            if summaries.is_empty() {
                writeln!(out, "No snapshots found")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<19}  {:>8}  {:>12}  {:>7}",
                "TIME", "CPU", "HEAP", "THREADS"
            )?;
            for s in summaries {
                writeln!(
                    out,
                    "{:<19}  {:>7.2}%  {:>7.2} MB/s  {:>7}",
                    format_timestamp(s.timestamp),
                    s.cpu_usage,
                    s.heap_alloc_mb(),
                    s.threads.len()
                )?;
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ThreadPage<'a, 'r> {
    label: &'a str,
    page: usize,
    total_pages: usize,
    rows: &'r [ThreadRow<'r>],
}

/// One page of the thread table, already filtered to the wanted snapshots.
pub fn write_threads<W: Write>(
    out: &mut W,
    mut rows: Vec<ThreadRow>,
    order: SortOrder,
    pager: Pager,
    label: &str,
    format: OutputFormat,
) -> Result<()> {
    order.sort(&mut rows);
    let total_pages = pager.total_pages(rows.len());
    let page = pager.slice(&rows);
    match format {
        OutputFormat::Json => write_json(
            out,
            &ThreadPage {
                label,
                page: pager.page,
                total_pages,
                rows: page,
            },
        )?,
        OutputFormat::Table => {
            writeln!(out, "Showing threads for: {}", label)?;
            writeln!(
                out,
                "{:<19}  {:<10}  {:<32}  {:<8}  {:>8}  {:>12}",
                "TIMESTAMP", "ID", "NAME", "STATE", "CPU", "ALLOC"
            )?;
            for row in page {
                writeln!(
                    out,
                    "{:<19}  {:<10}  {:<32}  {:<8}  {:>7.2}%  {:>7.2} MB/s",
                    format_timestamp(row.timestamp),
                    row.thread.id,
                    row.thread.name,
                    row.thread.state,
                    row.thread.cpu_usage,
                    row.thread.alloc_rate / BYTES_PER_MB
                )?;
            }
            if total_pages > 1 {
                writeln!(out, "Page {} of {}", pager.page, total_pages)?;
            }
        }
    }
    Ok(())
}

/// Everything the parser dropped, one line each.
pub fn write_diagnostics<W: Write>(
    out: &mut W,
    report: &ParseReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &report.diagnostics)?,
        OutputFormat::Table => {
            for diagnostic in &report.diagnostics {
                writeln!(out, "{}", diagnostic)?;
            }
            writeln!(
                out,
                "{} snapshots, {} blocks dropped, {} diagnostics",
                report.summaries.len(),
                report.dropped_blocks(),
                report.diagnostics.len()
            )?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
