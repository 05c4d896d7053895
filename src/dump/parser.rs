//! Parser for `sjk ttop` output.
//!
//! A document is a sequence of blank-line separated blocks, one per sample:
//!
//! ```"not rust"
//! 2024-03-14T10:15:02.123+0000 Process summary
//!   process cpu=45.23%
//!   application cpu=40.12% (user=35.00% sys=5.12%)
//!   other: cpu=5.11%
//!   thread count: 4
//!   heap allocation rate 234mb/s
//! [000123] user=12.34% sys= 1.23% alloc=  45mb/s - http-nio-8080-exec-1
//! ```
//!
//! Parsing is best effort. A block with a bad header is dropped whole, a thread
//! line that does not match is skipped, and an unusable rate becomes 0. Nothing
//! here returns an error; [`parse_document_with_report`] says what was dropped.

use std::sync::LazyLock;

use chrono::DateTime;
use log::*;
use regex::Regex;

use crate::dump::{
    diagnostic::{Diagnostic, DiagnosticKind},
    model::{ProcessSummary, ThreadState, ThreadStats},
    rate::{RateReading, leading_decimal},
};

/// Lines in the fixed block header, before any thread entries.
pub const HEADER_LINES: usize = 6;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4})")
        .expect("timestamp pattern compiles")
});

static PROCESS_CPU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"process cpu=([\d.]+)%").expect("process cpu pattern compiles")
});

static HEAP_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)heap allocation rate (\S+)").expect("heap rate pattern compiles")
});

static THREAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\[(\d+)\] ",
        r"user=\s*([-\d.]+)% ",
        r"sys=\s*([-\d.]+)% ",
        r"alloc=\s*(\S+) - (.+)$",
    ))
    .expect("thread pattern compiles")
});

/// Summaries in document order plus everything that was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub summaries: Vec<ProcessSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    pub fn dropped_blocks(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind.drops_block())
            .count()
    }
}

#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    text: &'a str,
}

/// Parse a whole document. Malformed parts are left out of the result.
pub fn parse_document(content: &str) -> Vec<ProcessSummary> {
    parse_document_with_report(content).summaries
}

/// Same as [`parse_document`], keeping a diagnostic per dropped block,
/// skipped thread line and zeroed rate.
pub fn parse_document_with_report(content: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for (index, block) in split_blocks(content).iter().enumerate() {
        let mut parser = BlockParser {
            block: index + 1,
            diagnostics: &mut report.diagnostics,
        };
        if let Some(summary) = parser.parse(block) {
            report.summaries.push(summary);
        }
    }
    report
}

/// Group trimmed, non-empty lines into blocks separated by blank lines.
fn split_blocks(content: &str) -> Vec<Vec<SourceLine<'_>>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(SourceLine {
                number: index + 1,
                text,
            });
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

struct BlockParser<'d> {
    block: usize,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl BlockParser<'_> {
    fn parse(&mut self, lines: &[SourceLine]) -> Option<ProcessSummary> {
        if lines.len() < HEADER_LINES {
            return self.reject(lines[0], DiagnosticKind::TooFewLines { found: lines.len() });
        }
        let Some(timestamp) = parse_timestamp(lines[0].text) else {
            return self.reject(lines[0], DiagnosticKind::BadTimestamp);
        };
        let Some(cpu_usage) = parse_process_cpu(lines[1].text) else {
            return self.reject(lines[1], DiagnosticKind::MissingProcessCpu);
        };
        let Some(heap_token) = HEAP_RATE_RE.captures(lines[5].text).map(|c| c[1].to_string())
        else {
            return self.reject(lines[5], DiagnosticKind::MissingHeapRate);
        };
        let heap_alloc_rate = self.rate(lines[5], &heap_token);

        let threads = lines[HEADER_LINES..]
            .iter()
            .filter_map(|line| self.thread(*line))
            .collect();

        Some(ProcessSummary {
            timestamp,
            cpu_usage,
            heap_alloc_rate,
            threads,
        })
    }

    fn thread(&mut self, line: SourceLine) -> Option<ThreadStats> {
        let parsed = THREAD_RE.captures(line.text).and_then(|caps| {
            let user = leading_decimal(&caps[2])?;
            let sys = leading_decimal(&caps[3])?;
            Some((
                caps[1].to_string(),
                user + sys,
                caps[4].to_string(),
                caps[5].trim().to_string(),
            ))
        });
        let Some((id, cpu_usage, alloc, name)) = parsed else {
            self.note(line, DiagnosticKind::UnmatchedThreadLine);
            return None;
        };
        Some(ThreadStats {
            id,
            name,
            state: ThreadState::Unknown,
            cpu_usage,
            alloc_rate: self.rate(line, &alloc),
        })
    }

    /// Normalize a rate token, noting why it was zeroed if it was.
    fn rate(&mut self, line: SourceLine, token: &str) -> f64 {
        let reading = RateReading::parse(token);
        match reading {
            RateReading::BytesPerSec(_) => {}
            RateReading::Unparsed => self.note(
                line,
                DiagnosticKind::UnparsedRate {
                    token: token.to_string(),
                },
            ),
            RateReading::Outlier(bytes_per_sec) => {
                self.note(line, DiagnosticKind::OutlierRate { bytes_per_sec })
            }
        }
        reading.bytes_per_sec()
    }

    fn reject<T>(&mut self, line: SourceLine, kind: DiagnosticKind) -> Option<T> {
        self.note(line, kind);
        None
    }

    fn note(&mut self, line: SourceLine, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            block: self.block,
            line: line.number,
            kind,
        };
        debug!(target: "Parser", "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn parse_timestamp(line: &str) -> Option<i64> {
    let caps = TIMESTAMP_RE.captures(line)?;
    DateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT)
        .ok()
        .map(|t| t.timestamp_millis())
}

fn parse_process_cpu(line: &str) -> Option<f64> {
    leading_decimal(&PROCESS_CPU_RE.captures(line)?[1])
}
