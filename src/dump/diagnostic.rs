use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Block dropped: the header needs six non-empty lines.
    TooFewLines { found: usize },
    /// Block dropped: line 1 is not `yyyy-mm-ddThh:mm:ss.SSS+zzzz`.
    BadTimestamp,
    /// Block dropped: line 2 has no `process cpu=<n>%`.
    MissingProcessCpu,
    /// Block dropped: line 6 has no `heap allocation rate <rate>`.
    MissingHeapRate,
    /// Line skipped: not a thread entry.
    UnmatchedThreadLine,
    /// Rate zeroed: token is not `<decimal><unit>/s`.
    UnparsedRate { token: String },
    /// Rate zeroed: above the 10,000 MB/s sanity limit.
    OutlierRate { bytes_per_sec: f64 },
}

impl DiagnosticKind {
    /// True when the whole block was discarded.
    pub fn drops_block(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::TooFewLines { .. }
                | DiagnosticKind::BadTimestamp
                | DiagnosticKind::MissingProcessCpu
                | DiagnosticKind::MissingHeapRate
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::TooFewLines { found } => {
                write!(f, "block dropped, {} non-empty lines (need 6)", found)
            }
            DiagnosticKind::BadTimestamp => write!(f, "block dropped, bad timestamp"),
            DiagnosticKind::MissingProcessCpu => {
                write!(f, "block dropped, no process cpu reading")
            }
            DiagnosticKind::MissingHeapRate => {
                write!(f, "block dropped, no heap allocation rate")
            }
            DiagnosticKind::UnmatchedThreadLine => write!(f, "not a thread line, skipped"),
            DiagnosticKind::UnparsedRate { token } => {
                write!(f, "rate '{}' not understood, using 0", token)
            }
            DiagnosticKind::OutlierRate { bytes_per_sec } => write!(
                f,
                "rate {:.0}MB/s over limit, using 0",
                bytes_per_sec / crate::dump::rate::BYTES_PER_MB
            ),
        }
    }
}

/// Why something in the document did not make it into the output as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-based index of the block in the document.
    pub block: usize,
    /// 1-based line number in the document.
    pub line: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} line {}: {}", self.block, self.line, self.kind)
    }
}
