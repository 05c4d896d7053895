use std::fmt;

use serde::Serialize;

/// Thread state as reported by the dump.
///
/// `ttop` does not print a state per thread, so every parsed thread is
/// `Unknown`. The type exists so the table can sort and render the column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ThreadState {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl ThreadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStats {
    pub id: String,
    pub name: String,
    pub state: ThreadState,
    /// user + sys, in percent. Not clamped.
    pub cpu_usage: f64,
    /// Bytes per second.
    pub alloc_rate: f64,
}

/// One `ttop` sample: the process header plus the thread lines under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub cpu_usage: f64,
    /// Bytes per second.
    pub heap_alloc_rate: f64,
    pub threads: Vec<ThreadStats>,
}

impl ProcessSummary {
    pub fn heap_alloc_mb(&self) -> f64 {
        self.heap_alloc_rate / crate::dump::rate::BYTES_PER_MB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_names() {
        let summary = ProcessSummary {
            timestamp: 1_000,
            cpu_usage: 12.5,
            heap_alloc_rate: 2048.0,
            threads: vec![ThreadStats {
                id: "7".to_string(),
                name: "main".to_string(),
                state: ThreadState::Unknown,
                cpu_usage: 1.0,
                alloc_rate: 10.0,
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["heapAllocRate"], 2048.0);
        assert_eq!(json["cpuUsage"], 12.5);
        assert_eq!(json["threads"][0]["allocRate"], 10.0);
        assert_eq!(json["threads"][0]["state"], "UNKNOWN");
    }
}
