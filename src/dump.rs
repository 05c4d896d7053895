//! Loading and parsing of `sjk ttop` dumps.

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::WrapErr};
use log::*;
use notify::{RecommendedWatcher, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{AppEvent, Event};

pub mod diagnostic;
pub mod model;
pub mod parser;
pub mod rate;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use model::{ProcessSummary, ThreadState, ThreadStats};
pub use parser::{ParseReport, parse_document, parse_document_with_report};

/// A dump file and its most recent parse.
#[derive(Debug)]
pub struct Document {
    pub file_path: PathBuf,
    report: ParseReport,
    watcher: Option<RecommendedWatcher>,
}

impl Document {
    pub fn load(file_path: PathBuf) -> Result<Document> {
        let report = Self::read_and_parse(&file_path)?;
        Ok(Document {
            file_path,
            report,
            watcher: None,
        })
    }

    /// Ask for an [`AppEvent::Reload`] whenever the file changes on disk.
    pub fn watch(&mut self, sender: UnboundedSender<Event>) -> Result<()> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res
                && (event.kind.is_modify() || event.kind.is_create())
            {
                let _ = sender.send(Event::App(AppEvent::Reload));
            }
        })?;
        info!(target: "Document", "Watching file {:?}", self.file_path);
        watcher.watch(&self.file_path, notify::RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);
        Ok(())
    }

    pub fn summaries(&self) -> &[ProcessSummary] {
        &self.report.summaries
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.report.diagnostics
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn is_watched(&self) -> bool {
        self.watcher.is_some()
    }

    /// Re-read the file. The previous parse is kept if reading fails.
    pub fn reload(&mut self) -> Result<&ParseReport> {
        self.report = Self::read_and_parse(&self.file_path)?;
        Ok(&self.report)
    }

    fn read_and_parse(file_path: &Path) -> Result<ParseReport> {
        let content = fs::read_to_string(file_path)
            .wrap_err_with(|| format!("reading {}", file_path.display()))?;
        let report = parse_document_with_report(&content);
        info!(
            target: "Document",
            "Parsed {} snapshots from {} ({} blocks dropped, {} diagnostics)",
            report.summaries.len(),
            file_path.display(),
            report.dropped_blocks(),
            report.diagnostics.len()
        );
        if report.summaries.is_empty() {
            warn!(target: "Document", "No snapshots found in {}", file_path.display());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_dump(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sjkview-{}-{}.txt", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_and_reload() {
        let path = temp_dump("reload", include_str!("../testdata/ttop.txt"));
        let mut doc = Document::load(path.clone()).unwrap();
        assert_eq!(doc.summaries().len(), 3);
        assert_eq!(doc.report().dropped_blocks(), 2);
        assert!(!doc.is_watched());

        fs::write(&path, "").unwrap();
        let report = doc.reload().unwrap();
        assert!(report.summaries.is_empty());
        assert!(doc.diagnostics().is_empty());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn failed_reload_keeps_previous_parse() {
        let path = temp_dump("missing", include_str!("../testdata/ttop.txt"));
        let mut doc = Document::load(path.clone()).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(doc.reload().is_err());
        assert_eq!(doc.summaries().len(), 3);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(Document::load(PathBuf::from("/nonexistent/sjkview/ttop.txt")).is_err());
    }
}
