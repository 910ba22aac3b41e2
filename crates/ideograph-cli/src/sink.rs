//! Writing rendered reports into the output directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::reports::ReportKind;

const BOM: char = '\u{feff}';

/// Writes reports and keeps score; a failed report never stops the run.
#[derive(Debug)]
pub struct ReportSink {
    out_dir: PathBuf,
    write_bom: bool,
    pub written: Vec<PathBuf>,
    pub failed: Vec<ReportKind>,
}

impl ReportSink {
    pub fn new(out_dir: impl Into<PathBuf>, write_bom: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            write_bom,
            written: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write `text` as the file of `kind`.
    pub fn write(&self, kind: ReportKind, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(kind.file_name());
        let mut contents = String::with_capacity(text.len() + BOM.len_utf8());
        if self.write_bom && kind.takes_bom() {
            contents.push(BOM);
        }
        contents.push_str(text);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Record the outcome of rendering `kind`, writing it on success.
    pub fn emit(&mut self, kind: ReportKind, rendered: Result<String>) {
        match rendered.and_then(|text| self.write(kind, &text)) {
            Ok(path) => {
                tracing::debug!(report = kind.name(), path = %path.display(), "report written");
                self.written.push(path);
            }
            Err(err) => {
                tracing::error!(report = kind.name(), error = ?err, "report failed");
                self.failed.push(kind);
            }
        }
    }
}
