//! Per-region report accumulation and rendering

use crate::config::OutputFormat;
use crate::error::SweepError;
use clemy_common::Image;
use clemy_common::defaults::REPORT_DIVIDER;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// What happened in one region.
///
/// Owned by the region's worker while it runs, then handed to the
/// orchestrator and never modified again.
#[derive(Debug)]
pub struct Report {
    region: String,
    dry_run: bool,
    removed: Vec<Image>,
    errors: Vec<SweepError>,
}

impl Report {
    pub fn new(region: impl Into<String>, dry_run: bool) -> Self {
        Self {
            region: region.into(),
            dry_run,
            removed: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Append an error
    pub fn add_error(&mut self, err: SweepError) {
        self.errors.push(err);
    }

    /// Unwrap `result`, recording the error and returning `None` on failure.
    pub fn record<T>(&mut self, result: Result<T, SweepError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add_error(err);
                None
            }
        }
    }

    pub(crate) fn set_removed(&mut self, images: Vec<Image>) {
        self.removed = images;
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Images deregistered (or, in dry-run, that would have been)
    pub fn removed(&self) -> &[Image] {
        &self.removed
    }

    pub fn errors(&self) -> &[SweepError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Serializable view of the report
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            region: &self.region,
            dry_run: self.dry_run,
            images: &self.removed,
            errors: self.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Region: {}", self.region)?;

        if self.removed.is_empty() {
            writeln!(f, "No images were removed")?;
        } else {
            if self.dry_run {
                writeln!(f, "Images to be removed:")?;
            } else {
                writeln!(f, "Images removed:")?;
            }
            for (idx, image) in self.removed.iter().enumerate() {
                writeln!(f, "{idx:3}: {}", image.image_id)?;
            }
        }

        if !self.errors.is_empty() {
            writeln!(f, "Errors encountered:")?;
            for (idx, err) in self.errors.iter().enumerate() {
                writeln!(f, "{idx}: {err}")?;
            }
        }

        Ok(())
    }
}

/// JSON shape of a report
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub region: &'a str,
    pub dry_run: bool,
    pub images: &'a [Image],
    pub errors: Vec<String>,
}

/// Writes reports to an output stream as they arrive
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
    verbose: bool,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat, verbose: bool) -> Self {
        Self {
            out,
            format,
            verbose,
        }
    }

    /// Write a single report
    pub fn write_report(&mut self, report: &Report) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{REPORT_DIVIDER}")?;
                write!(self.out, "{report}")?;
                if self.verbose && !report.has_errors() {
                    writeln!(self.out, "Completed region {}", report.region())?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &report.summary())?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    /// Write the closing divider after the last report
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "{REPORT_DIVIDER}")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
