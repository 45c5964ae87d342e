//! Per-event CSV record sink
//!
//! One row per processed event with the post-apply book state alongside it.
//! Numeric fields use fixed six-decimal rendering; absent optional values
//! render as empty fields so the column count stays stable.

use lobsim_book::{BookMetrics, TopOfBook};
use lobsim_core::Event;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str =
    "t,evt,side,qty,price,best_bid,best_bid_qty,best_ask,best_ask_qty,mid,spread,imbalance_top1";

/// Buffered CSV writer for the event record
pub struct CsvRecorder {
    out: BufWriter<File>,
}

impl CsvRecorder {
    /// Create (truncating) the file and write the header row
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{CSV_HEADER}")?;
        Ok(Self { out })
    }

    /// Append one row for an event and the book state after applying it
    pub fn record(
        &mut self,
        event: &Event,
        top: &TopOfBook,
        metrics: &BookMetrics,
    ) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{:.6},{},{},{},{:.6},{},{},{},{},{},{},{}",
            event.time,
            event.kind,
            event.side,
            event.quantity,
            event.price,
            format_optional(top.bid.map(|level| level.price)),
            format_count(top.bid.map(|level| level.quantity)),
            format_optional(top.ask.map(|level| level.price)),
            format_count(top.ask.map(|level| level.quantity)),
            format_optional(metrics.mid),
            format_optional(metrics.spread),
            format_optional(metrics.imbalance_top1),
        )
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn format_count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
