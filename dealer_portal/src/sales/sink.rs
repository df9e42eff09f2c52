//! Where accepted sales go.

use super::models::SaleRecord;
use log::{info, warn};

/// Fire-and-forget submission of an accepted sale.
pub trait SaleSink: Send {
    fn submit(&mut self, record: &SaleRecord);
}

/// Records each sale as a structured log line.
#[derive(Debug, Default)]
pub struct LoggingSaleSink {
    submitted: usize,
}

impl LoggingSaleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sales submitted through this sink.
    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl SaleSink for LoggingSaleSink {
    fn submit(&mut self, record: &SaleRecord) {
        self.submitted += 1;
        match serde_json::to_string(record) {
            Ok(json) => info!(target: "dealer_portal::sales", "Sale registered: {json}"),
            Err(e) => warn!(target: "dealer_portal::sales", "Sale registered but not serializable: {e}"),
        }
    }
}

/// Keeps every submitted record in memory.
#[derive(Debug, Default)]
pub struct RecordingSaleSink {
    pub records: Vec<SaleRecord>,
}

impl SaleSink for RecordingSaleSink {
    fn submit(&mut self, record: &SaleRecord) {
        self.records.push(record.clone());
    }
}
