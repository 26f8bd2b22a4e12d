// src/hal/transport.rs
//! HID transport abstraction
//!
//! The device speaks fixed-size reports addressed by a one-byte report
//! number. The core only needs the two operations below; the actual USB
//! plumbing lives behind this trait. The in-memory transport stands in
//! for the bus in tests and on machines without the hardware.

use std::collections::HashMap;

use crate::error::{EggError, EggResult};

pub use crate::config::constants::device::{PRODUCT_ID, VENDOR_ID};

/// Report-level access to an EGG-D800.
///
/// Calls are synchronous request/response. The trait provides no
/// locking; callers must serialize access to one device handle.
pub trait HidTransport {
    /// Fetch the input report with the given number. The returned block
    /// is `size` bytes, leading report-number byte included.
    fn get_report(&mut self, report_num: u8, size: usize) -> EggResult<Vec<u8>>;

    /// Transmit a complete output report; byte 0 is the report number.
    fn set_report(&mut self, report: &[u8]) -> EggResult<()>;
}

/// In-memory transport holding one report image per report number.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    reports: HashMap<u8, Vec<u8>>,
    /// Every report written, in order, for assertions.
    pub written: Vec<Vec<u8>>,
}

impl MemoryTransport {
    /// Empty transport; any read fails until a report is seeded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an input report image.
    pub fn seed_report(&mut self, report: Vec<u8>) {
        if let Some(&num) = report.first() {
            self.reports.insert(num, report);
        }
    }
}

impl HidTransport for MemoryTransport {
    fn get_report(&mut self, report_num: u8, size: usize) -> EggResult<Vec<u8>> {
        let report = self.reports.get(&report_num).ok_or(EggError::Transport {
            operation: "get_report",
            reason: format!("no report {report_num} available"),
        })?;
        if report.len() != size {
            return Err(EggError::Transport {
                operation: "get_report",
                reason: format!(
                    "report {report_num} is {} bytes, expected {size}",
                    report.len()
                ),
            });
        }
        Ok(report.clone())
    }

    fn set_report(&mut self, report: &[u8]) -> EggResult<()> {
        if report.is_empty() {
            return Err(EggError::Transport {
                operation: "set_report",
                reason: "empty report".to_string(),
            });
        }
        self.reports.insert(report[0], report.to_vec());
        self.written.push(report.to_vec());
        Ok(())
    }
}
