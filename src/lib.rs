// src/lib.rs
//! EGG-D800 device control and waveform display pipeline
//!
//! This library drives the EGG-D800 laryngograph/aerodynamic recorder
//! and turns its multiplexed recordings into calibrated, display-ready
//! waveforms. It provides:
//!
//! - A hardware abstraction layer over the device's USB HID reports
//! - Demultiplexing of the interleaved audio/Lx/pressure stream
//! - Zero-phase Butterworth low-pass filtering and decimation
//! - Linear-regression pressure calibration from reference recordings
//! - A viewer controller with zoom-dependent display downsampling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eggd800_core::config::DisplayConfig;
//! use eggd800_core::viewer::ViewerController;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut viewer = ViewerController::new(DisplayConfig::default())?;
//!     viewer.load("session/utt01.wav")?;
//!
//!     if let Some(report) = viewer.select_range(100, 400) {
//!         println!("mean p1 over selection: {}", report.p1_raw.mean);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod hal;
pub mod io;
pub mod signal;
pub mod viewer;

// Re-export commonly used types for convenience
pub use error::{EggError, EggResult};
pub use hal::{EggD800, HidTransport};
pub use signal::{butter_lowpass_filter, decimate, demux, CalibrationRecord, DemuxedChannels};
pub use viewer::{SessionData, ViewerController, ViewerState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
