// src/error.rs
//! Unified error handling for the EGG-D800 core
//!
//! Every failure surface named in the system design maps onto one variant
//! here: transport failures, illegal register values, unreadable files,
//! malformed sample matrices, bad processing parameters, and degenerate
//! calibration data. All variants carry enough context to be logged and
//! acted on without a backtrace.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum EggError {
    /// Device unreachable or a report read/write failed. Fatal to the
    /// current operation; surfaced to the caller.
    #[error("transport failure during {operation}: {reason}")]
    Transport {
        /// Operation that was in flight (e.g. "get_report").
        operation: &'static str,
        /// Transport-level detail.
        reason: String,
    },

    /// A register field was assigned a value outside its legal set or
    /// range. No device or image state is mutated when this is raised.
    #[error("illegal value {value} for register field `{field}`")]
    InvalidRegisterValue {
        /// Field name from the register layout table.
        field: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// Missing or corrupt WAV or calibration file.
    #[error("could not read {path}: {reason}")]
    FileRead {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// A sample matrix did not have the shape the demultiplexer requires.
    #[error("malformed sample matrix: {reason}")]
    InvalidShape {
        /// What was wrong with the shape.
        reason: String,
    },

    /// A processing-stage parameter (cutoff, order, decimation factor)
    /// was out of range for the given input.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// What was wrong with the parameter.
        reason: String,
    },

    /// Calibration data too degenerate to fit a line through.
    #[error("insufficient calibration data: {reason}")]
    InsufficientData {
        /// Why the fit is impossible.
        reason: String,
    },
}

/// Convenience alias used throughout the crate.
pub type EggResult<T> = Result<T, EggError>;
