// src/signal/calibration.rs
//! Two-point linear calibration of the pressure channels
//!
//! A calibration session records a handful of (reference, measurement)
//! pairs per channel. Fitting regresses the references on the
//! zero-offset-corrected measurements; applying the record maps a raw
//! channel into the reference units. Calibration is optional everywhere:
//! a channel without a usable record is displayed raw.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EggError, EggResult};

/// Name of the directory-scoped calibration file.
pub const CALIBRATION_FILE: &str = "calibration.toml";

/// Raw calibration measurements for one channel, as stored on disk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalibrationData {
    /// Reference inputs in physical units (e.g. cmH2O).
    pub refinputs: Vec<f32>,
    /// Device readings paired with each reference input.
    pub measurements: Vec<f32>,
    /// Physical unit label of the reference inputs.
    pub refunits: String,
}

/// A fitted calibration: the linear map plus the data it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRecord {
    /// The measurements the fit was derived from.
    pub data: CalibrationData,
    /// Gain of the raw-to-physical map.
    pub slope: f32,
    /// Offset of the regression line.
    pub intercept: f32,
    /// Measurement observed at a 0.0 reference input, if one was taken.
    pub zero_offset: f32,
}

/// Per-dataset calibration records for the two pressure channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationSet {
    /// Oral channel record.
    pub p1: Option<CalibrationRecord>,
    /// Nasal channel record.
    pub p2: Option<CalibrationRecord>,
}

#[derive(Debug, Deserialize)]
struct CalibrationFile {
    p1_data: Option<CalibrationData>,
    p2_data: Option<CalibrationData>,
}

impl CalibrationRecord {
    /// Fit the linear map from the recorded pairs.
    ///
    /// If a reference input of exactly 0.0 is present, its paired
    /// measurement becomes the zero offset; otherwise the offset is 0.
    /// The regression is ordinary least squares of references on
    /// offset-corrected measurements.
    ///
    /// # Errors
    ///
    /// `InsufficientData` on mismatched lengths, fewer than two pairs,
    /// or fewer than two distinct measurement values.
    pub fn fit(data: CalibrationData) -> EggResult<Self> {
        if data.refinputs.len() != data.measurements.len() {
            return Err(EggError::InsufficientData {
                reason: format!(
                    "{} reference inputs but {} measurements",
                    data.refinputs.len(),
                    data.measurements.len()
                ),
            });
        }
        if data.refinputs.len() < 2 {
            return Err(EggError::InsufficientData {
                reason: format!("need at least 2 pairs, got {}", data.refinputs.len()),
            });
        }

        let zero_offset = data
            .refinputs
            .iter()
            .position(|&r| r == 0.0)
            .map(|i| data.measurements[i])
            .unwrap_or(0.0);

        let n = data.measurements.len() as f64;
        let corrected: Vec<f64> = data
            .measurements
            .iter()
            .map(|&m| (m - zero_offset) as f64)
            .collect();
        let refs: Vec<f64> = data.refinputs.iter().map(|&r| r as f64).collect();

        let m_mean = corrected.iter().sum::<f64>() / n;
        let r_mean = refs.iter().sum::<f64>() / n;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (m, r) in corrected.iter().zip(&refs) {
            sxx += (m - m_mean) * (m - m_mean);
            sxy += (m - m_mean) * (r - r_mean);
        }
        if sxx == 0.0 {
            return Err(EggError::InsufficientData {
                reason: "all measurement values are identical".to_string(),
            });
        }

        let slope = sxy / sxx;
        let intercept = r_mean - slope * m_mean;
        Ok(Self {
            data,
            slope: slope as f32,
            intercept: intercept as f32,
            zero_offset,
        })
    }

    /// Map one raw reading into reference units.
    pub fn apply_one(&self, raw: f32) -> f32 {
        (raw - self.zero_offset - self.intercept) * self.slope
    }

    /// Map a raw channel into reference units, elementwise.
    pub fn apply(&self, raw: &[f32]) -> Vec<f32> {
        raw.iter().map(|&x| self.apply_one(x)).collect()
    }

    /// Unit label for calibrated output.
    pub fn units(&self) -> &str {
        &self.data.refunits
    }
}

fn fit_or_warn(channel: &str, data: Option<CalibrationData>) -> Option<CalibrationRecord> {
    match data.map(CalibrationRecord::fit) {
        Some(Ok(record)) => Some(record),
        Some(Err(e)) => {
            warn!(channel, error = %e, "calibration record unusable, channel stays raw");
            None
        }
        None => None,
    }
}

/// Load the calibration file scoped to a data directory.
///
/// Calibration is optional by design: a missing or malformed file
/// disables calibration (with a warning) rather than failing the caller.
pub fn load_calibration(dir: &Path) -> Option<CalibrationSet> {
    let path = dir.join(CALIBRATION_FILE);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no calibration loaded");
            return None;
        }
    };
    let file: CalibrationFile = match toml::from_str(&text) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "calibration file unparseable");
            return None;
        }
    };
    Some(CalibrationSet {
        p1: fit_or_warn("p1", file.p1_data),
        p2: fit_or_warn("p2", file.p2_data),
    })
}
