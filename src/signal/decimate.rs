// src/signal/decimate.rs
//! Anti-aliased decimation
//!
//! Rate reduction by an integer factor. Naive stride-subsampling folds
//! energy above the new Nyquist back into the band of interest, so the
//! signal is low-pass filtered (zero-phase, so decimation never shifts
//! features in time) before the stride is taken.

use crate::config::constants::filter::{ANTIALIAS_ORDER, ANTIALIAS_RELATIVE_CUTOFF};
use crate::error::{EggError, EggResult};
use crate::signal::filter::{design_lowpass, filtfilt, pad_len};

/// Downsample `data` by `factor`.
///
/// Factor 1 is the exact identity. For larger factors an order-8
/// Butterworth low-pass at 0.8 of the post-decimation Nyquist is applied
/// forward-backward, then every `factor`-th sample is kept. The output
/// has `ceil(len / factor)` samples.
///
/// # Errors
///
/// `InvalidParameter` if `factor` is zero or the input is too short to
/// support the anti-alias filter's edge padding.
pub fn decimate(data: &[f32], factor: usize) -> EggResult<Vec<f32>> {
    if factor == 0 {
        return Err(EggError::InvalidParameter {
            reason: "decimation factor must be at least 1".to_string(),
        });
    }
    if factor == 1 {
        return Ok(data.to_vec());
    }

    let padlen = pad_len(ANTIALIAS_ORDER);
    if data.len() <= padlen {
        return Err(EggError::InvalidParameter {
            reason: format!(
                "{} samples cannot support the order-{} anti-alias filter (needs more than {})",
                data.len(),
                ANTIALIAS_ORDER,
                padlen
            ),
        });
    }

    let normalized_cutoff = ANTIALIAS_RELATIVE_CUTOFF / factor as f32;
    let sections = design_lowpass(ANTIALIAS_ORDER, normalized_cutoff)?;
    let filtered = filtfilt(&sections, data, padlen)?;

    Ok(filtered.iter().step_by(factor).copied().collect())
}
