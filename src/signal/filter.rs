// src/signal/filter.rs
//! Zero-phase Butterworth low-pass filtering
//!
//! The filter is designed by bilinear transform as a cascade of biquad
//! sections and applied forward and backward so the phase delay of the
//! two passes cancels. Edge transients are suppressed by odd-extension
//! padding plus steady-state initial conditions, which also makes the
//! filter exact at DC.

use crate::config::constants::filter::MAX_ORDER;
use crate::error::{EggError, EggResult};

/// One second-order section in direct form II transposed. First-order
/// sections are represented with `b2 = a2 = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Biquad {
    /// Run the section over `data` in place, starting from the steady
    /// state for the first sample so a constant input passes unchanged.
    fn run(&self, data: &mut [f32]) {
        if data.is_empty() {
            return;
        }
        let x0 = data[0];
        let dc_gain = (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2);
        let y0 = dc_gain * x0;
        let mut z1 = y0 - self.b0 * x0;
        let mut z2 = self.b2 * x0 - self.a2 * y0;
        for x in data.iter_mut() {
            let input = *x;
            let y = self.b0 * input + z1;
            z1 = self.b1 * input - self.a1 * y + z2;
            z2 = self.b2 * input - self.a2 * y;
            *x = y;
        }
    }
}

/// Design a low-pass Butterworth cascade for the given order and
/// normalized cutoff (fraction of Nyquist, exclusive 0..1).
pub(crate) fn design_lowpass(order: usize, normalized_cutoff: f32) -> EggResult<Vec<Biquad>> {
    if order == 0 || order > MAX_ORDER {
        return Err(EggError::InvalidParameter {
            reason: format!("filter order must be 1-{MAX_ORDER}, got {order}"),
        });
    }
    if normalized_cutoff <= 0.0 || normalized_cutoff >= 1.0 {
        return Err(EggError::InvalidParameter {
            reason: format!(
                "normalized cutoff must lie in (0, 1), got {normalized_cutoff}"
            ),
        });
    }

    // Pre-warp for the bilinear transform.
    let k = (std::f32::consts::FRAC_PI_2 * normalized_cutoff).tan();
    let k2 = k * k;
    let mut sections = Vec::with_capacity((order + 1) / 2);

    // Conjugate pole pairs of the analog prototype.
    for pair in 0..order / 2 {
        let angle = std::f32::consts::PI * (2.0 * pair as f32 + 1.0) / (2.0 * order as f32);
        let two_sin = 2.0 * angle.sin();
        let norm = 1.0 + two_sin * k + k2;
        sections.push(Biquad {
            b0: k2 / norm,
            b1: 2.0 * k2 / norm,
            b2: k2 / norm,
            a1: (2.0 * k2 - 2.0) / norm,
            a2: (1.0 - two_sin * k + k2) / norm,
        });
    }

    // Odd orders carry one real pole.
    if order % 2 == 1 {
        let norm = 1.0 + k;
        sections.push(Biquad {
            b0: k / norm,
            b1: k / norm,
            b2: 0.0,
            a1: (k - 1.0) / norm,
            a2: 0.0,
        });
    }

    Ok(sections)
}

/// Edge padding required by the forward-backward pass.
pub(crate) fn pad_len(order: usize) -> usize {
    3 * (order + 1)
}

fn run_cascade(sections: &[Biquad], data: &mut [f32]) {
    for section in sections {
        section.run(data);
    }
}

/// Apply a section cascade forward and backward over `data`, with odd
/// reflection of `padlen` samples at each edge.
pub(crate) fn filtfilt(sections: &[Biquad], data: &[f32], padlen: usize) -> EggResult<Vec<f32>> {
    let n = data.len();
    if n <= padlen {
        return Err(EggError::InvalidParameter {
            reason: format!(
                "input of {n} samples is too short for zero-phase filtering (needs more than {padlen})"
            ),
        });
    }

    let mut extended = Vec::with_capacity(n + 2 * padlen);
    let first = data[0];
    let last = data[n - 1];
    for i in 0..padlen {
        extended.push(2.0 * first - data[padlen - i]);
    }
    extended.extend_from_slice(data);
    for i in 0..padlen {
        extended.push(2.0 * last - data[n - 2 - i]);
    }

    run_cascade(sections, &mut extended);
    extended.reverse();
    run_cascade(sections, &mut extended);
    extended.reverse();

    Ok(extended[padlen..padlen + n].to_vec())
}

/// Zero-phase low-pass Butterworth filter of `data`.
///
/// The cutoff is normalized internally as `cutoff / (0.5 * rate)`.
///
/// # Errors
///
/// `InvalidParameter` if the cutoff is at or above Nyquist, the order is
/// outside 1..=8, or the input is too short for the edge padding.
pub fn butter_lowpass_filter(
    data: &[f32],
    cutoff: f32,
    rate: f32,
    order: usize,
) -> EggResult<Vec<f32>> {
    if rate <= 0.0 {
        return Err(EggError::InvalidParameter {
            reason: format!("sample rate must be positive, got {rate}"),
        });
    }
    let normalized = cutoff / (0.5 * rate);
    let sections = design_lowpass(order, normalized)?;
    filtfilt(&sections, data, pad_len(order))
}
