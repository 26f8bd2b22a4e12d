// src/viewer/display.rs
//! Display buffer and zoom-dependent stride selection
//!
//! The plots are fed from a strided copy of the loaded channels. The
//! stride depends only on which zoom band the visible duration falls
//! into, so pan/zoom events that stay within a band never touch the
//! buffer.

use crate::config::constants::display;

/// Zoom bands over the visible duration, coarsest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomBand {
    /// Visible window of at most 2 s: every sample is drawn.
    FullResolution,
    /// At most 5 s: stride of 1/8 of the samples-per-pixel-width ratio.
    EighthWidth,
    /// At most 10 s: 1/4-width stride.
    QuarterWidth,
    /// Anything wider: 1/2-width stride.
    HalfWidth,
}

impl ZoomBand {
    /// Classify a visible duration in seconds.
    pub fn for_duration(duration_secs: f32) -> Self {
        if duration_secs <= display::BAND_FULL_RES_SECS {
            ZoomBand::FullResolution
        } else if duration_secs <= display::BAND_EIGHTH_SECS {
            ZoomBand::EighthWidth
        } else if duration_secs <= display::BAND_QUARTER_SECS {
            ZoomBand::QuarterWidth
        } else {
            ZoomBand::HalfWidth
        }
    }

    /// Stride this band implies for a buffer of `len` samples shown in
    /// `width` pixels. Never less than 1.
    pub fn stride(self, len: usize, width: usize) -> usize {
        let divisor = match self {
            ZoomBand::FullResolution => return 1,
            ZoomBand::EighthWidth => 8,
            ZoomBand::QuarterWidth => 4,
            ZoomBand::HalfWidth => 2,
        };
        let stride = (len as f32 / width as f32 / divisor as f32).round() as usize;
        stride.max(1)
    }
}

/// The strided channel copies the plots draw from. Replaced wholesale on
/// a band change; never mutated in place, so a reader always sees one
/// coherent generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySource {
    /// Time axis in seconds.
    pub x: Vec<f32>,
    /// Audio channel.
    pub au: Vec<f32>,
    /// Low-passed oral pressure.
    pub p1: Vec<f32>,
    /// Low-passed nasal pressure.
    pub p2: Vec<f32>,
}

impl DisplaySource {
    /// Build a source by striding the full display-rate channels.
    pub fn strided(
        timepts: &[f32],
        au: &[f32],
        lp_p1: &[f32],
        lp_p2: &[f32],
        step: usize,
    ) -> Self {
        let take = |v: &[f32]| v.iter().step_by(step.max(1)).copied().collect();
        Self {
            x: take(timepts),
            au: take(au),
            p1: take(lp_p1),
            p2: take(lp_p2),
        }
    }

    /// Number of points per channel.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when no file is loaded.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
