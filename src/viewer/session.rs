// src/viewer/session.rs
//! Per-file session data
//!
//! Everything derived from one loaded recording lives here: the
//! full-resolution channels and their filtered/calibrated variants, the
//! decimated display-rate channels, and the calibration records scoped
//! to the recording's directory. A session is immutable once built and
//! is replaced wholesale by the next load.

use std::path::Path;

use tracing::{debug, info};

use crate::config::constants::device::MUX_FACTOR;
use crate::config::DisplayConfig;
use crate::error::EggResult;
use crate::io::read_wav;
use crate::signal::{
    butter_lowpass_filter, decimate, demux, load_calibration, CalibrationSet,
};

/// All buffers derived from one loaded file.
#[derive(Debug, Clone)]
pub struct SessionData {
    /// Effective full-resolution rate: the WAV rate divided by the
    /// device's own two-way multiplexing.
    pub orig_rate: f32,
    /// Display rate after load-time decimation.
    pub rate: f32,

    /// Full-resolution audio.
    pub orig_au: Vec<f32>,
    /// Full-resolution Lx.
    pub orig_lx: Vec<f32>,
    /// Full-resolution raw oral pressure.
    pub orig_p1: Vec<f32>,
    /// Full-resolution raw nasal pressure.
    pub orig_p2: Vec<f32>,
    /// Low-passed raw oral pressure at full resolution.
    pub orig_lp_p1: Vec<f32>,
    /// Low-passed raw nasal pressure at full resolution.
    pub orig_lp_p2: Vec<f32>,
    /// Low-passed calibrated oral pressure, when a p1 record exists.
    pub orig_lp_cal_p1: Option<Vec<f32>>,
    /// Low-passed calibrated nasal pressure, when a p2 record exists.
    pub orig_lp_cal_p2: Option<Vec<f32>>,

    /// Decimated audio.
    pub au: Vec<f32>,
    /// Decimated Lx.
    pub lx: Vec<f32>,
    /// Decimated raw oral pressure.
    pub p1: Vec<f32>,
    /// Decimated raw nasal pressure.
    pub p2: Vec<f32>,
    /// Low-passed decimated oral pressure (what the plot shows).
    pub lp_p1: Vec<f32>,
    /// Low-passed decimated nasal pressure.
    pub lp_p2: Vec<f32>,
    /// Time axis for the decimated channels, in seconds.
    pub timepts: Vec<f32>,

    /// Directory-scoped calibration, if a usable file was found.
    pub calibration: Option<CalibrationSet>,
}

impl SessionData {
    /// Run the whole load pipeline for one recording.
    pub fn load(path: &Path, config: &DisplayConfig) -> EggResult<Self> {
        config.validate()?;
        let (wav_rate, data) = read_wav(path)?;
        let channels = demux(&data, config.audio_first)?;
        let orig_rate = wav_rate as f32 / MUX_FACTOR as f32;
        debug!(
            path = %path.display(),
            wav_rate,
            samples = channels.audio.len(),
            "demuxed recording"
        );

        // Calibration is scoped to the recording's directory, not the
        // file itself.
        let cal_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let calibration = load_calibration(cal_dir);

        let cutoff = config.lowpass_cutoff_hz;
        let order = config.filter_order;
        let orig_lp_p1 = butter_lowpass_filter(&channels.p1, cutoff, orig_rate, order)?;
        let orig_lp_p2 = butter_lowpass_filter(&channels.p2, cutoff, orig_rate, order)?;

        let cal_channel = |record: Option<&crate::signal::CalibrationRecord>,
                           raw: &[f32]|
         -> EggResult<Option<Vec<f32>>> {
            match record {
                Some(rec) => Ok(Some(butter_lowpass_filter(
                    &rec.apply(raw),
                    cutoff,
                    orig_rate,
                    order,
                )?)),
                None => Ok(None),
            }
        };
        let orig_lp_cal_p1 =
            cal_channel(calibration.as_ref().and_then(|c| c.p1.as_ref()), &channels.p1)?;
        let orig_lp_cal_p2 =
            cal_channel(calibration.as_ref().and_then(|c| c.p2.as_ref()), &channels.p2)?;

        let factor = config.decimation_factor;
        let au = decimate(&channels.audio, factor)?;
        let lx = decimate(&channels.lx, factor)?;
        let p1 = decimate(&channels.p1, factor)?;
        let p2 = decimate(&channels.p2, factor)?;
        let rate = orig_rate / factor as f32;

        let lp_p1 = butter_lowpass_filter(&p1, cutoff, rate, order)?;
        let lp_p2 = butter_lowpass_filter(&p2, cutoff, rate, order)?;

        let timepts: Vec<f32> = (0..au.len()).map(|i| i as f32 / rate).collect();

        info!(
            path = %path.display(),
            orig_rate,
            rate,
            duration_secs = timepts.last().copied().unwrap_or(0.0),
            calibrated = calibration.is_some(),
            "session loaded"
        );

        Ok(Self {
            orig_rate,
            rate,
            orig_au: channels.audio,
            orig_lx: channels.lx,
            orig_p1: channels.p1,
            orig_p2: channels.p2,
            orig_lp_p1,
            orig_lp_p2,
            orig_lp_cal_p1,
            orig_lp_cal_p2,
            au,
            lx,
            p1,
            p2,
            lp_p1,
            lp_p2,
            timepts,
            calibration,
        })
    }

    /// Total duration of the decimated channels in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.timepts.last().copied().unwrap_or(0.0)
    }

    /// Unit label for a calibrated pressure channel, falling back to
    /// "raw" when no record exists.
    pub fn units_p1(&self) -> &str {
        self.calibration
            .as_ref()
            .and_then(|c| c.p1.as_ref())
            .map(|r| r.units())
            .unwrap_or("raw")
    }

    /// Unit label for the nasal channel.
    pub fn units_p2(&self) -> &str {
        self.calibration
            .as_ref()
            .and_then(|c| c.p2.as_ref())
            .map(|r| r.units())
            .unwrap_or("raw")
    }
}
