// src/viewer/controller.rs
//! Viewer controller
//!
//! Owns the loaded session, the current display stride, and the display
//! source the plots draw from. Drives the load / rescale / select-range
//! operations that UI callbacks map onto.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use crate::config::DisplayConfig;
use crate::error::{EggError, EggResult};
use crate::viewer::display::{DisplaySource, ZoomBand};
use crate::viewer::session::SessionData;

/// Lifecycle of the viewer with respect to a data file.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    /// Nothing loaded yet.
    NoFile,
    /// A load is running inside the current callback.
    Loading,
    /// A session is loaded and displayable.
    Loaded,
    /// The last load failed; the message is user-visible.
    Error(String),
}

/// What a rescale request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleOutcome {
    /// The zoom band changed; the display source was rebuilt with the
    /// contained stride.
    Rebuilt(usize),
    /// Same band as before; nothing reallocated.
    Unchanged,
    /// Another rescale was in flight; this request was discarded.
    Dropped,
}

/// Mean/sum summary of one channel over a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    /// Arithmetic mean over the selection.
    pub mean: f32,
    /// Sum over the selection.
    pub sum: f32,
    /// Unit label: the calibration units, or "raw".
    pub units: String,
}

/// Selection statistics over both pressure channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionReport {
    /// Selection start in seconds.
    pub t_start: f32,
    /// Selection end in seconds.
    pub t_end: f32,
    /// Raw (uncalibrated) filtered oral pressure.
    pub p1_raw: ChannelSummary,
    /// Raw (uncalibrated) filtered nasal pressure.
    pub p2_raw: ChannelSummary,
    /// Calibrated filtered oral pressure, when calibration exists.
    pub p1_calibrated: Option<ChannelSummary>,
    /// Calibrated filtered nasal pressure, when calibration exists.
    pub p2_calibrated: Option<ChannelSummary>,
}

impl SelectionReport {
    /// Selection duration in seconds.
    pub fn duration(&self) -> f32 {
        self.t_end - self.t_start
    }
}

/// Orchestrates the demux/filter/decimate/calibrate pipeline per file
/// and keeps the display buffer in step with the zoom level.
#[derive(Debug)]
pub struct ViewerController {
    config: DisplayConfig,
    state: ViewerState,
    session: Option<SessionData>,
    step: usize,
    source: DisplaySource,
    // Re-entrancy guard for rescale. The runtime is single-threaded
    // event callbacks; a request arriving mid-rescale is dropped, not
    // queued.
    rescale_in_progress: AtomicBool,
}

impl ViewerController {
    /// Create a controller with no file loaded.
    pub fn new(config: DisplayConfig) -> EggResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ViewerState::NoFile,
            session: None,
            step: 1,
            source: DisplaySource::default(),
            rescale_in_progress: AtomicBool::new(false),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Current display stride.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The buffer the plots draw from.
    pub fn source(&self) -> &DisplaySource {
        &self.source
    }

    /// The loaded session, if any.
    pub fn session(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }

    /// Load a recording, replacing any previous session.
    ///
    /// On failure the controller moves to [`ViewerState::Error`] but
    /// keeps running; the previous session is discarded either way.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EggResult<()> {
        let path = path.as_ref();
        self.state = ViewerState::Loading;
        self.session = None;
        self.source = DisplaySource::default();

        match SessionData::load(path, &self.config) {
            Ok(session) => {
                // Default zoom shows the wide view: quarter-width stride.
                let step =
                    ZoomBand::QuarterWidth.stride(session.au.len(), self.config.plot_width);
                self.source = DisplaySource::strided(
                    &session.timepts,
                    &session.au,
                    &session.lp_p1,
                    &session.lp_p2,
                    step,
                );
                self.step = step;
                self.session = Some(session);
                self.state = ViewerState::Loaded;
                info!(path = %path.display(), step, "file loaded");
                Ok(())
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "load failed");
                self.state = ViewerState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// React to a zoom/pan change of the visible time window.
    ///
    /// Recomputes the stride band for the visible duration and rebuilds
    /// the display source only when the band actually changed. A request
    /// arriving while another rescale is in flight is dropped.
    pub fn rescale(&mut self, visible_start: f32, visible_end: f32) -> RescaleOutcome {
        if self.rescale_in_progress.swap(true, Ordering::AcqRel) {
            debug!("rescale already in progress, dropping request");
            return RescaleOutcome::Dropped;
        }
        let outcome = self.rescale_locked(visible_start, visible_end);
        self.rescale_in_progress.store(false, Ordering::Release);
        outcome
    }

    fn rescale_locked(&mut self, visible_start: f32, visible_end: f32) -> RescaleOutcome {
        let Some(session) = self.session.as_ref() else {
            return RescaleOutcome::Unchanged;
        };
        let duration = visible_end - visible_start;
        let band = ZoomBand::for_duration(duration);
        let new_step = band.stride(session.au.len(), self.config.plot_width);
        if new_step == self.step {
            debug!(duration, step = self.step, "zoom band unchanged");
            return RescaleOutcome::Unchanged;
        }

        debug!(duration, old_step = self.step, new_step, "rebuilding display source");
        // Build the replacement completely before swapping it in, so a
        // reader never observes a half-updated source.
        let new_source = DisplaySource::strided(
            &session.timepts,
            &session.au,
            &session.lp_p1,
            &session.lp_p2,
            new_step,
        );
        self.source = new_source;
        self.step = new_step;
        RescaleOutcome::Rebuilt(new_step)
    }

    /// Summarize a box selection given in display-buffer index space.
    ///
    /// Indices map back through the current stride to display-rate
    /// sample positions, then through the rate ratio to full-resolution
    /// positions. Selections of zero or one point yield `None`.
    pub fn select_range(&self, index_a: usize, index_b: usize) -> Option<SelectionReport> {
        let session = self.session.as_ref()?;
        let (lo, hi) = if index_a <= index_b {
            (index_a, index_b)
        } else {
            (index_b, index_a)
        };
        if hi - lo < 1 {
            return None;
        }

        let t_start = (lo * self.step) as f32 / session.rate;
        let t_end = (hi * self.step) as f32 / session.rate;
        let orig_len = session.orig_lp_p1.len();
        let orig_lo = ((t_start * session.orig_rate).round() as usize).min(orig_len);
        let orig_hi = ((t_end * session.orig_rate).round() as usize).min(orig_len);
        if orig_hi <= orig_lo {
            return None;
        }

        let summarize = |data: &[f32], units: &str| -> ChannelSummary {
            let slice = &data[orig_lo..orig_hi];
            let sum: f64 = slice.iter().map(|&x| x as f64).sum();
            ChannelSummary {
                mean: (sum / slice.len() as f64) as f32,
                sum: sum as f32,
                units: units.to_string(),
            }
        };

        Some(SelectionReport {
            t_start,
            t_end,
            p1_raw: summarize(&session.orig_lp_p1, "raw"),
            p2_raw: summarize(&session.orig_lp_p2, "raw"),
            p1_calibrated: session
                .orig_lp_cal_p1
                .as_ref()
                .map(|data| summarize(data, session.units_p1())),
            p2_calibrated: session
                .orig_lp_cal_p2
                .as_ref()
                .map(|data| summarize(data, session.units_p2())),
        })
    }

    /// List the `*.wav` files under a data directory, recursively.
    pub fn list_recordings(dir: &Path) -> EggResult<Vec<std::path::PathBuf>> {
        fn walk(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> std::io::Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    walk(&path, out)?;
                } else if path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("wav"))
                    .unwrap_or(false)
                {
                    out.push(path);
                }
            }
            Ok(())
        }
        let mut files = Vec::new();
        walk(dir, &mut files).map_err(|e| EggError::FileRead {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controller_has_no_file() {
        let viewer = ViewerController::new(DisplayConfig::default()).unwrap();
        assert_eq!(*viewer.state(), ViewerState::NoFile);
        assert!(viewer.source().is_empty());
        assert!(viewer.session().is_none());
    }

    #[test]
    fn test_load_missing_file_enters_error_state() {
        let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
        let result = viewer.load(Path::new("/nonexistent/file.wav"));
        assert!(result.is_err());
        assert!(matches!(viewer.state(), ViewerState::Error(_)));
        // The controller survives and can still answer queries.
        assert!(viewer.select_range(0, 100).is_none());
        assert_eq!(viewer.rescale(0.0, 5.0), RescaleOutcome::Unchanged);
    }

    #[test]
    fn test_rescale_without_session_is_noop() {
        let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
        assert_eq!(viewer.rescale(0.0, 1.0), RescaleOutcome::Unchanged);
    }

    #[test]
    fn test_rescale_dropped_while_in_progress() {
        let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
        viewer.rescale_in_progress.store(true, Ordering::SeqCst);
        assert_eq!(viewer.rescale(0.0, 1.0), RescaleOutcome::Dropped);
        // The in-flight owner is responsible for clearing the flag; a
        // dropped request must not clear it.
        assert!(viewer.rescale_in_progress.load(Ordering::SeqCst));
    }

    #[test]
    fn test_select_range_single_point_is_empty() {
        let viewer = ViewerController::new(DisplayConfig::default()).unwrap();
        assert!(viewer.select_range(5, 5).is_none());
    }
}
