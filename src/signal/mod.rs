// src/signal/mod.rs
//! Signal pipeline: demultiplexing, filtering, decimation, calibration

pub mod calibration;
pub mod decimate;
pub mod demux;
pub mod filter;

pub use calibration::{
    load_calibration, CalibrationData, CalibrationRecord, CalibrationSet, CALIBRATION_FILE,
};
pub use decimate::decimate;
pub use demux::{demux, demux_audio_only, remux, AudioLxChannels, DemuxedChannels};
pub use filter::butter_lowpass_filter;
