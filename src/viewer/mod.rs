// src/viewer/mod.rs
//! Waveform viewer: session state, display buffer, and controller

pub mod controller;
pub mod display;
pub mod session;

pub use controller::{
    ChannelSummary, RescaleOutcome, SelectionReport, ViewerController, ViewerState,
};
pub use display::{DisplaySource, ZoomBand};
pub use session::SessionData;
