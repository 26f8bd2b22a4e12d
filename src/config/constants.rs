// src/config/constants.rs
//! Fixed constants for the EGG-D800 and its display pipeline

/// Signal and display constants.
pub mod display {
    /// Horizontal pixel budget of one plot panel.
    pub const DEFAULT_PLOT_WIDTH: usize = 800;
    /// Vertical pixel budget of one plot panel.
    pub const DEFAULT_PLOT_HEIGHT: usize = 200;
    /// Default low-pass cutoff for the pressure channels, in Hz.
    pub const DEFAULT_LOWPASS_CUTOFF_HZ: f32 = 50.0;
    /// Default Butterworth order for the pressure low-pass.
    pub const DEFAULT_FILTER_ORDER: usize = 3;
    /// Display-buffer decimation factor applied on load.
    pub const DEFAULT_DECIMATION_FACTOR: usize = 2;

    /// Zoom-band boundaries, in seconds of visible signal. At or below
    /// the first bound the display runs at full resolution.
    pub const BAND_FULL_RES_SECS: f32 = 2.0;
    /// Upper bound of the 1/8-width stride band.
    pub const BAND_EIGHTH_SECS: f32 = 5.0;
    /// Upper bound of the 1/4-width stride band.
    pub const BAND_QUARTER_SECS: f32 = 10.0;
}

/// Device-side constants.
pub mod device {
    /// USB vendor id of the EGG-D800 (Atmel).
    pub const VENDOR_ID: u16 = 0x03eb;
    /// USB product id of the EGG-D800.
    pub const PRODUCT_ID: u16 = 0x6801;

    /// Total data rates the AD7689 front end accepts, in Hz.
    pub const VALID_DATA_RATES: [u32; 5] = [48_000, 80_000, 96_000, 120_000, 192_000];

    /// Number of hardware input channels on the analog front end.
    pub const HW_CHANNEL_COUNT: usize = 8;

    /// The device interleaves two logical streams onto its wire format,
    /// so the per-stream rate is the wire rate divided by this.
    pub const MUX_FACTOR: u32 = 2;
}

/// Filtering limits.
pub mod filter {
    /// Highest Butterworth order the cascaded-biquad design supports.
    pub const MAX_ORDER: usize = 8;
    /// Relative cutoff (fraction of the post-decimation Nyquist) used by
    /// the decimation anti-alias filter.
    pub const ANTIALIAS_RELATIVE_CUTOFF: f32 = 0.8;
    /// Butterworth order of the decimation anti-alias filter.
    pub const ANTIALIAS_ORDER: usize = 8;
}
