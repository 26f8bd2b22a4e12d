// src/config/mod.rs
//! Configuration for the display pipeline
//!
//! Settings deserialize from TOML with per-field defaults so a partial
//! file (or none at all) always yields a usable configuration.

pub mod constants;

pub use constants::*;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EggError, EggResult};

/// Display-pipeline settings: plot geometry, filtering, and the
/// load-time decimation factor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Horizontal pixel budget; the stride bands are expressed in
    /// fractions of this width.
    #[serde(default = "defaults::plot_width")]
    pub plot_width: usize,

    /// Vertical pixels per panel.
    #[serde(default = "defaults::plot_height")]
    pub plot_height: usize,

    /// Low-pass cutoff applied to the pressure channels, in Hz.
    #[serde(default = "defaults::lowpass_cutoff_hz")]
    pub lowpass_cutoff_hz: f32,

    /// Butterworth order of the pressure low-pass.
    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    /// Decimation factor applied to every channel on load.
    #[serde(default = "defaults::decimation_factor")]
    pub decimation_factor: usize,

    /// Which half-cycle of the multiplexed stream carries the audio/Lx
    /// pair. True for current hardware revisions.
    #[serde(default = "defaults::audio_first")]
    pub audio_first: bool,
}

mod defaults {
    use super::constants::display;

    pub fn plot_width() -> usize {
        display::DEFAULT_PLOT_WIDTH
    }
    pub fn plot_height() -> usize {
        display::DEFAULT_PLOT_HEIGHT
    }
    pub fn lowpass_cutoff_hz() -> f32 {
        display::DEFAULT_LOWPASS_CUTOFF_HZ
    }
    pub fn filter_order() -> usize {
        display::DEFAULT_FILTER_ORDER
    }
    pub fn decimation_factor() -> usize {
        display::DEFAULT_DECIMATION_FACTOR
    }
    pub fn audio_first() -> bool {
        true
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            plot_width: defaults::plot_width(),
            plot_height: defaults::plot_height(),
            lowpass_cutoff_hz: defaults::lowpass_cutoff_hz(),
            filter_order: defaults::filter_order(),
            decimation_factor: defaults::decimation_factor(),
            audio_first: defaults::audio_first(),
        }
    }
}

impl DisplayConfig {
    /// Load a configuration from a TOML file, filling in defaults for
    /// any field the file omits.
    pub fn from_file(path: &Path) -> EggResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EggError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| EggError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Basic consistency checks that cannot be expressed per-field.
    pub fn validate(&self) -> EggResult<()> {
        if self.plot_width == 0 {
            return Err(EggError::InvalidParameter {
                reason: "plot_width must be nonzero".to_string(),
            });
        }
        if self.decimation_factor == 0 {
            return Err(EggError::InvalidParameter {
                reason: "decimation_factor must be at least 1".to_string(),
            });
        }
        if self.filter_order == 0 || self.filter_order > constants::filter::MAX_ORDER {
            return Err(EggError::InvalidParameter {
                reason: format!(
                    "filter_order must be 1-{}, got {}",
                    constants::filter::MAX_ORDER,
                    self.filter_order
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DisplayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.plot_width, 800);
        assert_eq!(config.lowpass_cutoff_hz, 50.0);
        assert_eq!(config.filter_order, 3);
        assert!(config.audio_first);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: DisplayConfig = toml::from_str("lowpass_cutoff_hz = 30.0").unwrap();
        assert_eq!(config.lowpass_cutoff_hz, 30.0);
        assert_eq!(config.plot_width, 800);
        assert_eq!(config.decimation_factor, 2);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = DisplayConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: DisplayConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_invalid_order_rejected() {
        let config = DisplayConfig {
            filter_order: 0,
            ..DisplayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
