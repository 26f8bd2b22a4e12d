// src/hal/gpio.rs
//! GPIO pin block (report 4)
//!
//! Five bytes: the report number followed by a little-endian u32
//! bitmask. Single-purpose pins get boolean accessors; the multi-bit
//! groups (P3 connector, manometry, AD7689 channel lines) are exposed as
//! masked values.

use crate::error::{EggError, EggResult};
use crate::hal::fields::{FieldSpec, FieldWidth, LegalValues};
use crate::hal::transport::HidTransport;

/// Report number of the GPIO block.
pub const GPIO_REPORT_NUM: u8 = 4;
/// Total report size: 1 + 4.
pub const GPIO_REPORT_SIZE: usize = 5;

/// Low microphone preamp gain select.
pub const LOW_MIC_PREAMP: u32 = 0x0000_0001;
/// Gx electrode pair select.
pub const GX_SEL: u32 = 0x0000_0002;
/// Fast AGC time constant.
pub const FAST_AGC: u32 = 0x0000_0004;
/// Nasal pressure sensor enable.
pub const NX_PRESSURE: u32 = 0x0000_0008;
/// Accelerometer preamp enable.
pub const ACC_PREAMP: u32 = 0x0000_0010;
/// Vin select.
pub const VIN_SEL: u32 = 0x0000_0020;
/// I2C pressure sensor enable.
pub const I2C_PRESSURE: u32 = 0x0000_0040;
/// P3 connector pin group.
pub const P3_CONNECTOR: u32 = 0x000f_c000;
/// Manometry pin group.
pub const MANOMETRY: u32 = 0x00f0_0000;
/// AD7689 channel line group.
pub const AD7689_CHANNELS: u32 = 0xff00_0000;

const BITMASK: FieldSpec = FieldSpec {
    name: "gpio_bitmask",
    offset: 1,
    width: FieldWidth::U32,
    legal: LegalValues::Any,
};

/// In-memory image of the GPIO block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPins {
    image: [u8; GPIO_REPORT_SIZE],
}

impl GpioPins {
    /// Build the block from a fetched report.
    pub fn from_report(report: &[u8]) -> EggResult<Self> {
        if report.len() != GPIO_REPORT_SIZE {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!(
                    "GPIO report is {} bytes, expected {GPIO_REPORT_SIZE}",
                    report.len()
                ),
            });
        }
        if report[0] != GPIO_REPORT_NUM {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!("expected report {GPIO_REPORT_NUM}, got {}", report[0]),
            });
        }
        let mut image = [0u8; GPIO_REPORT_SIZE];
        image.copy_from_slice(report);
        Ok(Self { image })
    }

    /// Fetch the block from the device.
    pub fn read<T: HidTransport>(transport: &mut T) -> EggResult<Self> {
        let report = transport.get_report(GPIO_REPORT_NUM, GPIO_REPORT_SIZE)?;
        Self::from_report(&report)
    }

    /// Transmit the complete block.
    pub fn write<T: HidTransport>(&self, transport: &mut T) -> EggResult<()> {
        transport.set_report(&self.image)
    }

    /// The serialized report image.
    pub fn report(&self) -> &[u8] {
        &self.image
    }

    /// The whole pin bitmask.
    pub fn bitmask(&self) -> u32 {
        u32::from_le_bytes([self.image[1], self.image[2], self.image[3], self.image[4]])
    }

    /// Replace the whole pin bitmask as a single unit.
    pub fn set_bitmask(&mut self, mask: u32) {
        // LegalValues::Any over the full u32 cannot fail.
        let _ = BITMASK.encode(&mut self.image, mask);
    }

    fn get_bit(&self, bit: u32) -> bool {
        self.bitmask() & bit != 0
    }

    fn set_bit(&mut self, bit: u32, on: bool) {
        let mask = if on {
            self.bitmask() | bit
        } else {
            self.bitmask() & !bit
        };
        self.set_bitmask(mask);
    }

    /// Gx electrode pair selected.
    pub fn gx_sel(&self) -> bool {
        self.get_bit(GX_SEL)
    }

    /// Select the Gx electrode pair.
    pub fn set_gx_sel(&mut self, on: bool) {
        self.set_bit(GX_SEL, on);
    }

    /// Nasal pressure sensor enabled.
    pub fn nx_pressure(&self) -> bool {
        self.get_bit(NX_PRESSURE)
    }

    /// Enable the nasal pressure sensor.
    pub fn set_nx_pressure(&mut self, on: bool) {
        self.set_bit(NX_PRESSURE, on);
    }

    /// Low microphone preamp gain selected.
    pub fn low_mic_preamp(&self) -> bool {
        self.get_bit(LOW_MIC_PREAMP)
    }

    /// Select the low microphone preamp gain.
    pub fn set_low_mic_preamp(&mut self, on: bool) {
        self.set_bit(LOW_MIC_PREAMP, on);
    }

    /// Fast AGC time constant selected.
    pub fn fast_agc(&self) -> bool {
        self.get_bit(FAST_AGC)
    }

    /// Select the fast AGC time constant.
    pub fn set_fast_agc(&mut self, on: bool) {
        self.set_bit(FAST_AGC, on);
    }

    /// Value of the P3 connector pin group.
    pub fn p3_connector(&self) -> u32 {
        (self.bitmask() & P3_CONNECTOR) >> P3_CONNECTOR.trailing_zeros()
    }

    /// Value of the manometry pin group.
    pub fn manometry(&self) -> u32 {
        (self.bitmask() & MANOMETRY) >> MANOMETRY.trailing_zeros()
    }
}

impl Default for GpioPins {
    fn default() -> Self {
        let mut image = [0u8; GPIO_REPORT_SIZE];
        image[0] = GPIO_REPORT_NUM;
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_accessors() {
        let mut pins = GpioPins::default();
        assert!(!pins.gx_sel());
        pins.set_gx_sel(true);
        pins.set_nx_pressure(true);
        assert!(pins.gx_sel());
        assert!(pins.nx_pressure());
        assert_eq!(pins.bitmask(), GX_SEL | NX_PRESSURE);

        pins.set_gx_sel(false);
        assert!(!pins.gx_sel());
        assert_eq!(pins.bitmask(), NX_PRESSURE);
    }

    #[test]
    fn test_groups_do_not_overlap_single_bits() {
        let singles =
            LOW_MIC_PREAMP | GX_SEL | FAST_AGC | NX_PRESSURE | ACC_PREAMP | VIN_SEL | I2C_PRESSURE;
        assert_eq!(singles & P3_CONNECTOR, 0);
        assert_eq!(singles & MANOMETRY, 0);
        assert_eq!(singles & AD7689_CHANNELS, 0);
        assert_eq!(P3_CONNECTOR & MANOMETRY, 0);
        assert_eq!(MANOMETRY & AD7689_CHANNELS, 0);
    }

    #[test]
    fn test_report_roundtrip_little_endian() {
        let mut pins = GpioPins::default();
        pins.set_bitmask(0x0102_0304);
        assert_eq!(pins.report(), &[GPIO_REPORT_NUM, 0x04, 0x03, 0x02, 0x01]);
        let back = GpioPins::from_report(pins.report()).unwrap();
        assert_eq!(back.bitmask(), 0x0102_0304);
    }

    #[test]
    fn test_group_extraction() {
        let mut pins = GpioPins::default();
        pins.set_bitmask(0x0000_4000 | GX_SEL); // lowest P3 bit
        assert_eq!(pins.p3_connector(), 1);
        assert_eq!(pins.manometry(), 0);
    }
}
