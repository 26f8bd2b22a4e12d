// src/hal/codec.rs
//! CS4245 audio-codec control block (report 3)
//!
//! Thirteen bytes: the report number followed by twelve one-byte
//! control fields. Besides the typed accessors for the fields the
//! application actually drives (clock frequency and the preamp/AGC
//! gains), the whole block is reachable by name through the layout
//! table.

use crate::error::{EggError, EggResult};
use crate::hal::fields::{FieldSpec, FieldWidth, LegalValues};
use crate::hal::transport::HidTransport;

/// Report number of the codec block.
pub const CODEC_REPORT_NUM: u8 = 3;
/// Total report size: 1 + 12 one-byte fields.
pub const CODEC_REPORT_SIZE: usize = 13;

const fn byte_field(name: &'static str, offset: usize, legal: LegalValues) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width: FieldWidth::U8,
        legal,
    }
}

/// Master clock frequency index: 48k, 32k, 24k, 16k, 12k.
const CLOCK_FREQ: FieldSpec = byte_field("clock_freq", 1, LegalValues::Range(0, 4));
const MIC_PREAMP: FieldSpec = byte_field("mic_preamp", 2, LegalValues::Any);
const ACC_PREAMP: FieldSpec = byte_field("acc_preamp", 3, LegalValues::Any);
const LX_AGC: FieldSpec = byte_field("lx_agc", 4, LegalValues::Any);

const LAYOUT: [FieldSpec; 12] = [
    CLOCK_FREQ,
    MIC_PREAMP,
    ACC_PREAMP,
    LX_AGC,
    byte_field("power_ctl", 5, LegalValues::Any),
    byte_field("adc_ctl", 6, LegalValues::Any),
    byte_field("aout_sel", 7, LegalValues::Any),
    byte_field("dac_ctl", 8, LegalValues::Any),
    byte_field("dac_ctl2", 9, LegalValues::Any),
    byte_field("dac_cha_vol", 10, LegalValues::Any),
    byte_field("dac_chb_vol", 11, LegalValues::Any),
    byte_field("irq_status", 12, LegalValues::Any),
];

/// In-memory image of the codec control block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRegisters {
    image: [u8; CODEC_REPORT_SIZE],
}

impl CodecRegisters {
    /// The block's field layout table.
    pub fn layout() -> &'static [FieldSpec] {
        &LAYOUT
    }

    /// Build the block from a fetched report.
    pub fn from_report(report: &[u8]) -> EggResult<Self> {
        if report.len() != CODEC_REPORT_SIZE {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!(
                    "codec report is {} bytes, expected {CODEC_REPORT_SIZE}",
                    report.len()
                ),
            });
        }
        if report[0] != CODEC_REPORT_NUM {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!("expected report {CODEC_REPORT_NUM}, got {}", report[0]),
            });
        }
        let mut image = [0u8; CODEC_REPORT_SIZE];
        image.copy_from_slice(report);
        Ok(Self { image })
    }

    /// Fetch the block from the device.
    pub fn read<T: HidTransport>(transport: &mut T) -> EggResult<Self> {
        let report = transport.get_report(CODEC_REPORT_NUM, CODEC_REPORT_SIZE)?;
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

    /// Look up a field in the layout table by name.
    pub fn field(name: &str) -> Option<&'static FieldSpec> {
        LAYOUT.iter().find(|spec| spec.name == name)
    }

    /// Read any field by name.
    pub fn get(&self, name: &str) -> EggResult<u32> {
        let spec = Self::field(name).ok_or_else(|| EggError::InvalidParameter {
            reason: format!("no codec field named `{name}`"),
        })?;
        spec.decode(&self.image)
    }

    /// Stage any field by name, subject to its legal values.
    pub fn set(&mut self, name: &str, value: u32) -> EggResult<()> {
        let spec = Self::field(name).ok_or_else(|| EggError::InvalidParameter {
            reason: format!("no codec field named `{name}`"),
        })?;
        spec.encode(&mut self.image, value)
    }

    /// Master clock frequency index.
    pub fn clock_freq(&self) -> u8 {
        self.image[CLOCK_FREQ.offset]
    }

    /// Stage the clock frequency index (0..=4).
    pub fn set_clock_freq(&mut self, index: u8) -> EggResult<()> {
        CLOCK_FREQ.encode(&mut self.image, index as u32)
    }

    /// Microphone preamp gain.
    pub fn mic_preamp(&self) -> u8 {
        self.image[MIC_PREAMP.offset]
    }

    /// Stage the microphone preamp gain.
    pub fn set_mic_preamp(&mut self, gain: u8) -> EggResult<()> {
        MIC_PREAMP.encode(&mut self.image, gain as u32)
    }

    /// Accelerometer preamp gain.
    pub fn acc_preamp(&self) -> u8 {
        self.image[ACC_PREAMP.offset]
    }

    /// Stage the accelerometer preamp gain.
    pub fn set_acc_preamp(&mut self, gain: u8) -> EggResult<()> {
        ACC_PREAMP.encode(&mut self.image, gain as u32)
    }

    /// Lx automatic gain control setting.
    pub fn lx_agc(&self) -> u8 {
        self.image[LX_AGC.offset]
    }

    /// Stage the Lx AGC setting.
    pub fn set_lx_agc(&mut self, value: u8) -> EggResult<()> {
        LX_AGC.encode(&mut self.image, value as u32)
    }
}

impl Default for CodecRegisters {
    fn default() -> Self {
        let mut image = [0u8; CODEC_REPORT_SIZE];
        image[0] = CODEC_REPORT_NUM;
        Self { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_every_payload_byte_once() {
        let mut seen = [false; CODEC_REPORT_SIZE];
        seen[0] = true; // report number
        for spec in CodecRegisters::layout() {
            assert!(!seen[spec.offset], "field `{}` overlaps", spec.name);
            seen[spec.offset] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn test_clock_freq_range_enforced() {
        let mut regs = CodecRegisters::default();
        regs.set_clock_freq(4).unwrap();
        assert_eq!(regs.clock_freq(), 4);
        assert!(matches!(
            regs.set_clock_freq(5),
            Err(EggError::InvalidRegisterValue { field: "clock_freq", .. })
        ));
        assert_eq!(regs.clock_freq(), 4);
    }

    #[test]
    fn test_access_by_name() {
        let mut regs = CodecRegisters::default();
        regs.set("dac_cha_vol", 0x7f).unwrap();
        assert_eq!(regs.get("dac_cha_vol").unwrap(), 0x7f);
        assert!(regs.set("no_such_field", 1).is_err());
    }

    #[test]
    fn test_report_roundtrip() {
        let mut regs = CodecRegisters::default();
        regs.set_mic_preamp(10).unwrap();
        regs.set_lx_agc(1).unwrap();
        let back = CodecRegisters::from_report(regs.report()).unwrap();
        assert_eq!(back, regs);
        assert_eq!(back.mic_preamp(), 10);
        assert_eq!(back.lx_agc(), 1);
    }
}
