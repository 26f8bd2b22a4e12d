// src/hal/afe.rs
//! AD7689 analog-front-end register block (report 1)
//!
//! Layout: report number byte, channel count (u32), total data rate
//! (u32), then eight u16 channel configuration words. Channel selection
//! by index resolves through the fixed pattern table and always rewrites
//! the channel words together with the channel count.

use crate::config::constants::device::{HW_CHANNEL_COUNT, VALID_DATA_RATES};
use crate::error::{EggError, EggResult};
use crate::hal::fields::{FieldSpec, FieldWidth, LegalValues};
use crate::hal::transport::HidTransport;

/// Report number of the AFE block.
pub const AFE_REPORT_NUM: u8 = 1;
/// Total report size: 1 + 4 + 4 + 8 * 2.
pub const AFE_REPORT_SIZE: usize = 25;

/// Configuration word per hardware input channel; bits 12-10 select the
/// input (IN0..IN7).
pub const CHANNEL_PATTERNS: [u16; HW_CHANNEL_COUNT] = [
    0b1010_000_100100100, // 0xa124 IN0
    0b1010_001_100100100, // 0xa324 IN1
    0b1010_010_100100100, // 0xa524 IN2
    0b1010_011_100100100, // 0xa724 IN3
    0b1010_100_100100100, // 0xa924 IN4
    0b1010_101_100100100, // 0xab24 IN5
    0b1010_110_100100100, // 0xad24 IN6
    0b1010_111_100100100, // 0xaf24 IN7
];

const NUM_CHANNELS: FieldSpec = FieldSpec {
    name: "num_channels",
    offset: 1,
    width: FieldWidth::U32,
    legal: LegalValues::Range(1, HW_CHANNEL_COUNT as u32),
};

const DATA_RATE: FieldSpec = FieldSpec {
    name: "data_rate",
    offset: 5,
    width: FieldWidth::U32,
    legal: LegalValues::Set(&VALID_DATA_RATES),
};

const CHANNEL_WORDS: [FieldSpec; HW_CHANNEL_COUNT] = {
    const NAMES: [&str; HW_CHANNEL_COUNT] = [
        "channel_0", "channel_1", "channel_2", "channel_3", "channel_4", "channel_5",
        "channel_6", "channel_7",
    ];
    let mut specs = [FieldSpec {
        name: "",
        offset: 0,
        width: FieldWidth::U16,
        legal: LegalValues::Any,
    }; HW_CHANNEL_COUNT];
    let mut i = 0;
    while i < HW_CHANNEL_COUNT {
        specs[i] = FieldSpec {
            name: NAMES[i],
            offset: 9 + 2 * i,
            width: FieldWidth::U16,
            legal: LegalValues::Any,
        };
        i += 1;
    }
    specs
};

/// In-memory image of the AFE register block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfeRegisters {
    image: [u8; AFE_REPORT_SIZE],
}

impl AfeRegisters {
    /// The block's field layout table.
    pub fn layout() -> Vec<FieldSpec> {
        let mut fields = vec![NUM_CHANNELS, DATA_RATE];
        fields.extend_from_slice(&CHANNEL_WORDS);
        fields
    }

    /// Build the block from a fetched report.
    pub fn from_report(report: &[u8]) -> EggResult<Self> {
        if report.len() != AFE_REPORT_SIZE {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!(
                    "AFE report is {} bytes, expected {AFE_REPORT_SIZE}",
                    report.len()
                ),
            });
        }
        if report[0] != AFE_REPORT_NUM {
            return Err(EggError::Transport {
                operation: "decode_report",
                reason: format!("expected report {AFE_REPORT_NUM}, got {}", report[0]),
            });
        }
        let mut image = [0u8; AFE_REPORT_SIZE];
        image.copy_from_slice(report);
        Ok(Self { image })
    }

    /// Fetch the block from the device.
    pub fn read<T: HidTransport>(transport: &mut T) -> EggResult<Self> {
        let report = transport.get_report(AFE_REPORT_NUM, AFE_REPORT_SIZE)?;
        Self::from_report(&report)
    }

    /// Transmit the complete block. Fields are never written piecemeal.
    pub fn write<T: HidTransport>(&self, transport: &mut T) -> EggResult<()> {
        transport.set_report(&self.image)
    }

    /// The serialized report image.
    pub fn report(&self) -> &[u8] {
        &self.image
    }

    /// Active channel count.
    pub fn num_channels(&self) -> u32 {
        NUM_CHANNELS.decode(&self.image).unwrap_or(0)
    }

    /// Stage a new channel count.
    pub fn set_num_channels(&mut self, count: u32) -> EggResult<()> {
        NUM_CHANNELS.encode(&mut self.image, count)
    }

    /// Total data rate in Hz.
    pub fn data_rate(&self) -> u32 {
        DATA_RATE.decode(&self.image).unwrap_or(0)
    }

    /// Stage a new total data rate. Only the device's fixed rate set is
    /// accepted.
    pub fn set_data_rate(&mut self, rate: u32) -> EggResult<()> {
        DATA_RATE.encode(&mut self.image, rate)
    }

    /// The eight channel configuration words.
    pub fn channels(&self) -> [u16; HW_CHANNEL_COUNT] {
        let mut out = [0u16; HW_CHANNEL_COUNT];
        for (word, spec) in out.iter_mut().zip(&CHANNEL_WORDS) {
            *word = spec.decode(&self.image).unwrap_or(0) as u16;
        }
        out
    }

    /// Select hardware input channels by index, staging the pattern
    /// words and the channel count as one unit. Nothing is staged if any
    /// index is out of range.
    pub fn select_channels(&mut self, indexes: &[usize]) -> EggResult<()> {
        if indexes.is_empty() || indexes.len() > HW_CHANNEL_COUNT {
            return Err(EggError::InvalidRegisterValue {
                field: "num_channels",
                value: indexes.len() as u32,
            });
        }
        for &idx in indexes {
            if idx >= HW_CHANNEL_COUNT {
                return Err(EggError::InvalidRegisterValue {
                    field: "channel_index",
                    value: idx as u32,
                });
            }
        }
        for (slot, &idx) in indexes.iter().enumerate() {
            CHANNEL_WORDS[slot].encode(&mut self.image, CHANNEL_PATTERNS[idx] as u32)?;
        }
        self.set_num_channels(indexes.len() as u32)
    }
}

impl Default for AfeRegisters {
    fn default() -> Self {
        // A safe baseline: two channels at the lowest rate.
        let mut image = [0u8; AFE_REPORT_SIZE];
        image[0] = AFE_REPORT_NUM;
        image[1..5].copy_from_slice(&2u32.to_le_bytes());
        image[5..9].copy_from_slice(&VALID_DATA_RATES[0].to_le_bytes());
        image[9..11].copy_from_slice(&CHANNEL_PATTERNS[0].to_le_bytes());
        image[11..13].copy_from_slice(&CHANNEL_PATTERNS[1].to_le_bytes());
        Self { image }
    }
}
