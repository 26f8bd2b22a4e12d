// src/hal/fields.rs
//! Tagged register field tables
//!
//! Each register block is a fixed-size little-endian report image. Its
//! layout is a table of `FieldSpec` entries, and all access goes through
//! the pure `decode`/`encode` functions here. Encoding validates the
//! value against the field's legal set or range before touching the
//! image, so a rejected write leaves the image untouched.

use crate::error::{EggError, EggResult};

/// Width of one field in the report image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// One byte.
    U8,
    /// Two bytes, little-endian.
    U16,
    /// Four bytes, little-endian.
    U32,
}

impl FieldWidth {
    /// Size of the field in bytes.
    pub fn size(self) -> usize {
        match self {
            FieldWidth::U8 => 1,
            FieldWidth::U16 => 2,
            FieldWidth::U32 => 4,
        }
    }
}

/// Legal values a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalValues {
    /// Anything representable in the field's width.
    Any,
    /// One of an enumerated set.
    Set(&'static [u32]),
    /// An inclusive numeric range.
    Range(u32, u32),
}

impl LegalValues {
    fn allows(&self, value: u32) -> bool {
        match self {
            LegalValues::Any => true,
            LegalValues::Set(values) => values.contains(&value),
            LegalValues::Range(min, max) => value >= *min && value <= *max,
        }
    }
}

/// One named field of a register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used in errors and by-name access.
    pub name: &'static str,
    /// Byte offset within the report image (offset 0 is the report
    /// number byte).
    pub offset: usize,
    /// Field width.
    pub width: FieldWidth,
    /// Legal value constraint, enforced at encode time.
    pub legal: LegalValues,
}

impl FieldSpec {
    /// Read this field out of a report image.
    pub fn decode(&self, image: &[u8]) -> EggResult<u32> {
        let end = self.offset + self.width.size();
        let bytes = image.get(self.offset..end).ok_or(EggError::Transport {
            operation: "decode_report",
            reason: format!(
                "report of {} bytes too short for field `{}` at offset {}",
                image.len(),
                self.name,
                self.offset
            ),
        })?;
        Ok(match self.width {
            FieldWidth::U8 => bytes[0] as u32,
            FieldWidth::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
            FieldWidth::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }

    /// Write a validated value into a report image. The image is not
    /// modified when the value is rejected.
    pub fn encode(&self, image: &mut [u8], value: u32) -> EggResult<()> {
        if !self.legal.allows(value) {
            return Err(EggError::InvalidRegisterValue {
                field: self.name,
                value,
            });
        }
        let max = match self.width {
            FieldWidth::U8 => u8::MAX as u32,
            FieldWidth::U16 => u16::MAX as u32,
            FieldWidth::U32 => u32::MAX,
        };
        if value > max {
            return Err(EggError::InvalidRegisterValue {
                field: self.name,
                value,
            });
        }
        let end = self.offset + self.width.size();
        let bytes = image.get_mut(self.offset..end).ok_or(EggError::Transport {
            operation: "encode_report",
            reason: format!("field `{}` does not fit the report image", self.name),
        })?;
        match self.width {
            FieldWidth::U8 => bytes[0] = value as u8,
            FieldWidth::U16 => bytes.copy_from_slice(&(value as u16).to_le_bytes()),
            FieldWidth::U32 => bytes.copy_from_slice(&value.to_le_bytes()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: FieldSpec = FieldSpec {
        name: "rate",
        offset: 1,
        width: FieldWidth::U32,
        legal: LegalValues::Set(&[48_000, 96_000]),
    };

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut image = [0u8; 8];
        RATE.encode(&mut image, 96_000).unwrap();
        assert_eq!(RATE.decode(&image).unwrap(), 96_000);
        // Little-endian on the wire.
        assert_eq!(&image[1..5], &96_000u32.to_le_bytes());
    }

    #[test]
    fn test_illegal_value_leaves_image_untouched() {
        let mut image = [0u8; 8];
        RATE.encode(&mut image, 48_000).unwrap();
        let before = image;
        let err = RATE.encode(&mut image, 44_100).unwrap_err();
        assert!(matches!(err, EggError::InvalidRegisterValue { field: "rate", value: 44_100 }));
        assert_eq!(image, before);
    }

    #[test]
    fn test_range_constraint() {
        let spec = FieldSpec {
            name: "clock_freq",
            offset: 0,
            width: FieldWidth::U8,
            legal: LegalValues::Range(0, 4),
        };
        let mut image = [0u8; 1];
        spec.encode(&mut image, 4).unwrap();
        assert!(spec.encode(&mut image, 5).is_err());
    }

    #[test]
    fn test_short_report_decode_fails() {
        let image = [0u8; 3];
        assert!(matches!(RATE.decode(&image), Err(EggError::Transport { .. })));
    }
}
