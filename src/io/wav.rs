// src/io/wav.rs
//! WAV reading for EGG-D800 recordings
//!
//! Recordings come off the device as two-channel WAV files holding the
//! multiplexed stream. Samples are kept as raw counts (no rescaling);
//! the calibration layer is what turns counts into physical units.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use ndarray::Array2;

use crate::error::{EggError, EggResult};

fn read_error(path: &Path, reason: impl ToString) -> EggError {
    EggError::FileRead {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read a WAV file into `(sample_rate, frames)` where `frames` has one
/// row per frame and one column per channel.
///
/// # Errors
///
/// `FileRead` on a missing, truncated, or otherwise undecodable file.
pub fn read_wav(path: &Path) -> EggResult<(u32, Array2<f32>)> {
    let mut reader = WavReader::open(path).map_err(|e| read_error(path, e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(read_error(path, "file declares zero channels"));
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| read_error(path, e))?,
        SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| read_error(path, e))?,
    };

    if samples.len() % channels != 0 {
        return Err(read_error(path, "sample count is not a whole number of frames"));
    }
    let frames = samples.len() / channels;
    let data = Array2::from_shape_vec((frames, channels), samples)
        .map_err(|e| read_error(path, e))?;
    Ok((spec.sample_rate, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_test_wav(path: &Path, rate: u32, frames: &[[i16; 2]]) {
        let spec = WavSpec {
            channels: 2,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for frame in frames {
            writer.write_sample(frame[0]).unwrap();
            writer.write_sample(frame[1]).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_read_two_channel_int_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wav");
        write_test_wav(&path, 48_000, &[[1, 10], [2, 20], [3, 30], [4, 40]]);

        let (rate, data) = read_wav(&path).unwrap();
        assert_eq!(rate, 48_000);
        assert_eq!(data.nrows(), 4);
        assert_eq!(data.ncols(), 2);
        assert_eq!(data[[0, 0]], 1.0);
        assert_eq!(data[[3, 1]], 40.0);
    }

    #[test]
    fn test_missing_file_is_file_read_error() {
        let result = read_wav(Path::new("/nonexistent/recording.wav"));
        assert!(matches!(result, Err(EggError::FileRead { .. })));
    }

    #[test]
    fn test_garbage_file_is_file_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"this is not a wav file").unwrap();
        assert!(matches!(read_wav(&path), Err(EggError::FileRead { .. })));
    }
}
