// src/signal/demux.rs
//! Demultiplexing of the interleaved EGG-D800 sample stream
//!
//! The device writes two logical sample pairs onto a two-column stream,
//! alternating row by row: one row carries the audio/Lx pair, the next
//! carries the pressure pair. `audio_first` says which parity carries
//! audio; on current hardware the audio pair comes first.

use ndarray::Array2;

use crate::error::{EggError, EggResult};

/// The four logical channels recovered from an aerodynamic recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DemuxedChannels {
    /// Microphone audio.
    pub audio: Vec<f32>,
    /// Electroglottograph signal.
    pub lx: Vec<f32>,
    /// Oral airflow/pressure.
    pub p1: Vec<f32>,
    /// Nasal airflow/pressure.
    pub p2: Vec<f32>,
}

/// The audio/Lx pair from a recording made without aerodynamic sensors.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioLxChannels {
    /// Microphone audio.
    pub audio: Vec<f32>,
    /// Electroglottograph signal.
    pub lx: Vec<f32>,
}

fn check_columns(data: &Array2<f32>) -> EggResult<()> {
    if data.ncols() != 2 {
        return Err(EggError::InvalidShape {
            reason: format!("expected 2 columns, got {}", data.ncols()),
        });
    }
    Ok(())
}

/// Separate a multiplexed aerodynamic recording into its four channels.
///
/// Rows alternate between an audio row (column 0 audio, column 1 Lx) and
/// a pressure row (column 0 p2, column 1 p1). With `audio_first` the
/// even rows are the audio rows; otherwise the odd rows are.
///
/// # Errors
///
/// `InvalidShape` if the matrix does not have exactly two columns or has
/// an odd number of rows (the stream must contain whole pairs).
pub fn demux(data: &Array2<f32>, audio_first: bool) -> EggResult<DemuxedChannels> {
    check_columns(data)?;
    if data.nrows() % 2 != 0 {
        return Err(EggError::InvalidShape {
            reason: format!(
                "aerodynamic stream requires an even row count, got {}",
                data.nrows()
            ),
        });
    }

    let half = data.nrows() / 2;
    let mut out = DemuxedChannels {
        audio: Vec::with_capacity(half),
        lx: Vec::with_capacity(half),
        p1: Vec::with_capacity(half),
        p2: Vec::with_capacity(half),
    };

    let audio_parity = if audio_first { 0 } else { 1 };
    for (row_idx, row) in data.rows().into_iter().enumerate() {
        if row_idx % 2 == audio_parity {
            out.audio.push(row[0]);
            out.lx.push(row[1]);
        } else {
            out.p2.push(row[0]);
            out.p1.push(row[1]);
        }
    }
    Ok(out)
}

/// Separate a recording made without the aerodynamic module. Every row
/// carries the audio/Lx pair, so there is no parity requirement.
pub fn demux_audio_only(data: &Array2<f32>) -> EggResult<AudioLxChannels> {
    check_columns(data)?;
    let mut out = AudioLxChannels {
        audio: Vec::with_capacity(data.nrows()),
        lx: Vec::with_capacity(data.nrows()),
    };
    for row in data.rows() {
        out.audio.push(row[0]);
        out.lx.push(row[1]);
    }
    Ok(out)
}

/// Rebuild the interleaved two-column stream from demuxed channels.
/// Inverse of [`demux`]; used by tests and by writers that need to put
/// edited channels back into the device's file format.
pub fn remux(channels: &DemuxedChannels, audio_first: bool) -> EggResult<Array2<f32>> {
    let half = channels.audio.len();
    if channels.lx.len() != half || channels.p1.len() != half || channels.p2.len() != half {
        return Err(EggError::InvalidShape {
            reason: "all four channels must have equal length".to_string(),
        });
    }
    let mut data = Array2::zeros((half * 2, 2));
    let audio_parity = if audio_first { 0 } else { 1 };
    for i in 0..half {
        let (audio_row, pressure_row) = if audio_parity == 0 {
            (2 * i, 2 * i + 1)
        } else {
            (2 * i + 1, 2 * i)
        };
        data[[audio_row, 0]] = channels.audio[i];
        data[[audio_row, 1]] = channels.lx[i];
        data[[pressure_row, 0]] = channels.p2[i];
        data[[pressure_row, 1]] = channels.p1[i];
    }
    Ok(data)
}
