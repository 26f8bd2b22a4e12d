// tests/viewer_pipeline.rs
//! End-to-end tests of the viewer pipeline
//!
//! Each test synthesizes a multiplexed two-channel WAV recording (and
//! optionally a calibration file) in a temporary directory, loads it
//! through the controller, and checks the derived buffers, stride
//! changes, and selection statistics.

use std::f32::consts::PI;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use eggd800_core::config::DisplayConfig;
use eggd800_core::signal::CALIBRATION_FILE;
use eggd800_core::viewer::{RescaleOutcome, ViewerController, ViewerState};

/// Write a multiplexed recording: even frames carry (audio, lx), odd
/// frames carry (p2, p1). `gen` maps a full-resolution sample index to
/// the (audio, lx, p1, p2) tuple.
fn write_recording(
    path: &Path,
    wav_rate: u32,
    samples: usize,
    gen: impl Fn(usize) -> (f32, f32, f32, f32),
) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: wav_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..samples {
        let (au, lx, p1, p2) = gen(i);
        writer.write_sample(au as i16).unwrap();
        writer.write_sample(lx as i16).unwrap();
        writer.write_sample(p2 as i16).unwrap();
        writer.write_sample(p1 as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn constant_pressures(au_amp: f32, p1: f32, p2: f32) -> impl Fn(usize) -> (f32, f32, f32, f32) {
    move |i| {
        let t = i as f32 / 24_000.0;
        let au = au_amp * (2.0 * PI * 220.0 * t).sin();
        (au, 100.0, p1, p2)
    }
}

#[test]
fn test_load_derives_rates_and_buffer_lengths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utt01.wav");
    // 48 kHz WAV, 1 s of full-resolution data per channel.
    write_recording(&path, 48_000, 24_000, constant_pressures(1000.0, 300.0, 150.0));

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    viewer.load(&path).unwrap();
    assert_eq!(*viewer.state(), ViewerState::Loaded);

    let session = viewer.session().unwrap();
    assert_eq!(session.orig_rate, 24_000.0);
    assert_eq!(session.rate, 12_000.0);
    assert_eq!(session.orig_au.len(), 24_000);
    assert_eq!(session.orig_lp_p1.len(), 24_000);
    // Decimation by 2 halves every channel; lengths stay consistent.
    assert_eq!(session.au.len(), 12_000);
    assert_eq!(session.lp_p1.len(), 12_000);
    assert_eq!(session.lp_p2.len(), 12_000);
    assert_eq!(session.timepts.len(), 12_000);
    assert!((session.duration_secs() - 1.0).abs() < 1e-3);

    // No calibration file in the directory.
    assert!(session.calibration.is_none());
    assert!(session.orig_lp_cal_p1.is_none());
    assert_eq!(session.units_p1(), "raw");
}

#[test]
fn test_initial_display_uses_quarter_width_stride() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utt01.wav");
    write_recording(&path, 48_000, 24_000, constant_pressures(1000.0, 300.0, 150.0));

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    viewer.load(&path).unwrap();

    // 12000 display samples over 800 px, quarter-width band:
    // round(12000 / 800 / 4) = 4.
    assert_eq!(viewer.step(), 4);
    assert_eq!(viewer.source().len(), 3000);
    let src = viewer.source();
    assert_eq!(src.au.len(), src.x.len());
    assert_eq!(src.p1.len(), src.x.len());
}

#[test]
fn test_rescale_band_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utt01.wav");
    // 10 s recording so every band yields a distinct stride.
    write_recording(&path, 48_000, 240_000, constant_pressures(1000.0, 300.0, 150.0));

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    viewer.load(&path).unwrap();
    // 120000 display samples: initial quarter-width stride is
    // round(120000 / 800 / 4) = 38.
    assert_eq!(viewer.step(), 38);

    // Zooming into a 1.5 s window crosses into full resolution.
    assert_eq!(viewer.rescale(2.0, 3.5), RescaleOutcome::Rebuilt(1));
    assert_eq!(viewer.step(), 1);
    assert_eq!(viewer.source().len(), 120_000);

    // Widening to 3 s moves to the eighth-width band.
    let eighth = viewer.rescale(2.0, 5.0);
    assert_eq!(eighth, RescaleOutcome::Rebuilt(19));

    // Panning within the same band leaves the buffer alone.
    assert_eq!(viewer.rescale(4.0, 7.0), RescaleOutcome::Unchanged);
    assert_eq!(viewer.step(), 19);

    // Back to a narrow window rebuilds at full resolution again.
    assert_eq!(viewer.rescale(0.0, 1.0), RescaleOutcome::Rebuilt(1));
}

#[test]
fn test_selection_statistics_on_constant_pressure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utt01.wav");
    write_recording(&path, 48_000, 24_000, constant_pressures(1000.0, 300.0, 150.0));

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    viewer.load(&path).unwrap();

    // Select the middle of the recording, away from filter edges.
    let report = viewer.select_range(1000, 2000).unwrap();
    assert!(report.t_start < report.t_end);
    assert!((report.duration() - (1000.0 * 4.0 / 12_000.0)).abs() < 1e-4);

    // A constant passes the low-pass untouched, so the mean over any
    // interior window recovers it.
    assert!((report.p1_raw.mean - 300.0).abs() < 1.0);
    assert!((report.p2_raw.mean - 150.0).abs() < 1.0);
    assert_eq!(report.p1_raw.units, "raw");
    assert!(report.p1_calibrated.is_none());

    // Reversed indices mean the same selection.
    let flipped = viewer.select_range(2000, 1000).unwrap();
    assert_eq!(flipped, report);
}

#[test]
fn test_calibrated_selection_reports_physical_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utt01.wav");
    write_recording(&path, 48_000, 24_000, constant_pressures(1000.0, 300.0, 150.0));
    // p1: slope 0.1 per count with a 100-count zero offset, so a raw
    // reading of 300 maps to (300 - 100) * 0.1 = 20 cmH2O.
    std::fs::write(
        dir.path().join(CALIBRATION_FILE),
        r#"
[p1_data]
refinputs = [0.0, 10.0, 20.0]
measurements = [100.0, 200.0, 300.0]
refunits = "cmH2O"
"#,
    )
    .unwrap();

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    viewer.load(&path).unwrap();

    let session = viewer.session().unwrap();
    assert!(session.calibration.as_ref().unwrap().p1.is_some());
    assert!(session.calibration.as_ref().unwrap().p2.is_none());
    assert_eq!(session.units_p1(), "cmH2O");

    let report = viewer.select_range(1000, 2000).unwrap();
    let p1_cal = report.p1_calibrated.unwrap();
    assert!((p1_cal.mean - 20.0).abs() < 0.1);
    assert_eq!(p1_cal.units, "cmH2O");
    // The uncalibrated channel is still reported alongside.
    assert!((report.p1_raw.mean - 300.0).abs() < 1.0);
    assert!(report.p2_calibrated.is_none());
}

#[test]
fn test_load_failure_then_successful_load_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.wav");
    std::fs::write(&bad, b"not a wav").unwrap();
    let good = dir.path().join("good.wav");
    write_recording(&good, 48_000, 24_000, constant_pressures(1000.0, 300.0, 150.0));

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    assert!(viewer.load(&bad).is_err());
    assert!(matches!(viewer.state(), ViewerState::Error(_)));
    assert!(viewer.source().is_empty());

    viewer.load(&good).unwrap();
    assert_eq!(*viewer.state(), ViewerState::Loaded);
    assert!(!viewer.source().is_empty());
}

#[test]
fn test_odd_frame_count_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.wav");
    // 3 frames: the demultiplexer needs whole audio/pressure cycles.
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for s in [1i16, 10, 2, 20, 3, 30] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let mut viewer = ViewerController::new(DisplayConfig::default()).unwrap();
    assert!(viewer.load(&path).is_err());
    assert!(matches!(viewer.state(), ViewerState::Error(_)));
}

#[test]
fn test_list_recordings_walks_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("session1");
    std::fs::create_dir(&sub).unwrap();
    write_recording(
        &dir.path().join("b.wav"),
        48_000,
        100,
        constant_pressures(10.0, 1.0, 1.0),
    );
    write_recording(&sub.join("a.WAV"), 48_000, 100, constant_pressures(10.0, 1.0, 1.0));
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let files = ViewerController::list_recordings(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|p| {
        p.extension()
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false)
    }));
}
