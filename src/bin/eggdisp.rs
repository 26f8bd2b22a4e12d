// src/bin/eggdisp.rs
//! Render an EGG-D800 recording to a PNG waveform display.
//!
//! Runs the same load pipeline as the interactive viewer and draws the
//! audio and low-passed pressure channels as three stacked panels.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use plotters::prelude::*;
use tracing::info;

use eggd800_core::config::DisplayConfig;
use eggd800_core::viewer::{DisplaySource, ViewerController};

#[derive(Parser, Debug)]
#[command(name = "eggdisp", version, about = "Display an EGG-D800 recording")]
struct Args {
    /// Multiplexed two-channel WAV recording to display
    wavfile: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "eggdisp.png")]
    out: PathBuf,

    /// Display configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Low-pass cutoff for the pressure channels, in Hz
    #[arg(long)]
    cutoff: Option<f32>,

    /// Low-pass filter order
    #[arg(long)]
    order: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = match &args.config {
        Some(path) => DisplayConfig::from_file(path)?,
        None => DisplayConfig::default(),
    };
    if let Some(cutoff) = args.cutoff {
        config.lowpass_cutoff_hz = cutoff;
    }
    if let Some(order) = args.order {
        config.filter_order = order;
    }

    let mut viewer = ViewerController::new(config.clone())?;
    viewer.load(&args.wavfile)?;

    render(viewer.source(), &config, &args.out)?;
    info!(out = %args.out.display(), "display written");
    Ok(())
}

fn render(
    source: &DisplaySource,
    config: &DisplayConfig,
    out: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    if source.is_empty() {
        return Err("recording produced no display samples".into());
    }

    let width = config.plot_width as u32;
    let height = 3 * config.plot_height as u32;
    let root = BitMapBackend::new(out, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((3, 1));
    let labels = ["audio", "p1 (oral)", "p2 (nasal)"];
    let channels = [&source.au, &source.p1, &source.p2];
    let t_end = source.x.last().copied().unwrap_or(1.0).max(f32::EPSILON);

    for ((panel, label), channel) in panels.iter().zip(labels).zip(channels) {
        let (y_min, y_max) = channel
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (y_min, y_max) = if (y_max - y_min).abs() < f32::EPSILON {
            (y_min - 1.0, y_max + 1.0)
        } else {
            (y_min, y_max)
        };

        let mut chart = ChartBuilder::on(panel)
            .margin(5)
            .caption(label, ("sans-serif", 16))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 25)
            .build_cartesian_2d(0f32..t_end, y_min..y_max)?;
        chart.configure_mesh().light_line_style(WHITE.mix(0.5)).draw()?;
        chart.draw_series(LineSeries::new(
            source.x.iter().copied().zip(channel.iter().copied()),
            &BLUE,
        ))?;
    }

    root.present()?;
    Ok(())
}
