// src/main.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use soundlit::acquire::{AcquisitionSelector, FileUpload, JsonRecording};
use soundlit::{AudioWidget, LogSink, SourceMode, WidgetConfig};

#[derive(Parser)]
#[command(name = "soundlit", about = "Upload or replay a recording, check its length and load it")]
struct Cli {
    /// JSON widget configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    min_duration: Option<f64>,

    #[arg(long)]
    max_duration: Option<f64>,

    #[arg(long)]
    sample_rate: Option<u32>,

    /// Keep two channels instead of mixing down to mono
    #[arg(long)]
    stereo: bool,

    /// Write the loaded waveform here as 16-bit WAV
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    source: Source,
}

#[derive(Subcommand)]
enum Source {
    /// Use an audio file from disk
    Upload { path: PathBuf },
    /// Use a recorder transport dump (`{"arr": {"0": 82, ...}}`)
    Record { path: PathBuf },
}

fn main() -> Result<ExitCode, anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WidgetConfig::load_from_disk(path)?,
        None => WidgetConfig::default(),
    };
    if let Some(v) = cli.min_duration {
        config.min_duration = v;
    }
    if let Some(v) = cli.max_duration {
        config.max_duration = v;
    }
    if let Some(v) = cli.sample_rate {
        config.sample_rate = v;
    }
    if cli.stereo {
        config.mono = false;
    }

    let (mode, upload, record) = match cli.source {
        Source::Upload { path } => (SourceMode::Upload, Some(path), None),
        Source::Record { path } => (SourceMode::Record, None, Some(path)),
    };
    let selector = AcquisitionSelector::new(
        Box::new(FileUpload::new(upload)),
        Box::new(JsonRecording::new(record)),
        config.require_contiguous,
    );

    let mut widget = AudioWidget::new(config, selector, LogSink)?;
    let Some(waveform) = widget.get_audio(mode)? else {
        return Ok(ExitCode::from(2));
    };

    if let Some(out) = &cli.out {
        std::fs::write(out, waveform.to_wav_bytes()?)?;
        log::info!("wrote {}", out.display());
    }
    println!("{}", serde_json::to_string_pretty(&waveform.summary())?);
    Ok(ExitCode::SUCCESS)
}
