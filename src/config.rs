// src/config.rs

use crate::error::{PipelineError, Result};
use crate::validate::DurationBounds;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the staging directory when the
/// configuration does not name one.
pub const STAGING_DIR_ENV: &str = "SOUNDLIT_STAGING_DIR";

const DEFAULT_AVAILABLE_FORMATS: [&str; 11] = [
    ".wav", ".aac", ".ogg", ".mp3", ".aiff", ".flac", ".ape", ".dsd", ".mqa", ".wma", ".m4a",
];

const DEFAULT_COMMON_EXTENSIONS: [&str; 4] = ["wav", "mp3", "ogg", "flac"];

/// Settings of one widget instance. Immutable once the widget is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub min_duration: f64,     // seconds, inclusive
    pub max_duration: f64,     // seconds, inclusive
    pub available_formats: Vec<String>, // upload picker filter
    pub convert_to: String,    // target format passed to the decoder
    pub common_extensions: Vec<String>, // already canonical, never converted
    pub sample_rate: u32,      // resample target
    pub mono: bool,
    pub root_dir: Option<PathBuf>,
    pub decoder: String,
    pub require_contiguous: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            min_duration: 0.0,
            max_duration: 60_000.0,
            available_formats: DEFAULT_AVAILABLE_FORMATS.iter().map(|s| s.to_string()).collect(),
            convert_to: "wav".to_string(),
            common_extensions: DEFAULT_COMMON_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            sample_rate: 22_050,
            mono: true,
            root_dir: None,
            decoder: "ffmpeg".to_string(),
            require_contiguous: true,
        }
    }
}

impl WidgetConfig {
    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_duration.is_finite() || !self.max_duration.is_finite() {
            return Err(PipelineError::Config("duration bounds must be finite".into()));
        }
        if self.min_duration < 0.0 {
            return Err(PipelineError::Config(format!(
                "min_duration must not be negative, got {}",
                self.min_duration
            )));
        }
        if self.min_duration > self.max_duration {
            return Err(PipelineError::Config(format!(
                "min_duration ({}) exceeds max_duration ({})",
                self.min_duration, self.max_duration
            )));
        }
        if self.sample_rate == 0 {
            return Err(PipelineError::Config("sample_rate must be positive".into()));
        }
        if self.convert_to.trim().is_empty() {
            return Err(PipelineError::Config("convert_to must name a format".into()));
        }
        Ok(())
    }

    pub fn bounds(&self) -> DurationBounds {
        DurationBounds::new(self.min_duration, self.max_duration)
    }

    pub fn channels(&self) -> usize {
        if self.mono { 1 } else { 2 }
    }

    /// Resolves the staging directory: explicit setting, then the
    /// environment, then the working directory.
    pub fn staging_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.root_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = std::env::var_os(STAGING_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        Ok(std::env::current_dir()?)
    }

    /// Label shown by the upload picker.
    pub fn upload_prompt(&self) -> String {
        format!(
            "Upload an audio file that is at least {} and at most {} seconds long.",
            self.min_duration, self.max_duration
        )
    }
}
