// src/normalize/mod.rs

pub mod riff;
pub mod staging;
pub mod transcoder;

use crate::acquire::RawCapture;
use crate::error::ConversionError;
use log::{debug, info};
use std::path::PathBuf;

pub use staging::StagingFile;
pub use transcoder::{Ffmpeg, Transcoder};

/// Bytes in one of the canonical formats, ready for decoding.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub bytes: Vec<u8>,
    /// Format of `bytes`, used as a probe hint.
    pub extension: Option<String>,
}

pub struct FormatNormalizer<T = Ffmpeg> {
    transcoder: T,
    common_extensions: Vec<String>,
    convert_to: String,
    root_dir: PathBuf,
}

impl<T: Transcoder> FormatNormalizer<T> {
    pub fn new(
        transcoder: T,
        common_extensions: Vec<String>,
        convert_to: impl Into<String>,
        root_dir: PathBuf,
    ) -> Self {
        Self { transcoder, common_extensions, convert_to: convert_to.into(), root_dir }
    }

    pub fn root_dir(&self) -> &std::path::Path {
        &self.root_dir
    }

    pub fn is_common(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| self.common_extensions.iter().any(|c| c == ext))
    }

    pub fn normalize(&self, capture: &RawCapture) -> Result<NormalizedAudio, ConversionError> {
        let extension = capture.extension();
        if self.is_common(extension) {
            debug!("{:?} is already canonical, skipping conversion", capture.filename);
            return Ok(NormalizedAudio {
                bytes: capture.bytes.clone(),
                extension: extension.map(str::to_string),
            });
        }

        let path = StagingFile::location(&self.root_dir, &capture.unique_id, extension.unwrap_or("bin"));
        let staged = StagingFile::create(path.clone(), &capture.bytes).map_err(|source| {
            ConversionError::Staging { path: path.display().to_string(), source }
        })?;

        // `staged` is dropped on every return below, removing the file.
        let mut bytes = self.transcoder.transcode(staged.path(), &self.convert_to)?;
        if self.convert_to == "wav" && riff::patch_streamed_sizes(&mut bytes) {
            debug!("patched streamed wave header sizes");
        }
        info!(
            "converted {:?} to {} ({} -> {} bytes)",
            capture.filename,
            self.convert_to,
            capture.bytes.len(),
            bytes.len()
        );

        Ok(NormalizedAudio { bytes, extension: Some(self.convert_to.clone()) })
    }
}
