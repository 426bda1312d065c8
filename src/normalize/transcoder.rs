// src/normalize/transcoder.rs

use crate::error::ConversionError;
use log::info;
use std::path::Path;
use std::process::{Command, Stdio};

/// Turns a staged input file into bytes of the requested format.
pub trait Transcoder {
    fn transcode(&self, input: &Path, format: &str) -> Result<Vec<u8>, ConversionError>;
}

/// Runs `ffmpeg -hide_banner -i <input> -f <format> -` and reads stdout.
///
/// Blocks until the process exits. No timeout is applied, so a hung decoder
/// hangs the caller.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, input: &Path, format: &str) -> Result<Vec<u8>, ConversionError> {
        info!("converting {} to {format} with {}", input.display(), self.program);

        let output = Command::new(&self.program)
            .arg("-hide_banner")
            .arg("-i")
            .arg(input)
            .arg("-f")
            .arg(format)
            .arg("-")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ConversionError::Spawn { program: self.program.clone(), source })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(ConversionError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }
        if output.stdout.is_empty() {
            return Err(ConversionError::NoOutput { program: self.program.clone(), stderr });
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let ff = Ffmpeg::new("soundlit-no-such-decoder");
        let err = ff.transcode(Path::new("in.m4a"), "wav").unwrap_err();
        assert!(matches!(err, ConversionError::Spawn { .. }));
        assert!(err.to_string().contains("soundlit-no-such-decoder"));
    }
}
