// src/error.rs

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Failures that make the bytes of one invocation unusable.
///
/// These point at a transport or data-integrity problem rather than at the
/// user's content, so they are never turned into a soft rejection.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed recorder payload: {0}")]
    Payload(String),

    #[error("audio decoder failed: {0}")]
    Symphonia(#[from] SymphoniaError),

    #[error("no decodable audio track in input")]
    NoTrack,

    #[error("input contains no audio frames")]
    Empty,
}

/// The external decoder could not turn a capture into the canonical format.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to stage input at {path}: {source}")]
    Staging {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("`{program}` produced no output: {stderr}")]
    NoOutput { program: String, stderr: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("unsupported upload format `{0}`")]
    UnsupportedFormat(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("resampler setup failed: {0}")]
    ResamplerSetup(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),

    #[error("failed to encode waveform: {0}")]
    Encode(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<SymphoniaError> for PipelineError {
    fn from(e: SymphoniaError) -> Self {
        PipelineError::Decode(DecodeError::Symphonia(e))
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
