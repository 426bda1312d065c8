// src/lib.rs

pub mod acquire;
pub mod config;
pub mod decoder;
pub mod error;
pub mod normalize;
pub mod validate;
pub mod waveform;
pub mod widget;

pub use acquire::{AcquisitionSelector, RawCapture, SourceMode, SparseByteMap};
pub use config::WidgetConfig;
pub use error::{ConversionError, DecodeError, PipelineError};
pub use normalize::{FormatNormalizer, NormalizedAudio};
pub use validate::{DurationBounds, DurationValidator, Rejection, Verdict};
pub use waveform::{Waveform, WaveformLoader}; // convenience
pub use widget::{AudioWidget, ErrorSink, LogSink};
