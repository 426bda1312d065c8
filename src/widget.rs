// src/widget.rs

use crate::acquire::{AcquisitionSelector, RawCapture, SourceMode, UploadRequest};
use crate::config::WidgetConfig;
use crate::error::Result;
use crate::normalize::{Ffmpeg, FormatNormalizer, Transcoder};
use crate::validate::{DurationValidator, Verdict};
use crate::waveform::{Waveform, WaveformLoader};
use log::error;

/// User-facing error display of the host UI.
pub trait ErrorSink {
    fn report(&mut self, message: &str);
}

/// Sends reports to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&mut self, message: &str) {
        error!("{message}");
    }
}

impl ErrorSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Upload/record front door: acquire, normalize, check duration, load.
///
/// Rejections and conversion failures are reported to the sink and come back
/// as `Ok(None)`. Decode failures come back as `Err`.
pub struct AudioWidget<S = LogSink, T = Ffmpeg> {
    config: WidgetConfig,
    selector: AcquisitionSelector,
    normalizer: FormatNormalizer<T>,
    validator: DurationValidator,
    loader: WaveformLoader,
    sink: S,
}

impl<S: ErrorSink> AudioWidget<S, Ffmpeg> {
    pub fn new(config: WidgetConfig, selector: AcquisitionSelector, sink: S) -> Result<Self> {
        let ffmpeg = Ffmpeg::new(config.decoder.clone());
        Self::with_transcoder(config, selector, sink, ffmpeg)
    }
}

impl<S: ErrorSink, T: Transcoder> AudioWidget<S, T> {
    pub fn with_transcoder(
        config: WidgetConfig,
        selector: AcquisitionSelector,
        sink: S,
        transcoder: T,
    ) -> Result<Self> {
        config.validate()?;
        let root_dir = config.staging_dir()?;
        let normalizer = FormatNormalizer::new(
            transcoder,
            config.common_extensions.clone(),
            config.convert_to.clone(),
            root_dir,
        );
        Ok(Self {
            validator: DurationValidator::new(config.bounds()),
            loader: WaveformLoader::new(config.sample_rate, config.mono),
            config,
            selector,
            normalizer,
            sink,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        self.normalizer.root_dir()
    }

    pub fn get_audio(&mut self, mode: SourceMode) -> Result<Option<Waveform>> {
        let request = UploadRequest {
            prompt: self.config.upload_prompt(),
            accept: &self.config.available_formats,
        };
        let Some(capture) = self.selector.acquire(mode, &request)? else {
            return Ok(None);
        };
        self.process(&capture)
    }

    pub fn process(&mut self, capture: &RawCapture) -> Result<Option<Waveform>> {
        let normalized = match self.normalizer.normalize(capture) {
            Ok(n) => n,
            Err(e) => {
                self.sink
                    .report(&format!("We're sorry, something happened to the server.\n{e}"));
                return Ok(None);
            }
        };

        match self.validator.validate(&normalized)? {
            Verdict::Rejected(rejection) => {
                self.sink.report(&rejection.to_string());
                Ok(None)
            }
            Verdict::Accepted { .. } => Ok(Some(self.loader.load(&normalized)?)),
        }
    }
}
