// src/acquire/mod.rs

pub mod reassemble;

use crate::error::{PipelineError, Result};
use log::info;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub use reassemble::SparseByteMap;

/// Filename given to reassembled recordings; the browser recorder always
/// emits a wave stream.
pub const RECORDING_NAME: &str = "recording.wav";

/// Bytes handed to the pipeline by one user interaction.
#[derive(Debug, Clone)]
pub struct RawCapture {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub unique_id: String,
}

impl RawCapture {
    pub fn new(bytes: Vec<u8>, filename: Option<String>, unique_id: impl Into<String>) -> Self {
        Self { bytes, filename, unique_id: unique_id.into() }
    }

    /// Wraps reassembled recorder bytes under a fresh identifier.
    pub fn recording(bytes: Vec<u8>) -> Self {
        Self::new(bytes, Some(RECORDING_NAME.to_string()), uuid::Uuid::new_v4().to_string())
    }

    /// Suffix after the last '.', or the whole name when there is none.
    pub fn extension(&self) -> Option<&str> {
        self.filename.as_deref().and_then(|name| name.rsplit('.').next())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Upload,
    Record,
}

/// A file returned by the upload picker.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub file_id: String,
    pub bytes: Vec<u8>,
}

impl From<UploadedFile> for RawCapture {
    fn from(f: UploadedFile) -> Self {
        RawCapture::new(f.bytes, Some(f.name), f.file_id)
    }
}

/// What the picker is asked to show.
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub prompt: String,
    pub accept: &'a [String],
}

impl UploadRequest<'_> {
    /// Case-insensitive filter check; entries may carry a leading dot.
    pub fn accepts(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.accept
            .iter()
            .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Upload picker of the hosting UI. `Ok(None)` means no file chosen yet.
pub trait UploadSource {
    fn pick(&mut self, request: &UploadRequest<'_>) -> Result<Option<UploadedFile>>;
}

/// In-browser recorder of the hosting UI. Yields the raw transport value, or
/// `None` while nothing has been recorded.
pub trait RecordSource {
    fn poll(&mut self) -> Result<Option<Value>>;
}

/// Chooses between the two byte sources.
pub struct AcquisitionSelector {
    upload: Box<dyn UploadSource>,
    record: Box<dyn RecordSource>,
    require_contiguous: bool,
}

impl AcquisitionSelector {
    pub fn new(
        upload: Box<dyn UploadSource>,
        record: Box<dyn RecordSource>,
        require_contiguous: bool,
    ) -> Self {
        Self { upload, record, require_contiguous }
    }

    pub fn acquire(&mut self, mode: SourceMode, request: &UploadRequest<'_>) -> Result<Option<RawCapture>> {
        match mode {
            SourceMode::Upload => Ok(self.upload.pick(request)?.map(RawCapture::from)),
            SourceMode::Record => {
                let Some(value) = self.record.poll()? else {
                    return Ok(None);
                };
                let Some(map) = SparseByteMap::from_transport(&value)? else {
                    return Ok(None);
                };
                info!("retrieving audio recording ({} bytes)", map.len());
                let bytes = map.reassemble(self.require_contiguous)?;
                Ok(Some(RawCapture::recording(bytes)))
            }
        }
    }
}

/// Upload source backed by a path on disk.
pub struct FileUpload {
    path: Option<PathBuf>,
}

impl FileUpload {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl UploadSource for FileUpload {
    fn pick(&mut self, request: &UploadRequest<'_>) -> Result<Option<UploadedFile>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let name = file_name(path);
        if !request.accepts(&name) {
            return Err(PipelineError::UnsupportedFormat(name));
        }
        let bytes = std::fs::read(path)?;
        Ok(Some(UploadedFile { name, file_id: uuid::Uuid::new_v4().to_string(), bytes }))
    }
}

/// Record source reading a saved recorder transport dump.
pub struct JsonRecording {
    path: Option<PathBuf>,
}

impl JsonRecording {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl RecordSource for JsonRecording {
    fn poll(&mut self) -> Result<Option<Value>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let reader = BufReader::new(File::open(path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
