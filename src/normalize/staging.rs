// src/normalize/staging.rs

use log::warn;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Input file written for the external decoder. Removed on drop, so the
/// path is gone whether conversion succeeds or fails.
pub struct StagingFile {
    path: PathBuf,
}

impl StagingFile {
    /// `{root}/{unique_id}.{extension}`
    pub fn location(root: &Path, unique_id: &str, extension: &str) -> PathBuf {
        root.join(format!("{unique_id}.{extension}"))
    }

    pub fn create(path: PathBuf, bytes: &[u8]) -> std::io::Result<Self> {
        // Own the path before writing so a partial write is cleaned up too.
        let staged = Self { path };
        let file = File::create(&staged.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove staging file {}: {e}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = StagingFile::location(dir.path(), "abc", "m4a");
        assert_eq!(path, dir.path().join("abc.m4a"));
        {
            let staged = StagingFile::create(path.clone(), b"data").unwrap();
            assert_eq!(std::fs::read(staged.path()).unwrap(), b"data");
        }
        assert!(!path.exists());
    }

    #[test]
    fn failed_create_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("abc.m4a");
        assert!(StagingFile::create(path.clone(), b"data").is_err());
        assert!(!path.exists());
    }
}
