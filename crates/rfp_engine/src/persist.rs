use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rfp_logging::rfp_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::{brief_filename, BRIEF_MIME_TYPE};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` when it is missing, then checks that a file can be
/// created inside it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir(format!("{}: {reason}", dir.display()));
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(unusable("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
        }
        Err(err) => return Err(unusable(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| unusable(e.to_string()))?;
    Ok(())
}

/// Publishes files into one directory. Bytes are staged in a temp file next
/// to the target and renamed over it once synced to disk.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the path of the published file. An existing file of the same
    /// name is replaced.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}

/// Saves the brief verbatim as `marketing-brief-<date>.md` in `dir`.
/// A second download on the same day replaces the earlier file.
pub fn save_brief(dir: &Path, date: NaiveDate, content: &str) -> Result<PathBuf, PersistError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&brief_filename(date), content.as_bytes())?;
    rfp_info!(
        "saved brief type={} bytes={} path={:?}",
        BRIEF_MIME_TYPE,
        content.len(),
        path
    );
    Ok(path)
}
