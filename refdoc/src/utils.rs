//! Filesystem helpers that attach the offending path to every error.
use std::{fs, path::Path};

use crate::error::PipelineError;

/// Read a whole file as UTF-8.
///
/// # Errors
///
/// Returns [`PipelineError::Read`] with the path attached.
pub fn read_file(path: &Path) -> Result<String, PipelineError> {
  fs::read_to_string(path).map_err(|source| {
    PipelineError::Read {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Write `content` to `path`, creating parent directories and replacing any
/// previous file.
///
/// # Errors
///
/// Returns [`PipelineError::Write`] with the path attached.
pub fn write_file(path: &Path, content: &str) -> Result<(), PipelineError> {
  let to_error = |source| {
    PipelineError::Write {
      path: path.to_path_buf(),
      source,
    }
  };

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(to_error)?;
  }
  fs::write(path, content).map_err(to_error)
}
