use std::{io, path::PathBuf, process::ExitStatus, string::FromUtf8Error};

use refdoc_jsdoc::JsDocError;
use thiserror::Error;

/// Errors raised while turning modules into markdown.
#[derive(Debug, Error)]
pub enum ExtractError {
  #[error(transparent)]
  JsDoc(#[from] JsDocError),

  #[error("failed to run `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source:  io::Error,
  },

  #[error("`{program}` exited with {status}: {stderr}")]
  Command {
    program: String,
    status:  ExitStatus,
    stderr:  String,
  },

  #[error("`{program}` wrote non UTF-8 output: {source}")]
  Utf8 {
    program: String,
    #[source]
    source:  FromUtf8Error,
  },

  /// The module documents no class, so there is nothing to merge into.
  #[error("no documented class in {}", path.display())]
  NoUnit { path: PathBuf },
}

/// Top-level error type for the refdoc pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to list {}: {source}", path.display())]
  Walk {
    path:   PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// Extraction failed for a module. Fatal for the whole run.
  #[error("extraction failed for `{module}`: {source}")]
  Extraction {
    module: String,
    #[source]
    source: ExtractError,
  },

  #[error("`{derived}` inherits from `{base}`, which was not staged")]
  MissingBase { derived: String, base: String },

  #[error("invalid exclude pattern `{pattern}`: {source}")]
  Pattern {
    pattern: String,
    #[source]
    source:  regex::Error,
  },
}

impl PipelineError {
  /// Attach the module identifier to an extraction error.
  pub fn extraction(module: &str, source: impl Into<ExtractError>) -> Self {
    Self::Extraction {
      module: module.to_string(),
      source: source.into(),
    }
  }
}
