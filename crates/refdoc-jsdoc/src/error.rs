use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when extracting JSDoc comments.
#[derive(Debug, Error)]
pub enum JsDocError {
  /// The source file could not be read from disk.
  #[error("failed to read source file `{path}`: {source}")]
  ReadFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A doc comment is malformed beyond recovery.
  ///
  /// Raised for unterminated `/**` blocks, tags that require a name but have
  /// none, and type expressions with unbalanced braces.
  #[error("{}:{line}: malformed doc comment: {message}", path.display())]
  Parse {
    path:    PathBuf,
    line:    u32,
    message: String,
  },
}
