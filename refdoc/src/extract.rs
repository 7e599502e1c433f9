//! Turning module files into reference markdown.
//!
//! [`LibraryExtractor`] parses doc comments in-process. [`CommandExtractor`]
//! shells out to an external documentation tool and captures whatever it
//! prints. Member merging needs structured member lists and always goes
//! through [`extract_document`].
use std::{
  path::{Path, PathBuf},
  process::Command,
};

use refdoc_config::extractor::{ExtractorConfig, ExtractorMode};
use refdoc_jsdoc::{Document, extract_from_file, extract_from_files, render_markdown};

use crate::error::ExtractError;

/// Renders the documentation of one or more modules as a single markdown
/// document: shallow, alphabetical, without a table of contents.
pub trait Extractor: Send + Sync {
  /// Render `paths` together.
  ///
  /// # Errors
  ///
  /// Returns an [`ExtractError`] when the modules cannot be read or parsed,
  /// or when an external tool fails.
  fn render(&self, paths: &[PathBuf]) -> Result<String, ExtractError>;
}

/// In-process extraction with `refdoc-jsdoc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryExtractor;

impl Extractor for LibraryExtractor {
  fn render(&self, paths: &[PathBuf]) -> Result<String, ExtractError> {
    let document = extract_from_files(paths)?;
    Ok(render_markdown(&document))
  }
}

/// Runs `program args... paths...` and takes its stdout as the markdown.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
  program: String,
  args:    Vec<String>,
}

impl CommandExtractor {
  #[must_use]
  pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
    Self {
      program: program.into(),
      args,
    }
  }
}

impl Extractor for CommandExtractor {
  fn render(&self, paths: &[PathBuf]) -> Result<String, ExtractError> {
    log::debug!(
      "Running {} {} on {} file(s)",
      self.program,
      self.args.join(" "),
      paths.len()
    );

    let output = Command::new(&self.program)
      .args(&self.args)
      .args(paths)
      .output()
      .map_err(|source| {
        ExtractError::Spawn {
          program: self.program.clone(),
          source,
        }
      })?;

    if !output.status.success() {
      return Err(ExtractError::Command {
        program: self.program.clone(),
        status:  output.status,
        stderr:  String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    String::from_utf8(output.stdout).map_err(|source| {
      ExtractError::Utf8 {
        program: self.program.clone(),
        source,
      }
    })
  }
}

/// Build the extractor selected by the configuration.
#[must_use]
pub fn extractor_for(config: &ExtractorConfig) -> Box<dyn Extractor> {
  match config.mode {
    ExtractorMode::Library => Box::new(LibraryExtractor),
    ExtractorMode::Command => {
      Box::new(CommandExtractor::new(
        config.command.clone(),
        config.args.clone(),
      ))
    },
  }
}

/// Structured, shallow extraction of a single module.
///
/// # Errors
///
/// Returns an [`ExtractError`] if the module cannot be read or parsed.
pub fn extract_document(path: &Path) -> Result<Document, ExtractError> {
  Ok(extract_from_file(path)?)
}
