use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How reference markdown is produced for a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
  /// In-process extraction with `refdoc-jsdoc`.
  #[default]
  Library,

  /// Run an external documentation tool and capture its stdout.
  Command,
}

impl fmt::Display for ExtractorMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Library => "library",
      Self::Command => "command",
    })
  }
}

impl FromStr for ExtractorMode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "library" => Ok(Self::Library),
      "command" => Ok(Self::Command),
      _ => {
        Err(ConfigError::Config(format!(
          "Invalid value for 'extractor.mode': '{s}'. Expected library or \
           command"
        )))
      },
    }
  }
}

/// Configuration for the documentation extractor
///
/// Member merging always uses the in-process extractor, since it needs the
/// structured member lists rather than rendered markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
  /// Which extractor renders pages.
  pub mode: ExtractorMode,

  /// Program run in command mode.
  pub command: String,

  /// Arguments passed before the module paths in command mode.
  pub args: Vec<String>,
}

impl Default for ExtractorConfig {
  fn default() -> Self {
    Self {
      mode:    ExtractorMode::Library,
      command: "documentation".to_string(),
      args:    [
        "build",
        "-f",
        "md",
        "--shallow",
        "--markdown-toc=false",
        "--sort-order=alpha",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
    }
  }
}

impl ExtractorConfig {
  /// Take every field of `other` that differs from the default.
  pub fn merge(&mut self, other: Self) {
    let defaults = Self::default();
    if other.mode != defaults.mode {
      self.mode = other.mode;
    }
    if other.command != defaults.command {
      self.command = other.command;
    }
    if other.args != defaults.args {
      self.args = other.args;
    }
  }
}
