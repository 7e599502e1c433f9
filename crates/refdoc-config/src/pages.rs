//! Configuration of the pages built next to the per-module helper pages.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the combined plugins page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
  /// Directory holding one module per plugin.
  pub source_dir: PathBuf,

  /// Markdown file all plugins are rendered into.
  pub output: PathBuf,

  /// Value of the `permalink` front matter key.
  pub permalink: String,

  /// Value of the `title` front matter key.
  pub title: String,
}

impl Default for PluginsConfig {
  fn default() -> Self {
    Self {
      source_dir: PathBuf::from("lib/plugin"),
      output:     PathBuf::from("docs/plugins.md"),
      permalink:  "plugins".to_string(),
      title:      "Plugins".to_string(),
    }
  }
}

/// A helper module living outside the source tree, such as one installed
/// from a package registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHelper {
  /// Page identifier; the page is written to `<output_dir>/<name>.md`.
  pub name: String,

  /// Path to the helper's module. Never modified.
  pub source: PathBuf,
}

/// A hand-written markdown file republished with front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
  pub source:    PathBuf,
  pub output:    PathBuf,
  pub permalink: String,
  pub title:     String,

  #[serde(default)]
  pub layout: Option<String>,

  #[serde(default)]
  pub sidebar: Option<String>,

  #[serde(default)]
  pub sidebar_depth: Option<String>,

  /// Emits `editLink: false` when disabled.
  #[serde(default = "default_true")]
  pub edit_link: bool,

  /// Optional `# heading` placed above the body.
  #[serde(default)]
  pub heading: Option<String>,

  /// Optional note rendered as a blockquote under the heading.
  #[serde(default)]
  pub note: Option<String>,
}

const fn default_true() -> bool {
  true
}

/// Configuration for the release notes page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
  pub source: PathBuf,
  pub output: PathBuf,

  /// Repository URL used to link `#123` issue references.
  pub repository: String,
}

impl Default for ChangelogConfig {
  fn default() -> Self {
    Self {
      source:     PathBuf::from("CHANGELOG.md"),
      output:     PathBuf::from("docs/changelog.md"),
      repository: "https://github.com/codeceptjs/CodeceptJS".to_string(),
    }
  }
}
