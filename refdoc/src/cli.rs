use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use refdoc_config::{Config, extractor::ExtractorMode};

/// Command line interface for refdoc
#[derive(Parser, Debug)]
#[command(author, version, about = "refdoc: reference pages from doc comments")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Options shared by every command that writes pages.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
  /// Directory the helper pages are written to.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Scratch directory for rewritten module copies.
  #[arg(short, long)]
  pub build_dir: Option<PathBuf>,

  /// Number of threads to use for parallel processing.
  #[arg(short = 'p', long = "jobs")]
  pub jobs: Option<usize>,

  /// Extractor used to render pages.
  #[arg(short, long, value_enum)]
  pub extractor: Option<ExtractorArg>,
}

/// CLI spelling of [`ExtractorMode`].
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorArg {
  Library,
  Command,
}

impl From<ExtractorArg> for ExtractorMode {
  fn from(arg: ExtractorArg) -> Self {
    match arg {
      ExtractorArg::Library => Self::Library,
      ExtractorArg::Command => Self::Command,
    }
  }
}

impl BuildArgs {
  /// CLI flags take precedence over configuration files.
  pub fn apply(&self, config: &mut Config) {
    if let Some(ref output_dir) = self.output_dir {
      config.output_dir.clone_from(output_dir);
    }
    if let Some(ref build_dir) = self.build_dir {
      config.build_dir.clone_from(build_dir);
    }
    if self.jobs.is_some() {
      config.jobs = self.jobs;
    }
    if let Some(extractor) = self.extractor {
      config.extractor.mode = extractor.into();
    }
  }
}

/// All supported subcommands for the refdoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new refdoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "refdoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Build every page: helpers, plugins, external helpers, static pages
  /// and the changelog.
  Docs {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Build one page per helper module.
  Helpers {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Build the combined plugins page.
  Plugins {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Build pages for helpers maintained outside the source tree.
  External {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Republish static pages and the changelog.
  Pages {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Stage rewritten module copies without building pages.
  BuildLib {
    #[command(flatten)]
    build: BuildArgs,

    /// Keep type aliases as written, for type definition generators.
    #[arg(long)]
    for_typings: bool,
  },
}

impl Commands {
  /// Build options of a page-writing command.
  #[must_use]
  pub const fn build_args(&self) -> Option<&BuildArgs> {
    match self {
      Self::Init { .. } => None,
      Self::Docs { build }
      | Self::Helpers { build }
      | Self::Plugins { build }
      | Self::External { build }
      | Self::Pages { build }
      | Self::BuildLib { build, .. } => Some(build),
    }
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
