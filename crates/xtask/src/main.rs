use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;
use refdoc::cli::Cli;

const BIN_NAME: &str = "refdoc";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the refdoc CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist", value_parser = clap::value_parser!(std::path::PathBuf))]
    output_dir: PathBuf,

    /// Only generate shell completions.
    #[arg(long, conflicts_with = "manpage_only")]
    completions_only: bool,

    /// Only generate manpages.
    #[arg(long, conflicts_with = "completions_only")]
    manpage_only: bool,
  },

  /// Write the sample configuration files shipped with releases
  SampleConfig {
    /// Output directory for the samples.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  match xtask.command {
    Commands::Dist {
      output_dir,
      completions_only,
      manpage_only,
    } => {
      if !manpage_only {
        generate_completions(&output_dir)?;
      }
      if !completions_only {
        generate_manpages(&output_dir)?;
      }
    },
    Commands::SampleConfig { output_dir } => {
      write_sample_configs(&output_dir)?;
    },
  }

  Ok(())
}

/// Generate shell completions for various shells.
fn generate_completions(output_dir: &Path) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;
  let mut cmd = Cli::command();
  for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
    generate_to(shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
  }
  println!(
    "Shell completions generated in {}",
    completions_dir.display()
  );
  Ok(())
}

/// Generate `refdoc.1` plus one `refdoc-<command>.1` page per subcommand.
fn generate_manpages(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;

  let cmd = Cli::command().name(BIN_NAME);
  render_manpage(cmd.clone(), &man_dir.join(format!("{BIN_NAME}.1")))?;

  for sub in cmd.get_subcommands() {
    let name = format!("{BIN_NAME}-{}", sub.get_name());
    let page = sub.clone().name(name.clone());
    render_manpage(page, &man_dir.join(format!("{name}.1")))?;
  }

  println!("Manpages generated in {}", man_dir.display());
  Ok(())
}

fn render_manpage(cmd: clap::Command, file_path: &Path) -> Result<()> {
  let mut file = fs::File::create(file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  Man::new(cmd)
    .render(&mut file)
    .with_context(|| format!("Failed to render {}", file_path.display()))
}

/// Write `refdoc.toml` and `refdoc.json` with every default spelled out.
fn write_sample_configs(output_dir: &Path) -> Result<()> {
  fs::create_dir_all(output_dir)?;
  for format in ["toml", "json"] {
    let template = refdoc_config::templates::get_template(format)?;
    let path = output_dir.join(format!("{BIN_NAME}.{format}"));
    fs::write(&path, template)
      .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Sample configuration written to {}", path.display());
  }
  Ok(())
}
