use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use refdoc::{
  cli::{Cli, Commands},
  extract::extractor_for,
  pages,
  pipeline,
};
use refdoc_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    // Check if file already exists and that we're not forcing overwrite
    if output.exists() && !force {
      bail!(
        "Configuration file already exists: {}. Use --force to overwrite.",
        output.display()
      );
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }

    Config::generate_default_config(format, output).wrap_err_with(|| {
      format!(
        "Failed to generate configuration file: {}",
        output.display()
      )
    })?;

    info!(
      "Configuration file created successfully. Edit it to customize your \
       documentation build."
    );
    return Ok(());
  }

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
  if let Some(build) = cli.command.build_args() {
    build.apply(&mut config);
  }
  config.validate()?;
  config.validate_paths()?;

  run(&cli.command, &config)
}

/// Dispatch a page-writing command.
fn run(command: &Commands, config: &Config) -> Result<()> {
  // Setup thread pool once for all parallel operations
  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()?;

  let extractor = extractor_for(&config.extractor);
  info!("Using the {} extractor", config.extractor.mode);

  let written = match command {
    Commands::Init { .. } => return Ok(()),
    Commands::Docs { .. } => pipeline::run_all(config, extractor.as_ref())?,
    Commands::Helpers { .. } => {
      pipeline::run_helpers(config, extractor.as_ref())?
    },
    Commands::Plugins { .. } => {
      let plugins = config.plugins.clone().unwrap_or_default();
      vec![pages::run_plugins(&plugins, config, extractor.as_ref())?]
    },
    Commands::External { .. } => {
      pages::run_external_helpers(config, extractor.as_ref())?
    },
    Commands::Pages { .. } => {
      let mut written = pages::run_static_pages(config)?;
      if let Some(changelog) = &config.changelog {
        written.push(pages::run_changelog(changelog)?);
      }
      written
    },
    Commands::BuildLib { for_typings, .. } => {
      let staged = pipeline::build_lib(config, *for_typings)?;
      staged.into_iter().map(|module| module.path).collect()
    },
  };

  info!("Wrote {} files", written.len());
  Ok(())
}
