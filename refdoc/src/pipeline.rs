//! Page assembly for documented modules.
//!
//! A run has two phases. Staging copies every module into the build
//! directory with partials substituted and type aliases expanded; the
//! original file is never written. Rendering then extracts each staged copy
//! (merging inherited members where a pairing is configured), normalizes the
//! markdown and writes `<output_dir>/<Id>.md`. Staging finishes for every
//! module before the first page is rendered, so a base unit's staged copy
//! always exists when a derived unit needs it.
use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use log::{debug, info};
use rayon::prelude::*;
use refdoc_config::{AliasRule, Config, inheritance::InheritanceConfig};
use refdoc_jsdoc::render_markdown;
use walkdir::WalkDir;

use crate::{
  error::{ExtractError, PipelineError},
  extract::{Extractor, extract_document},
  markdown::{FrontMatter, normalize},
  merge::{ExclusionFilter, merge_units},
  pages,
  template::{FragmentKind, Substitutions, expand_aliases},
  utils::{read_file, write_file},
};

/// A source module. Its identifier is the file name without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
  pub name: String,
  pub path: PathBuf,
}

/// A module after staging; `path` points into the build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedModule {
  pub name: String,
  pub path: PathBuf,
}

/// Modules directly inside `dir` with the given extension, sorted by file
/// name.
///
/// # Errors
///
/// Returns [`PipelineError::Walk`] if the directory cannot be listed.
pub fn discover_modules(
  dir: &Path,
  extension: &str,
) -> Result<Vec<Module>, PipelineError> {
  let mut modules = Vec::new();

  for entry in WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name()
  {
    let entry = entry.map_err(|source| {
      PipelineError::Walk {
        path: dir.to_path_buf(),
        source,
      }
    })?;
    let path = entry.path();
    if !entry.file_type().is_file()
      || path.extension().and_then(|ext| ext.to_str()) != Some(extension)
    {
      continue;
    }
    let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
      continue;
    };
    modules.push(Module {
      name: name.to_string(),
      path: path.to_path_buf(),
    });
  }

  debug!("Found {} modules in {}", modules.len(), dir.display());
  Ok(modules)
}

/// Rewrites module copies into the build directory.
#[derive(Debug, Clone)]
pub struct Stager {
  build_dir: PathBuf,
  partials:  Substitutions,
  aliases:   Vec<AliasRule>,
}

impl Stager {
  #[must_use]
  pub fn new(
    build_dir: impl Into<PathBuf>,
    partials: Substitutions,
    aliases: Vec<AliasRule>,
  ) -> Self {
    Self {
      build_dir: build_dir.into(),
      partials,
      aliases,
    }
  }

  /// Stager for the configured partials and alias rules. Type definition
  /// builds keep the aliases as written.
  ///
  /// # Errors
  ///
  /// Fails if the partials cannot be read.
  pub fn from_config(
    config: &Config,
    for_typings: bool,
  ) -> Result<Self, PipelineError> {
    let partials = Substitutions::load(
      FragmentKind::Partial,
      &config.partials_dir,
      &config.partial_extension,
    )?;
    let aliases = if for_typings {
      Vec::new()
    } else {
      config.alias_rules().to_vec()
    };
    Ok(Self::new(&config.build_dir, partials, aliases))
  }

  /// The staged text of `source`.
  #[must_use]
  pub fn transform(&self, source: &str) -> String {
    let text = self.partials.apply(source);
    expand_aliases(&text, &self.aliases)
  }

  /// Write the transformed copy of `module` to the build directory.
  ///
  /// # Errors
  ///
  /// Fails if the module cannot be read or the copy cannot be written.
  pub fn stage(&self, module: &Module) -> Result<StagedModule, PipelineError> {
    let source = read_file(&module.path)?;
    let file_name = module
      .path
      .file_name()
      .map_or_else(|| PathBuf::from(&module.name), PathBuf::from);
    let staged = self.build_dir.join(file_name);

    write_file(&staged, &self.transform(&source))?;
    debug!("Staged {} at {}", module.name, staged.display());

    Ok(StagedModule {
      name: module.name.clone(),
      path: staged,
    })
  }

  /// Stage `modules` in parallel. Fails on the first error.
  ///
  /// # Errors
  ///
  /// See [`Stager::stage`].
  pub fn stage_all(
    &self,
    modules: &[Module],
  ) -> Result<Vec<StagedModule>, PipelineError> {
    modules.par_iter().map(|module| self.stage(module)).collect()
  }
}

/// Path of the page for module `id`.
#[must_use]
pub fn page_path(output_dir: &Path, id: &str) -> PathBuf {
  output_dir.join(format!("{id}.md"))
}

/// Stage every module without rendering pages.
///
/// # Errors
///
/// Fails on the first module that cannot be staged.
pub fn build_lib(
  config: &Config,
  for_typings: bool,
) -> Result<Vec<StagedModule>, PipelineError> {
  let modules = discover_modules(&config.source_dir, &config.module_extension)?;
  let stager = Stager::from_config(config, for_typings)?;
  info!(
    "Staging {} modules into {}{}",
    modules.len(),
    config.build_dir.display(),
    if for_typings { " for type definitions" } else { "" }
  );
  stager.stage_all(&modules)
}

/// Build one page per non-ignored module. Returns the written pages in
/// module order.
///
/// # Errors
///
/// The first failing module aborts the run. Pages written before the
/// failure stay on disk.
pub fn run_helpers(
  config: &Config,
  extractor: &dyn Extractor,
) -> Result<Vec<PathBuf>, PipelineError> {
  let modules: Vec<Module> =
    discover_modules(&config.source_dir, &config.module_extension)?
      .into_iter()
      .filter(|module| {
        let ignored = config.is_ignored(&module.name);
        if ignored {
          debug!("Skipping ignored module {}", module.name);
        }
        !ignored
      })
      .collect();

  let staged = Stager::from_config(config, false)?.stage_all(&modules)?;

  let shared = Substitutions::load(
    FragmentKind::Shared,
    &config.shared_dir,
    &config.partial_extension,
  )?;
  if shared.is_empty() {
    debug!("No shared blocks in {}", config.shared_dir.display());
  } else {
    debug!("Splicing {} shared blocks into helper pages", shared.len());
  }
  let by_name: HashMap<&str, &StagedModule> =
    staged.iter().map(|m| (m.name.as_str(), m)).collect();

  staged
    .par_iter()
    .map(|module| {
      info!("Writing documentation for {}", module.name);
      let page = render_helper_page(config, extractor, &shared, module, &by_name)?;
      let path = page_path(&config.output_dir, &module.name);
      write_file(&path, &page)?;
      Ok(path)
    })
    .collect()
}

/// The complete page of one staged module, front matter included.
///
/// # Errors
///
/// Returns [`PipelineError::Extraction`] if extraction fails and
/// [`PipelineError::MissingBase`] if the module inherits from a unit that
/// was not staged.
pub fn render_helper_page(
  config: &Config,
  extractor: &dyn Extractor,
  shared: &Substitutions,
  module: &StagedModule,
  staged: &HashMap<&str, &StagedModule>,
) -> Result<String, PipelineError> {
  let pairing = config
    .inheritance_rules()
    .iter()
    .find(|pairing| pairing.derived == module.name);

  let markdown = if let Some(pairing) = pairing {
    let base = staged.get(pairing.base.as_str()).ok_or_else(|| {
      PipelineError::MissingBase {
        derived: pairing.derived.clone(),
        base:    pairing.base.clone(),
      }
    })?;
    render_merged(module, base, pairing)?
  } else {
    extractor
      .render(std::slice::from_ref(&module.path))
      .map_err(|e| PipelineError::extraction(&module.name, e))?
  };

  let body = normalize(&markdown, shared);
  Ok(FrontMatter::helper(&config.permalink_prefix, &module.name).prepend(&body))
}

/// Extract `derived` and `base`, fold the applicable base instance members
/// into the derived unit, and render the derived document.
///
/// # Errors
///
/// Fails if either module cannot be extracted or documents no class, or if
/// an exclusion pattern is invalid.
pub fn render_merged(
  derived: &StagedModule,
  base: &StagedModule,
  pairing: &InheritanceConfig,
) -> Result<String, PipelineError> {
  let filter = ExclusionFilter::for_pairing(pairing)?;

  let mut derived_doc = extract_document(&derived.path)
    .map_err(|e| PipelineError::extraction(&derived.name, e))?;
  let base_doc = extract_document(&base.path)
    .map_err(|e| PipelineError::extraction(&base.name, e))?;

  let base_unit = base_doc.primary_unit(&base.name).ok_or_else(|| {
    PipelineError::extraction(&base.name, ExtractError::NoUnit {
      path: base.path.clone(),
    })
  })?;
  let derived_unit =
    derived_doc.primary_unit_mut(&derived.name).ok_or_else(|| {
      PipelineError::extraction(&derived.name, ExtractError::NoUnit {
        path: derived.path.clone(),
      })
    })?;

  let inherited = merge_units(derived_unit, base_unit, &filter);
  info!(
    "{} inherits {inherited} members from {}",
    derived.name, base.name
  );

  Ok(render_markdown(&derived_doc))
}

/// Build every category: helper pages, the plugins page, external helpers,
/// static pages and the changelog. Categories run in parallel.
///
/// # Errors
///
/// Returns the first error, checked in the category order above.
pub fn run_all(
  config: &Config,
  extractor: &dyn Extractor,
) -> Result<Vec<PathBuf>, PipelineError> {
  let (helpers, (plugins, (external, (static_pages, changelog)))) = rayon::join(
    || run_helpers(config, extractor),
    || {
      rayon::join(
        || {
          config.plugins.as_ref().map_or_else(
            || Ok(None),
            |plugins| pages::run_plugins(plugins, config, extractor).map(Some),
          )
        },
        || {
          rayon::join(
            || pages::run_external_helpers(config, extractor),
            || {
              rayon::join(
                || pages::run_static_pages(config),
                || {
                  config
                    .changelog
                    .as_ref()
                    .map_or_else(|| Ok(None), |c| pages::run_changelog(c).map(Some))
                },
              )
            },
          )
        },
      )
    },
  );

  let mut written = helpers?;
  written.extend(plugins?);
  written.extend(external?);
  written.extend(static_pages?);
  written.extend(changelog?);
  Ok(written)
}
