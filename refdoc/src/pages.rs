//! Pages built next to the per-module helper pages: the combined plugins
//! page, helpers maintained outside the source tree, hand-written pages
//! republished with front matter, and the release notes.
use std::{
  fmt::Write,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use log::info;
use rayon::prelude::*;
use regex::Regex;
use refdoc_config::{
  Config,
  pages::{ChangelogConfig, ExternalHelper, PageConfig, PluginsConfig},
};
use refdoc_jsdoc::never_matching_regex;

use crate::{
  error::PipelineError,
  extract::Extractor,
  markdown::FrontMatter,
  pipeline::{discover_modules, page_path},
  template::expand_aliases,
  utils::{read_file, write_file},
};

static USER_MENTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s@([\w-]+)").unwrap_or_else(|e| {
    log::error!("Failed to compile USER_MENTION regex: {e}");
    never_matching_regex()
  })
});

static ISSUE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"#(\d+)").unwrap_or_else(|e| {
    log::error!("Failed to compile ISSUE_REFERENCE regex: {e}");
    never_matching_regex()
  })
});

static HELPER_TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s\[(\w+)\]\s").unwrap_or_else(|e| {
    log::error!("Failed to compile HELPER_TAG regex: {e}");
    never_matching_regex()
  })
});

/// Render every plugin module into one page.
///
/// # Errors
///
/// Fails if the plugin directory cannot be listed, extraction fails, or the
/// page cannot be written.
pub fn run_plugins(
  plugins: &PluginsConfig,
  config: &Config,
  extractor: &dyn Extractor,
) -> Result<PathBuf, PipelineError> {
  let modules =
    discover_modules(&plugins.source_dir, &config.module_extension)?;
  info!("Writing documentation for {} plugins", modules.len());

  let paths: Vec<PathBuf> = modules.into_iter().map(|m| m.path).collect();
  let markdown = extractor
    .render(&paths)
    .map_err(|e| PipelineError::extraction("plugins", e))?;

  let page = FrontMatter::new(&plugins.permalink, &plugins.title)
    .with_sidebar_depth("")
    .with_sidebar("auto")
    .prepend(&markdown);
  write_file(&plugins.output, &page)?;
  Ok(plugins.output.clone())
}

/// Build a page for every configured external helper.
///
/// # Errors
///
/// Fails on the first helper that cannot be read, extracted or written.
pub fn run_external_helpers(
  config: &Config,
  extractor: &dyn Extractor,
) -> Result<Vec<PathBuf>, PipelineError> {
  config
    .external_helpers
    .par_iter()
    .map(|helper| {
      info!("Writing documentation for external helper {}", helper.name);
      let page = render_external_helper(config, extractor, helper)?;
      let path = page_path(&config.output_dir, &helper.name);
      write_file(&path, &page)?;
      Ok(path)
    })
    .collect()
}

/// Aliases are expanded on a scratch copy so the helper's own file is left
/// alone.
fn render_external_helper(
  config: &Config,
  extractor: &dyn Extractor,
  helper: &ExternalHelper,
) -> Result<String, PipelineError> {
  let source = read_file(&helper.source)?;
  let scratch = scratch_path(&config.build_dir, helper);
  write_file(&scratch, &expand_aliases(&source, config.alias_rules()))?;

  let markdown = extractor
    .render(&[scratch])
    .map_err(|e| PipelineError::extraction(&helper.name, e))?;

  let prefix = config.permalink_prefix.trim_end_matches('/');
  let body = format!("# {}\n\n{markdown}", helper.name);
  Ok(
    FrontMatter::new(format!("{prefix}/{}", helper.name), &helper.name)
      .with_sidebar("auto")
      .prepend(&body),
  )
}

fn scratch_path(build_dir: &Path, helper: &ExternalHelper) -> PathBuf {
  let file_name = helper
    .source
    .file_name()
    .map_or_else(|| PathBuf::from(&helper.name), PathBuf::from);
  build_dir.join("external").join(&helper.name).join(file_name)
}

/// Republish every configured static page.
///
/// # Errors
///
/// Fails on the first page that cannot be read or written.
pub fn run_static_pages(config: &Config) -> Result<Vec<PathBuf>, PipelineError> {
  config
    .pages
    .par_iter()
    .map(|page| {
      info!("Writing page {}", page.output.display());
      let body = read_file(&page.source)?;
      write_file(&page.output, &render_static_page(page, &body))?;
      Ok(page.output.clone())
    })
    .collect()
}

/// Front matter, optional heading and note, then the page body verbatim.
#[must_use]
pub fn render_static_page(page: &PageConfig, body: &str) -> String {
  let mut front = FrontMatter::new(&page.permalink, &page.title)
    .with_edit_link(page.edit_link);
  front.layout.clone_from(&page.layout);
  front.sidebar.clone_from(&page.sidebar);
  front.sidebar_depth.clone_from(&page.sidebar_depth);

  let mut out = front.render();
  if let Some(heading) = &page.heading {
    // Writing to String is infallible
    let _ = write!(out, "# {heading}\n\n");
  }
  if let Some(note) = &page.note {
    for line in note.lines() {
      out.push_str("> ");
      out.push_str(line);
      out.push('\n');
    }
    out.push('\n');
  }
  out.push_str(body);
  out
}

/// Write the release notes page.
///
/// # Errors
///
/// Fails if the changelog cannot be read or the page cannot be written.
pub fn run_changelog(
  changelog: &ChangelogConfig,
) -> Result<PathBuf, PipelineError> {
  info!("Writing changelog {}", changelog.output.display());
  let source = read_file(&changelog.source)?;
  let page = render_changelog(&source, &changelog.repository);
  write_file(&changelog.output, &page)?;
  Ok(changelog.output.clone())
}

/// Link `@user` mentions and `#123` issue references, bold ` [Helper] `
/// tags, and wrap the result in the releases page header.
#[must_use]
pub fn render_changelog(changelog: &str, repository: &str) -> String {
  let text =
    USER_MENTION.replace_all(changelog, " **[${1}](https://github.com/${1})**");
  let issues = format!(
    "[#${{1}}]({}/issues/${{1}})",
    repository.trim_end_matches('/')
  );
  let text = ISSUE_REFERENCE.replace_all(&text, issues.as_str());
  let text = HELPER_TAG.replace_all(&text, " **[${1}]** ");

  let front = FrontMatter::new("/changelog", "Releases")
    .with_layout("Section")
    .with_sidebar("false");
  front.prepend(&format!("# Releases\n\n{text}"))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_changelog_rewrites() {
    let page = render_changelog(
      "* [Playwright] fixed click by @davertmik in #123\n",
      "https://github.com/codeceptjs/CodeceptJS/",
    );
    assert_eq!(
      page,
      "---\npermalink: /changelog\nlayout: Section\nsidebar: false\ntitle: \
       Releases\n---\n\n# Releases\n\n* **[Playwright]** fixed click by \
       **[davertmik](https://github.com/davertmik)** in \
       [#123](https://github.com/codeceptjs/CodeceptJS/issues/123)\n"
    );
  }

  #[test]
  fn test_static_page_with_heading_and_note() {
    let page = PageConfig {
      source:        PathBuf::from("docker/README.md"),
      output:        PathBuf::from("docs/docker.md"),
      permalink:     "/docker".to_string(),
      title:         "Docker".to_string(),
      layout:        Some("Section".to_string()),
      sidebar:       Some("false".to_string()),
      sidebar_depth: None,
      edit_link:     false,
      heading:       Some("Docker".to_string()),
      note:          Some("Generated from the wiki".to_string()),
    };
    assert_eq!(
      render_static_page(&page, "Body\n"),
      "---\npermalink: /docker\nlayout: Section\nsidebar: false\ntitle: \
       Docker\neditLink: false\n---\n\n# Docker\n\n> Generated from the \
       wiki\n\nBody\n"
    );
  }

  #[test]
  fn test_scratch_path_is_per_helper() {
    let helper = ExternalHelper {
      name:   "MockRequest".to_string(),
      source: PathBuf::from("node_modules/@codeceptjs/mock-request/index.js"),
    };
    assert_eq!(
      scratch_path(Path::new("docs/build"), &helper),
      PathBuf::from("docs/build/external/MockRequest/index.js")
    );
  }
}
