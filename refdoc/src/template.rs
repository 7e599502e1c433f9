//! Placeholder substitution for module copies and generated pages.
//!
//! Two kinds of fragments exist. Inline partials (`{{> name }}`) live inside
//! doc comments, so their bodies are re-indented as doc comment lines.
//! Shared blocks (`{{ name }}`) are spliced into generated markdown and get a
//! couple of blank lines in front. A placeholder without a fragment is left
//! exactly as written.
use std::{
  fs,
  path::{Path, PathBuf},
};

use refdoc_config::AliasRule;

use crate::{error::PipelineError, utils::read_file};

/// Continuation prefix of a line inside a `/** ... */` block.
pub const DOC_COMMENT_INDENT: &str = "   * ";

/// A named template block, read from `<dir>/<name>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
  pub name: String,
  pub body: String,
}

/// Which placeholder syntax a fragment is substituted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
  /// `{{> name }}` inside doc comments.
  Partial,
  /// `{{ name }}` in generated markdown.
  Shared,
}

impl FragmentKind {
  #[must_use]
  pub fn placeholder(self, name: &str) -> String {
    match self {
      Self::Partial => format!("{{{{> {name} }}}}"),
      Self::Shared => format!("{{{{ {name} }}}}"),
    }
  }

  /// Reshape a fragment body for insertion.
  #[must_use]
  pub fn format(self, body: &str) -> String {
    match self {
      Self::Partial => format_partial(body),
      Self::Shared => format_shared(body),
    }
  }
}

/// Read every `*.<extension>` file in `dir`, sorted by file name.
///
/// A missing directory yields no fragments.
///
/// # Errors
///
/// Fails if the directory or one of its fragments cannot be read.
pub fn load_fragments(
  dir: &Path,
  extension: &str,
) -> Result<Vec<Fragment>, PipelineError> {
  if !dir.is_dir() {
    log::debug!("No fragment directory at {}", dir.display());
    return Ok(Vec::new());
  }

  let entries = fs::read_dir(dir).map_err(|source| {
    PipelineError::Read {
      path: dir.to_path_buf(),
      source,
    }
  })?;

  let mut paths: Vec<PathBuf> = entries
    .filter_map(Result::ok)
    .map(|entry| entry.path())
    .filter(|path| {
      path.is_file()
        && path.extension().and_then(|ext| ext.to_str()) == Some(extension)
    })
    .collect();
  paths.sort();

  let mut fragments = Vec::with_capacity(paths.len());
  for path in paths {
    let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
      continue;
    };
    fragments.push(Fragment {
      name: name.to_string(),
      body: read_file(&path)?,
    });
  }

  log::debug!("Loaded {} fragments from {}", fragments.len(), dir.display());
  Ok(fragments)
}

/// Reshape a partial so it reads as doc comment text in place of its
/// placeholder.
///
/// The first line continues the placeholder's own comment line; every
/// following line (including the empty one after a trailing newline) gets
/// the doc comment prefix.
#[must_use]
pub fn format_partial(body: &str) -> String {
  let mut out = String::with_capacity(body.len() + body.len() / 8);
  for (idx, line) in body.split('\n').enumerate() {
    if idx > 0 {
      out.push('\n');
      out.push_str(DOC_COMMENT_INDENT);
    }
    out.push_str(line);
  }
  out
}

/// Prefix a shared block with two blank lines so it starts a new markdown
/// block wherever it lands.
#[must_use]
pub fn format_shared(body: &str) -> String {
  format!("\n\n\n{body}")
}

/// Ordered placeholder to body replacements of one fragment kind.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
  rules: Vec<(String, String)>,
}

impl Substitutions {
  #[must_use]
  pub fn new(kind: FragmentKind, fragments: &[Fragment]) -> Self {
    Self {
      rules: fragments
        .iter()
        .map(|f| (kind.placeholder(&f.name), kind.format(&f.body)))
        .collect(),
    }
  }

  /// Load and format the fragments of `dir` in one go.
  ///
  /// # Errors
  ///
  /// See [`load_fragments`].
  pub fn load(
    kind: FragmentKind,
    dir: &Path,
    extension: &str,
  ) -> Result<Self, PipelineError> {
    Ok(Self::new(kind, &load_fragments(dir, extension)?))
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.rules.len()
  }

  /// Replace every occurrence of every known placeholder, fragment by
  /// fragment in load order. Unknown placeholders are untouched.
  #[must_use]
  pub fn apply(&self, text: &str) -> String {
    let mut out = text.to_string();
    for (placeholder, body) in &self.rules {
      if out.contains(placeholder.as_str()) {
        out = out.replace(placeholder.as_str(), body);
      }
    }
    out
  }
}

/// Apply literal alias rewrites in order.
#[must_use]
pub fn expand_aliases(text: &str, rules: &[AliasRule]) -> String {
  let mut out = text.to_string();
  for rule in rules {
    if !rule.from.is_empty() && out.contains(rule.from.as_str()) {
      out = out.replace(rule.from.as_str(), &rule.to);
    }
  }
  out
}
