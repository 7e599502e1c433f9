//! `refdoc-jsdoc`.
//!
//! This crate reads JavaScript source files, locates `/** ... */` doc
//! comments and the declarations they document, and returns a structured
//! [`Document`]: top-level units (classes, functions, typedefs) with class
//! members partitioned into instance and static lists. Extraction is
//! shallow: only the given files are read and nothing is resolved across
//! modules. Units are sorted by name with capitalized names first, members
//! alphabetically.
//!
//! [`render_markdown`] turns a [`Document`] into reference markdown.
//!
//! # Example
//!
//! ```no_run
//! use refdoc_jsdoc::{extract_from_file, render_markdown};
//!
//! let doc = extract_from_file("lib/helper/Playwright.js").unwrap();
//! for member in &doc.units[0].members.instance {
//!   println!("{}", member.signature());
//! }
//! let markdown = render_markdown(&doc);
//! ```

mod comment;
pub mod error;
mod extractor;
mod render;
mod types;

use std::path::{Path, PathBuf};

use regex::Regex;

pub use error::JsDocError;
pub use render::render_markdown;
pub use types::{
  Doc,
  DocUnit,
  Document,
  Kind,
  Location,
  Member,
  Members,
  Param,
  Returns,
  Scope,
  alpha_cmp,
};

use crate::extractor::{RawEntry, Target};

/// Extract the documentation of a single source file.
///
/// # Errors
///
/// Returns [`JsDocError::ReadFile`] if the file cannot be read and
/// [`JsDocError::Parse`] if a doc comment is malformed.
pub fn extract_from_file(
  path: impl AsRef<Path>,
) -> Result<Document, JsDocError> {
  let path = path.as_ref();
  let src = std::fs::read_to_string(path).map_err(|source| {
    JsDocError::ReadFile {
      path: path.to_path_buf(),
      source,
    }
  })?;

  extract_from_source(&src, path)
}

/// Extract several files into one [`Document`], sorted as a whole.
///
/// # Errors
///
/// Fails on the first file that cannot be read or parsed.
pub fn extract_from_files(paths: &[PathBuf]) -> Result<Document, JsDocError> {
  let mut merged = Document::default();
  for path in paths {
    merged.units.extend(extract_from_file(path)?.units);
  }
  merged.sort_alpha();
  Ok(merged)
}

/// Extract documentation from source text. `path` is used for locations,
/// error messages, and to name anonymous `module.exports` functions.
///
/// # Errors
///
/// Returns [`JsDocError::Parse`] if a doc comment is malformed.
pub fn extract_from_source(
  src: &str,
  path: &Path,
) -> Result<Document, JsDocError> {
  let entries = extractor::scan_entries(src, path)?;
  let mut document = build_document(entries, path)?;
  document.sort_alpha();
  Ok(document)
}

/// Create a regex that never matches anything.
///
/// Used as the fallback when a static pattern fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// The class that receives method comments.
#[derive(Clone, Copy)]
enum ClassScope {
  None,
  Open(usize),
  Hidden,
}

/// Attach parsed comments to units and members.
///
/// Methods belong to the most recently opened class. A method comment seen
/// before any class is documented as a top-level function.
fn build_document(
  entries: Vec<RawEntry>,
  path: &Path,
) -> Result<Document, JsDocError> {
  let mut document = Document::default();
  let mut current_class = ClassScope::None;

  for entry in entries {
    let location = Location {
      file: path.to_path_buf(),
      line: entry.line,
    };

    let Some(raw) = entry.comment else {
      // Undocumented class: open a scope but keep it out of the output
      // unless members show up.
      if let Some(Target::Class(name)) = entry.target {
        document.units.push(DocUnit {
          name,
          kind: Kind::Class,
          doc: Doc::default(),
          members: Members::default(),
          location,
        });
        current_class = ClassScope::Open(document.units.len() - 1);
      }
      continue;
    };

    let parsed = comment::parse_comment(&raw).map_err(|message| {
      JsDocError::Parse {
        path: path.to_path_buf(),
        line: entry.line,
        message,
      }
    })?;

    let is_class = parsed.kind == Some(Kind::Class)
      || (parsed.kind.is_none()
        && matches!(entry.target, Some(Target::Class(_))));

    let target_name = match &entry.target {
      Some(
        Target::Class(name) | Target::Function(name) | Target::Method {
          name,
          ..
        },
      ) => Some(name.clone()),
      None => None,
    };

    let Some(name) = parsed.name.clone().or(target_name) else {
      log::debug!(
        "refdoc-jsdoc: skipping unnamed doc comment at {}:{}",
        path.display(),
        entry.line
      );
      continue;
    };

    if parsed.hidden {
      if is_class {
        current_class = ClassScope::Hidden;
      }
      continue;
    }

    if is_class {
      document.units.push(DocUnit {
        name,
        kind: Kind::Class,
        doc: parsed.doc,
        members: Members::default(),
        location,
      });
      current_class = ClassScope::Open(document.units.len() - 1);
      continue;
    }

    if parsed.kind == Some(Kind::Typedef) {
      document.units.push(DocUnit {
        name,
        kind: Kind::Typedef,
        doc: parsed.doc,
        members: Members::default(),
        location,
      });
      continue;
    }

    let method_static = match entry.target {
      Some(Target::Method { is_static, .. })
        if parsed.kind != Some(Kind::Function) =>
      {
        Some(is_static || parsed.is_static)
      },
      _ => None,
    };

    match (method_static, current_class) {
      // Methods of a hidden class go with it.
      (Some(_), ClassScope::Hidden) => {},
      (Some(is_static), ClassScope::Open(idx)) => {
        let scope = if is_static {
          Scope::Static
        } else {
          Scope::Instance
        };
        let member = Member {
          name,
          scope,
          doc: parsed.doc,
          location,
        };
        let members = &mut document.units[idx].members;
        if is_static {
          members.static_members.push(member);
        } else {
          members.instance.push(member);
        }
      },
      _ => {
        document.units.push(DocUnit {
          name,
          kind: Kind::Function,
          doc: parsed.doc,
          members: Members::default(),
          location,
        });
      },
    }
  }

  // Undocumented classes without documented members carry nothing.
  document.units.retain(|u| {
    !(u.kind == Kind::Class && u.doc == Doc::default() && u.members.is_empty())
  });

  Ok(document)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  const FOO: &str = r"
/**
 * Foo helper for tests.
 */
class Foo extends Helper {
  /**
   * Sees text on page.
   * @param {string} text expected text.
   */
  see(text) {}

  /**
   * Clicks an element.
   * @param {string | object} locator element.
   */
  click(locator) {}

  /**
   * @private
   */
  _hidden() {}

  /** Creates a helper. */
  static create() {}
}

module.exports = Foo;
";

  #[test]
  fn test_members_sorted_alphabetically() {
    let doc = extract_from_source(FOO, Path::new("Foo.js")).unwrap();
    assert_eq!(doc.units.len(), 1);
    let unit = &doc.units[0];
    assert_eq!(unit.name, "Foo");
    assert_eq!(unit.kind, Kind::Class);

    let names: Vec<&str> =
      unit.members.instance.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["click", "see"]);
    assert_eq!(unit.members.static_members[0].name, "create");
    assert_eq!(unit.members.static_members[0].scope, Scope::Static);
    assert_eq!(unit.members.instance[0].signature(), "click(locator)");
  }

  #[test]
  fn test_typedef_and_function_are_units() {
    let src = r"
/**
 * @typedef {object} config
 * @property {string} url base url.
 */

/**
 * Waits a little.
 * @param {number} sec seconds.
 */
function pause(sec) {}
";
    let doc = extract_from_source(src, Path::new("utils.js")).unwrap();
    let names: Vec<&str> = doc.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["config", "pause"]);
    assert_eq!(doc.units[0].kind, Kind::Typedef);
    assert_eq!(doc.units[1].kind, Kind::Function);
  }

  #[test]
  fn test_hidden_class_drops_its_methods() {
    let src = r"
/** @private */
class Internal {
  /** Doc. */
  run() {}
}
";
    let doc = extract_from_source(src, Path::new("Internal.js")).unwrap();
    assert!(doc.units.is_empty());
  }

  #[test]
  fn test_methods_of_undocumented_class() {
    let src = "class Bare {\n  /** Doc. */\n  see(text) {}\n}\n";
    let doc = extract_from_source(src, Path::new("Bare.js")).unwrap();
    assert_eq!(doc.units.len(), 1);
    assert_eq!(doc.units[0].members.instance[0].name, "see");
  }

  #[test]
  fn test_comment_markers_in_code_do_not_leak() {
    let src = "// matches lib/**\nclass Foo {\n  constructor() {\n    this.pattern = '/api/**';\n  }\n\n  /** Clicks. */\n  click(locator) {}\n}\n";
    let doc = extract_from_source(src, Path::new("Foo.js")).unwrap();
    assert_eq!(doc.units.len(), 1);
    assert_eq!(doc.units[0].name, "Foo");
    assert_eq!(doc.units[0].kind, Kind::Class);

    let click = &doc.units[0].members.instance[0];
    assert_eq!(click.name, "click");
    assert_eq!(click.doc.description, "Clicks.");
    assert_eq!(click.location.line, 7);
  }

  #[test]
  fn test_parse_error_carries_line() {
    let src = "class A {\n\n  /** @param {string */\n  foo(x) {}\n}\n";
    let err = extract_from_source(src, Path::new("A.js")).unwrap_err();
    assert!(err.to_string().contains("A.js:3"));
  }

  #[test]
  fn test_primary_unit_falls_back_to_first_class() {
    let doc = extract_from_source(FOO, Path::new("Other.js")).unwrap();
    assert_eq!(doc.primary_unit("Other").map(|u| u.name.as_str()), Some("Foo"));
  }
}
