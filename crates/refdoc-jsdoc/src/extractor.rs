//! Source scanning: locate `/** ... */` comments and the declaration each one
//! documents.
//!
//! Only the text right after a comment is inspected, and only the given file
//! is read. Nothing is resolved across modules, which keeps extraction
//! shallow.
use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::{error::JsDocError, never_matching_regex};

/// The declaration a doc comment is attached to, as far as it can be told
/// from the first code line that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  Class(String),
  Method { name: String, is_static: bool },
  Function(String),
}

/// One located doc comment, or an undocumented class declaration (which
/// still opens a scope for the methods that follow it).
#[derive(Debug)]
pub struct RawEntry {
  /// Raw comment text including delimiters. `None` for an undocumented
  /// class declaration.
  pub comment: Option<String>,
  /// 1-based line of the comment (or the class keyword).
  pub line:    u32,
  pub target:  Option<Target>,
}

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)")
    .unwrap_or_else(|e| {
      log::error!("Failed to compile CLASS_RE regex: {e}");
      never_matching_regex()
    })
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile FUNCTION_RE regex: {e}");
    never_matching_regex()
  })
});

static EXPORTS_MEMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=").unwrap_or_else(
    |e| {
      log::error!("Failed to compile EXPORTS_MEMBER_RE regex: {e}");
      never_matching_regex()
    },
  )
});

static MODULE_EXPORTS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^module\.exports\s*=\s*(?:async\s+)?(?:function\b|\()")
    .unwrap_or_else(|e| {
      log::error!("Failed to compile MODULE_EXPORTS_RE regex: {e}");
      never_matching_regex()
    })
});

static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=")
    .unwrap_or_else(|e| {
      log::error!("Failed to compile BINDING_RE regex: {e}");
      never_matching_regex()
    })
});

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(static\s+)?(?:async\s+)?(?:get\s+|set\s+)?\*?\s*([A-Za-z_$][\w$]*)\s*\(",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile METHOD_RE regex: {e}");
    never_matching_regex()
  })
});

const NOT_METHODS: &[&str] = &[
  "if", "for", "while", "switch", "return", "function", "catch", "await",
  "typeof", "new", "super",
];

/// Find every doc comment in `src` together with its target.
///
/// # Errors
///
/// Returns [`JsDocError::Parse`] when a `/**` is never closed.
pub fn scan_entries(
  src: &str,
  file_path: &Path,
) -> Result<Vec<RawEntry>, JsDocError> {
  let mut entries = Vec::new();
  let mut cursor = 0usize;
  let mut after_doc = false;

  while let Some(start) = next_doc_open(src, cursor) {
    collect_classes(&src[cursor..start], src, cursor, after_doc, &mut entries);

    let after_open = &src[start..];
    // `/**/` is an empty plain comment, `/***` a banner. Neither documents
    // anything.
    if after_open.starts_with("/**/") {
      cursor = start + 4;
      after_doc = false;
      continue;
    }

    let Some(close_rel) = src[start + 3..].find("*/") else {
      return Err(JsDocError::Parse {
        path:    file_path.to_path_buf(),
        line:    line_of_offset(src, start),
        message: "unterminated `/**` comment".to_string(),
      });
    };
    let end = start + 3 + close_rel + 2;

    after_doc = !after_open.starts_with("/***");
    if after_doc {
      entries.push(RawEntry {
        comment: Some(src[start..end].to_string()),
        line:    line_of_offset(src, start),
        target:  target_after(&src[end..], file_path),
      });
    }

    cursor = end;
  }

  collect_classes(&src[cursor..], src, cursor, after_doc, &mut entries);
  Ok(entries)
}

/// Byte offset of the next `/**` at or after `from` that sits in code.
///
/// String and template literals, `//` line comments and plain `/* */`
/// comments are stepped over, so a `/**` inside them opens nothing.
fn next_doc_open(src: &str, from: usize) -> Option<usize> {
  let bytes = src.as_bytes();
  let mut i = from;

  while i < bytes.len() {
    match bytes[i] {
      quote @ (b'\'' | b'"' | b'`') => i = skip_string(bytes, i + 1, quote),
      b'/' if bytes.get(i + 1) == Some(&b'/') => {
        i = bytes[i..]
          .iter()
          .position(|&b| b == b'\n')
          .map_or(bytes.len(), |rel| i + rel);
      },
      b'/' if bytes.get(i + 1) == Some(&b'*') => {
        if bytes.get(i + 2) == Some(&b'*') {
          return Some(i);
        }
        i = src[i + 2..]
          .find("*/")
          .map_or(bytes.len(), |rel| i + 2 + rel + 2);
      },
      _ => i += 1,
    }
  }

  None
}

/// Offset just past the literal that opened before `start` with `quote`.
///
/// Quoted strings cannot span lines, so an unclosed one ends at the newline
/// and scanning resumes there. Template literals run to their closing
/// backtick.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
  let mut j = start;
  while j < bytes.len() {
    match bytes[j] {
      b'\\' => j += 2,
      b'\n' if quote != b'`' => return j,
      b if b == quote => return j + 1,
      _ => j += 1,
    }
  }
  bytes.len()
}

/// Record undocumented class declarations in `segment` (which starts at byte
/// `offset` of `src`) so later methods are attached to the right class.
///
/// When the segment directly follows a doc comment, its first code line is
/// that comment's target and has already been recorded.
fn collect_classes(
  segment: &str,
  src: &str,
  mut offset: usize,
  skip_first: bool,
  out: &mut Vec<RawEntry>,
) {
  let mut skipping = skip_first;

  for line in segment.split_inclusive('\n') {
    let start = offset;
    offset += line.len();

    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }
    if skipping {
      skipping = false;
      continue;
    }

    if let Some(caps) = CLASS_RE.captures(trimmed) {
      out.push(RawEntry {
        comment: None,
        line:    line_of_offset(src, start),
        target:  Some(Target::Class(caps[1].to_string())),
      });
    }
  }
}

/// Inspect the first non-blank code line after a comment.
fn target_after(rest: &str, file_path: &Path) -> Option<Target> {
  let line = rest.lines().map(str::trim).find(|l| !l.is_empty())?;
  // Another comment directly follows: nothing to attach to.
  if line.starts_with("/*") || line.starts_with("//") {
    return None;
  }

  if let Some(caps) = CLASS_RE.captures(line) {
    return Some(Target::Class(caps[1].to_string()));
  }
  if let Some(caps) = FUNCTION_RE.captures(line) {
    return Some(Target::Function(caps[1].to_string()));
  }
  if let Some(caps) = EXPORTS_MEMBER_RE.captures(line) {
    return Some(Target::Function(caps[1].to_string()));
  }
  if MODULE_EXPORTS_RE.is_match(line) {
    // Plugins export a single anonymous function; the module name is the
    // only name it has.
    let stem = file_path.file_stem()?.to_string_lossy().into_owned();
    return Some(Target::Function(stem));
  }
  if let Some(caps) = BINDING_RE.captures(line) {
    return Some(Target::Function(caps[1].to_string()));
  }
  if let Some(caps) = METHOD_RE.captures(line) {
    let name = caps[2].to_string();
    if NOT_METHODS.contains(&name.as_str()) {
      return None;
    }
    return Some(Target::Method {
      name,
      is_static: caps.get(1).is_some(),
    });
  }

  None
}

/// Return the 1-based line number for a byte offset within `src`.
fn line_of_offset(src: &str, offset: usize) -> u32 {
  let safe_offset = offset.min(src.len());
  let line = src.as_bytes()[..safe_offset]
    .iter()
    .filter(|&&b| b == b'\n')
    .count();
  u32::try_from(line + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use std::path::PathBuf;

  use super::*;

  fn path() -> PathBuf {
    PathBuf::from("Foo.js")
  }

  #[test]
  fn test_scan_class_and_methods() {
    let src = r"/**
 * Foo helper.
 */
class Foo extends Helper {
  /**
   * Click it.
   */
  async click(locator) {}

  /** Static factory. */
  static create() {}
}
";
    let entries = scan_entries(src, &path()).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].target, Some(Target::Class("Foo".into())));
    assert_eq!(
      entries[1].target,
      Some(Target::Method {
        name:      "click".into(),
        is_static: false,
      })
    );
    assert_eq!(entries[1].line, 5);
    assert_eq!(
      entries[2].target,
      Some(Target::Method {
        name:      "create".into(),
        is_static: true,
      })
    );
  }

  #[test]
  fn test_undocumented_class_is_recorded() {
    let src = "class Bare {\n  /** Doc. */\n  see(text) {}\n}\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].comment.is_none());
    assert_eq!(entries[0].target, Some(Target::Class("Bare".into())));
    assert_eq!(entries[1].line, 2);
  }

  #[test]
  fn test_module_exports_uses_file_stem() {
    let src = "/** Plugin. */\nmodule.exports = function (config) {}\n";
    let entries =
      scan_entries(src, Path::new("lib/plugin/retryTo.js")).unwrap();
    assert_eq!(entries[0].target, Some(Target::Function("retryTo".into())));
  }

  #[test]
  fn test_plain_and_banner_comments_are_skipped() {
    let src = "/* plain */\n/*** banner ***/\n/**/\nfunction x() {}\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert!(entries.is_empty());
  }

  #[test]
  fn test_keyword_is_not_a_method() {
    let src = "/** Not a method. */\nif (x) {}\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert_eq!(entries[0].target, None);
  }

  #[test]
  fn test_doc_open_inside_string_is_ignored() {
    let src = "class Foo {\n  constructor() {\n    this.pattern = '/api/**';\n  }\n\n  /** Clicks. */\n  click(locator) {}\n}\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].target, Some(Target::Class("Foo".into())));
    assert_eq!(entries[1].comment.as_deref(), Some("/** Clicks. */"));
    assert_eq!(entries[1].line, 6);
  }

  #[test]
  fn test_doc_open_inside_line_comment_is_ignored() {
    let src = "// matches lib/**\nclass Foo {\n  /** Sees. */\n  see(t) {}\n}\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].target, Some(Target::Class("Foo".into())));
    assert_eq!(entries[1].line, 3);
  }

  #[test]
  fn test_quotes_and_templates_are_skipped() {
    let src = "const a = \"/** x */\";\nconst b = 'it\\'s /**';\nconst c = `\n/** ${a} */\n`;\n/* plain /** */\n";
    let entries = scan_entries(src, &path()).unwrap();
    assert!(entries.is_empty());
  }

  #[test]
  fn test_unterminated_comment_is_error() {
    let src = "class A {\n  /** never closed\n  foo() {}\n}\n";
    let err = scan_entries(src, &path()).unwrap_err();
    match err {
      JsDocError::Parse { line, .. } => assert_eq!(line, 2),
      other => panic!("unexpected error: {other}"),
    }
  }
}
