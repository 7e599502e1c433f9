//! Markdown rendering of extracted documentation.
//!
//! Layout: `##` per unit, `###` per member, `####` for member sections.
//! There is no table of contents. Optional parameters with a default get a
//! trailing `(optional, default ...)` annotation; the page normalizer is
//! expected to strip it.
//!
//! Type names that can be linked (JavaScript globals and units documented on
//! the same page) are written as numbered reference links, `[string][1]`,
//! numbered in order of first use. The definitions close the page, so a page
//! with any linked type ends in a `[1]: ...` block.
use std::{collections::HashSet, fmt::Write, sync::LazyLock};

use regex::{Captures, Regex};

use crate::{
  never_matching_regex,
  types::{Doc, DocUnit, Document, Kind, Member, Param},
};

const GLOBAL_OBJECTS: &str =
  "https://developer.mozilla.org/docs/Web/JavaScript/Reference/Global_Objects/";

static TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[A-Za-z_$][\w$]*").unwrap_or_else(|e| {
    log::error!("Failed to compile TYPE_NAME regex: {e}");
    never_matching_regex()
  })
});

/// Numbered link targets of one page.
struct LinkRefs<'a> {
  units:   HashSet<&'a str>,
  targets: Vec<String>,
}

impl<'a> LinkRefs<'a> {
  fn new(document: &'a Document) -> Self {
    Self {
      units:   document.units.iter().map(|u| u.name.as_str()).collect(),
      targets: Vec::new(),
    }
  }

  fn target(&self, name: &str) -> Option<String> {
    let global = match name {
      "string" | "String" => "String",
      "number" | "Number" => "Number",
      "boolean" | "Boolean" => "Boolean",
      "object" | "Object" => "Object",
      "array" | "Array" => "Array",
      "function" | "Function" => "Function",
      "Promise" => "Promise",
      "Error" => "Error",
      "RegExp" => "RegExp",
      "Date" => "Date",
      "Symbol" => "Symbol",
      _ => {
        return self
          .units
          .contains(name)
          .then(|| format!("#{}", name.to_lowercase()));
      },
    };
    Some(format!("{GLOBAL_OBJECTS}{global}"))
  }

  /// Reference number of `name`, assigning the next one on first use.
  fn number(&mut self, name: &str) -> Option<usize> {
    let target = self.target(name)?;
    let idx = self
      .targets
      .iter()
      .position(|t| *t == target)
      .unwrap_or_else(|| {
        self.targets.push(target);
        self.targets.len() - 1
      });
    Some(idx + 1)
  }

  /// `type_expr` with every linkable name turned into a reference link.
  fn link(&mut self, type_expr: &str) -> String {
    TYPE_NAME
      .replace_all(type_expr, |caps: &Captures| {
        let name = &caps[0];
        self
          .number(name)
          .map_or_else(|| name.to_string(), |n| format!("[{name}][{n}]"))
      })
      .into_owned()
  }

  fn definitions(&self) -> Option<String> {
    if self.targets.is_empty() {
      return None;
    }
    Some(
      self
        .targets
        .iter()
        .enumerate()
        .map(|(idx, target)| format!("[{}]: {target}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n\n"),
    )
  }
}

/// Render a whole document, units in their stored order.
#[must_use]
pub fn render_markdown(document: &Document) -> String {
  let mut refs = LinkRefs::new(document);
  let mut blocks: Vec<String> = Vec::new();
  for unit in &document.units {
    render_unit(unit, &mut refs, &mut blocks);
  }

  if blocks.is_empty() {
    return String::new();
  }
  blocks.extend(refs.definitions());
  let mut out = blocks.join("\n\n");
  out.push('\n');
  out
}

/// A single member as a `###` section, without a trailing newline.
fn render_member(member: &Member, refs: &mut LinkRefs<'_>) -> String {
  let mut blocks = vec![format!("### {}", member.name)];
  render_doc(&member.doc, 4, refs, &mut blocks);
  blocks.join("\n\n")
}

fn render_unit(
  unit: &DocUnit,
  refs: &mut LinkRefs<'_>,
  blocks: &mut Vec<String>,
) {
  blocks.push(format!("## {}", unit.name));

  if unit.kind == Kind::Typedef
    && let Some(type_expr) = &unit.doc.type_expr
  {
    blocks.push(format!("Type: {}", refs.link(type_expr)));
  }
  render_doc(&unit.doc, 3, refs, blocks);

  for member in unit
    .members
    .instance
    .iter()
    .chain(unit.members.static_members.iter())
  {
    let rendered = render_member(member, refs);
    blocks.push(rendered);
  }
}

/// Push description, parameters, properties, examples, meta and returns.
/// `level` is the heading level for the section titles.
fn render_doc(
  doc: &Doc,
  level: usize,
  refs: &mut LinkRefs<'_>,
  blocks: &mut Vec<String>,
) {
  let hashes = "#".repeat(level);

  if !doc.description.is_empty() {
    blocks.push(doc.description.clone());
  }

  if !doc.params.is_empty() {
    blocks.push(format!("{hashes} Parameters"));
    blocks.push(param_list(&doc.params, refs));
  }

  if !doc.properties.is_empty() {
    blocks.push(format!("{hashes} Properties"));
    blocks.push(param_list(&doc.properties, refs));
  }

  if !doc.examples.is_empty() {
    blocks.push(format!("{hashes} Examples"));
    for example in &doc.examples {
      blocks.push(format!("```js\n{example}\n```"));
    }
  }

  if let Some(notice) = &doc.deprecated {
    let mut meta = String::from("**Meta**\n\n*   **deprecated**");
    if !notice.is_empty() {
      let _ = write!(meta, ": {notice}");
    }
    blocks.push(meta);
  }

  for see in &doc.see {
    blocks.push(format!("**See**: {see}"));
  }

  if let Some(returns) = &doc.returns {
    let type_expr = returns
      .type_expr
      .as_deref()
      .map_or_else(|| "any".to_string(), |t| refs.link(t));
    let mut line = format!("Returns **{type_expr}**");
    if !returns.description.is_empty() {
      let _ = write!(line, " {}", returns.description);
    }
    blocks.push(line);
  }
}

fn param_list(params: &[Param], refs: &mut LinkRefs<'_>) -> String {
  params
    .iter()
    .map(|param| {
      let mut type_expr = param
        .type_expr
        .as_deref()
        .map_or_else(|| "any".to_string(), |t| refs.link(t));
      if param.optional {
        type_expr.push('?');
      }

      // Nested `options.timeout` params are indented under their parent.
      let indent = "    ".repeat(param.name.matches('.').count());
      let mut line = format!("{indent}*   `{}` **{type_expr}**", param.name);
      if !param.description.is_empty() {
        let _ = write!(line, " {}", param.description);
      }
      if let Some(default) = &param.default {
        let _ = write!(line, " (optional, default `{default}`)");
      }
      line
    })
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use std::path::Path;

  use super::*;
  use crate::extract_from_source;

  #[test]
  fn test_render_class_with_members() {
    let src = r"
/**
 * Foo helper.
 */
class Foo {
  /**
   * Sees text.
   * @param {string} text expected text.
   * @param {string} [context=null] where to look.
   * @returns {void}
   */
  see(text, context) {}

  /**
   * Clicks.
   * @example
   * I.click('Login');
   */
  click(locator) {}
}
";
    let doc = extract_from_source(src, Path::new("Foo.js")).unwrap();
    let md = render_markdown(&doc);

    let expected = "## Foo

Foo helper.

### click

Clicks.

#### Examples

```js
I.click('Login');
```

### see

Sees text.

#### Parameters

*   `text` **[string][1]** expected text.
*   `context` **[string][1]?** where to look. (optional, default `null`)

Returns **void**

[1]: https://developer.mozilla.org/docs/Web/JavaScript/Reference/Global_Objects/String
";
    assert_eq!(md, expected);
  }

  #[test]
  fn test_render_typedef_properties() {
    let src = r"
/**
 * Helper configuration.
 * @typedef {object} config
 * @property {string} url base url.
 */
";
    let doc = extract_from_source(src, Path::new("Foo.js")).unwrap();
    let md = render_markdown(&doc);
    assert!(
      md.starts_with("## config\n\nType: [object][1]\n\nHelper configuration.")
    );
    assert!(md.contains("### Properties\n\n*   `url` **[string][2]** base url."));
    assert!(md.ends_with(&format!(
      "[1]: {GLOBAL_OBJECTS}Object\n\n[2]: {GLOBAL_OBJECTS}String\n"
    )));
  }

  #[test]
  fn test_nested_params_are_indented() {
    let src = r"
/**
 * @param {object} opts options.
 * @param {number} opts.timeout timeout.
 */
function run(opts) {}
";
    let doc = extract_from_source(src, Path::new("run.js")).unwrap();
    let md = render_markdown(&doc);
    assert!(
      md.contains("*   `opts` **[object][1]** options.\n    *   `opts.timeout`")
    );
  }

  #[test]
  fn test_deprecated_meta() {
    let src = "class A {\n  /**\n   * Old.\n   * @deprecated\n   */\n  old() {}\n}\n";
    let doc = extract_from_source(src, Path::new("A.js")).unwrap();
    let md = render_markdown(&doc);
    assert!(md.contains("**Meta**\n\n*   **deprecated**\n"));
  }

  #[test]
  fn test_empty_document_renders_empty() {
    assert_eq!(render_markdown(&Document::default()), "");
  }
}
