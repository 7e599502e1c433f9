//! Parsing of a single `/** ... */` comment into a [`Doc`] plus the tag
//! hints that decide how the comment is attached to its declaration.
use crate::types::{Doc, Kind, Param, Returns};

/// A parsed doc comment before it has been attached to a declaration.
#[derive(Debug, Default)]
pub struct ParsedComment {
  pub doc:       Doc,
  /// Explicit name from `@name`, `@alias`, `@typedef`, `@class` or
  /// `@function`.
  pub name:      Option<String>,
  /// Kind forced by a tag, overriding what the code line suggests.
  pub kind:      Option<Kind>,
  pub is_static: bool,
  /// `@private`, `@ignore` or `@internal`: never rendered.
  pub hidden:    bool,
}

/// Parse the raw comment text, including its `/**` and `*/` delimiters.
///
/// Errors carry a message only; the caller attaches file and line.
pub fn parse_comment(raw: &str) -> Result<ParsedComment, String> {
  let lines = comment_lines(raw);

  let mut description = Vec::new();
  let mut tags: Vec<(String, Vec<String>)> = Vec::new();

  for line in lines {
    if let Some(tag) = tag_start(&line) {
      let in_example = tags.last().is_some_and(|(name, _)| name == "example");
      if !in_example || is_known_tag(&tag) {
        let rest = line.trim_start()[tag.len() + 1..].trim_start().to_string();
        tags.push((tag, vec![rest]));
        continue;
      }
    }

    match tags.last_mut() {
      Some((_, body)) => body.push(line),
      None => description.push(line),
    }
  }

  let mut parsed = ParsedComment {
    doc: Doc {
      description: trim_block(&description.join("\n")),
      ..Doc::default()
    },
    ..ParsedComment::default()
  };

  for (tag, body) in tags {
    apply_tag(&mut parsed, &tag, &body)?;
  }

  Ok(parsed)
}

fn apply_tag(
  parsed: &mut ParsedComment,
  tag: &str,
  body: &[String],
) -> Result<(), String> {
  let text = trim_block(&body.join("\n"));

  match tag {
    "param" | "arg" | "argument" => {
      parsed.doc.params.push(parse_param(&text, tag)?);
    },
    "property" | "prop" => {
      parsed.doc.properties.push(parse_param(&text, tag)?);
    },
    "returns" | "return" => {
      let (type_expr, rest) = take_type(&text)?;
      parsed.doc.returns = Some(Returns {
        type_expr,
        description: strip_dash(rest),
      });
    },
    "example" => {
      parsed.doc.examples.push(example_body(body));
    },
    "typedef" => {
      let (type_expr, rest) = take_type(&text)?;
      let name = first_word(rest)
        .ok_or_else(|| "@typedef is missing a name".to_string())?;
      parsed.doc.type_expr = type_expr;
      parsed.name = Some(name.to_string());
      parsed.kind = Some(Kind::Typedef);
    },
    "type" => {
      let (type_expr, _) = take_type(&text)?;
      parsed.doc.type_expr = type_expr;
    },
    "name" | "alias" => {
      let name = first_word(&text)
        .ok_or_else(|| format!("@{tag} is missing a name"))?;
      parsed.name = Some(name.to_string());
    },
    "class" | "constructor" => {
      parsed.kind = Some(Kind::Class);
      if let Some(name) = first_word(&text) {
        parsed.name = Some(name.to_string());
      }
    },
    "function" | "func" | "method" => {
      parsed.kind = Some(Kind::Function);
      if let Some(name) = first_word(&text) {
        parsed.name = Some(name.to_string());
      }
    },
    "static" => parsed.is_static = true,
    "private" | "ignore" | "internal" => parsed.hidden = true,
    "deprecated" => parsed.doc.deprecated = Some(text),
    "see" => parsed.doc.see.push(text),
    other => {
      log::trace!("refdoc-jsdoc: ignoring unsupported tag @{other}");
    },
  }

  Ok(())
}

/// Parse the body of a `@param` / `@property` tag:
/// `{type} name description`, `{type} [name=default] - description`.
fn parse_param(text: &str, tag: &str) -> Result<Param, String> {
  let (type_expr, rest) = take_type(text)?;
  let rest = rest.trim_start();

  let (name, default, bracketed, rest) = if rest.starts_with('[') {
    let close = matching_close(rest, '[', ']')
      .ok_or_else(|| format!("@{tag} has an unclosed `[` in its name"))?;
    let inner = rest[1..close].trim();
    let (name, default) = match inner.split_once('=') {
      Some((name, default)) => {
        (name.trim(), Some(default.trim().to_string()))
      },
      None => (inner, None),
    };
    (name, default, true, &rest[close + 1..])
  } else {
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (&rest[..end], None, false, &rest[end..])
  };

  if name.is_empty() {
    return Err(format!("@{tag} is missing a name"));
  }

  let (type_expr, type_optional) = match type_expr {
    Some(t) if t.ends_with('=') => {
      (Some(t.trim_end_matches('=').to_string()), true)
    },
    other => (other, false),
  };

  Ok(Param {
    name: name.to_string(),
    type_expr,
    description: strip_dash(rest),
    optional: bracketed || type_optional,
    default,
  })
}

/// Split a leading `{type}` off `text`. Nested braces are balanced, so
/// record types like `{{url: string}}` work.
fn take_type(text: &str) -> Result<(Option<String>, &str), String> {
  let trimmed = text.trim_start();
  if !trimmed.starts_with('{') {
    return Ok((None, trimmed));
  }

  let close = matching_close(trimmed, '{', '}')
    .ok_or_else(|| "unbalanced braces in type expression".to_string())?;
  let type_expr = trimmed[1..close].trim().to_string();
  Ok((Some(type_expr), &trimmed[close + 1..]))
}

/// Byte index of the bracket closing the one at the start of `s`.
fn matching_close(s: &str, open: char, close: char) -> Option<usize> {
  let mut depth = 0usize;
  for (idx, c) in s.char_indices() {
    if c == open {
      depth += 1;
    } else if c == close {
      depth = depth.checked_sub(1)?;
      if depth == 0 {
        return Some(idx);
      }
    }
  }
  None
}

/// Strip the comment delimiters and the leading ` * ` of every line.
fn comment_lines(raw: &str) -> Vec<String> {
  let inner = raw.trim();
  let inner = inner.strip_prefix("/**").unwrap_or(inner);
  let inner = inner.strip_suffix("*/").unwrap_or(inner);

  inner
    .lines()
    .map(|line| {
      let trimmed = line.trim_start();
      let content = trimmed.strip_prefix('*').map_or(trimmed, |rest| {
        rest.strip_prefix(' ').unwrap_or(rest)
      });
      content.trim_end().to_string()
    })
    .collect()
}

/// Return the tag name when `line` begins a block tag (`@word`).
fn tag_start(line: &str) -> Option<String> {
  let rest = line.trim_start().strip_prefix('@')?;
  let name: String = rest
    .chars()
    .take_while(char::is_ascii_alphanumeric)
    .collect();
  if name.is_empty() { None } else { Some(name) }
}

fn is_known_tag(tag: &str) -> bool {
  matches!(
    tag,
    "param"
      | "arg"
      | "argument"
      | "property"
      | "prop"
      | "returns"
      | "return"
      | "example"
      | "typedef"
      | "type"
      | "name"
      | "alias"
      | "class"
      | "constructor"
      | "function"
      | "func"
      | "method"
      | "static"
      | "private"
      | "ignore"
      | "internal"
      | "deprecated"
      | "see"
  )
}

/// Example bodies keep their indentation; only surrounding blank lines and
/// a leading `<caption>` are dropped.
fn example_body(body: &[String]) -> String {
  let mut lines: Vec<&str> = body.iter().map(String::as_str).collect();

  if let Some(first) = lines.first().copied()
    && let Some(rest) = first.trim_start().strip_prefix("<caption>")
  {
    lines[0] = rest
      .split_once("</caption>")
      .map_or("", |(_, after)| after.trim_start());
  }

  while lines.first().is_some_and(|l| l.trim().is_empty()) {
    lines.remove(0);
  }
  while lines.last().is_some_and(|l| l.trim().is_empty()) {
    lines.pop();
  }

  lines.join("\n")
}

fn first_word(text: &str) -> Option<&str> {
  text.split_whitespace().next()
}

fn strip_dash(text: &str) -> String {
  let text = text.trim();
  text
    .strip_prefix('-')
    .map_or(text, str::trim_start)
    .to_string()
}

/// Trim leading and trailing blank lines plus trailing whitespace.
fn trim_block(text: &str) -> String {
  text.trim_matches('\n').trim_end().to_string()
}
