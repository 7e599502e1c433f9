//! Normalization rules applied to every extracted helper page.
//!
//! Each rule is a standalone transform that leaves markdown without its
//! pattern unchanged. [`normalize`] runs them in order.
use std::sync::LazyLock;

use regex::Regex;
use refdoc_jsdoc::never_matching_regex;

use crate::template::Substitutions;

/// Where the configuration section of a page is moved to.
pub const CONFIGURATION_ANCHOR: &str = "<!-- configuration -->";

/// Marker that ends the configuration section, and what the section
/// collapses to.
pub const CONFIGURATION_END: &str = "[1]";

static OPTIONAL_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\(optional, default.*?\)").unwrap_or_else(|e| {
    log::error!("Failed to compile OPTIONAL_DEFAULT regex: {e}");
    never_matching_regex()
  })
});

static ESCAPE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\\+").unwrap_or_else(|e| {
    log::error!("Failed to compile ESCAPE_MARKERS regex: {e}");
    never_matching_regex()
  })
});

// Greedy: the section runs to the last marker on the page.
static CONFIGURATION_SECTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)## config(.*)\[1\]").unwrap_or_else(|e| {
    log::error!("Failed to compile CONFIGURATION_SECTION regex: {e}");
    never_matching_regex()
  })
});

/// Run every rule in order.
#[must_use]
pub fn normalize(markdown: &str, shared: &Substitutions) -> String {
  let text = strip_optional_defaults(markdown);
  let text = strip_escape_markers(&text);
  let text = splice_shared_blocks(&text, shared);
  splice_configuration(&text)
}

/// Remove `(optional, default ...)` annotations up to the first closing
/// parenthesis on the same line.
#[must_use]
pub fn strip_optional_defaults(markdown: &str) -> String {
  OPTIONAL_DEFAULT.replace_all(markdown, "").into_owned()
}

/// Remove the backslashes extractors put before markdown punctuation.
#[must_use]
pub fn strip_escape_markers(markdown: &str) -> String {
  ESCAPE_MARKERS.replace_all(markdown, "").into_owned()
}

/// Substitute shared block placeholders that survived into the markdown.
#[must_use]
pub fn splice_shared_blocks(markdown: &str, shared: &Substitutions) -> String {
  shared.apply(markdown)
}

/// Move the configuration section to [`CONFIGURATION_ANCHOR`].
///
/// The section starts at `## config` and ends at the last
/// [`CONFIGURATION_END`] marker. Its body (without heading and marker)
/// replaces the anchor, and the section itself collapses to the marker.
/// Nothing happens unless the section exists and the anchor sits outside
/// it.
#[must_use]
pub fn splice_configuration(markdown: &str) -> String {
  let Some(caps) = CONFIGURATION_SECTION.captures(markdown) else {
    return markdown.to_string();
  };
  let (Some(section), Some(body)) = (caps.get(0), caps.get(1)) else {
    return markdown.to_string();
  };

  let before = &markdown[..section.start()];
  let after = &markdown[section.end()..];
  let anchor_before = before.contains(CONFIGURATION_ANCHOR);
  if !anchor_before && !after.contains(CONFIGURATION_ANCHOR) {
    log::debug!("Configuration section found but no anchor outside of it");
    return markdown.to_string();
  }

  let body = body.as_str();
  let (before, after) = if anchor_before {
    (before.replacen(CONFIGURATION_ANCHOR, body, 1), after.to_string())
  } else {
    (before.to_string(), after.replacen(CONFIGURATION_ANCHOR, body, 1))
  };

  let mut out = String::with_capacity(markdown.len() + body.len());
  out.push_str(&before);
  out.push_str(CONFIGURATION_END);
  out.push_str(&after);
  out
}
