//! Member inheritance between documented units.
//!
//! A derived unit receives every base member it does not define itself,
//! unless the member's name matches one of the exclusion patterns. Derived
//! members keep their position and win name collisions; inherited members
//! follow in base order. Member bodies are never touched.
use std::collections::HashSet;

use regex::Regex;
use refdoc_config::inheritance::InheritanceConfig;
use refdoc_jsdoc::{DocUnit, Member};

use crate::error::PipelineError;

/// Ordered, unanchored name patterns. A base member whose name matches any of
/// them is never inherited.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
  patterns: Vec<Regex>,
}

impl ExclusionFilter {
  /// Compile `patterns`.
  ///
  /// # Errors
  ///
  /// Returns [`PipelineError::Pattern`] for the first invalid pattern.
  pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PipelineError> {
    let patterns = patterns
      .iter()
      .map(|pattern| {
        Regex::new(pattern.as_ref()).map_err(|source| {
          PipelineError::Pattern {
            pattern: pattern.as_ref().to_string(),
            source,
          }
        })
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { patterns })
  }

  /// Filter of an inheritance pairing.
  ///
  /// # Errors
  ///
  /// See [`ExclusionFilter::new`].
  pub fn for_pairing(
    pairing: &InheritanceConfig,
  ) -> Result<Self, PipelineError> {
    Self::new(&pairing.exclude)
  }

  #[must_use]
  pub fn excludes(&self, name: &str) -> bool {
    self.patterns.iter().any(|re| re.is_match(name))
  }
}

/// Derived members followed by the applicable base members.
#[must_use]
pub fn inherit_members(
  derived: &[Member],
  base: &[Member],
  filter: &ExclusionFilter,
) -> Vec<Member> {
  let defined: HashSet<&str> = derived.iter().map(|m| m.name.as_str()).collect();

  let inherited = base.iter().filter(|member| {
    if filter.excludes(&member.name) {
      log::trace!("Not inheriting excluded member {}", member.name);
      return false;
    }
    !defined.contains(member.name.as_str())
  });

  derived.iter().chain(inherited).cloned().collect()
}

/// Fold the applicable instance members of `base` into `derived`.
/// Returns how many members were inherited.
pub fn merge_units(
  derived: &mut DocUnit,
  base: &DocUnit,
  filter: &ExclusionFilter,
) -> usize {
  let before = derived.members.instance.len();
  derived.members.instance =
    inherit_members(&derived.members.instance, &base.members.instance, filter);
  derived.members.instance.len() - before
}
