use std::{fmt, path::PathBuf};

/// Source location of a documented declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
  /// Path to the source file.
  pub file: PathBuf,
  /// 1-based line number of the doc comment's opening `/**`.
  pub line: u32,
}

/// Which member list a documented declaration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
  /// A method on class instances.
  Instance,
  /// A `static` method on the class itself.
  Static,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Instance => "instance",
      Self::Static => "static",
    })
  }
}

/// Kind of a top-level documented unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
  Class,
  Function,
  Typedef,
}

/// A `@param` or `@property` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  pub name:        String,
  /// Type expression without the surrounding braces.
  pub type_expr:   Option<String>,
  pub description: String,
  /// Declared as `[name]`, `[name=default]` or with a trailing `=` type.
  pub optional:    bool,
  /// Default value from `[name=default]`.
  pub default:     Option<String>,
}

/// A `@returns` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Returns {
  pub type_expr:   Option<String>,
  pub description: String,
}

/// The parsed body of one doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
  /// Free text before the first block tag.
  pub description: String,
  pub params:      Vec<Param>,
  pub properties:  Vec<Param>,
  pub returns:     Option<Returns>,
  /// Bodies of `@example` tags, verbatim.
  pub examples:    Vec<String>,
  /// Type from `@typedef {T}` or `@type {T}`.
  pub type_expr:   Option<String>,
  /// `Some` when `@deprecated` is present; the notice may be empty.
  pub deprecated:  Option<String>,
  pub see:         Vec<String>,
}

/// One documented member of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
  pub name:     String,
  pub scope:    Scope,
  pub doc:      Doc,
  pub location: Location,
}

impl Member {
  /// Call signature built from the top-level documented parameters,
  /// e.g. `click(locator, context)`.
  #[must_use]
  pub fn signature(&self) -> String {
    signature(&self.name, &self.doc.params)
  }
}

/// Members of a unit, partitioned by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
  pub instance:       Vec<Member>,
  pub static_members: Vec<Member>,
}

impl Members {
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.instance.is_empty() && self.static_members.is_empty()
  }
}

/// A top-level documented declaration: a class with its members, a
/// function, or a typedef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocUnit {
  pub name:     String,
  pub kind:     Kind,
  pub doc:      Doc,
  pub members:  Members,
  pub location: Location,
}

/// Everything extracted from one or more source files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub units: Vec<DocUnit>,
}

impl Document {
  /// Find a unit by exact name.
  #[must_use]
  pub fn unit(&self, name: &str) -> Option<&DocUnit> {
    self.units.iter().find(|u| u.name == name)
  }

  /// The unit named `name`, or the first class unit if there is none.
  ///
  /// Helper modules are named after the class they export, but a module may
  /// still export a class under a different name.
  #[must_use]
  pub fn primary_unit(&self, name: &str) -> Option<&DocUnit> {
    self
      .unit(name)
      .or_else(|| self.units.iter().find(|u| u.kind == Kind::Class))
  }

  /// Mutable variant of [`Self::primary_unit`].
  pub fn primary_unit_mut(&mut self, name: &str) -> Option<&mut DocUnit> {
    let idx = self
      .units
      .iter()
      .position(|u| u.name == name)
      .or_else(|| self.units.iter().position(|u| u.kind == Kind::Class))?;
    self.units.get_mut(idx)
  }

  /// Sort units by name, capitalized (class) names first, and each unit's
  /// members alphabetically.
  pub fn sort_alpha(&mut self) {
    self.units.sort_by(|a, b| a.name.cmp(&b.name));
    for unit in &mut self.units {
      unit
        .members
        .instance
        .sort_by(|a, b| alpha_cmp(&a.name, &b.name));
      unit
        .members
        .static_members
        .sort_by(|a, b| alpha_cmp(&a.name, &b.name));
    }
  }
}

/// Case-insensitive ordering with a case-sensitive tiebreak so the result is
/// total and stable across runs.
#[must_use]
pub fn alpha_cmp(a: &str, b: &str) -> std::cmp::Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

pub(crate) fn signature(name: &str, params: &[Param]) -> String {
  let args: Vec<&str> = params
    .iter()
    .filter(|p| !p.name.contains('.'))
    .map(|p| p.name.as_str())
    .collect();
  format!("{name}({})", args.join(", "))
}
