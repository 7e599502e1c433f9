use std::fmt::Write;

/// Page header consumed by the documentation site.
///
/// Keys are always written in the same order: `permalink`, `layout`,
/// `sidebarDepth`, `sidebar`, `title`, `editLink`. Optional keys are left out
/// when unset; `editLink: false` is written only when editing is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
  pub permalink:     String,
  pub layout:        Option<String>,
  /// May be empty, which renders as a bare `sidebarDepth: ` key.
  pub sidebar_depth: Option<String>,
  pub sidebar:       Option<String>,
  pub title:         String,
  pub edit_link:     bool,
}

impl FrontMatter {
  #[must_use]
  pub fn new(permalink: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      permalink:     permalink.into(),
      layout:        None,
      sidebar_depth: None,
      sidebar:       None,
      title:         title.into(),
      edit_link:     true,
    }
  }

  /// Header of a generated helper page: `<prefix>/<id>`, auto sidebar, not
  /// editable.
  #[must_use]
  pub fn helper(prefix: &str, id: &str) -> Self {
    Self {
      sidebar: Some("auto".to_string()),
      edit_link: false,
      ..Self::new(format!("{}/{id}", prefix.trim_end_matches('/')), id)
    }
  }

  #[must_use]
  pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
    self.layout = Some(layout.into());
    self
  }

  #[must_use]
  pub fn with_sidebar(mut self, sidebar: impl Into<String>) -> Self {
    self.sidebar = Some(sidebar.into());
    self
  }

  #[must_use]
  pub fn with_sidebar_depth(mut self, depth: impl Into<String>) -> Self {
    self.sidebar_depth = Some(depth.into());
    self
  }

  #[must_use]
  pub const fn with_edit_link(mut self, edit_link: bool) -> Self {
    self.edit_link = edit_link;
    self
  }

  /// The header block, ending with the closing `---` and one blank line.
  #[must_use]
  pub fn render(&self) -> String {
    let mut out = String::from("---\n");
    // Writing to String is infallible
    let _ = writeln!(out, "permalink: {}", self.permalink);
    if let Some(layout) = &self.layout {
      let _ = writeln!(out, "layout: {layout}");
    }
    if let Some(depth) = &self.sidebar_depth {
      let _ = writeln!(out, "sidebarDepth: {depth}");
    }
    if let Some(sidebar) = &self.sidebar {
      let _ = writeln!(out, "sidebar: {sidebar}");
    }
    let _ = writeln!(out, "title: {}", self.title);
    if !self.edit_link {
      out.push_str("editLink: false\n");
    }
    out.push_str("---\n\n");
    out
  }

  /// Prepend the header to `body`.
  #[must_use]
  pub fn prepend(&self, body: &str) -> String {
    let mut out = self.render();
    out.push_str(body);
    out
  }
}
