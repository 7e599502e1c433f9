use serde::{Deserialize, Serialize};

/// One derived/base pairing for member inheritance.
///
/// Instance members of `base` that the `derived` unit does not define, and
/// whose names match none of the `exclude` patterns, are appended to the
/// derived unit's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceConfig {
  /// Module identifier of the unit receiving members.
  pub derived: String,

  /// Module identifier of the unit members are taken from.
  pub base: String,

  /// Regular expressions matched against base member names, unanchored.
  #[serde(default)]
  pub exclude: Vec<String>,
}

/// The built-in pairing: the mobile helper inherits every WebDriver method
/// that makes sense outside a desktop browser.
#[must_use]
pub fn default_inheritance() -> Vec<InheritanceConfig> {
  vec![InheritanceConfig {
    derived: "Appium".to_string(),
    base:    "WebDriver".to_string(),
    exclude: [
      "Title",
      "Popup",
      "Cookie",
      "Url",
      "^press",
      "^refreshPage",
      "^resizeWindow",
      "Script$",
      "cursor",
      "Css",
      "Tab$",
      "^wait",
    ]
    .into_iter()
    .map(String::from)
    .collect(),
  }]
}
