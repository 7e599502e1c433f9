use std::{
  fs,
  path::{Path, PathBuf},
  sync::{LazyLock, OnceLock},
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  extractor::ExtractorConfig,
  inheritance::{InheritanceConfig, default_inheritance},
  pages::{ChangelogConfig, ExternalHelper, PageConfig, PluginsConfig},
  templates,
};

/// A literal type alias rewrite applied to staged module copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
  pub from: String,
  pub to:   String,
}

impl AliasRule {
  #[must_use]
  pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
    Self {
      from: from.into(),
      to:   to.into(),
    }
  }
}

/// Built-in alias rules. Order matters: the optional forms must be rewritten
/// before their bare prefixes.
static DEFAULT_ALIASES: LazyLock<Vec<AliasRule>> = LazyLock::new(|| {
  vec![
    AliasRule::new("CodeceptJS.LocatorOrString?", "(string | object)?"),
    AliasRule::new("LocatorOrString?", "(string | object)?"),
    AliasRule::new("CodeceptJS.LocatorOrString", "string | object"),
    AliasRule::new("LocatorOrString", "string | object"),
    AliasRule::new("CodeceptJS.StringOrSecret", "string | object"),
  ]
});

static DEFAULT_INHERITANCE: LazyLock<Vec<InheritanceConfig>> =
  LazyLock::new(default_inheritance);

static DEFAULT_IGNORE: LazyLock<Vec<String>> =
  LazyLock::new(|| vec!["Polly".to_string(), "MockRequest".to_string()]);

/// Configuration for the refdoc documentation pipeline.
///
/// [`Config`] holds every directory the pipeline reads from or writes to,
/// the rules applied to staged module copies, and the optional extra pages.
/// Fields are typically loaded from a TOML or JSON config file, but can also
/// be set via `--config KEY=VALUE`.
///
/// List fields that ship with built-in rules (`ignore`, `aliases`,
/// `inheritance`) are optional: leaving them out keeps the built-ins, while
/// setting them (even to an empty list) replaces the built-ins entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing the documented modules.
  pub source_dir: PathBuf,

  /// Extension of documented modules, without the dot.
  pub module_extension: String,

  /// Directory of inline partials (`{{> name }}`).
  pub partials_dir: PathBuf,

  /// Extension of partial and shared block files, without the dot.
  pub partial_extension: String,

  /// Directory of shared blocks (`{{ name }}`).
  pub shared_dir: PathBuf,

  /// Scratch directory receiving rewritten module copies.
  pub build_dir: PathBuf,

  /// Directory receiving one page per module.
  pub output_dir: PathBuf,

  /// Permalink prefix of module pages, e.g. `/helpers`.
  pub permalink_prefix: String,

  /// Module identifiers that never get a page.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ignore: Option<Vec<String>>,

  /// Number of threads to use for parallel processing.
  pub jobs: Option<usize>,

  /// Type alias rewrites.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub aliases: Option<Vec<AliasRule>>,

  /// Member inheritance pairings.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inheritance: Option<Vec<InheritanceConfig>>,

  /// Extractor selection.
  pub extractor: ExtractorConfig,

  /// Combined plugins page.
  pub plugins: Option<PluginsConfig>,

  /// Helpers documented from outside the source tree.
  pub external_helpers: Vec<ExternalHelper>,

  /// Hand-written pages republished with front matter.
  pub pages: Vec<PageConfig>,

  /// Release notes page.
  pub changelog: Option<ChangelogConfig>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_dir:        PathBuf::from("lib/helper"),
      module_extension:  "js".to_string(),
      partials_dir:      PathBuf::from("docs/webapi"),
      partial_extension: "mustache".to_string(),
      shared_dir:        PathBuf::from("docs/shared"),
      build_dir:         PathBuf::from("docs/build"),
      output_dir:        PathBuf::from("docs/helpers"),
      permalink_prefix:  "/helpers".to_string(),
      ignore:            None,
      jobs:              None,
      aliases:           None,
      inheritance:       None,
      extractor:         ExtractorConfig::default(),
      plugins:           None,
      external_helpers:  Vec::new(),
      pages:             Vec::new(),
      changelog:         None,
    }
  }
}

impl Config {
  /// Alias rules in application order.
  #[must_use]
  pub fn alias_rules(&self) -> &[AliasRule] {
    self.aliases.as_deref().unwrap_or(&DEFAULT_ALIASES)
  }

  /// Inheritance pairings.
  #[must_use]
  pub fn inheritance_rules(&self) -> &[InheritanceConfig] {
    self.inheritance.as_deref().unwrap_or(&DEFAULT_INHERITANCE)
  }

  /// Module identifiers skipped entirely.
  #[must_use]
  pub fn ignored_modules(&self) -> &[String] {
    self.ignore.as_deref().unwrap_or(&DEFAULT_IGNORE)
  }

  /// Whether the module `name` is on the ignore list.
  #[must_use]
  pub fn is_ignored(&self, name: &str) -> bool {
    self.ignored_modules().iter().any(|ignored| ignored == name)
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content)
          .map_err(ConfigError::from)
          .map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse JSON config from {}: {}",
              path.display(),
              e
            ))
          })
      },
      "toml" => {
        toml::from_str(&content)
          .map_err(ConfigError::from)
          .map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse TOML config from {}: {}",
              path.display(),
              e
            ))
          })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then apply
  /// `--config KEY=VALUE` overrides.
  ///
  /// Files are merged in order, later files taking precedence. Without any
  /// file the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is invalid, or
  /// the result fails [`Config::validate`].
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load config from {}: {}",
          first.display(),
          e
        ))
      })?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            config_path.display(),
            e
          ))
        })?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    // Paths are validated separately, after CLI flags had their say.
    config.validate()?;

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "output_dir=site/helpers".to_string(),
  ///     "extractor.mode=command".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Nested keys use dots, e.g. `plugins.output`;
  /// setting a key of an absent section creates that section with defaults.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "source_dir" => self.source_dir = PathBuf::from(value),
      "module_extension" => self.module_extension = value.to_string(),
      "partials_dir" => self.partials_dir = PathBuf::from(value),
      "partial_extension" => self.partial_extension = value.to_string(),
      "shared_dir" => self.shared_dir = PathBuf::from(value),
      "build_dir" => self.build_dir = PathBuf::from(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "permalink_prefix" => self.permalink_prefix = value.to_string(),
      "ignore" => self.ignore = Some(parse_list(value)),
      "jobs" => self.jobs = parse_optional_usize(key, value)?,
      "extractor.mode" => self.extractor.mode = value.parse()?,
      "extractor.command" => self.extractor.command = value.to_string(),
      "extractor.args" => {
        self.extractor.args =
          value.split_whitespace().map(String::from).collect();
      },
      "plugins.source_dir" => {
        self.plugins_mut().source_dir = PathBuf::from(value);
      },
      "plugins.output" => self.plugins_mut().output = PathBuf::from(value),
      "plugins.permalink" => self.plugins_mut().permalink = value.to_string(),
      "plugins.title" => self.plugins_mut().title = value.to_string(),
      "changelog.source" => {
        self.changelog_mut().source = PathBuf::from(value);
      },
      "changelog.output" => {
        self.changelog_mut().output = PathBuf::from(value);
      },
      "changelog.repository" => {
        self.changelog_mut().repository = value.to_string();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  fn plugins_mut(&mut self) -> &mut PluginsConfig {
    self.plugins.get_or_insert_with(PluginsConfig::default)
  }

  fn changelog_mut(&mut self) -> &mut ChangelogConfig {
    self.changelog.get_or_insert_with(ChangelogConfig::default)
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (paths, strings): Other's value replaces this config's
  ///   value unless it is the default, so a second file does not reset
  ///   what the first one set
  pub fn merge(&mut self, other: Self) {
    macro_rules! merge_plain {
      ($defaults:ident; $($field:ident),* $(,)?) => {
        $(
          if other.$field != $defaults.$field {
            self.$field = other.$field;
          }
        )*
      };
    }

    macro_rules! merge_option {
      ($($field:ident),* $(,)?) => {
        $(
          if other.$field.is_some() {
            self.$field = other.$field;
          }
        )*
      };
    }

    let defaults = Self::default();
    merge_plain!(
      defaults;
      source_dir,
      module_extension,
      partials_dir,
      partial_extension,
      shared_dir,
      build_dir,
      output_dir,
      permalink_prefix,
    );
    merge_option!(ignore, jobs, aliases, inheritance, plugins, changelog);

    self.extractor.merge(other.extractor);
    self.external_helpers.extend(other.external_helpers);
    self.pages.extend(other.pages);
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "refdoc.toml",
          "refdoc.json",
          ".refdoc.toml",
          ".refdoc.json",
          ".config/refdoc.toml",
          ".config/refdoc.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        config_filenames
          .iter()
          .map(|filename| current_dir.join(filename))
          .find(|config_path| config_path.exists())
      })
      .clone()
  }

  /// Check values that do not depend on the filesystem.
  ///
  /// # Errors
  ///
  /// Returns every problem found in a single error.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.jobs == Some(0) {
      errors.push("jobs must be at least 1".to_string());
    }

    if self.module_extension.is_empty() {
      errors.push("module_extension must not be empty".to_string());
    }

    for pairing in self.inheritance_rules() {
      if pairing.derived == pairing.base {
        errors.push(format!(
          "Inheritance pairing for '{}' names itself as base",
          pairing.derived
        ));
      }
      for pattern in &pairing.exclude {
        if let Err(e) = Regex::new(pattern) {
          errors.push(format!(
            "Invalid exclude pattern '{pattern}' for '{}': {e}",
            pairing.derived
          ));
        }
      }
    }

    for rule in self.alias_rules() {
      if rule.from.is_empty() {
        errors.push(format!("Alias rule to '{}' has an empty 'from'", rule.to));
      }
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Validate all paths specified in the configuration
  ///
  /// Partial and shared block directories may be absent: a missing directory
  /// simply contributes no fragments.
  ///
  /// # Errors
  ///
  /// Returns an error if any configured input does not exist or has the wrong
  /// type.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if !self.source_dir.exists() {
      errors.push(format!(
        "Source directory does not exist: {}",
        self.source_dir.display()
      ));
    } else if !self.source_dir.is_dir() {
      errors.push(format!(
        "Source directory path is not a directory: {}",
        self.source_dir.display()
      ));
    }

    for (label, dir) in [
      ("Partials", &self.partials_dir),
      ("Shared blocks", &self.shared_dir),
    ] {
      if dir.exists() && !dir.is_dir() {
        errors.push(format!(
          "{label} directory path is not a directory: {}",
          dir.display()
        ));
      }
    }

    if let Some(ref plugins) = self.plugins
      && !plugins.source_dir.is_dir()
    {
      errors.push(format!(
        "Plugin directory does not exist: {}",
        plugins.source_dir.display()
      ));
    }

    for helper in &self.external_helpers {
      if !helper.source.is_file() {
        errors.push(format!(
          "External helper '{}' source is not a file: {}",
          helper.name,
          helper.source.display()
        ));
      }
    }

    for (index, page) in self.pages.iter().enumerate() {
      if !page.source.is_file() {
        errors.push(format!(
          "Page {} source is not a file: {}",
          index + 1,
          page.source.display()
        ));
      }
    }

    if let Some(ref changelog) = self.changelog
      && !changelog.source.is_file()
    {
      errors.push(format!(
        "Changelog file does not exist: {}",
        changelog.source.display()
      ));
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Split a comma separated override value, dropping empty items.
fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(String::from)
    .collect()
}

fn parse_optional_usize(
  key: &str,
  value: &str,
) -> Result<Option<usize>, ConfigError> {
  if value.is_empty() {
    return Ok(None);
  }
  value.parse().map(Some).map_err(|_| {
    ConfigError::Config(format!(
      "Invalid value for '{key}': '{value}'. Expected a positive integer"
    ))
  })
}
