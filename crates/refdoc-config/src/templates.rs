use crate::error::ConfigError;

/// Default configuration in TOML, with a comment on every field so a fresh
/// `refdoc init` explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# refdoc configuration file

# Directory holding the documented modules, one page per module
source_dir = "lib/helper"

# Extension of documented modules, without the dot
module_extension = "js"

# Inline partials, substituted for `{{> name }}` inside doc comments
partials_dir = "docs/webapi"

# Shared blocks, substituted for `{{ name }}` in generated pages
shared_dir = "docs/shared"

# Extension of partial and shared block files
partial_extension = "mustache"

# Scratch directory for rewritten module copies
build_dir = "docs/build"

# Directory the helper pages are written to
output_dir = "docs/helpers"

# Permalink prefix of helper pages
permalink_prefix = "/helpers"

# Modules that never get a page
ignore = ["Polly", "MockRequest"]

# Number of threads to use (defaults to number of CPU cores)
# jobs = 4

[extractor]
# "library" extracts in-process, "command" runs an external tool
mode = "library"
command = "documentation"
args = ["build", "-f", "md", "--shallow", "--markdown-toc=false", "--sort-order=alpha"]

# Literal type alias rewrites, applied in order to staged copies
[[aliases]]
from = "CodeceptJS.LocatorOrString?"
to = "(string | object)?"

[[aliases]]
from = "LocatorOrString?"
to = "(string | object)?"

[[aliases]]
from = "CodeceptJS.LocatorOrString"
to = "string | object"

[[aliases]]
from = "LocatorOrString"
to = "string | object"

[[aliases]]
from = "CodeceptJS.StringOrSecret"
to = "string | object"

# Members the derived unit inherits from its base
[[inheritance]]
derived = "Appium"
base = "WebDriver"
exclude = [
  "Title", "Popup", "Cookie", "Url", "^press", "^refreshPage",
  "^resizeWindow", "Script$", "cursor", "Css", "Tab$", "^wait",
]

# All plugin modules rendered into one page
[plugins]
source_dir = "lib/plugin"
output = "docs/plugins.md"
permalink = "plugins"
title = "Plugins"

# Helpers maintained outside the source tree
# [[external_helpers]]
# name = "Detox"
# source = "node_modules/@codeceptjs/detox-helper/Detox.js"

# Hand-written pages republished with front matter
# [[pages]]
# source = "docker/README.md"
# output = "docs/docker.md"
# permalink = "/docker"
# title = "Docker"
# layout = "Section"
# sidebar = "false"
# edit_link = false

# Release notes
# [changelog]
# source = "CHANGELOG.md"
# output = "docs/changelog.md"
# repository = "https://github.com/codeceptjs/CodeceptJS"
"#;

/// Default configuration in JSON. JSON has no comments, so only the core
/// fields are listed.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "source_dir": "lib/helper",
  "module_extension": "js",
  "partials_dir": "docs/webapi",
  "shared_dir": "docs/shared",
  "partial_extension": "mustache",
  "build_dir": "docs/build",
  "output_dir": "docs/helpers",
  "permalink_prefix": "/helpers",
  "ignore": ["Polly", "MockRequest"],
  "extractor": {
    "mode": "library"
  },
  "plugins": {
    "source_dir": "lib/plugin",
    "output": "docs/plugins.md"
  }
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns an error if the format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => {
      Err(ConfigError::Config(format!(
        "Unsupported config format: {format}"
      )))
    },
  }
}
