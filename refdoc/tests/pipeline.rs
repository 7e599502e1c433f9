#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use refdoc::{
  error::PipelineError,
  extract::LibraryExtractor,
  markdown::normalize::CONFIGURATION_ANCHOR,
  pages::{run_changelog, run_external_helpers, run_plugins, run_static_pages},
  pipeline::{build_lib, run_all, run_helpers},
};
use refdoc_config::{
  Config,
  inheritance::InheritanceConfig,
  pages::{ChangelogConfig, ExternalHelper, PageConfig, PluginsConfig},
};
use tempfile::tempdir;

const FOO: &str = r"const Helper = require('@codeceptjs/helper');

/**
 * Foo helper.
 */
class Foo extends Helper {
  /**
   * Sees text.
   * @param {string} text expected text.
   */
  see(text) {}

  /**
   * Clicks an element.
   * {{> click }}
   * @param {LocatorOrString} locator element to click.
   */
  click(locator) {}
}

module.exports = Foo;
";

const WEBDRIVER: &str = r"/**
 * Desktop browsers.
 */
class WebDriver {
  /**
   * Desktop click.
   */
  click(locator) {}

  /**
   * Grabs the title.
   */
  grabTitle() {}

  /**
   * Checks the title.
   */
  seeInTitle(text) {}
}
";

const APPIUM: &str = r"/**
 * Mobile apps.
 */
class Appium extends WebDriver {
  /**
   * Mobile click.
   */
  click(locator) {}

  /**
   * Swipes.
   */
  swipe(locator) {}
}
";

/// Lay out a project under `root` and point a config at it.
fn project(root: &Path, modules: &[(&str, &str)]) -> Config {
  let source_dir = root.join("lib/helper");
  let partials_dir = root.join("docs/webapi");
  fs::create_dir_all(&source_dir).expect("Failed to create dir in test");
  fs::create_dir_all(&partials_dir).expect("Failed to create dir in test");

  for (name, src) in modules {
    fs::write(source_dir.join(format!("{name}.js")), src)
      .expect("Failed to write module in test");
  }
  fs::write(partials_dir.join("click.mustache"), "Clicks by locator.\n")
    .expect("Failed to write partial in test");

  Config {
    source_dir,
    partials_dir,
    shared_dir: root.join("docs/shared"),
    build_dir: root.join("docs/build"),
    output_dir: root.join("docs/helpers"),
    ..Default::default()
  }
}

fn read(path: &Path) -> String {
  fs::read_to_string(path).expect("Failed to read file in test")
}

#[test]
fn test_helper_page_end_to_end() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[("Foo", FOO)]);

  let written =
    run_helpers(&config, &LibraryExtractor).expect("Helpers should build");
  assert_eq!(written, vec![config.output_dir.join("Foo.md")]);

  let page = read(&written[0]);
  assert!(page.starts_with(
    "---\npermalink: /helpers/Foo\nsidebar: auto\ntitle: Foo\neditLink: \
     false\n---\n\n## Foo\n\nFoo helper.\n\n"
  ));
  assert!(page.contains("Clicks by locator."));
  assert!(page.contains("**[string][1] | [object][2]**"));
  assert!(!page.contains("{{> click }}"));

  let click = page.find("### click").expect("click is documented");
  let see = page.find("### see").expect("see is documented");
  assert!(click < see);

  // The source module is never rewritten in place.
  assert_eq!(read(&config.source_dir.join("Foo.js")), FOO);
  assert!(read(&config.build_dir.join("Foo.js")).contains("Clicks by locator."));
}

#[test]
fn test_rebuild_is_identical() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[("Foo", FOO)]);

  run_helpers(&config, &LibraryExtractor).expect("First build should pass");
  let first = read(&config.output_dir.join("Foo.md"));
  run_helpers(&config, &LibraryExtractor).expect("Second build should pass");
  assert_eq!(read(&config.output_dir.join("Foo.md")), first);
}

#[test]
fn test_ignored_modules_get_no_page() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[("Foo", FOO), ("Polly", FOO)]);

  let written =
    run_helpers(&config, &LibraryExtractor).expect("Helpers should build");
  assert_eq!(written.len(), 1);
  assert!(!config.output_dir.join("Polly.md").exists());
}

#[test]
fn test_inherited_members_are_merged() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(temp_dir.path(), &[
    ("Appium", APPIUM),
    ("WebDriver", WEBDRIVER),
  ]);
  config.inheritance = Some(vec![InheritanceConfig {
    derived: "Appium".to_string(),
    base:    "WebDriver".to_string(),
    exclude: vec!["^seeIn".to_string()],
  }]);

  run_helpers(&config, &LibraryExtractor).expect("Helpers should build");
  let page = read(&config.output_dir.join("Appium.md"));

  assert_eq!(page.matches("### click").count(), 1);
  assert!(page.contains("Mobile click."));
  assert!(!page.contains("Desktop click."));
  assert!(page.contains("### grabTitle"));
  assert!(!page.contains("seeInTitle"));

  // Derived members keep their place, inherited ones follow.
  let swipe = page.find("### swipe").expect("swipe is documented");
  let grab = page.find("### grabTitle").expect("grabTitle is inherited");
  assert!(swipe < grab);

  // The base page is built as is.
  let base = read(&config.output_dir.join("WebDriver.md"));
  assert!(base.contains("### seeInTitle"));
}

#[test]
fn test_missing_base_is_error() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(temp_dir.path(), &[("Appium", APPIUM)]);
  config.inheritance = Some(vec![InheritanceConfig {
    derived: "Appium".to_string(),
    base:    "WebDriver".to_string(),
    exclude: Vec::new(),
  }]);

  let err = run_helpers(&config, &LibraryExtractor)
    .expect_err("Merging without a base should fail");
  assert!(matches!(err, PipelineError::MissingBase { .. }));
}

#[test]
fn test_shared_blocks_and_unknown_placeholders() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let src = FOO.replace(
    " * Foo helper.\n",
    " * Foo helper.\n *\n * {{ commonKeys }}\n *\n * {{ unknownBlock }}\n",
  );
  let config = project(temp_dir.path(), &[("Foo", src.as_str())]);
  fs::create_dir_all(&config.shared_dir).expect("Failed to create dir in test");
  fs::write(config.shared_dir.join("commonKeys.mustache"), "| Key |")
    .expect("Failed to write shared block in test");

  run_helpers(&config, &LibraryExtractor).expect("Helpers should build");
  let page = read(&config.output_dir.join("Foo.md"));
  assert!(page.contains("\n\n\n| Key |"));
  assert!(page.contains("{{ unknownBlock }}"));
}

#[test]
fn test_build_lib_for_typings_keeps_aliases() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[("Foo", FOO)]);

  let staged = build_lib(&config, true).expect("Staging should pass");
  let typings = read(&staged[0].path);
  assert!(typings.contains("{LocatorOrString}"));
  assert!(typings.contains("Clicks by locator."));

  let staged = build_lib(&config, false).expect("Staging should pass");
  assert!(read(&staged[0].path).contains("{string | object}"));
}

#[test]
fn test_static_pages_and_changelog() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let root = temp_dir.path();
  fs::write(root.join("README.md"), "Body\n").expect("Failed to write page");
  fs::write(root.join("CHANGELOG.md"), "* fixed #7 by @someone\n")
    .expect("Failed to write changelog");

  let config = Config {
    pages: vec![PageConfig {
      source:        root.join("README.md"),
      output:        root.join("docs/readme.md"),
      permalink:     "/readme".to_string(),
      title:         "Readme".to_string(),
      layout:        None,
      sidebar:       None,
      sidebar_depth: None,
      edit_link:     true,
      heading:       None,
      note:          None,
    }],
    ..Default::default()
  };
  let written = run_static_pages(&config).expect("Pages should build");
  assert_eq!(
    read(&written[0]),
    "---\npermalink: /readme\ntitle: Readme\n---\n\nBody\n"
  );

  let changelog = ChangelogConfig {
    source:     root.join("CHANGELOG.md"),
    output:     root.join("docs/changelog.md"),
    repository: "https://example.com/repo".to_string(),
  };
  let page = read(&run_changelog(&changelog).expect("Changelog should build"));
  assert!(page.ends_with(
    "# Releases\n\n* fixed [#7](https://example.com/repo/issues/7) by \
     **[someone](https://github.com/someone)**\n"
  ));
}

const CONFIGURED: &str = r"/**
 * Foo helper.
 *
 * <!-- configuration -->
 */
class Foo {
  /**
   * Clicks.
   * @param {string} locator element.
   */
  click(locator) {}
}

/**
 * @typedef {object} config
 * @property {string} url base url.
 */
";

const PLUGIN: &str = "/**\n * Retries failed steps.\n */\nmodule.exports = \
                      function (config) {}\n";

const MOCK_REQUEST: &str = r"/**
 * Mocks requests.
 */
class MockRequest {
  /**
   * Starts mocking.
   * @param {LocatorOrString} target what to mock.
   */
  startMocking(target) {}
}
";

#[test]
fn test_configuration_section_lands_at_anchor() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[("Foo", CONFIGURED)]);

  run_helpers(&config, &LibraryExtractor).expect("Helpers should build");
  let page = read(&config.output_dir.join("Foo.md"));

  assert!(!page.contains("## config"));
  assert!(!page.contains(CONFIGURATION_ANCHOR));
  let properties = page.find("### Properties").expect("config is spliced");
  let click = page.find("### click").expect("click is documented");
  assert!(properties < click);
  assert!(page.contains("*   `url` **[string][1]** base url."));
  assert!(page.contains(
    "\n[1]: https://developer.mozilla.org/docs/Web/JavaScript/Reference/Global_Objects/String\n"
  ));
}

#[test]
fn test_malformed_module_aborts_with_module_id() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(temp_dir.path(), &[
    ("Bad", "class Bad {\n  /** never closed\n  foo() {}\n}\n"),
    ("Foo", FOO),
  ]);

  let err = run_helpers(&config, &LibraryExtractor)
    .expect_err("A malformed module should fail the run");
  assert!(matches!(
    &err,
    PipelineError::Extraction { module, .. } if module == "Bad"
  ));
  assert!(err.to_string().contains("unterminated"));
}

#[test]
fn test_plugins_page() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let root = temp_dir.path();
  let config = project(root, &[]);
  let plugins = PluginsConfig {
    source_dir: root.join("lib/plugin"),
    output: root.join("docs/plugins.md"),
    ..PluginsConfig::default()
  };
  fs::create_dir_all(&plugins.source_dir).expect("Failed to create dir in test");
  fs::write(plugins.source_dir.join("retryTo.js"), PLUGIN)
    .expect("Failed to write plugin in test");

  let written = run_plugins(&plugins, &config, &LibraryExtractor)
    .expect("Plugins page should build");
  assert_eq!(
    read(&written),
    "---\npermalink: plugins\nsidebarDepth: \nsidebar: auto\ntitle: \
     Plugins\n---\n\n## retryTo\n\nRetries failed steps.\n"
  );
}

#[test]
fn test_external_helper_page() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let root = temp_dir.path();
  let source = root.join("node_modules/mock-request/index.js");
  fs::create_dir_all(root.join("node_modules/mock-request"))
    .expect("Failed to create dir in test");
  fs::write(&source, MOCK_REQUEST).expect("Failed to write helper in test");

  let mut config = project(root, &[]);
  config.external_helpers = vec![ExternalHelper {
    name:   "MockRequest".to_string(),
    source: source.clone(),
  }];

  let written = run_external_helpers(&config, &LibraryExtractor)
    .expect("External helpers should build");
  assert_eq!(written, vec![config.output_dir.join("MockRequest.md")]);

  let page = read(&written[0]);
  assert!(page.starts_with(
    "---\npermalink: /helpers/MockRequest\nsidebar: auto\ntitle: \
     MockRequest\n---\n\n# MockRequest\n\n## MockRequest\n"
  ));
  assert!(page.contains("**[string][1] | [object][2]**"));

  // Aliases are expanded on the scratch copy only.
  assert_eq!(read(&source), MOCK_REQUEST);
  let scratch = config.build_dir.join("external/MockRequest/index.js");
  assert!(read(&scratch).contains("{string | object}"));
}

#[test]
fn test_run_all_builds_every_category() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let root = temp_dir.path();
  let mut config = project(root, &[("Foo", FOO)]);

  fs::create_dir_all(root.join("lib/plugin")).expect("Failed to create dir");
  fs::write(root.join("lib/plugin/retryTo.js"), PLUGIN)
    .expect("Failed to write plugin in test");
  fs::write(root.join("README.md"), "Body\n").expect("Failed to write page");
  fs::write(root.join("CHANGELOG.md"), "* fixed #7\n")
    .expect("Failed to write changelog");

  config.plugins = Some(PluginsConfig {
    source_dir: root.join("lib/plugin"),
    output: root.join("docs/plugins.md"),
    ..PluginsConfig::default()
  });
  config.pages = vec![PageConfig {
    source:        root.join("README.md"),
    output:        root.join("docs/readme.md"),
    permalink:     "/readme".to_string(),
    title:         "Readme".to_string(),
    layout:        None,
    sidebar:       None,
    sidebar_depth: None,
    edit_link:     true,
    heading:       None,
    note:          None,
  }];
  config.changelog = Some(ChangelogConfig {
    source:     root.join("CHANGELOG.md"),
    output:     root.join("docs/changelog.md"),
    repository: "https://example.com/repo".to_string(),
  });

  let written = run_all(&config, &LibraryExtractor).expect("Docs should build");
  assert_eq!(written, vec![
    config.output_dir.join("Foo.md"),
    root.join("docs/plugins.md"),
    root.join("docs/readme.md"),
    root.join("docs/changelog.md"),
  ]);
  assert!(written.iter().all(|path| path.is_file()));
}
