pub mod config;
pub mod error;
pub mod extractor;
pub mod inheritance;
pub mod pages;
pub mod templates;

pub use config::{AliasRule, Config};
pub use error::ConfigError;
