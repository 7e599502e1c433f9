//! Reference documentation pages from doc-commented source modules.
//!
//! The binary is a thin wrapper around this library; the modules are public
//! so the pipeline stages can be tested and benchmarked on their own.
pub mod cli;
pub mod error;
pub mod extract;
pub mod markdown;
pub mod merge;
pub mod pages;
pub mod pipeline;
pub mod template;
pub mod utils;
