//! Post-processing of extracted markdown: normalization rules and page
//! front matter.
pub mod frontmatter;
pub mod normalize;

pub use frontmatter::FrontMatter;
pub use normalize::normalize;
