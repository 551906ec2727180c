pub mod catalog;
pub mod config;
pub mod error;
pub mod paging;
pub mod parse;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
