//! Scores CI/CD pipeline definitions against a fixed catalog of
//! best-practice rules.
//!
//! [`analyzer::analyze`] is the entry point: it maps a decoded
//! [`document::PipelineDocument`] to an [`analyzer::AnalysisResult`] and does
//! no I/O. Loading files, keeping history across analyses and rendering
//! reports live in the surrounding modules.

pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod loader;
pub mod output;

pub use analyzer::{analyze, AnalysisResult};
pub use document::PipelineDocument;
pub use error::{PipeLensError, Result};
