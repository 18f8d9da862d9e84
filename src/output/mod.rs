mod catalog;
mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use catalog::{print_rule_catalog, rule_id};
pub use exports::export_history;
pub use progress::AnalysisProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_summary, render_summary};

/// Prints the `PipeLens` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔍 PipeLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI/CD Pipeline Quality Analyzer")
    );
}
