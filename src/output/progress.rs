use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress bar shown on stderr while pipeline files are analyzed.
pub struct AnalysisProgress {
    pb: ProgressBar,
}

impl AnalysisProgress {
    pub fn start(total: usize) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Analyzing").underlined());
        let pb = ProgressBar::new(total as u64);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template("  {msg} [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { pb }
    }

    pub fn advance(&self, source: &str) {
        self.pb
            .set_message(bright_yellow(format!("Analyzing {source}")).to_string());
        self.pb.inc(1);
    }

    pub fn finish(self) {
        self.pb
            .finish_with_message(bright_green("Pipelines analyzed ✓").to_string());
        eprintln!();
    }
}
