use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

use pipelens::analyzer::analyze;
use pipelens::config::{Config, OutputFormat};
use pipelens::history::History;
use pipelens::loader::load_file;
use pipelens::output::{self, AnalysisProgress};

#[derive(Parser)]
#[command(name = "pipelens")]
#[command(author, version, about = "CI/CD Pipeline Quality Analyzer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Configuration file (defaults to ./pipelens.{toml,json,yaml,yml})
    #[arg(short, long, global = true, env = "PIPELENS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score pipeline definitions against the best-practice rules
    Analyze {
        /// Pipeline files (.yml or .yaml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Exit with an error when any pipeline scores below this value
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        fail_under: Option<u8>,

        /// Number of most frequent warnings to report
        #[arg(long)]
        top_warnings: Option<usize>,
    },
    /// List the rules pipelines are scored against
    Rules,
}

impl Cli {
    fn execute_analyze(
        &self,
        config: &Config,
        files: &[PathBuf],
        format: OutputFormat,
        fail_under: Option<u8>,
        top_warnings: usize,
    ) -> Result<()> {
        info!("Analyzing {} pipeline file(s)", files.len());

        let mut history = History::new();
        let mut failed = 0;
        let progress = (files.len() > 1).then(|| AnalysisProgress::start(files.len()));

        for path in files {
            let source = path.display().to_string();
            if let Some(progress) = &progress {
                progress.advance(&source);
            }
            match load_file(path) {
                Ok(document) => {
                    let result = analyze(&document);
                    info!("{source}: score {}", result.score());
                    history.record(source, result, document.jobs().mapping().clone());
                }
                Err(err) => {
                    warn!("Skipping {source}: {err}");
                    eprintln!("{} {err}", output::dim("error:"));
                    failed += 1;
                }
            }
        }

        if let Some(progress) = progress {
            progress.finish();
        }

        let pretty = self.pretty || config.output.pretty;
        match (format, &self.output) {
            (OutputFormat::Summary, None) => output::print_summary(&history, top_warnings),
            (OutputFormat::Summary, Some(path)) => {
                write_report(path, output::render_summary(&history, top_warnings).as_bytes())?;
            }
            (format, None) => {
                let stdout = std::io::stdout();
                output::export_history(&history, format, pretty, top_warnings, &mut stdout.lock())?;
            }
            (format, Some(path)) => {
                let mut buffer = Vec::new();
                output::export_history(&history, format, pretty, top_warnings, &mut buffer)?;
                write_report(path, &buffer)?;
            }
        }

        if failed > 0 {
            bail!("{failed} file(s) could not be analyzed");
        }

        if let Some(threshold) = fail_under {
            let below: Vec<&str> = history
                .entries()
                .iter()
                .filter(|entry| entry.result.score() < threshold)
                .map(|entry| entry.source.as_str())
                .collect();
            if !below.is_empty() {
                bail!(
                    "{} pipeline(s) scored below {threshold}: {}",
                    below.len(),
                    below.join(", ")
                );
            }
        }

        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Analyze {
                files,
                format,
                fail_under,
                top_warnings,
            } => {
                let config = Config::load(self.config.as_deref())?;
                let format = format.unwrap_or(config.output.format);
                let fail_under = fail_under.or(config.analysis.fail_under);
                let top_warnings = top_warnings.unwrap_or(config.analysis.frequent_warnings_limit);
                self.execute_analyze(&config, files, format, fail_under, top_warnings)
            }
            Commands::Rules => {
                output::print_rule_catalog();
                Ok(())
            }
        }
    }
}

fn write_report(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!("Report written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from([
            "pipelens",
            "analyze",
            "a.yml",
            "b.yaml",
            "--format",
            "json",
            "--fail-under",
            "70",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        match cli.command {
            Commands::Analyze {
                files,
                format,
                fail_under,
                top_warnings,
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(fail_under, Some(70));
                assert_eq!(top_warnings, None);
            }
            Commands::Rules => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["pipelens", "analyze"]).is_err());
    }

    #[test]
    fn test_fail_under_is_bounded() {
        assert!(Cli::try_parse_from(["pipelens", "analyze", "a.yml", "--fail-under", "101"]).is_err());
    }

    #[test]
    fn test_fail_under_rejects_low_scores() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = dir.path().join("ci.yml");
        std::fs::write(&pipeline, "jobs: {}\n").unwrap();
        let report = dir.path().join("report.json");

        let cli = Cli::try_parse_from([
            OsString::from("pipelens"),
            OsString::from("analyze"),
            pipeline.clone().into_os_string(),
            OsString::from("--format"),
            OsString::from("json"),
            OsString::from("--fail-under"),
            OsString::from("96"),
            OsString::from("--output"),
            report.clone().into_os_string(),
        ])
        .unwrap();

        let err = cli.execute().unwrap_err();
        assert!(err.to_string().contains("scored below 96"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written["analyses"][0]["score"], 95);
    }

    #[test]
    fn test_unsupported_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = dir.path().join("ci.txt");
        std::fs::write(&pipeline, "jobs: {}\n").unwrap();
        let report = dir.path().join("report.csv");

        let cli = Cli::try_parse_from([
            OsString::from("pipelens"),
            OsString::from("analyze"),
            pipeline.clone().into_os_string(),
            OsString::from("--format"),
            OsString::from("csv"),
            OsString::from("--output"),
            report.clone().into_os_string(),
        ])
        .unwrap();

        let err = cli.execute().unwrap_err();
        assert!(err.to_string().contains("could not be analyzed"));
    }
}
