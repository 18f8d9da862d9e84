use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::Mapping;
use std::io::Write;

use crate::config::OutputFormat;
use crate::history::{History, HistoryEntry, WarningCount};

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    generated_at: DateTime<Utc>,
    analyses: &'a [HistoryEntry],
    average_score: Option<f64>,
    frequent_warnings: Vec<WarningCount>,
    last_jobs: Option<&'a Mapping>,
}

/// Exports a run's analyses in a machine-readable format.
///
/// - JSON: one object per file (`source`, `recorded_at`, `score`,
///   `warnings`, `suggestions`), run aggregates and the jobs of the last
///   analyzed pipeline
/// - CSV: a per-file score section followed by one row per finding
pub fn export_history(
    history: &History,
    format: OutputFormat,
    pretty: bool,
    frequent_limit: usize,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            anyhow::bail!("summary output is rendered to the terminal, not exported")
        }
        OutputFormat::Json => export_json(history, pretty, frequent_limit, output),
        OutputFormat::Csv => export_csv(history, output),
    }
}

fn export_json(
    history: &History,
    pretty: bool,
    frequent_limit: usize,
    output: &mut dyn Write,
) -> Result<()> {
    let report = RunReport {
        generated_at: Utc::now(),
        analyses: history.entries(),
        average_score: history.average_score(),
        frequent_warnings: history.frequent_warnings(frequent_limit),
        last_jobs: history.last_jobs(),
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

fn export_csv(history: &History, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "File,Score,Warnings,Suggestions")?;
    for entry in history.entries() {
        writeln!(
            output,
            "{},{},{},{}",
            csv_field(&entry.source),
            entry.result.score(),
            entry.result.warnings().len(),
            entry.result.suggestions().len()
        )?;
    }

    writeln!(output)?;
    writeln!(output, "File,Category,Finding")?;
    for entry in history.entries() {
        let source = csv_field(&entry.source);
        for warning in entry.result.warnings() {
            writeln!(output, "{source},warning,{}", csv_field(warning))?;
        }
        for suggestion in entry.result.suggestions() {
            writeln!(output, "{source},suggestion,{}", csv_field(suggestion))?;
        }
    }

    Ok(())
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
