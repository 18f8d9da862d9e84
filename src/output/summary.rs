use std::fmt::Write;

use comfy_table::Cell;

use crate::analyzer::{AnalysisResult, Category};
use crate::history::{History, HistoryEntry};

use super::styling::{bright, bright_green, bright_yellow, cyan, dim, score};
use super::tables::{category_cell, color_coded_score_cell, create_table, cyan_header};

/// Prints a human-readable report of a run's analyses to stdout.
///
/// Displays:
/// - One section per analyzed file: score, then every warning and suggestion
///   in the order the rules produced them
/// - Overview: file count, average score and per-file scores
/// - Most Frequent Warnings: the top `frequent_limit` warning texts
///
/// Scores are green from 80, yellow from 50 and red below that.
pub fn print_summary(history: &History, frequent_limit: usize) {
    println!("{}", render_summary(history, frequent_limit));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_entry(output: &mut String, entry: &HistoryEntry) {
    let result = &entry.result;
    add_section_header(output, "📄", &entry.source);
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n",
        dim("Score:"),
        score(result.score()),
        dim("Warnings:"),
        bright_yellow(result.warnings().len()),
        dim("Suggestions:"),
        bright_yellow(result.suggestions().len()),
    );

    if result.warnings().is_empty() && result.suggestions().is_empty() {
        let _ = writeln!(output, "  {}\n", bright_green("No findings. Nice pipeline!"));
        return;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["#", "Category", "Finding"]));
    for (idx, (category, finding)) in findings(result).enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            category_cell(category),
            Cell::new(finding),
        ]);
    }
    let _ = writeln!(output, "{table}\n");
}

fn findings(result: &AnalysisResult) -> impl Iterator<Item = (Category, &str)> {
    let warnings = result
        .warnings()
        .iter()
        .map(|w| (Category::Warning, w.as_str()));
    let suggestions = result
        .suggestions()
        .iter()
        .map(|s| (Category::Suggestion, s.as_str()));
    warnings.chain(suggestions)
}

pub fn render_summary(history: &History, frequent_limit: usize) -> String {
    let mut output = String::new();

    if history.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No pipelines analyzed."));
        return output;
    }

    for entry in history.entries() {
        render_entry(&mut output, entry);
    }

    // Overview section
    add_section_header(&mut output, "📊", "Overview");
    let average = history.average_score().unwrap_or_default();
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n",
        dim("Pipelines analyzed:"),
        bright_yellow(history.len()),
        dim("Average score:"),
        score(average),
    );

    if history.len() > 1 {
        let mut scores_table = create_table();
        scores_table.set_header(cyan_header(&["#", "Pipeline", "Score"]));
        for (entry, metric) in history.entries().iter().zip(history.metrics()) {
            scores_table.add_row(vec![
                Cell::new(metric.sequence),
                Cell::new(&entry.source),
                color_coded_score_cell(metric.score),
            ]);
        }
        let _ = writeln!(output, "{scores_table}\n");
    }

    let frequent = history.frequent_warnings(frequent_limit);
    if !frequent.is_empty() {
        add_section_header(&mut output, "⚠️", "Most Frequent Warnings");
        let mut frequent_table = create_table();
        frequent_table.set_header(cyan_header(&["Warning", "Count"]));
        for item in &frequent {
            frequent_table.add_row(vec![Cell::new(&item.warning), Cell::new(item.count)]);
        }
        let _ = writeln!(output, "{frequent_table}\n");
    }

    // Next Steps
    add_section_header(&mut output, "💡", "Next Steps");
    let _ = writeln!(
        output,
        "  {} Fix warnings first - they are what lowers the score\n\
         \x20 {} Use {} to feed the results into other tools",
        cyan("•"),
        cyan("•"),
        bright_yellow("--format json"),
    );

    output
}
