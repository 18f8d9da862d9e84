use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::analyzer::AnalysisResult;

/// Number of warnings reported by [`History::frequent_warnings`] by default.
pub const DEFAULT_FREQUENT_WARNINGS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub source: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// One row of the run's metrics, numbered from 1 in recording order.
#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint<'a> {
    pub sequence: usize,
    pub score: u8,
    pub warnings: &'a [String],
    pub suggestions: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningCount {
    pub warning: String,
    pub count: usize,
}

/// Results collected across analyses, kept by the caller.
///
/// The analyzer never sees this; the CLI owns one per run.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    last_jobs: Option<Mapping>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result and replaces the snapshot of the last analyzed jobs.
    pub fn record(&mut self, source: impl Into<String>, result: AnalysisResult, jobs: Mapping) {
        self.entries.push(HistoryEntry {
            source: source.into(),
            recorded_at: Utc::now(),
            result,
        });
        self.last_jobs = Some(jobs);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn last_jobs(&self) -> Option<&Mapping> {
        self.last_jobs.as_ref()
    }

    pub fn metrics(&self) -> Vec<MetricPoint<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| MetricPoint {
                sequence: idx + 1,
                score: entry.result.score(),
                warnings: entry.result.warnings(),
                suggestions: entry.result.suggestions(),
            })
            .collect()
    }

    /// Mean score rounded to two decimals, or `None` before any analysis.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_score(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: u64 = self
            .entries
            .iter()
            .map(|entry| u64::from(entry.result.score()))
            .sum();
        let average = total as f64 / self.entries.len() as f64;
        Some((average * 100.0).round() / 100.0)
    }

    /// The most common warning texts, most frequent first. Ties keep the
    /// order in which the warnings were first seen.
    pub fn frequent_warnings(&self, limit: usize) -> Vec<WarningCount> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for warning in self.entries.iter().flat_map(|e| e.result.warnings()) {
            *counts.entry(warning.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<WarningCount> = counts
            .into_iter()
            .map(|(warning, count)| WarningCount {
                warning: warning.to_string(),
                count,
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }
}
