mod rules;

pub use rules::{is_common_stage, Category, Rule, COMMON_STAGES, MAX_SEQUENTIAL_JOBS, MIN_STAGES};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::{value_text, Jobs, PipelineDocument, Stages};

/// Score of a pipeline with no findings.
pub const MAX_SCORE: u8 = 100;

/// Outcome of analyzing one pipeline document.
///
/// Findings keep the order in which rules fired; the same text may appear
/// more than once when several jobs or stages trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    score: u8,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn findings(&self, category: Category) -> &[String] {
        match category {
            Category::Warning => &self.warnings,
            Category::Suggestion => &self.suggestions,
        }
    }
}

/// Accumulates findings and deductions while the rules run.
struct ScoreCard {
    score: i64,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl ScoreCard {
    fn new() -> Self {
        Self {
            score: i64::from(MAX_SCORE),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn record(&mut self, rule: Rule, subject: &str) {
        debug!("Rule {rule:?} fired for '{subject}'");
        let message = rule.message(subject);
        match rule.category() {
            Category::Warning => self.warnings.push(message),
            Category::Suggestion => self.suggestions.push(message),
        }
        self.score -= i64::from(rule.penalty());
    }

    fn finish(self) -> AnalysisResult {
        let score = u8::try_from(self.score.clamp(0, i64::from(MAX_SCORE))).unwrap_or(0);
        AnalysisResult {
            score,
            warnings: self.warnings,
            suggestions: self.suggestions,
        }
    }
}

/// Scores a pipeline document against the rule catalog.
///
/// Pure and infallible: fields with unexpected shapes leave their rule
/// untriggered instead of failing the analysis. Rules run in this order:
/// job count, per-job checks, stage checks, plain-text secrets, then
/// notifications, each pass walking jobs in document order.
pub fn analyze(document: &PipelineDocument) -> AnalysisResult {
    let mut card = ScoreCard::new();
    let jobs = document.jobs();
    let job_count = jobs.count();
    if matches!(jobs, Jobs::Implicit(_)) {
        debug!("No 'jobs' mapping, reading {job_count} top-level entries as jobs");
    } else {
        debug!("Analyzing {job_count} jobs");
    }

    if job_count > MAX_SEQUENTIAL_JOBS {
        card.record(Rule::TooManyJobs, "");
    }

    for (name, job) in jobs.specs() {
        for rule in Rule::JOB_CHECKS {
            if rule.fires_for(&job) {
                card.record(rule, &name);
            }
        }
    }

    match document.stages() {
        Stages::Absent => card.record(Rule::NoStages, ""),
        Stages::Listed(stages) if stages.len() < MIN_STAGES => card.record(Rule::FewStages, ""),
        Stages::Listed(stages) => {
            for stage in stages {
                let known = stage.as_str().is_some_and(is_common_stage);
                if !known {
                    card.record(Rule::UncommonStage, &value_text(stage));
                }
            }
        }
        Stages::Unreadable(value) => {
            debug!("Skipping stage rules: 'stages' is not a list ({value:?})");
        }
    }

    for rule in [Rule::PlaintextSecret, Rule::MissingNotifications] {
        for (name, job) in jobs.specs() {
            if rule.fires_for(&job) {
                card.record(rule, &name);
            }
        }
    }

    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_yaml(yaml: &str) -> AnalysisResult {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        analyze(&PipelineDocument::from_value(value).unwrap())
    }

    const COMPLETE_JOB: &str =
        "{script: make, retry: 2, cache: {}, variables: {A: b}, notifications: slack}";

    /// A fully configured job named `build` with `extra` fields appended.
    fn single_job(extra: &str) -> String {
        format!(
            "stages: [build, test, deploy]\njobs:\n  build: {{retry: 2, cache: {{}}, variables: {{A: b}}, notifications: slack{extra}}}\n"
        )
    }

    #[test]
    fn test_empty_document() {
        let result = analyze_yaml("jobs: {}");
        assert_eq!(result.score(), 95);
        assert_eq!(result.warnings(), ["No stages defined in the pipeline"]);
        assert!(result.suggestions().is_empty());
    }

    #[test]
    fn test_clean_pipeline_scores_full_marks() {
        let result = analyze_yaml(&single_job(""));
        assert_eq!(result.score(), 100);
        assert!(result.warnings().is_empty());
        assert!(result.suggestions().is_empty());
    }

    #[test]
    fn test_six_minimal_jobs() {
        let mut yaml = String::from("jobs:\n");
        for i in 1..=6 {
            yaml.push_str(&format!("  job{i}: {{script: echo hi}}\n"));
        }
        let result = analyze_yaml(&yaml);

        // 100 - 10 parallelism - 5 stages - 6 * 2 retry - 6 * 2 notifications
        assert_eq!(result.score(), 61);
        assert_eq!(result.warnings().len(), 7);
        assert_eq!(result.suggestions().len(), 19);

        assert_eq!(result.suggestions()[0], "Consider using parallelism between jobs");
        assert_eq!(result.suggestions()[1], "Consider adding a cache to job 'job1'");
        assert_eq!(
            result.suggestions()[2],
            "Consider adding environment variables to job 'job1'"
        );
        assert_eq!(result.warnings()[0], "Job 'job1' has no retry configured");
        assert_eq!(result.warnings()[6], "No stages defined in the pipeline");
        assert_eq!(
            result.suggestions()[18],
            "Consider adding notifications to job 'job6'"
        );
    }

    #[test]
    fn test_five_jobs_do_not_trigger_parallelism() {
        let mut yaml = String::from("stages: [build, test, deploy]\njobs:\n");
        for i in 1..=5 {
            yaml.push_str(&format!("  job{i}: {COMPLETE_JOB}\n"));
        }
        let result = analyze_yaml(&yaml);
        assert_eq!(result.score(), 100);
        assert!(result.suggestions().is_empty());
    }

    #[test]
    fn test_empty_dependencies_costs_three() {
        let baseline = analyze_yaml(&single_job(""));
        let result = analyze_yaml(&single_job(", dependencies: []"));
        assert_eq!(result.warnings(), ["Job 'build' has empty dependencies"]);
        assert_eq!(baseline.score() - result.score(), 3);
    }

    #[test]
    fn test_image_suggestion() {
        let official = analyze_yaml(&single_job(", image: docker.io/library/python"));
        assert!(official.suggestions().is_empty());

        let custom = analyze_yaml(&single_job(", image: myregistry/python"));
        assert_eq!(
            custom.suggestions(),
            ["Consider using an official Docker image for job 'build'"]
        );
        assert_eq!(custom.score(), 100);
    }

    #[test]
    fn test_recognized_stages() {
        let result = analyze_yaml("stages: [build, test, deploy]\njobs: {}");
        assert_eq!(result.score(), 100);
        assert!(result.warnings().is_empty());
        assert!(result.suggestions().is_empty());
    }

    #[test]
    fn test_too_few_stages_skips_name_check() {
        let result = analyze_yaml("stages: [build, qa]\njobs: {}");
        assert_eq!(
            result.suggestions(),
            ["Consider adding more stages to the pipeline for better organization"]
        );
        assert!(result.warnings().is_empty());
        assert_eq!(result.score(), 95);
    }

    #[test]
    fn test_uncommon_stage_names() {
        let result = analyze_yaml("stages: [build, qa, deploy, 7]\njobs: {}");
        assert_eq!(
            result.warnings(),
            [
                "Stage 'qa' is not a common name and may cause confusion",
                "Stage '7' is not a common name and may cause confusion",
            ]
        );
        assert_eq!(result.score(), 96);
    }

    #[test]
    fn test_unreadable_stages_fire_nothing() {
        let result = analyze_yaml("stages: build\njobs: {}");
        assert_eq!(result.score(), 100);
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_plaintext_secret_and_empty_conditions() {
        let result = analyze_yaml(&single_job(
            ", script: [export password=hunter2], only: [], except: {}",
        ));
        assert_eq!(
            result.warnings(),
            [
                "Job 'build' has an empty 'only' condition",
                "Job 'build' has an empty 'except' condition",
                "Job 'build' uses passwords or secrets in plain text",
            ]
        );
        assert_eq!(result.score(), 91);
    }

    #[test]
    fn test_artifacts_and_timeout() {
        let result = analyze_yaml(&single_job(", artifacts: {when: always}, timeout: 60"));
        assert_eq!(result.warnings(), ["Job 'build' has no artifact paths defined"]);
        assert_eq!(
            result.suggestions(),
            ["Consider setting an appropriate timeout value for job 'build'"]
        );
        assert_eq!(result.score(), 97);
    }

    #[test]
    fn test_implicit_jobs_include_reserved_keys() {
        let yaml = "stages: [build, test, deploy]\nbuild: {script: make}\nvariables: {A: b}\n";
        let result = analyze_yaml(yaml);

        // `variables` is a mapping at the top level, so it is read as a job.
        assert!(result
            .warnings()
            .contains(&"Job 'variables' has no retry configured".to_string()));
        assert!(!result
            .warnings()
            .iter()
            .any(|w| w.contains("'stages'")));
    }

    #[test]
    fn test_malformed_jobs_count_but_are_not_inspected() {
        let mut yaml = String::from("stages: [build, test, deploy]\njobs:\n");
        for i in 1..=6 {
            yaml.push_str(&format!("  job{i}: [not, a, mapping]\n"));
        }
        let result = analyze_yaml(&yaml);
        assert_eq!(result.score(), 90);
        assert_eq!(result.suggestions(), ["Consider using parallelism between jobs"]);
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_score_is_floored_at_zero() {
        let mut yaml = String::from("stages: [a, b, c, d, e, f, g, h]\njobs:\n");
        for i in 1..=20 {
            yaml.push_str(&format!("  job{i}: {{script: echo password, dependencies: []}}\n"));
        }
        let result = analyze_yaml(&yaml);
        assert_eq!(result.score(), 0);
        assert!(result.score() <= MAX_SCORE);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let yaml = "stages: [build]\njobs: {a: {script: echo secret}, b: 3}";
        let first = serde_json::to_string(&analyze_yaml(yaml)).unwrap();
        let second = serde_json::to_string(&analyze_yaml(yaml)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_serializes_to_flat_shape() {
        let result = analyze_yaml("jobs: {}");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 95);
        assert_eq!(json["warnings"][0], "No stages defined in the pipeline");
        assert!(json["suggestions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_findings_by_category() {
        let result = analyze_yaml("stages: [x]\njobs: {}");
        assert_eq!(result.findings(Category::Suggestion).len(), 1);
        assert!(result.findings(Category::Warning).is_empty());
    }
}
