use serde::{Deserialize, Serialize};

use crate::document::{value_text, JobSpec};

/// Images pulled from this registry prefix count as official.
const OFFICIAL_IMAGE_PREFIX: &str = "docker.io";

/// Stage names that need no explanation.
pub const COMMON_STAGES: [&str; 4] = ["build", "test", "deploy", "cleanup"];

/// Substrings in a job script that indicate a plain-text credential.
const SECRET_MARKERS: [&str; 2] = ["password", "secret"];

/// Pipelines with more jobs than this are told to parallelize.
pub const MAX_SEQUENTIAL_JOBS: usize = 5;

/// Pipelines with fewer stages than this are told to add more.
pub const MIN_STAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Warning,
    Suggestion,
}

/// The fixed rule catalog, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    TooManyJobs,
    MissingRetry,
    MissingCache,
    MissingVariables,
    EmptyDependencies,
    UnofficialImage,
    EmptyOnly,
    EmptyExcept,
    NonTextTimeout,
    MissingArtifactPaths,
    NoStages,
    FewStages,
    UncommonStage,
    PlaintextSecret,
    MissingNotifications,
}

impl Rule {
    pub const ALL: [Rule; 15] = [
        Rule::TooManyJobs,
        Rule::MissingRetry,
        Rule::MissingCache,
        Rule::MissingVariables,
        Rule::EmptyDependencies,
        Rule::UnofficialImage,
        Rule::EmptyOnly,
        Rule::EmptyExcept,
        Rule::NonTextTimeout,
        Rule::MissingArtifactPaths,
        Rule::NoStages,
        Rule::FewStages,
        Rule::UncommonStage,
        Rule::PlaintextSecret,
        Rule::MissingNotifications,
    ];

    /// Per-job rules checked together in the first pass over the jobs.
    pub const JOB_CHECKS: [Rule; 9] = [
        Rule::MissingRetry,
        Rule::MissingCache,
        Rule::MissingVariables,
        Rule::EmptyDependencies,
        Rule::UnofficialImage,
        Rule::EmptyOnly,
        Rule::EmptyExcept,
        Rule::NonTextTimeout,
        Rule::MissingArtifactPaths,
    ];

    pub fn category(self) -> Category {
        match self {
            Rule::MissingRetry
            | Rule::EmptyDependencies
            | Rule::EmptyOnly
            | Rule::EmptyExcept
            | Rule::MissingArtifactPaths
            | Rule::NoStages
            | Rule::UncommonStage
            | Rule::PlaintextSecret => Category::Warning,
            Rule::TooManyJobs
            | Rule::MissingCache
            | Rule::MissingVariables
            | Rule::UnofficialImage
            | Rule::NonTextTimeout
            | Rule::FewStages
            | Rule::MissingNotifications => Category::Suggestion,
        }
    }

    /// Points taken off the score each time the rule fires.
    ///
    /// `TooManyJobs`, `FewStages` and `MissingNotifications` are suggestions
    /// that still cost points.
    pub fn penalty(self) -> u32 {
        match self {
            Rule::TooManyJobs => 10,
            Rule::MissingRetry => 2,
            Rule::EmptyDependencies => 3,
            Rule::EmptyOnly | Rule::EmptyExcept => 2,
            Rule::MissingArtifactPaths => 3,
            Rule::NoStages | Rule::FewStages => 5,
            Rule::UncommonStage => 2,
            Rule::PlaintextSecret => 5,
            Rule::MissingNotifications => 2,
            Rule::MissingCache
            | Rule::MissingVariables
            | Rule::UnofficialImage
            | Rule::NonTextTimeout => 0,
        }
    }

    /// Human-readable finding. `subject` is the job or stage name; pipeline
    /// level rules ignore it.
    pub fn message(self, subject: &str) -> String {
        match self {
            Rule::TooManyJobs => "Consider using parallelism between jobs".to_string(),
            Rule::MissingRetry => format!("Job '{subject}' has no retry configured"),
            Rule::MissingCache => format!("Consider adding a cache to job '{subject}'"),
            Rule::MissingVariables => {
                format!("Consider adding environment variables to job '{subject}'")
            }
            Rule::EmptyDependencies => format!("Job '{subject}' has empty dependencies"),
            Rule::UnofficialImage => {
                format!("Consider using an official Docker image for job '{subject}'")
            }
            Rule::EmptyOnly => format!("Job '{subject}' has an empty 'only' condition"),
            Rule::EmptyExcept => format!("Job '{subject}' has an empty 'except' condition"),
            Rule::NonTextTimeout => {
                format!("Consider setting an appropriate timeout value for job '{subject}'")
            }
            Rule::MissingArtifactPaths => {
                format!("Job '{subject}' has no artifact paths defined")
            }
            Rule::NoStages => "No stages defined in the pipeline".to_string(),
            Rule::FewStages => {
                "Consider adding more stages to the pipeline for better organization".to_string()
            }
            Rule::UncommonStage => {
                format!("Stage '{subject}' is not a common name and may cause confusion")
            }
            Rule::PlaintextSecret => {
                format!("Job '{subject}' uses passwords or secrets in plain text")
            }
            Rule::MissingNotifications => {
                format!("Consider adding notifications to job '{subject}'")
            }
        }
    }

    /// Whether a per-job rule fires for `job`. Pipeline and stage level
    /// rules never fire here.
    ///
    /// Fields of an unexpected type (a non-string `image`, a non-mapping
    /// `artifacts`) leave the rule untriggered.
    pub fn fires_for(self, job: &JobSpec<'_>) -> bool {
        match self {
            Rule::MissingRetry => !job.has("retry"),
            Rule::MissingCache => !job.has("cache") && job.has("script"),
            Rule::MissingVariables => !job.has("variables"),
            Rule::EmptyDependencies => job.is_present_but_empty("dependencies"),
            Rule::UnofficialImage => job
                .text("image")
                .is_some_and(|image| !image.starts_with(OFFICIAL_IMAGE_PREFIX)),
            Rule::EmptyOnly => job.is_present_but_empty("only"),
            Rule::EmptyExcept => job.is_present_but_empty("except"),
            Rule::NonTextTimeout => job.get("timeout").is_some_and(|t| !t.is_string()),
            Rule::MissingArtifactPaths => job
                .mapping("artifacts")
                .is_some_and(|artifacts| !artifacts.contains_key("paths")),
            Rule::PlaintextSecret => job.get("script").is_some_and(|script| {
                let text = value_text(script);
                SECRET_MARKERS.iter().any(|marker| text.contains(marker))
            }),
            Rule::MissingNotifications => !job.has("notifications"),
            Rule::TooManyJobs | Rule::NoStages | Rule::FewStages | Rule::UncommonStage => false,
        }
    }
}

pub fn is_common_stage(stage: &str) -> bool {
    COMMON_STAGES.contains(&stage)
}
