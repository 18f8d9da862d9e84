//! Typed views over a decoded pipeline document.
//!
//! The analyzer never touches raw YAML directly. Every field it inspects goes
//! through the predicates here, so "is this present", "is this empty" and "is
//! this text" are explicit decisions on the value's variant.

use serde_yaml::{Mapping, Value};

use crate::error::{PipeLensError, Result};

const JOBS_KEY: &str = "jobs";
const STAGES_KEY: &str = "stages";

/// A decoded CI/CD pipeline definition.
///
/// Wraps the top-level YAML mapping. Construction never fails for a mapping;
/// only the loader rejects documents whose root is a scalar or a sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineDocument {
    root: Mapping,
}

impl PipelineDocument {
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    /// Builds a document from an already-decoded YAML value.
    ///
    /// A null root (an empty file) is treated as an empty document.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(root) => Ok(Self::new(root)),
            Value::Null => Ok(Self::default()),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            other => Err(PipeLensError::InvalidDocument(format!(
                "expected a mapping at the top level, found {}",
                variant_name(&other)
            ))),
        }
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Resolves the jobs mapping.
    ///
    /// A `jobs` key holding a mapping (even an empty one) is used as-is.
    /// Otherwise the whole document is read as the jobs mapping, which is how
    /// GitLab-style files without an outer wrapper are written. Reserved keys
    /// such as `stages` are not stripped in that case; they are skipped later
    /// because their values are not mappings.
    pub fn jobs(&self) -> Jobs<'_> {
        match self.root.get(JOBS_KEY).map(untagged) {
            // An empty `jobs: {}` stays the jobs mapping so it scores as a pipeline with no jobs.
            Some(Value::Mapping(jobs)) => Jobs::Wrapped(jobs),
            _ => Jobs::Implicit(&self.root),
        }
    }

    pub fn stages(&self) -> Stages<'_> {
        match self.root.get(STAGES_KEY).map(untagged) {
            None => Stages::Absent,
            Some(value) if !is_truthy(value) => Stages::Absent,
            Some(Value::Sequence(stages)) => Stages::Listed(stages),
            Some(other) => Stages::Unreadable(other),
        }
    }
}

/// Where the jobs mapping of a document came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jobs<'a> {
    /// Read from the explicit `jobs:` key.
    Wrapped(&'a Mapping),
    /// The whole document, for files without a `jobs:` wrapper.
    Implicit(&'a Mapping),
}

impl<'a> Jobs<'a> {
    pub fn mapping(&self) -> &'a Mapping {
        match self {
            Self::Wrapped(jobs) | Self::Implicit(jobs) => jobs,
        }
    }

    /// Number of entries, malformed ones included.
    pub fn count(&self) -> usize {
        self.mapping().len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, JobEntry<'a>)> + 'a {
        self.mapping()
            .iter()
            .map(|(name, value)| (value_text(name), JobEntry::from_value(value)))
    }

    /// Only the mapping-typed entries, in document order.
    pub fn specs(&self) -> impl Iterator<Item = (String, JobSpec<'a>)> + 'a {
        self.entries().filter_map(|(name, entry)| match entry {
            JobEntry::Spec(spec) => Some((name, spec)),
            JobEntry::Malformed(_) => None,
        })
    }
}

/// A single value found under a job name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobEntry<'a> {
    Spec(JobSpec<'a>),
    /// Scalars and sequences; counted as jobs but never inspected.
    Malformed(&'a Value),
}

impl<'a> JobEntry<'a> {
    fn from_value(value: &'a Value) -> Self {
        match untagged(value) {
            Value::Mapping(fields) => Self::Spec(JobSpec { fields }),
            other => Self::Malformed(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobSpec<'a> {
    fields: &'a Mapping,
}

impl<'a> JobSpec<'a> {
    /// True when the key is present, whatever its value (null included).
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).map(untagged)
    }

    /// Present but falsy: null, `false`, zero, `""`, `[]` or `{}`.
    pub fn is_present_but_empty(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !is_truthy(value))
    }

    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn mapping(&self, key: &str) -> Option<&'a Mapping> {
        self.get(key).and_then(Value::as_mapping)
    }
}

/// The document's `stages` entry, classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stages<'a> {
    /// Missing, null or empty.
    Absent,
    Listed(&'a [Value]),
    /// Non-empty but not a sequence; stage rules skip it.
    Unreadable(&'a Value),
}

/// Strips YAML tags (`!reference [...]` and friends) down to the plain value.
pub fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match untagged(value) {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(fields) => !fields.is_empty(),
        Value::Tagged(_) => true,
    }
}

/// Flattens a value to text. Sequences join their items line by line, so a
/// multi-line `script:` reads the same as a single block string.
pub fn value_text(value: &Value) -> String {
    match untagged(value) {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Sequence(items) => items.iter().map(value_text).collect::<Vec<_>>().join("\n"),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn variant_name(value: &Value) -> &'static str {
    match untagged(value) {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
