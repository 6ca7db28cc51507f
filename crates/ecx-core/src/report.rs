//! Step outcomes and progress reporting

use crate::model::Category;
use std::fmt;

/// One unit of work of an apply run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub category: Category,

    /// Human readable label (key, name or document path)
    pub label: String,
}

impl Step {
    pub fn new(category: Category, label: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.label)
    }
}

/// Outcome of a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The resource was created
    Created,
    /// A resource with the declared name already existed
    Reused,
    /// Nothing to do, no value was supplied
    Skipped,
    /// The step failed and the run stops
    Failed(String),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Created => write!(f, "created"),
            StepOutcome::Reused => write!(f, "reused"),
            StepOutcome::Skipped => write!(f, "skipped"),
            StepOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Receives progress of an apply run
pub trait Reporter {
    /// A step is about to run
    fn started(&mut self, _step: &Step) {}

    /// Intermediate progress inside a step (e.g. the rule being created)
    fn progress(&mut self, _step: &Step, _detail: &str) {}

    fn finished(&mut self, step: &Step, outcome: &StepOutcome);
}

/// Reporter that discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn finished(&mut self, _step: &Step, _outcome: &StepOutcome) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Record of every step an apply run went through
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub steps: Vec<StepRecord>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepRecord { step, outcome });
    }

    pub fn is_success(&self) -> bool {
        !self.steps.iter().any(|r| r.outcome.is_failure())
    }

    fn count(&self, predicate: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|r| predicate(&r.outcome)).count()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            created: self.count(|o| *o == StepOutcome::Created),
            reused: self.count(|o| *o == StepOutcome::Reused),
            skipped: self.count(|o| *o == StepOutcome::Skipped),
            failed: self.count(StepOutcome::is_failure),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub reused: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} reused, {} skipped, {} failed",
            self.created, self.reused, self.skipped, self.failed
        )
    }
}
