use indexmap::IndexMap;
use serde::Serialize;

use crate::types::Build;

/// Status tallies across a window of recent builds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    /// Count per build status across the whole window
    pub statuses: IndexMap<String, usize>,
    /// Per-branch tallies in first-seen order
    pub branches: IndexMap<String, BranchSummary>,
}

/// Tallies for a single branch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchSummary {
    /// Builds seen for this branch
    pub total: usize,
    /// Count per build status
    pub statuses: IndexMap<String, usize>,
}

impl BranchSummary {
    /// Number of builds with the given status.
    pub fn status_count(&self, status: &str) -> usize {
        self.statuses.get(status).copied().unwrap_or(0)
    }

    /// Health bucket from this branch's failed share.
    pub fn health(&self) -> BranchHealth {
        BranchHealth::from_counts(self.status_count("failed"), self.total)
    }
}

/// Coarse branch health derived from the failed-build ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchHealth {
    Healthy,
    MostlyHealthy,
    Mixed,
    MostlyFailing,
    Failing,
}

impl BranchHealth {
    /// Buckets `failed / max(total, 1)` into the five-step scale.
    ///
    /// A ratio of exactly zero is always healthy; every other boundary
    /// belongs to the higher-severity bucket (0.4 is mixed, 0.8 is failing).
    pub fn from_counts(failed: usize, total: usize) -> Self {
        let ratio = failed as f64 / total.max(1) as f64;

        if ratio == 0.0 {
            BranchHealth::Healthy
        } else if ratio < 0.4 {
            BranchHealth::MostlyHealthy
        } else if ratio < 0.6 {
            BranchHealth::Mixed
        } else if ratio < 0.8 {
            BranchHealth::MostlyFailing
        } else {
            BranchHealth::Failing
        }
    }

    /// Emoji indicator for this bucket.
    pub fn symbol(&self) -> &'static str {
        match self {
            BranchHealth::Healthy => "🟢",
            BranchHealth::MostlyHealthy => "🟡",
            BranchHealth::Mixed => "🟠",
            BranchHealth::MostlyFailing => "🔴",
            BranchHealth::Failing => "⛔",
        }
    }

    /// Human-readable bucket name.
    pub fn label(&self) -> &'static str {
        match self {
            BranchHealth::Healthy => "healthy",
            BranchHealth::MostlyHealthy => "mostly healthy",
            BranchHealth::Mixed => "mixed",
            BranchHealth::MostlyFailing => "mostly failing",
            BranchHealth::Failing => "failing",
        }
    }

    /// One line naming every symbol, shown under the branch table.
    pub fn legend() -> String {
        [
            BranchHealth::Healthy,
            BranchHealth::MostlyHealthy,
            BranchHealth::Mixed,
            BranchHealth::MostlyFailing,
            BranchHealth::Failing,
        ]
        .iter()
        .map(|health| format!("{} {}", health.symbol(), health.label()))
        .collect::<Vec<_>>()
        .join("  ")
    }
}

/// Tallies build statuses globally and per branch, in first-seen order.
pub fn summarize(builds: &[Build]) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for build in builds {
        *summary.statuses.entry(build.status.clone()).or_default() += 1;

        let branch = summary.branches.entry(build.branch.clone()).or_default();
        branch.total += 1;
        *branch.statuses.entry(build.status.clone()).or_default() += 1;
    }

    summary
}
