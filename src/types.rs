use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the recent-build listing.
///
/// Retains the subset of the API's build record that the reports read;
/// everything else in the response is dropped during decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Build number, unique within the project
    pub build_num: u64,
    /// Final build status (e.g. "success", "failed", "fixed")
    pub status: String,
    /// Retry count reported by the API, absent on most builds
    #[serde(default)]
    pub retries: Option<u32>,
    /// Branch the build ran against; the failed-build projection never reads
    /// it, so an absent field decodes as empty rather than failing
    #[serde(default)]
    pub branch: String,
}

/// Full detail record for a single build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDetail {
    /// Build number, unique within the project
    pub build_num: u64,
    /// Branch the build ran against
    pub branch: String,
    /// Web URL of the build as reported by the API
    #[serde(default)]
    pub build_url: Option<String>,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A named phase within a build, containing one or more actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step name as shown in the CircleCI UI
    pub name: String,
    /// Actions in execution order
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// The smallest executable unit within a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Action name
    pub name: String,
    /// Final action status (e.g. "success", "failed", "canceled")
    pub status: String,
    /// Whether the action failed; the API reports null for non-terminal cases
    #[serde(default)]
    pub failed: Option<bool>,
    /// Whether the failure was caused by CI infrastructure
    #[serde(default)]
    pub infrastructure_fail: Option<bool>,
    /// URL of the action's captured output, when any was recorded
    #[serde(default)]
    pub output_url: Option<String>,
    /// When the action started
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

impl Action {
    /// Whether this action counts as the build's failure.
    ///
    /// Any non-"success" status counts as failing even when `failed` is
    /// unset, so canceled and infrastructure-failed actions match too.
    pub fn is_failing(&self) -> bool {
        self.failed.unwrap_or(false) || self.status != "success"
    }
}
