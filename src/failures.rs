use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::client::CircleClient;
use crate::error::{CircleStatsError, Result};
use crate::links;
use crate::output;
use crate::types::BuildDetail;

/// Failure details per failed build, keyed by build number in fetch order
/// (most recent first, as returned by the API).
pub type BuildFailures = IndexMap<u64, FailureInfo>;

/// The first failing action of a failed build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Step the failing action belongs to
    pub step_name: String,
    /// Name of the failing action
    pub action_name: String,
    /// Web URL of the build
    pub link: String,
    /// When the failing action started
    pub start_time: Option<DateTime<Utc>>,
    /// Status of the failing action
    pub status: String,
    /// Whether the failure was caused by CI infrastructure
    pub infrastructure_fail: Option<bool>,
    /// URL of the action's captured output
    pub output: Option<String>,
    /// Branch the build ran against
    pub branch: String,
}

/// Failures bucketed under one step/action combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureGroup {
    /// Number of failures in this bucket
    pub count: usize,
    /// Build links in encounter order
    pub builds: Vec<String>,
}

/// Finds the first failing action of a build, in step-then-action order.
///
/// Iteration stops at the first action where `failed` is set or the status is
/// anything but "success" (first match, not best match). The record combines
/// the action's fields with the step name, the build's web URL and its
/// branch.
///
/// # Errors
///
/// Returns [`CircleStatsError::NoFailingAction`] when no action matches, i.e.
/// a build the API flags as failed looks fully successful; the error carries
/// the step list so the caller can echo it for diagnostics.
pub fn extract_failure(detail: &BuildDetail, project: &str) -> Result<FailureInfo> {
    for step in &detail.steps {
        for action in &step.actions {
            if action.is_failing() {
                let link = detail
                    .build_url
                    .clone()
                    .unwrap_or_else(|| links::build_url(project, detail.build_num));

                return Ok(FailureInfo {
                    step_name: step.name.clone(),
                    action_name: action.name.clone(),
                    link,
                    start_time: action.start_time,
                    status: action.status.clone(),
                    infrastructure_fail: action.infrastructure_fail,
                    output: action.output_url.clone(),
                    branch: detail.branch.clone(),
                });
            }
        }
    }

    Err(CircleStatsError::NoFailingAction {
        build_num: detail.build_num,
        steps: serde_json::to_value(&detail.steps)?,
    })
}

/// Fetches the most recent failed builds and the failure details of each.
///
/// One detail request per build, issued sequentially; a stderr progress bar
/// tracks the loop. Results keep fetch order.
pub async fn collect_failures(client: &CircleClient, limit: usize) -> Result<BuildFailures> {
    let builds = client.failed_builds(limit).await?;
    info!("Fetched {} failed builds", builds.len());

    let progress = output::detail_progress(builds.len() as u64);
    let mut failures = BuildFailures::new();
    for build in &builds {
        debug!("Fetching failure details for build {}", build.build_num);
        let detail = client.build_detail(build.build_num).await?;
        failures.insert(build.build_num, extract_failure(&detail, client.project())?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(failures)
}

/// Failures whose action name contains `name` case-insensitively, in the
/// order they appear in `failures`.
pub fn filter_by_action(failures: &BuildFailures, name: &str) -> BuildFailures {
    let needle = name.to_lowercase();

    failures
        .iter()
        .filter(|(_, info)| info.action_name.to_lowercase().contains(&needle))
        .map(|(build_num, info)| (*build_num, info.clone()))
        .collect()
}

/// Groups failures by `"{step_name}/{action_name}"`, counting occurrences
/// and collecting build links in encounter order.
pub fn aggregate(failures: &BuildFailures) -> IndexMap<String, FailureGroup> {
    let mut groups: IndexMap<String, FailureGroup> = IndexMap::new();

    for info in failures.values() {
        let key = format!("{}/{}", info.step_name, info.action_name);
        let group = groups.entry(key).or_default();
        group.count += 1;
        group.builds.push(info.link.clone());
    }

    groups
}

/// Groups sorted by count descending. The sort is stable, so groups with
/// equal counts keep their aggregation order.
pub fn rank_by_count(groups: IndexMap<String, FailureGroup>) -> Vec<(String, FailureGroup)> {
    groups
        .sorted_by(|_, a, _, b| b.count.cmp(&a.count))
        .collect()
}
