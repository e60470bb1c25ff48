//! Prometheus metrics recorder and counter names
//!
//! Counters are recorded through the `metrics` facade; without an
//! installed recorder they are no-ops.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const LEADS_CAPTURED: &str = "leads_captured_total";
pub const WORKOUT_SESSIONS_COMPLETED: &str = "workout_sessions_completed_total";
pub const JOURNAL_ENTRIES_CREATED: &str = "journal_entries_created_total";

/// Install the global Prometheus recorder
///
/// Must be called at most once per process.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    metrics::describe_counter!(LEADS_CAPTURED, "Prelaunch signups stored");
    metrics::describe_counter!(WORKOUT_SESSIONS_COMPLETED, "Workout sessions completed");
    metrics::describe_counter!(JOURNAL_ENTRIES_CREATED, "Journal entries written");

    Ok(handle)
}
