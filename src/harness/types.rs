//! Task outcomes and run summaries.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// Terminal record of one unit of concurrent work.
///
/// Finalized exactly once when its task completes, then immutable.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    /// Unique id derived from the task parameters and launch time.
    pub id: String,
    /// Whether the task reached its goal.
    pub passed: bool,
    /// The final payload: the remote result on success, the causing
    /// error on failure. Failures are never silently dropped.
    pub payload: Value,
    /// Wall time from task start to terminal state.
    #[serde(with = "duration_secs")]
    pub runtime: Duration,
    /// Workflow-specific extra measurements (e.g. confirmation time).
    pub metrics: HashMap<String, f64>,
}

/// Aggregate over a completed run. Derived on demand, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    #[serde(with = "duration_secs")]
    pub total_runtime: Duration,
    /// Mean per-task runtime; `None` for an empty run.
    #[serde(with = "opt_duration_secs")]
    pub mean_step_runtime: Option<Duration>,
}

impl RunSummary {
    /// Compute a summary over a finished outcome map.
    ///
    /// Tolerates empty and all-failed runs.
    pub fn from_results(results: &HashMap<String, TaskOutcome>, total_runtime: Duration) -> Self {
        let passed = results.values().filter(|o| o.passed).count();
        let failed = results.len() - passed;
        let mean_step_runtime = if results.is_empty() {
            None
        } else {
            let total: Duration = results.values().map(|o| o.runtime).sum();
            Some(total / results.len() as u32)
        };
        Self {
            passed,
            failed,
            total_runtime,
            mean_step_runtime,
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

mod opt_duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }
}
