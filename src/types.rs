use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Behaviour when a watch trigger arrives for a task that is already part of
/// the active run.
///
/// - `Overlap`: dispatch another invocation right away, even if the previous
///   one is still writing (default; every change event gets its own run).
/// - `Queue`: remember the trigger and start a new run when the current one
///   finishes.
/// - `Cancel`: drop any previously queued run and only keep the latest
///   trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Overlap,
    Queue,
    Cancel,
}

impl FromStr for TriggerWhileRunningBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overlap" => Ok(TriggerWhileRunningBehaviour::Overlap),
            "queue" => Ok(TriggerWhileRunningBehaviour::Queue),
            "cancel" => Ok(TriggerWhileRunningBehaviour::Cancel),
            other => Err(format!(
                "invalid triggered_while_running_behaviour: {other} (expected \"overlap\", \"queue\" or \"cancel\")"
            )),
        }
    }
}

/// Which flavour of the stylesheet chain to run.
///
/// `Prod` adds prefixing, purging and minification on top of `Dev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildProfile {
    Prod,
    Dev,
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProfile::Prod => f.write_str("prod"),
            BuildProfile::Dev => f.write_str("dev"),
        }
    }
}
