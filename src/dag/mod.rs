// src/dag/mod.rs

//! Build plans and scheduling.
//!
//! - [`plan`] lowers series/parallel recipes into a DAG of task steps.
//! - [`scheduler`] is the per-run state machine deciding which steps are
//!   ready and which are failed by an upstream failure.
//! - [`task_info`] holds run states and dispatch records.

pub mod plan;
pub mod scheduler;
pub mod scheduler_step;
pub mod task_info;

pub use plan::{Plan, Recipe};
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use task_info::{ScheduledTask, TaskRunState};
