// src/exec/mod.rs

//! Task execution layer.
//!
//! This module runs scheduled tasks through the [`crate::pipeline::Pipeline`]
//! on Tokio's blocking pool and reports back to the orchestration runtime via
//! `RuntimeEvent`s.
//!
//! - [`executor_loop`] owns the main executor loop which spawns task runs.
//! - [`task_runner`] handles a single task run.
//! - [`backend`] provides the `ExecutorBackend` trait and a concrete
//!   `RealExecutorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod executor_loop;
pub mod task_runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::spawn_executor;
