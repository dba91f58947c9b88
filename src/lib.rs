//! tq-rerun - resubmit failed task-queue jobs
//!
//! tq-rerun takes the failed jobs of a batch, works out which RabbitMQ broker
//! each one was originally sent to, optionally appends operator-supplied
//! arguments to the stored request, and hands each request to the task-queue
//! submission program again.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (rerun, list)
//! - **core**: Host resolution, request augmentation, submission, batch driver
//! - **models**: Data structures (config, environment, job records)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{FailureKind, RerunError, Result};
