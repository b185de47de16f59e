//! Domain core for the runyard workspace execution service.
//!
//! Holds the pieces shared between the API server and the worker: the
//! error taxonomy, the directory-backed workspace store, execution targets,
//! and the subprocess execution runner. This crate has no dependency on the
//! database or HTTP layers.

pub mod error;
pub mod runner;
pub mod target;
pub mod types;
pub mod workspace;
