//! HTTP handler functions, grouped by resource.

pub mod execution;
pub mod files;
pub mod introspection;
pub mod queue;
pub mod workspace;
