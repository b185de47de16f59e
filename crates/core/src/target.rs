//! Execution targets: what a job runs.

use serde::{Deserialize, Serialize};

/// The unit of work referenced by a job: either a whole script, or one
/// named top-level function from a script. The workspace is referenced by
/// name only; resolution to a directory happens at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionTarget {
    /// Run the entire script file as a subprocess. Stdout and stderr go to
    /// a log file written into the workspace.
    Script { workspace: String, script: String },
    /// Call one named top-level function from the script with no arguments.
    /// The function's JSON-encoded return value becomes the job result.
    Function {
        workspace: String,
        script: String,
        function: String,
    },
}

impl ExecutionTarget {
    pub fn from_parts(workspace: String, script: String, function: Option<String>) -> Self {
        match function {
            Some(function) => Self::Function {
                workspace,
                script,
                function,
            },
            None => Self::Script { workspace, script },
        }
    }

    pub fn workspace(&self) -> &str {
        match self {
            Self::Script { workspace, .. } | Self::Function { workspace, .. } => workspace,
        }
    }

    pub fn script(&self) -> &str {
        match self {
            Self::Script { script, .. } | Self::Function { script, .. } => script,
        }
    }

    pub fn function(&self) -> Option<&str> {
        match self {
            Self::Script { .. } => None,
            Self::Function { function, .. } => Some(function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_without_function_is_script_mode() {
        let target = ExecutionTarget::from_parts("ws".into(), "job.py".into(), None);
        assert_eq!(target.workspace(), "ws");
        assert_eq!(target.script(), "job.py");
        assert_eq!(target.function(), None);
    }

    #[test]
    fn from_parts_with_function_is_function_mode() {
        let target =
            ExecutionTarget::from_parts("ws".into(), "job.py".into(), Some("f".into()));
        assert_eq!(target.function(), Some("f"));
    }
}
