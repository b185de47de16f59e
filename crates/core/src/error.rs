use crate::types::JobId;

/// Domain error taxonomy shared by the API layer and the worker.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Workspace '{0}' is not empty")]
    WorkspaceNotEmpty(String),

    #[error("File '{file}' not found in workspace '{workspace}'")]
    FileNotFound { workspace: String, file: String },

    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    #[error("Function '{function}' not found in script '{script}'")]
    FunctionNotFound { function: String, script: String },

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Execution failed with exit code {exit_code}: {stderr}")]
    Execution { exit_code: i32, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_workspace_not_found() {
        let err = CoreError::WorkspaceNotFound("alpha".to_string());
        assert_eq!(err.to_string(), "Workspace not found: alpha");
    }

    #[test]
    fn display_function_not_found() {
        let err = CoreError::FunctionNotFound {
            function: "f".to_string(),
            script: "job.py".to_string(),
        };
        assert_eq!(err.to_string(), "Function 'f' not found in script 'job.py'");
    }

    #[test]
    fn display_execution_failed() {
        let err = CoreError::Execution {
            exit_code: 3,
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Execution failed with exit code 3: boom"
        );
    }

    #[test]
    fn io_error_is_wrapped() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let err: CoreError = inner.into();
        assert!(err.to_string().contains("file gone"));
    }
}
