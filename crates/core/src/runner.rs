//! Execution runner: runs a job's target as a subprocess bound to its
//! workspace directory.
//!
//! Two modes:
//! - whole-script: the script file runs as its own process with stdout and
//!   stderr redirected into a freshly named log file inside the workspace.
//! - function: a fixed loader program runs in the interpreter, imports the
//!   script as a module, calls the named top-level function with no
//!   arguments, and prints the JSON-encoded return value on stdout.
//!
//! No timeout, resource limit, or output cap is imposed; a runaway script
//! blocks its worker indefinitely.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::CoreError;
use crate::target::ExecutionTarget;
use crate::workspace::WorkspaceStore;

/// Exit code the loader program reserves for "named function not found",
/// so it can be told apart from an ordinary script failure.
const FUNCTION_NOT_FOUND_EXIT: i32 = 44;

/// How much of a failed script's log is carried into the job's error
/// message.
const ERROR_TAIL_BYTES: usize = 2048;

/// Loader program for function mode. Receives the script path and function
/// name as arguments, imports the script file as a module, and prints the
/// function's return value as JSON. This fixed program is the whole
/// code-loading surface for function jobs.
const FUNCTION_LOADER: &str = r#"
import importlib.util, json, sys

script, function = sys.argv[1], sys.argv[2]
spec = importlib.util.spec_from_file_location("workspace_script", script)
module = importlib.util.module_from_spec(spec)
spec.loader.exec_module(module)
fn = getattr(module, function, None)
if fn is None or not callable(fn):
    print("function %r not found" % function, file=sys.stderr)
    sys.exit(44)
print(json.dumps(fn()))
"#;

/// Result of a successful execution.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Whole-script mode: the name of the log file written into the
    /// workspace.
    LogFile(String),
    /// Function mode: the function's JSON-decoded return value.
    Value(serde_json::Value),
}

impl Outcome {
    /// JSON payload stored in the job's `result` column.
    pub fn into_result_json(self) -> serde_json::Value {
        match self {
            Self::LogFile(name) => serde_json::json!({ "log_file": name }),
            Self::Value(value) => value,
        }
    }
}

/// Spawns script and function executions for the worker.
pub struct Runner {
    python_bin: String,
}

impl Runner {
    pub fn new(python_bin: impl Into<String>) -> Self {
        Self {
            python_bin: python_bin.into(),
        }
    }

    /// Resolve the target's workspace and script, then execute it.
    ///
    /// Resolution happens here, at execution time: a workspace or script
    /// deleted after enqueue fails with the matching not-found error, which
    /// the worker records as a failed job.
    pub async fn run(
        &self,
        store: &WorkspaceStore,
        target: &ExecutionTarget,
    ) -> Result<Outcome, CoreError> {
        let workspace = target.workspace();
        if !store.exists(workspace).await {
            return Err(CoreError::WorkspaceNotFound(workspace.to_string()));
        }
        let dir = store.path_of(workspace)?;
        let script_path = store.file_path(workspace, target.script())?;
        if tokio::fs::metadata(&script_path).await.is_err() {
            return Err(CoreError::ScriptNotFound(target.script().to_string()));
        }

        match target {
            ExecutionTarget::Script { .. } => self.run_script(&dir, &script_path).await,
            ExecutionTarget::Function {
                script, function, ..
            } => self.run_function(&dir, &script_path, script, function).await,
        }
    }

    /// Whole-script mode: spawn the interpreter on the script with the
    /// workspace as working directory, both output streams redirected into
    /// a uniquely named log file in the workspace.
    async fn run_script(
        &self,
        dir: &std::path::Path,
        script_path: &std::path::Path,
    ) -> Result<Outcome, CoreError> {
        let log_name = format!("{}_output.log", uuid::Uuid::new_v4());
        let log_path = dir.join(&log_name);

        let log_file = tokio::fs::File::create(&log_path).await?.into_std().await;
        let log_file_err = log_file.try_clone()?;

        tracing::debug!(script = %script_path.display(), log = %log_name, "Spawning script");

        let status = Command::new(&self.python_bin)
            .arg(script_path)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(log_file_err))
            .kill_on_drop(true)
            .status()
            .await?;

        if !status.success() {
            let tail = read_tail(&log_path).await;
            return Err(CoreError::Execution {
                exit_code: status.code().unwrap_or(-1),
                stderr: tail,
            });
        }

        Ok(Outcome::LogFile(log_name))
    }

    /// Function mode: run the loader program in a fresh interpreter and
    /// parse the function's return value from its stdout.
    async fn run_function(
        &self,
        dir: &std::path::Path,
        script_path: &std::path::Path,
        script: &str,
        function: &str,
    ) -> Result<Outcome, CoreError> {
        let output = Command::new(&self.python_bin)
            .arg("-c")
            .arg(FUNCTION_LOADER)
            .arg(script_path)
            .arg(function)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code == FUNCTION_NOT_FOUND_EXIT {
            return Err(CoreError::FunctionNotFound {
                function: function.to_string(),
                script: script.to_string(),
            });
        }
        if !output.status.success() {
            return Err(CoreError::Execution {
                exit_code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        let value = serde_json::from_str(trimmed)
            .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string()));
        Ok(Outcome::Value(value))
    }
}

/// Last `ERROR_TAIL_BYTES` of a log file, for error messages. Best-effort;
/// an unreadable log yields an empty string.
async fn read_tail(path: &std::path::Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let start = bytes.len().saturating_sub(ERROR_TAIL_BYTES);
            String::from_utf8_lossy(&bytes[start..]).into_owned()
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, WorkspaceStore, Runner) {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::new(dir.path());
        let runner = Runner::new("python3");
        (dir, store, runner)
    }

    async fn workspace_with_script(store: &WorkspaceStore, script: &str, body: &str) {
        store.create("ws").await.unwrap();
        store.write_file("ws", script, body.as_bytes()).await.unwrap();
    }

    #[tokio::test]
    async fn script_mode_writes_log_file() {
        let (_dir, store, runner) = setup();
        workspace_with_script(&store, "hello.py", "print('ok')\n").await;
        let target = ExecutionTarget::from_parts("ws".into(), "hello.py".into(), None);

        let outcome = runner.run(&store, &target).await.unwrap();
        let Outcome::LogFile(log_name) = outcome else {
            panic!("expected log file outcome");
        };
        assert!(log_name.ends_with("_output.log"));

        let contents = tokio::fs::read_to_string(store.file_path("ws", &log_name).unwrap())
            .await
            .unwrap();
        assert_eq!(contents.trim(), "ok");
    }

    #[tokio::test]
    async fn script_runs_with_workspace_as_cwd() {
        let (_dir, store, runner) = setup();
        workspace_with_script(
            &store,
            "writer.py",
            "open('out.txt', 'w').write('ok')\n",
        )
        .await;
        let target = ExecutionTarget::from_parts("ws".into(), "writer.py".into(), None);

        runner.run(&store, &target).await.unwrap();

        let files = store.list_files("ws").await.unwrap();
        assert!(files.contains(&"out.txt".to_string()));
    }

    #[tokio::test]
    async fn failing_script_reports_exit_code() {
        let (_dir, store, runner) = setup();
        workspace_with_script(&store, "bad.py", "import sys\nsys.exit(3)\n").await;
        let target = ExecutionTarget::from_parts("ws".into(), "bad.py".into(), None);

        let err = runner.run(&store, &target).await.unwrap_err();
        assert!(matches!(err, CoreError::Execution { exit_code: 3, .. }));
    }

    #[tokio::test]
    async fn function_mode_returns_json_value() {
        let (_dir, store, runner) = setup();
        workspace_with_script(&store, "calc.py", "def f():\n    return 42\n").await;
        let target =
            ExecutionTarget::from_parts("ws".into(), "calc.py".into(), Some("f".into()));

        let outcome = runner.run(&store, &target).await.unwrap();
        let Outcome::Value(value) = outcome else {
            panic!("expected value outcome");
        };
        assert_eq!(value, serde_json::json!(42));
    }

    #[tokio::test]
    async fn missing_function_is_distinguished_from_failure() {
        let (_dir, store, runner) = setup();
        workspace_with_script(&store, "calc.py", "def f():\n    return 42\n").await;
        let target =
            ExecutionTarget::from_parts("ws".into(), "calc.py".into(), Some("nope".into()));

        let err = runner.run(&store, &target).await.unwrap_err();
        assert!(matches!(err, CoreError::FunctionNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_workspace_fails_resolution() {
        let (_dir, store, runner) = setup();
        let target = ExecutionTarget::from_parts("ghost".into(), "a.py".into(), None);
        let err = runner.run(&store, &target).await.unwrap_err();
        assert!(matches!(err, CoreError::WorkspaceNotFound(_)));
    }

    #[tokio::test]
    async fn missing_script_fails_resolution() {
        let (_dir, store, runner) = setup();
        store.create("ws").await.unwrap();
        let target = ExecutionTarget::from_parts("ws".into(), "ghost.py".into(), None);
        let err = runner.run(&store, &target).await.unwrap_err();
        assert!(matches!(err, CoreError::ScriptNotFound(_)));
    }

    #[test]
    fn outcome_json_shapes() {
        let log = Outcome::LogFile("abc_output.log".into()).into_result_json();
        assert_eq!(log, serde_json::json!({ "log_file": "abc_output.log" }));

        let value = Outcome::Value(serde_json::json!([1, 2])).into_result_json();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
