//! Directory-backed workspace store.
//!
//! A workspace is a named flat directory under the configured base
//! directory. The store provides no concurrency control beyond filesystem
//! atomicity; concurrent writers to the same workspace must coordinate
//! out-of-band.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::CoreError;

/// Maximum length of a workspace or file name.
const MAX_NAME_LEN: usize = 128;

/// Validate a workspace or file name as a single path segment.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_NAME_LEN` characters.
/// - Must contain only alphanumeric, hyphen, underscore, or dot characters.
/// - Must not be `.` or `..`.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::InvalidName("name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::InvalidName(format!(
            "name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CoreError::InvalidName(
            "name may only contain alphanumeric, hyphen, underscore, or dot characters"
                .to_string(),
        ));
    }
    if name == "." || name == ".." {
        return Err(CoreError::InvalidName(format!(
            "'{name}' is not a valid name"
        )));
    }
    Ok(())
}

/// Directory-backed namespace for workspaces.
pub struct WorkspaceStore {
    base_dir: PathBuf,
}

impl WorkspaceStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the base directory if it does not exist yet. Called once at
    /// startup by each binary.
    pub async fn ensure_base_dir(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }

    /// Resolve the directory path of a workspace. Validates the name but
    /// does not touch the filesystem.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, CoreError> {
        validate_name(name)?;
        Ok(self.base_dir.join(name))
    }

    /// Resolve the path of a file within a workspace.
    pub fn file_path(&self, workspace: &str, file: &str) -> Result<PathBuf, CoreError> {
        let dir = self.path_of(workspace)?;
        validate_name(file)?;
        Ok(dir.join(file))
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.path_of(name) {
            Ok(path) => fs::metadata(&path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Create a workspace directory. Idempotent.
    pub async fn create(&self, name: &str) -> Result<(), CoreError> {
        let path = self.path_of(name)?;
        fs::create_dir_all(&path).await?;
        tracing::debug!(workspace = name, "Workspace created");
        Ok(())
    }

    /// Delete an empty workspace. Errors if the workspace is missing or
    /// still contains files (rmdir semantics).
    pub async fn delete(&self, name: &str) -> Result<(), CoreError> {
        let path = self.path_of(name)?;
        if !self.exists(name).await {
            return Err(CoreError::WorkspaceNotFound(name.to_string()));
        }
        match fs::remove_dir(&path).await {
            Ok(()) => {
                tracing::debug!(workspace = name, "Workspace deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::DirectoryNotEmpty => {
                Err(CoreError::WorkspaceNotEmpty(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List workspace names, sorted.
    pub async fn list(&self) -> Result<Vec<String>, CoreError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// List file names within a workspace, sorted.
    pub async fn list_files(&self, name: &str) -> Result<Vec<String>, CoreError> {
        if !self.exists(name).await {
            return Err(CoreError::WorkspaceNotFound(name.to_string()));
        }
        let path = self.path_of(name)?;
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Ok(file) = entry.file_name().into_string() {
                    files.push(file);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Create or overwrite a file in a workspace.
    pub async fn write_file(
        &self,
        workspace: &str,
        file: &str,
        contents: &[u8],
    ) -> Result<(), CoreError> {
        if !self.exists(workspace).await {
            return Err(CoreError::WorkspaceNotFound(workspace.to_string()));
        }
        let path = self.file_path(workspace, file)?;
        fs::write(&path, contents).await?;
        Ok(())
    }
}
