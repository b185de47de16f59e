//! Handlers for files within a workspace: view, create, upload.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use runyard_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Body for the create-file endpoint.
#[derive(Debug, Deserialize)]
pub struct FileContent {
    pub data: String,
}

/// GET /workspace/{name}/view/{file}
///
/// Stream the content of a file in a workspace.
pub async fn view_file(
    State(state): State<AppState>,
    Path((name, file)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    if !state.store.exists(&name).await {
        return Err(CoreError::WorkspaceNotFound(name).into());
    }
    let path = state.store.file_path(&name, &file)?;
    let handle = match tokio::fs::File::open(&path).await {
        Ok(handle) => handle,
        Err(_) => {
            return Err(CoreError::FileNotFound {
                workspace: name,
                file,
            }
            .into())
        }
    };

    let stream = ReaderStream::new(handle);
    let body = Body::from_stream(stream);
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    ))
}

/// POST /workspace/{name}/create/{file}
///
/// Create or update a file in a workspace from a literal string body.
pub async fn create_file(
    State(state): State<AppState>,
    Path((name, file)): Path<(String, String)>,
    Json(content): Json<FileContent>,
) -> AppResult<impl IntoResponse> {
    state
        .store
        .write_file(&name, &file, content.data.as_bytes())
        .await?;
    tracing::debug!(workspace = %name, file = %file, "File written");
    Ok(Json(MessageResponse::new(format!("File '{file}' created"))))
}

/// POST /workspace/{name}/upload
///
/// Upload a file into a workspace. The first multipart field carrying a
/// filename is stored; the stored name is the uploaded filename.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    if !state.store.exists(&name).await {
        return Err(CoreError::WorkspaceNotFound(name).into());
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        state.store.write_file(&name, &file_name, &bytes).await?;
        tracing::info!(workspace = %name, file = %file_name, size = bytes.len(), "File uploaded");
        return Ok(Json(MessageResponse::new(format!(
            "File '{file_name}' uploaded"
        ))));
    }

    Err(AppError::BadRequest(
        "Multipart body contains no file field".to_string(),
    ))
}
