use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::wizard::mime_for;

#[derive(Debug, Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub mime_type: String,
}

#[utoipa::path(
    post,
    path = "/uploads",
    tag = "File Upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = FileUploadResponse),
        (status = 400, description = "Bad Request"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Object storage unavailable")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileUploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .or_else(|| mime_for(&file_name).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Failed to read file bytes".to_string()))?;

        if data.len() > state.upload_max_bytes {
            tracing::info!(file = %file_name, size = data.len(), "upload rejected: too large");
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                state.upload_max_bytes
            )));
        }

        let size = data.len() as i64;
        let stored = state.storage.upload(&file_name, &mime_type, data).await?;

        tracing::info!(file = %file_name, key = %stored.key, size, "file uploaded");
        return Ok(Json(FileUploadResponse {
            file_name,
            url: stored.url,
            size,
            mime_type,
        }));
    }

    Err(AppError::BadRequest("No file field found".to_string()))
}
