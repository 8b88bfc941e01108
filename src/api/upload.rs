use super::{ApiError, ApiState};
use crate::browser::{UploadReport, UploadRequest};
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    success: bool,
    message: String,
    #[serde(flatten)]
    report: UploadReport,
}

/// Upload a file from a multipart form
pub async fn upload_file(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut request = UploadRequest::default();
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                request.original_name = field.file_name().map(str::to_string);
                request.content_type = field.content_type().map(str::to_string);
                request.body = field.bytes().await?;
                has_file = true;
            }
            "folder" => request.folder = Some(field.text().await?),
            "fileName" => request.file_name = Some(field.text().await?),
            _ => {}
        }
    }

    if !has_file {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    }

    let report = state
        .browser
        .upload(request)
        .await
        .map_err(ApiError::operation("Failed to upload file"))?;

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        report,
    }))
}
