use super::{ApiError, ApiState};
use crate::browser::ListingEntry;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    folder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    success: bool,
    folder: String,
    items: Vec<ListingEntry>,
    files: Vec<ListingEntry>,
    folders: Vec<ListingEntry>,
    count: usize,
    truncated: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileQuery {
    object_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    success: bool,
    message: String,
}

/// List files and folders in a folder (or the root)
pub async fn list_files(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ListFilesResponse>, ApiError> {
    let folder = query.folder.unwrap_or_default();
    let listing = state
        .browser
        .list_folder(&folder)
        .await
        .map_err(ApiError::operation("Failed to list files"))?;

    let files = listing.files().cloned().collect();
    let folders = listing.folders().cloned().collect();

    Ok(Json(ListFilesResponse {
        success: true,
        folder: if folder.is_empty() {
            "root".to_string()
        } else {
            folder
        },
        count: listing.entries.len(),
        truncated: listing.truncated,
        items: listing.entries,
        files,
        folders,
    }))
}

pub async fn delete_file(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DeleteFileQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .browser
        .delete_file(query.object_name.as_deref().unwrap_or_default())
        .await
        .map_err(ApiError::operation("Failed to delete file"))?;

    Ok(Json(MessageResponse {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}
