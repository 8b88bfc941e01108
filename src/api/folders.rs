use super::{ApiError, ApiState};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ListFoldersResponse {
    success: bool,
    folders: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderQuery {
    folder_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderResponse {
    success: bool,
    message: String,
    deleted_count: usize,
}

pub async fn list_folders(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListFoldersResponse>, ApiError> {
    let folders = state
        .browser
        .list_root_folders()
        .await
        .map_err(ApiError::operation("Failed to list folders"))?;

    Ok(Json(ListFoldersResponse {
        success: true,
        folders,
    }))
}

/// Delete a folder (every object under its prefix)
pub async fn delete_folder(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DeleteFolderQuery>,
) -> Result<Json<DeleteFolderResponse>, ApiError> {
    let report = state
        .browser
        .delete_folder_with_cancel(
            query.folder_path.as_deref().unwrap_or_default(),
            &state.shutdown.child_token(),
        )
        .await
        .map_err(ApiError::operation("Failed to delete folder"))?;

    Ok(Json(DeleteFolderResponse {
        success: true,
        message: format!(
            "Folder deleted successfully. {} file(s) removed.",
            report.deleted_count
        ),
        deleted_count: report.deleted_count,
    }))
}
