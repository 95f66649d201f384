//! Project CRUD endpoints.
//!
//! Thin field get/set/delete against the project record; no business logic
//! beyond presence checks and 404 on missing ids.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::store::{NewProject, Project, ProjectSummary, ProjectUpdate, StoreError};

use super::routes::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub project_id: String,
}

fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "project not found".to_string()),
        other => {
            tracing::error!("Project store failure: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "project store failure".to_string(),
            )
        }
    }
}

/// POST /api/projects - create a project.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewProject>,
) -> Result<Json<CreatedResponse>, (StatusCode, String)> {
    let project_id = state.store.create(req).await.map_err(store_error)?;
    Ok(Json(CreatedResponse { project_id }))
}

/// GET /api/projects/:id - fetch one project.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>, (StatusCode, String)> {
    let project = state.store.get(&id).await.map_err(store_error)?;
    Ok(Json(project))
}

/// GET /api/projects - list all projects.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectSummary>>, (StatusCode, String)> {
    let projects = state.store.list().await.map_err(store_error)?;
    Ok(Json(projects))
}

/// PUT /api/projects/:id - partial update, last writer wins.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProjectUpdate>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.store.update(&id, req).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/projects/:id - delete a project.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.store.delete(&id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}
