//! Handlers for the generation endpoints.
//!
//! Generation services never fail: they return typed fallback values, so
//! every handler here serializes a well-formed success response. The only
//! client errors are malformed `task_info` documents and unparsable
//! durations, which are genuinely caller-caused.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::services::chat::ChatContext;

use super::routes::AppState;
use super::types::*;

/// POST /api/question - clarifying questions for a raw idea.
pub async fn question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Json<QuestionResponse> {
    let questions = state
        .services
        .question
        .generate(&req.idea, &req.duration, req.num_people)
        .await;
    Json(QuestionResponse { questions })
}

/// POST /api/summary - markdown specification from answered questions.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummaryRequest>,
) -> Json<SummaryResponse> {
    let summary = state.services.summary.generate(&req.answers).await;
    Json(SummaryResponse { summary })
}

/// POST /api/framework - ranked framework candidates.
pub async fn framework(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FrameworkRequest>,
) -> Json<FrameworkResponse> {
    Json(state.services.framework.generate(&req.specification).await)
}

/// POST /api/directory - directory layout for the chosen framework.
pub async fn directory(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DirectoryRequest>,
) -> Json<DirectoryResponse> {
    let directory_structure = state
        .services
        .directory
        .generate(&req.specification, &req.framework)
        .await;
    Json(DirectoryResponse {
        directory_structure,
    })
}

/// POST /api/tasks - flat task breakdown.
pub async fn tasks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TasksRequest>,
) -> Json<TasksResponse> {
    let tasks = state
        .services
        .tasks
        .generate(&req.specification, &req.directory, &req.framework)
        .await;
    Json(TasksResponse { tasks })
}

/// POST /api/taskDetail - batched hands-on detail for every task.
pub async fn task_detail(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskDetailRequest>,
) -> Json<TaskDetailResponse> {
    let tasks = state
        .services
        .task_detail
        .generate_details(&req.tasks, &req.specification)
        .await;
    Json(TaskDetailResponse { tasks })
}

/// POST /api/graphTask - dependency edges from stored task documents.
pub async fn graph_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphTaskRequest>,
) -> Result<Json<GraphTaskResponse>, (StatusCode, String)> {
    let tasks = decode_task_info(&req.task_info).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let edges = state.services.graph.generate(&tasks).await;
    Ok(Json(GraphTaskResponse { edges }))
}

/// POST /api/durationTask - per-task schedule within the project length.
pub async fn duration_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DurationTaskRequest>,
) -> Result<Json<DurationTaskResponse>, (StatusCode, String)> {
    let total_days = parse_total_days(&req.duration).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let tasks = decode_task_info(&req.task_info).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let durations = state.services.duration.generate(total_days, &tasks).await;
    Ok(Json(DurationTaskResponse { durations }))
}

/// POST /api/environment - four-part environment setup hands-on.
pub async fn environment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnvironmentRequest>,
) -> Json<EnvironmentResponse> {
    Json(
        state
            .services
            .environment
            .generate(&req.specification, &req.directory, &req.framework)
            .await,
    )
}

/// POST /api/deploy - deploy service recommendation.
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeployRequest>,
) -> Json<DeployResponse> {
    let deploy = state
        .services
        .deploy
        .generate(&req.specification, &req.framework)
        .await;
    Json(DeployResponse { deploy })
}

/// POST /api/taskChat - one chat turn grounded in the current task.
pub async fn task_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskChatRequest>,
) -> Json<TaskChatResponse> {
    let response = state
        .services
        .chat
        .generate(ChatContext {
            specification: &req.specification,
            directory_structure: &req.directory_structure,
            chat_history: &req.chat_history,
            user_question: &req.user_question,
            framework: &req.framework,
            task_detail: &req.task_detail,
        })
        .await;
    Json(TaskChatResponse { response })
}

/// POST /api/handson - hands-on guide for a single task.
pub async fn handson(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HandsonRequest>,
) -> Json<HandsonResponse> {
    let handson = state
        .services
        .handson
        .generate(
            &req.specification,
            &req.task_title,
            &req.priority,
            &req.task_specification,
        )
        .await;
    Json(HandsonResponse { handson })
}
