use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        StatsResponse, TaskDeletedResponse, TaskListResponse, TaskMutationResponse, TaskResponse,
    },
    repo::StoreError,
    validation::{validate_create, validate_list_query, validate_update, ListQuery},
};
use crate::{
    auth::AuthUser,
    error::{ApiError, FieldError},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e, "unreadable task query");
        ApiError::validation(
            "Invalid query parameters",
            vec![FieldError::new("query", e.body_text())],
        )
    })?;
    let filter = validate_list_query(&query).map_err(|details| {
        warn!(?details, "rejected task query");
        ApiError::validation("Invalid query parameters", details)
    })?;

    let tasks = state
        .tasks
        .list(&user.id, &filter)
        .await
        .map_err(|e| store_error(&state, e))?;

    Ok(Json(TaskListResponse {
        total: tasks.len(),
        tasks,
        filters: (&filter).into(),
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskMutationResponse>), ApiError> {
    let body = json_body(payload)?;
    let fields = validate_create(&body).map_err(|details| {
        warn!(?details, "rejected task payload");
        ApiError::validation("Invalid task data", details)
    })?;

    let task = state
        .tasks
        .create(&user.id, fields, &user.created_by_label())
        .await
        .map_err(|e| store_error(&state, e))?;

    info!(task_id = %task.id, "task created");
    Ok((
        StatusCode::CREATED,
        Json(TaskMutationResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn task_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state
        .tasks
        .stats(&user.id)
        .await
        .map_err(|e| store_error(&state, e))?;
    Ok(Json(StatsResponse { stats }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = task_id(&id)?;
    let task = state
        .tasks
        .get(id, &user.id)
        .await
        .map_err(|e| store_error(&state, e))?;
    Ok(Json(TaskResponse { task }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TaskMutationResponse>, ApiError> {
    let id = task_id(&id)?;
    let body = json_body(payload)?;
    let patch = validate_update(&body).map_err(|details| {
        warn!(?details, "rejected task update");
        ApiError::validation("Invalid task data", details)
    })?;

    let task = state
        .tasks
        .update(id, &user.id, patch)
        .await
        .map_err(|e| store_error(&state, e))?;

    info!(task_id = %task.id, "task updated");
    Ok(Json(TaskMutationResponse {
        message: "Task updated successfully",
        task,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TaskDeletedResponse>, ApiError> {
    let id = task_id(&id)?;
    let task_id = state
        .tasks
        .delete(id, &user.id)
        .await
        .map_err(|e| store_error(&state, e))?;

    info!(%task_id, "task deleted");
    Ok(Json(TaskDeletedResponse {
        message: "Task deleted successfully",
        task_id,
    }))
}

/// A path segment that isn't a UUID can't name any task.
fn task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Task not found"))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(e) => {
            warn!(error = %e, "unreadable task body");
            Err(ApiError::validation(
                "Invalid task data",
                vec![FieldError::new("body", e.body_text())],
            ))
        }
    }
}

fn store_error(state: &AppState, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found("Task not found"),
        StoreError::Backend(e) => {
            error!(error = %e, "task store failed");
            if state.config.environment.is_production() {
                ApiError::internal("An internal server error occurred")
            } else {
                ApiError::internal(e.to_string())
            }
        }
    }
}
