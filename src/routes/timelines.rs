use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateTimelineRequest, CreateTimelineResponse, TimelineWithFiles};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/timelines",
    request_body = CreateTimelineRequest,
    responses(
        (status = 201, description = "Timeline created with its files", body = CreateTimelineResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Timelines"
)]
pub async fn create_timeline(
    State(state): State<AppState>,
    Json(payload): Json<CreateTimelineRequest>,
) -> Result<(StatusCode, Json<CreateTimelineResponse>), AppError> {
    let timeline_id = state.timelines.create_timeline(payload).await?;
    Ok((StatusCode::CREATED, Json(CreateTimelineResponse { timeline_id })))
}

#[utoipa::path(
    get,
    path = "/timelines",
    responses(
        (status = 200, description = "All timelines, newest first", body = [TimelineWithFiles]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Timelines"
)]
pub async fn list_timelines(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimelineWithFiles>>, AppError> {
    Ok(Json(state.timelines.list_timelines().await?))
}

#[utoipa::path(
    get,
    path = "/timelines/{id}",
    params(
        ("id" = Uuid, Path, description = "Timeline ID")
    ),
    responses(
        (status = 200, description = "Timeline with its files", body = TimelineWithFiles),
        (status = 404, description = "Timeline not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Timelines"
)]
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimelineWithFiles>, AppError> {
    Ok(Json(state.timelines.get_timeline(id).await?))
}
