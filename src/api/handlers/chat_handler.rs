use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
    services::dashboard::Command,
};

pub async fn submit_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitQueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Submitting query to session {}: {:?}", id, request.text);

    let command = Command::SubmitQuery {
        role: request.role.unwrap_or_default(),
        text: request.text,
    };

    let view = state.dashboard_service.handle(&id, command).await?;
    state.metrics.record_query();
    state.metrics.record_messages(2);

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn submit_quick_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QuickQueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Quick query for session {}: {:?}", id, request.topic);

    let command = Command::QuickQuery {
        topic: request.topic,
    };

    let view = state.dashboard_service.handle(&id, command).await?;
    state.metrics.record_quick_query();
    state.metrics.record_messages(1);

    Ok((StatusCode::CREATED, Json(view)))
}
