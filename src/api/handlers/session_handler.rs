use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::session_dto::*},
    error::AppError,
    services::session::{Pagination, SessionQuery},
};

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating session with role {:?}", request.role);

    let session = state.session_service.create(request.role).await?;
    state.metrics.record_session(1);

    let response = CreateSessionResponse {
        id: session.id,
        role: session.role,
        created_at: session.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListSessionsParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(20);
    debug!("Listing sessions: page={}, page_size={}", page, page_size);

    let query = SessionQuery {
        pagination: Pagination::new(page, page_size),
    };
    let sessions = state.session_service.list(query).await?;
    let total = state.session_service.count().await? as usize;

    Ok(Json(SessionListResponse {
        sessions: sessions.into_iter().map(SessionResponse::from).collect(),
        total,
        page,
        page_size,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Fetching session {}", id);

    let session = state
        .session_service
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting session {}", id);

    state.session_service.delete(&id).await?;
    state.metrics.record_session(-1);

    Ok(Json(DeleteSessionResponse {
        id,
        message: "Session deleted".to_string(),
    }))
}

#[derive(Debug, Deserialize, Default)]
pub struct ListSessionsParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}
