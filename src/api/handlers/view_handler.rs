use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{
    api::app_state::AppState,
    error::AppError,
    models::observation::MeasurementField,
    services::dashboard::{Command, NavigationTab},
};

pub async fn chatbot_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Rendering chatbot view for session {}", id);

    let command = Command::Navigate {
        tab: NavigationTab::Chatbot,
    };
    let view = state.dashboard_service.handle(&id, command).await?;

    Ok(Json(view))
}

pub async fn explore_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ExploreParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Rendering explore view for session {}: start={:?}, end={:?}, parameter={:?}",
        id, params.start, params.end, params.parameter
    );

    let command = Command::Explore {
        start: params.start,
        end: params.end,
        parameter: params.parameter,
    };
    let view = state.dashboard_service.handle(&id, command).await?;

    Ok(Json(view))
}

pub async fn visualizations_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Rendering visualizations view for session {}", id);

    let command = Command::Navigate {
        tab: NavigationTab::Visualizations,
    };
    let view = state.dashboard_service.handle(&id, command).await?;

    Ok(Json(view))
}

pub async fn history_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Rendering history view for session {}", id);

    let command = Command::Navigate {
        tab: NavigationTab::QueryHistory,
    };
    let view = state.dashboard_service.handle(&id, command).await?;

    Ok(Json(view))
}

#[derive(Debug, Deserialize, Default)]
pub struct ExploreParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub parameter: Option<MeasurementField>,
}
