use axum::{
    Json,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{
    api::app_state::AppState,
    dataset::export::{EXPORT_FILE_NAME, observations_to_csv},
    error::AppError,
    services::dashboard::views::TableView,
};

pub async fn get_dataset(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    debug!("Returning full sample dataset: {} rows", state.dataset.len());

    let table = TableView::from_rows(state.dataset.all().to_vec());

    Ok(Json(table))
}

pub async fn get_filtered(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Filtering dataset: start={:?}, end={:?}, year={:?}, month={:?}",
        params.start, params.end, params.year, params.month
    );

    let rows = match (params.start, params.end, params.year, params.month) {
        (Some(start), Some(end), None, None) => {
            state.dataset.filter_by_date_range(start, end)?
        }
        (None, None, Some(year), Some(month)) => state.dataset.filter_by_month(year, month),
        _ => {
            return Err(AppError::Validation(
                "Provide either start and end dates or year and month".to_string(),
            ));
        }
    };

    Ok(Json(TableView::from_rows(rows)))
}

pub async fn get_columns(
    State(state): State<AppState>,
    Query(params): Query<ColumnsParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Projecting dataset columns: fields={:?}", params.fields);

    let names: Vec<&str> = params
        .fields
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    let projection = state.dataset.select_columns(&names)?;

    Ok(Json(projection))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Exporting dataset as CSV: start={:?}, end={:?}",
        params.start, params.end
    );

    let rows = match (params.start, params.end) {
        (Some(start), Some(end)) => state.dataset.filter_by_date_range(start, end)?,
        (None, None) => state.dataset.all().to_vec(),
        _ => {
            return Err(AppError::Validation(
                "Provide both start and end dates, or neither".to_string(),
            ));
        }
    };

    let csv = observations_to_csv(&rows)?;
    state.metrics.record_export();

    let headers = [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ),
    ];

    Ok((headers, csv))
}

#[derive(Debug, Deserialize, Default)]
pub struct FilterParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnsParams {
    pub fields: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}
