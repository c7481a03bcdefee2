//! Dashboard handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use shared::models::DashboardSummary;
use shared::validation::parse_granularity;

use crate::error::{AppError, AppResult};
use crate::handlers::reporting::{csv_response, wants_csv};
use crate::services::{PgReportStore, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub period: Option<String>, // "daily", "weekly", "monthly" or "yearly"
    pub format: Option<String>, // "json" or "csv"
}

fn service(state: &AppState) -> ReportingService<PgReportStore> {
    ReportingService::new(
        PgReportStore::new(state.db.clone()),
        state.config.reporting.clone(),
    )
}

/// Get dashboard summary
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let granularity = parse_granularity(query.period.as_deref())
        .map_err(|m| AppError::validation("period", m))?;

    Ok(Json(service(&state).dashboard_summary(granularity).await))
}

/// Get the cumulative user growth series
pub async fn get_user_growth(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
    let granularity = parse_granularity(query.period.as_deref())
        .map_err(|m| AppError::validation("period", m))?;

    let series = service(&state).user_growth(granularity).await;

    if wants_csv(query.format.as_deref()) {
        let csv = ReportingService::<PgReportStore>::export_to_csv(&series)?;
        Ok(csv_response(&format!("user_growth_{}.csv", granularity), csv))
    } else {
        Ok(Json(series).into_response())
    }
}
