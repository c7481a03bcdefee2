//! Reporting handlers for sales analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use shared::models::{CategoryShare, MetricSnapshot, SalesTrend};
use shared::render::export_filename;
use shared::types::{MonthFilter, TrendRange};
use shared::validation::{parse_month_filter, parse_trend_range, validate_export_password};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::export::{render_pdf, ReportExport};
use crate::services::reporting::ReportPayload;
use crate::services::{AuthService, PgReportStore, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub range: Option<String>,  // "daily", "monthly" or "yearly"
    pub month: Option<String>,  // "all" or 1-12, yearly only
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub password: String,
    pub range: Option<String>,
    pub month: Option<String>,
}

pub(crate) fn wants_csv(format: Option<&str>) -> bool {
    matches!(format, Some(f) if f.eq_ignore_ascii_case("csv"))
}

pub(crate) fn csv_response(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Parse range and month; the month only narrows the yearly range
fn parse_filters(range: Option<&str>, month: Option<&str>) -> AppResult<(TrendRange, MonthFilter)> {
    let range = parse_trend_range(range).map_err(|m| AppError::validation("range", m))?;
    let month = parse_month_filter(month).map_err(|m| AppError::validation("month", m))?;

    if range == TrendRange::Yearly {
        Ok((range, month))
    } else {
        Ok((range, MonthFilter::All))
    }
}

fn service(state: &AppState) -> ReportingService<PgReportStore> {
    ReportingService::new(
        PgReportStore::new(state.db.clone()),
        state.config.reporting.clone(),
    )
}

/// Get the full metric snapshot
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<MetricSnapshot>> {
    let (range, month) = parse_filters(query.range.as_deref(), query.month.as_deref())?;
    Ok(Json(service(&state).build_snapshot(range, month).await))
}

/// Get the rendered report cards with their snapshot
pub async fn get_report_view(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ReportPayload>> {
    let (range, month) = parse_filters(query.range.as_deref(), query.month.as_deref())?;
    Ok(Json(service(&state).report_view(range, month).await))
}

/// Get the sales trend
pub async fn get_sales_trend(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let (range, month) = parse_filters(query.range.as_deref(), query.month.as_deref())?;
    let trend: SalesTrend = service(&state).sales_trend(range, month).await;

    if wants_csv(query.format.as_deref()) {
        let csv = ReportingService::<PgReportStore>::export_to_csv(&trend.points)?;
        Ok(csv_response(&format!("sales_trend_{}.csv", range), csv))
    } else {
        Ok(Json(trend).into_response())
    }
}

/// Get the category distribution
pub async fn get_category_distribution(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let categories: Vec<CategoryShare> = service(&state).category_distribution().await;

    if wants_csv(query.format.as_deref()) {
        let csv = ReportingService::<PgReportStore>::export_to_csv(&categories)?;
        Ok(csv_response("category_distribution.csv", csv))
    } else {
        Ok(Json(categories).into_response())
    }
}

/// Export the report as PDF after re-checking the admin password
pub async fn export_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ExportRequest>,
) -> AppResult<Response> {
    validate_export_password(&body.password).map_err(|m| AppError::validation("password", m))?;
    let (range, month) = parse_filters(body.range.as_deref(), body.month.as_deref())?;

    let store = PgReportStore::new(state.db.clone());
    AuthService::new(store.clone(), &state.config)
        .verify_export_password(user.admin_id, &body.password)
        .await?;

    let settings = state.config.reporting.clone();
    let snapshot = ReportingService::new(store, settings.clone())
        .build_snapshot(range, month)
        .await;
    let generated_at = Utc::now().with_timezone(&settings.offset());

    let pdf = tokio::task::spawn_blocking(move || {
        let export = ReportExport {
            snapshot: &snapshot,
            range,
            month,
            generated_at,
        };
        render_pdf(&export, &settings)
    })
    .await
    .map_err(|e| AppError::ExportFailed(e.to_string()))??;

    let filename = export_filename(range, generated_at.date_naive());
    tracing::info!(admin_id = %user.admin_id, email = %user.email, %filename, bytes = pdf.len(), "Report exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_dropped_outside_yearly() {
        assert_eq!(
            parse_filters(Some("monthly"), Some("4")).unwrap(),
            (TrendRange::Monthly, MonthFilter::All)
        );
        assert_eq!(
            parse_filters(Some("yearly"), Some("4")).unwrap(),
            (TrendRange::Yearly, MonthFilter::Month(4))
        );
        assert_eq!(
            parse_filters(None, None).unwrap(),
            (TrendRange::Daily, MonthFilter::All)
        );
    }

    #[test]
    fn test_invalid_filters_name_the_field() {
        match parse_filters(Some("hourly"), None) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "range"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
        match parse_filters(Some("yearly"), Some("13")) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "month"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_wants_csv() {
        assert!(wants_csv(Some("csv")));
        assert!(wants_csv(Some("CSV")));
        assert!(!wants_csv(Some("json")));
        assert!(!wants_csv(None));
    }
}
