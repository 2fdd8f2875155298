use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::Value;

use super::pdf_attachment;
use crate::{
    AppState,
    error::{AppError, AppResult},
    middleware::ReportSession,
    views,
};

pub async fn report_display(
    State(state): State<AppState>,
    ReportSession(session): ReportSession,
) -> AppResult<Response> {
    let Some(report_id) = session else {
        return Ok(Redirect::to("/formpage").into_response());
    };

    let results = state.report_service.results(report_id).await?;
    Ok(Html(views::report_page(&results)).into_response())
}

pub async fn download_report(
    State(state): State<AppState>,
    ReportSession(session): ReportSession,
) -> AppResult<Response> {
    let Some(report_id) = session else {
        return Ok(Redirect::to("/formpage").into_response());
    };

    let document = state.report_service.report_document(report_id).await?;
    Ok(pdf_attachment(&format!("AdvancedReport{report_id}.pdf"), document))
}

pub async fn report_status(
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if report_id <= 0 {
        return Err(AppError::Validation("report id must be positive".into()));
    }
    let status = state.report_service.status(report_id).await?;
    Ok(Json(status))
}
