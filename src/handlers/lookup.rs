use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use super::pdf_attachment;
use crate::{
    AppState,
    error::AppResult,
    middleware::remember_report,
    services::LookupOutcome,
    views::{self, Notice},
};

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    /// Report number.
    #[serde(default)]
    pub address: String,
}

pub async fn index() -> Redirect {
    Redirect::to("/formpage")
}

pub async fn lookup_form() -> Html<String> {
    Html(views::lookup_page(None))
}

pub async fn lookup_report(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LookupForm>,
) -> AppResult<Response> {
    let Some(report_id) = parse_report_id(&form.address) else {
        let notice = Notice::error("Report number must be a positive whole number");
        return Ok((StatusCode::BAD_REQUEST, Html(views::lookup_page(Some(&notice)))).into_response());
    };

    let response = match state.report_service.lookup(report_id).await? {
        LookupOutcome::BasicDocument(pdf) => {
            pdf_attachment(&format!("BasicReport{report_id}.pdf"), pdf)
        }
        LookupOutcome::AdvancedReady => {
            (remember_report(jar, report_id), Redirect::to("/reportDisplay")).into_response()
        }
        LookupOutcome::NotReady => {
            let notice = Notice::info(format!(
                "Report {report_id} is still being prepared. Please check back later."
            ));
            Html(views::lookup_page(Some(&notice))).into_response()
        }
        LookupOutcome::Unknown => {
            let notice = Notice::error(format!("No report was found with number {report_id}"));
            (StatusCode::NOT_FOUND, Html(views::lookup_page(Some(&notice)))).into_response()
        }
    };

    Ok(response)
}

fn parse_report_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
