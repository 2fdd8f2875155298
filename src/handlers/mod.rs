mod health;
mod lookup;
mod payment;
mod report;

pub use health::health_check;
pub use lookup::{index, lookup_form, lookup_report};
pub use payment::{payment_form, submit_payment};
pub use report::{download_report, report_display, report_status};

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};

fn pdf_attachment(filename: &str, body: impl Into<Body>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body.into(),
    )
        .into_response()
}
