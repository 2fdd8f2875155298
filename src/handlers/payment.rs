use std::sync::LazyLock;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use regex::Regex;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use super::pdf_attachment;
use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Customer, OrderRequest, PaymentCard, ReportKind},
    views::{self, Notice, PaymentPrefill},
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(rename = "Report Type")]
    pub report_type: String,
    pub cardnumber: String,
    pub expmonth: String,
    pub expyear: String,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl PaymentForm {
    fn prefill(&self) -> PaymentPrefill {
        PaymentPrefill {
            first_name: self.firstname.trim().to_string(),
            last_name: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            street: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
            report_type: normalize(&self.report_type),
        }
    }

    /// Customer fields are stored lowercased so duplicate addresses compare equal.
    pub fn into_order_request(self, today: Date) -> AppResult<OrderRequest> {
        let customer = Customer {
            first_name: normalize(&self.firstname),
            last_name: normalize(&self.lastname),
            email: normalize(&self.email),
            street: normalize(&self.address),
            city: normalize(&self.city),
            state: normalize(&self.state),
            zip: normalize(&self.zip),
        };

        let required = [
            ("First name", &customer.first_name),
            ("Last name", &customer.last_name),
            ("Email", &customer.email),
            ("Street address", &customer.street),
            ("City", &customer.city),
            ("State", &customer.state),
            ("Zip", &customer.zip),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(AppError::Validation(format!("{field} is required")));
        }

        if !EMAIL.is_match(&customer.email) {
            return Err(AppError::Validation("email address is not valid".into()));
        }

        if self.report_type.trim().is_empty() {
            return Err(AppError::Validation("choose a Basic or Advanced report".into()));
        }
        let report_kind: ReportKind = self.report_type.parse()?;
        let card = PaymentCard::parse(&self.cardnumber, &self.expmonth, &self.expyear, today)?;

        Ok(OrderRequest {
            customer,
            report_kind,
            card,
        })
    }
}

pub async fn payment_form() -> Html<String> {
    Html(views::payment_page(None, &PaymentPrefill::default()))
}

pub async fn submit_payment(
    State(state): State<AppState>,
    Form(form): Form<PaymentForm>,
) -> AppResult<Response> {
    let prefill = form.prefill();

    let request = match form.into_order_request(OffsetDateTime::now_utc().date()) {
        Ok(request) => request,
        Err(AppError::Validation(message)) => {
            tracing::info!(reason = %message, "Order form rejected");
            let notice = Notice::error(format!("Please check your details: {message}"));
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(views::payment_page(Some(&notice), &prefill)),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    };

    match state.order_service.place(request).await {
        Ok(placed) => Ok(pdf_attachment(
            &format!("Invoice{}.pdf", placed.order.report_id),
            placed.invoice_pdf,
        )),
        Err(AppError::Conflict(message)) => {
            let notice = Notice::info(format!("{message}. Enter its report number below."));
            Ok((StatusCode::CONFLICT, Html(views::lookup_page(Some(&notice)))).into_response())
        }
        Err(e) => Err(e),
    }
}
