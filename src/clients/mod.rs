pub mod eagleview;
pub mod nrel;

use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use reqwest::{RequestBuilder, Response};

use crate::error::UpstreamError;
use crate::telemetry::UPSTREAM_REQUEST_DURATION;

pub use eagleview::{AccessToken, EagleViewClient, EagleViewCredentials, ImageView, ReportFile};
pub use nrel::NrelClient;

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("solar-report-portal/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Sends the request and rejects non-success statuses with the response body attached.
pub(crate) async fn send(
    service: &'static str,
    operation: &'static str,
    request: RequestBuilder,
) -> Result<Response, UpstreamError> {
    let start = Instant::now();
    let result = request.send().await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let outcome = match &result {
        Ok(resp) if resp.status().is_success() => "ok",
        Ok(_) => "error_status",
        Err(_) => "transport_error",
    };
    UPSTREAM_REQUEST_DURATION.record(
        elapsed_ms,
        &[
            KeyValue::new("upstream.service", service),
            KeyValue::new("upstream.operation", operation),
            KeyValue::new("upstream.outcome", outcome),
        ],
    );

    let response = result.map_err(|source| UpstreamError::Http { service, source })?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            upstream.service = service,
            upstream.operation = operation,
            status = status.as_u16(),
            "Upstream request rejected"
        );
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body: truncate(&body, 500),
        });
    }

    Ok(response)
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, UpstreamError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| UpstreamError::Http { service, source })?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
        service,
        message: e.to_string(),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}
