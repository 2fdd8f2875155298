//! Fixtures shared by the repository, service and router tests.

use serde_json::json;
use sqlx::PgPool;
use time::macros::date;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::clients::{EagleViewClient, EagleViewCredentials, NrelClient};
use crate::models::{Customer, OrderRecord, OrderRequest, PaymentCard, ReportKind};
use crate::repository::OrderRepository;

pub fn customer() -> Customer {
    Customer {
        first_name: "ada".into(),
        last_name: "lovelace".into(),
        email: "ada@example.com".into(),
        street: "85 n raymond ave".into(),
        city: "pasadena".into(),
        state: "ca".into(),
        zip: "91103".into(),
    }
}

pub fn order_request(kind: ReportKind) -> OrderRequest {
    OrderRequest {
        customer: customer(),
        report_kind: kind,
        card: PaymentCard::parse("4111 1111 1111 1111", "12", "2030", date!(2026 - 10 - 19))
            .unwrap(),
    }
}

pub fn eagleview(server: &MockServer) -> EagleViewClient {
    EagleViewClient::new(
        reqwest::Client::new(),
        &server.uri(),
        &server.uri(),
        EagleViewCredentials {
            source_id: "source-id".into(),
            client_secret: "secret".into(),
            username: "ops@example.com".into(),
            password: "hunter2".into(),
        },
    )
}

pub fn nrel(server: &MockServer) -> NrelClient {
    NrelClient::new(reqwest::Client::new(), &server.uri(), "key")
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/Token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

pub async fn mount_pvwatts(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/pvwatts/v6.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "warnings": [],
            "station_info": { "lat": 34.15, "lon": -118.14 },
            "outputs": { "ac_annual": 117.6, "solrad_annual": 6.15 }
        })))
        .mount(server)
        .await;
}

/// Records an order directly, as if it had been placed earlier.
pub async fn insert_order(
    pool: &PgPool,
    customer: &Customer,
    kind: ReportKind,
    report_id: i64,
) -> OrderRecord {
    let mut conn = pool.acquire().await.unwrap();
    OrderRepository::new(pool.clone())
        .insert(&mut conn, customer, kind, report_id + 1000, report_id)
        .await
        .unwrap()
}
