use std::sync::Arc;

use bytes::Bytes;
use opentelemetry::KeyValue;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    clients::{EagleViewClient, NrelClient},
    error::{AppError, AppResult},
    invoice::Invoice,
    models::{Customer, OrderRecord, OrderRequest},
    repository::{OrderRepository, SolarRepository},
    telemetry::{
        INVOICES_GENERATED, ORDERS_DUPLICATE, ORDERS_PLACED, SOLAR_ESTIMATES_FAILED,
        SOLAR_ESTIMATES_STORED,
    },
};

#[derive(Debug)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub invoice_pdf: Vec<u8>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    solar: SolarRepository,
    eagleview: Arc<EagleViewClient>,
    nrel: Arc<NrelClient>,
    invoice_logo: Option<Bytes>,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        solar: SolarRepository,
        eagleview: Arc<EagleViewClient>,
        nrel: Arc<NrelClient>,
        invoice_logo: Option<Bytes>,
    ) -> Self {
        Self {
            orders,
            solar,
            eagleview,
            nrel,
            invoice_logo,
        }
    }

    #[instrument(
        name = "order.place",
        skip(self, request),
        fields(
            report.kind = %request.report_kind,
            card.last_four = %request.card.last_four(),
            report.id
        )
    )]
    pub async fn place(&self, request: OrderRequest) -> AppResult<PlacedOrder> {
        // Held until the order is recorded, so a concurrent request for the same
        // address sees it and is refused.
        let mut tx = self.orders.lock_address(&request.customer).await?;

        if let Some(existing) = self
            .orders
            .find_report_by_address(&mut tx, &request.customer)
            .await?
        {
            ORDERS_DUPLICATE.add(1, &[]);
            tracing::info!(report_id = existing, "Address already has a report");
            return Err(AppError::Conflict(format!(
                "A report (#{existing}) has already been ordered for this address"
            )));
        }

        let token = self.eagleview.access_token().await?;
        let stats = self.eagleview.place_order(&token, &request).await?;
        let report_id = stats.primary_report_id()?;
        tracing::Span::current().record("report.id", report_id);

        let order = self
            .record(tx, &request, stats.order_id, report_id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    order_id = stats.order_id,
                    report_id,
                    error = %e,
                    "Order accepted by EagleView but not recorded"
                );
            })?;

        ORDERS_PLACED.add(
            1,
            &[KeyValue::new("report.kind", request.report_kind.as_str())],
        );

        self.store_solar_estimate(&request.customer).await;

        let invoice = Invoice::for_order(
            &request.customer,
            request.report_kind,
            report_id,
            OffsetDateTime::now_utc().date(),
        );
        let invoice_pdf = invoice
            .to_pdf(self.invoice_logo.as_deref())
            .inspect_err(|e| {
                tracing::error!(report_id, error = %e, "Order placed but invoice not rendered");
            })?;
        INVOICES_GENERATED.add(1, &[]);

        tracing::info!(order_id = order.order_id, report_id, "Order placed");

        Ok(PlacedOrder { order, invoice_pdf })
    }

    async fn record(
        &self,
        mut tx: Transaction<'static, Postgres>,
        request: &OrderRequest,
        order_id: i64,
        report_id: i64,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = self
            .orders
            .insert(&mut tx, &request.customer, request.report_kind, order_id, report_id)
            .await?;
        tx.commit().await?;
        Ok(order)
    }

    /// PVWatts enrichment is best effort: the order already stands.
    async fn store_solar_estimate(&self, customer: &Customer) {
        let estimate = match self.nrel.pvwatts(&customer.address_line()).await {
            Ok(estimate) => estimate,
            Err(e) => {
                SOLAR_ESTIMATES_FAILED.add(1, &[KeyValue::new("stage", "lookup")]);
                tracing::warn!(error = %e, "PVWatts lookup failed");
                return;
            }
        };

        match self.solar.upsert(customer, &estimate).await {
            Ok(()) => SOLAR_ESTIMATES_STORED.add(1, &[]),
            Err(e) => {
                SOLAR_ESTIMATES_FAILED.add(1, &[KeyValue::new("stage", "store")]);
                tracing::warn!(error = %e, "Failed to store PVWatts estimate");
            }
        }
    }
}
