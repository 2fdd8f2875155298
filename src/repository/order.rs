use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use crate::models::{Customer, OrderRecord, ReportKind, ReportSummary};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a transaction holding a per-address advisory lock. Orders for the same
    /// address run one at a time until the transaction commits or rolls back.
    #[instrument(name = "db.order.lock_address", skip(self, customer))]
    pub async fn lock_address(
        &self,
        customer: &Customer,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(address_key(customer))
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    #[instrument(name = "db.order.insert", skip(self, conn, customer))]
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
        kind: ReportKind,
        order_id: i64,
        report_id: i64,
    ) -> Result<OrderRecord, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            INSERT INTO order_history
                (first_name, last_name, email, street, city, state, zipcode,
                 order_id, report_id, report_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, first_name, last_name, email, street, city, state, zipcode,
                      order_id, report_id, report_type, created_at
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.street)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip)
        .bind(order_id)
        .bind(report_id)
        .bind(kind.as_str())
        .fetch_one(conn)
        .await
    }

    #[instrument(name = "db.order.find_report_type", skip(self))]
    pub async fn find_report_type(&self, report_id: i64) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query("SELECT report_type FROM order_history WHERE report_id = $1")
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("report_type")))
    }

    #[instrument(name = "db.order.find_report_by_address", skip(self, conn, customer))]
    pub async fn find_report_by_address(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT report_id
            FROM order_history
            WHERE street = $1 AND city = $2 AND state = $3 AND zipcode = $4
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(&customer.street)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|r| r.get::<i64, _>("report_id")))
    }

    #[instrument(name = "db.order.find_summary", skip(self))]
    pub async fn find_summary(&self, report_id: i64) -> Result<Option<ReportSummary>, sqlx::Error> {
        sqlx::query_as::<_, ReportSummary>(
            r#"
            SELECT
                o.report_id, o.street, o.city, o.state, o.zipcode,
                s.azimuth, s.tilt, s.solrad_annual, s.ac_annual
            FROM order_history o
            LEFT JOIN solar_estimates s
                ON s.street = o.street
               AND s.city = o.city
               AND s.state = o.state
               AND s.zipcode = o.zipcode
            WHERE o.report_id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await
    }
}

fn address_key(customer: &Customer) -> String {
    [
        customer.street.as_str(),
        customer.city.as_str(),
        customer.state.as_str(),
        customer.zip.as_str(),
    ]
    .join("\u{1f}")
}
