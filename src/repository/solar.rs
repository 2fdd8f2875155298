use sqlx::PgPool;
use tracing::instrument;

use crate::models::{Customer, SolarEstimate};

#[derive(Clone)]
pub struct SolarRepository {
    pool: PgPool,
}

impl SolarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Keeps one estimate per address; a re-run replaces the previous figures.
    #[instrument(name = "db.solar.upsert", skip(self, customer))]
    pub async fn upsert(
        &self,
        customer: &Customer,
        estimate: &SolarEstimate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO solar_estimates
                (street, city, state, zipcode, latitude, longitude,
                 azimuth, tilt, solrad_annual, ac_annual)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (street, city, state, zipcode) DO UPDATE SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                azimuth = EXCLUDED.azimuth,
                tilt = EXCLUDED.tilt,
                solrad_annual = EXCLUDED.solrad_annual,
                ac_annual = EXCLUDED.ac_annual,
                created_at = NOW()
            "#,
        )
        .bind(&customer.street)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip)
        .bind(estimate.latitude)
        .bind(estimate.longitude)
        .bind(estimate.azimuth)
        .bind(estimate.tilt)
        .bind(estimate.solrad_annual)
        .bind(estimate.ac_annual)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
