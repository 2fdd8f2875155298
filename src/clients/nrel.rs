use serde::Deserialize;
use tracing::instrument;

use super::{read_json, send};
use crate::error::UpstreamError;
use crate::models::SolarEstimate;

const SERVICE: &str = "nrel";

/// PVWatts system parameters sent with every estimate request.
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    pub system_capacity_kw: f64,
    pub azimuth: f64,
    pub tilt: f64,
    pub array_type: u8,
    pub module_type: u8,
    pub losses_pct: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system_capacity_kw: 0.08,
            azimuth: 180.0,
            tilt: 40.0,
            array_type: 1,
            module_type: 1,
            losses_pct: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PvWattsResponse {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub warnings: Vec<serde_json::Value>,
    pub station_info: Option<StationInfo>,
    pub outputs: Option<PvWattsOutputs>,
}

#[derive(Debug, Deserialize)]
pub struct StationInfo {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct PvWattsOutputs {
    pub ac_annual: f64,
    pub solrad_annual: f64,
}

/// Body PVWatts sends with a 4xx when it rejects the request parameters.
#[derive(Debug, Deserialize)]
struct PvWattsErrorBody {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

fn reported_errors(errors: &[serde_json::Value]) -> Option<UpstreamError> {
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
        .collect();
    Some(UpstreamError::Nrel(messages.join("; ")))
}

/// Replaces a 4xx status error with the messages from its `errors` array, when it has one.
fn client_error(error: UpstreamError) -> UpstreamError {
    let UpstreamError::Status { status: 400..=499, body, .. } = &error else {
        return error;
    };
    serde_json::from_str::<PvWattsErrorBody>(body)
        .ok()
        .and_then(|parsed| reported_errors(&parsed.errors))
        .unwrap_or(error)
}

impl PvWattsResponse {
    fn into_estimate(self, system: &SystemConfig) -> Result<SolarEstimate, UpstreamError> {
        if let Some(error) = reported_errors(&self.errors) {
            return Err(error);
        }

        let (Some(station), Some(outputs)) = (self.station_info, self.outputs) else {
            return Err(UpstreamError::Decode {
                service: SERVICE,
                message: "response is missing station_info or outputs".into(),
            });
        };

        Ok(SolarEstimate {
            latitude: station.lat,
            longitude: station.lon,
            azimuth: system.azimuth,
            tilt: system.tilt,
            solrad_annual: outputs.solrad_annual,
            ac_annual: outputs.ac_annual,
        })
    }
}

pub struct NrelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    system: SystemConfig,
}

impl NrelClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            system: SystemConfig::default(),
        }
    }

    #[instrument(name = "nrel.pvwatts", skip(self))]
    pub async fn pvwatts(&self, address: &str) -> Result<SolarEstimate, UpstreamError> {
        let system = &self.system;
        let request = self
            .http
            .get(format!("{}/api/pvwatts/v6.json", self.base_url))
            .query(&[
                ("api_key", self.api_key.clone()),
                ("address", address.to_string()),
                ("system_capacity", system.system_capacity_kw.to_string()),
                ("azimuth", system.azimuth.to_string()),
                ("tilt", system.tilt.to_string()),
                ("array_type", system.array_type.to_string()),
                ("module_type", system.module_type.to_string()),
                ("losses", system.losses_pct.to_string()),
            ]);

        let response = send(SERVICE, "pvwatts", request)
            .await
            .map_err(client_error)?;
        let body: PvWattsResponse = read_json(SERVICE, response).await?;

        if !body.warnings.is_empty() {
            tracing::warn!(warnings = ?body.warnings, "PVWatts returned warnings");
        }

        let estimate = body.into_estimate(system)?;

        tracing::info!(
            lat = estimate.latitude,
            lon = estimate.longitude,
            ac_annual = estimate.ac_annual,
            "PVWatts estimate received"
        );

        Ok(estimate)
    }
}
