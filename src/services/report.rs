use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use opentelemetry::KeyValue;
use tracing::instrument;

use crate::{
    clients::{AccessToken, EagleViewClient, ImageView, ReportFile},
    error::{AppError, AppResult},
    imaging,
    models::ReportKind,
    radiance::{RadianceCache, RadianceModel, RoofRow, roof_rows},
    repository::OrderRepository,
    telemetry::{REPORT_ASSET_FAILURES, REPORT_LOOKUPS, REPORT_PAGE_DURATION},
};

#[derive(Debug)]
pub enum LookupOutcome {
    /// Basic reports are handed over as the PDF itself.
    BasicDocument(Bytes),
    AdvancedReady,
    NotReady,
    Unknown,
}

impl LookupOutcome {
    fn label(&self) -> &'static str {
        match self {
            LookupOutcome::BasicDocument(_) => "basic_document",
            LookupOutcome::AdvancedReady => "advanced_ready",
            LookupOutcome::NotReady => "not_ready",
            LookupOutcome::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportImage {
    pub view: ImageView,
    /// Base64 PNG, `None` when the image could not be fetched or decoded.
    pub png_base64: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReportAssets {
    pub images: Vec<ReportImage>,
    pub radiance: Option<RadianceModel>,
    /// Whether the Advanced report PDF can be downloaded yet.
    pub document_ready: bool,
}

#[derive(Debug)]
pub struct ReportResults {
    pub report_id: i64,
    pub address: String,
    pub annual_solar: Option<f64>,
    pub ac_annual: Option<f64>,
    /// Array orientation the PVWatts estimate was computed for, in degrees.
    pub azimuth: Option<f64>,
    pub tilt: Option<f64>,
    pub images: Vec<ReportImage>,
    pub roofs: Vec<RoofRow>,
    pub document_ready: bool,
}

#[derive(Clone)]
pub struct ReportService {
    orders: OrderRepository,
    eagleview: Arc<EagleViewClient>,
    radiance_cache: RadianceCache,
}

impl ReportService {
    pub fn new(
        orders: OrderRepository,
        eagleview: Arc<EagleViewClient>,
        radiance_cache: RadianceCache,
    ) -> Self {
        Self {
            orders,
            eagleview,
            radiance_cache,
        }
    }

    #[instrument(name = "report.lookup", skip(self))]
    pub async fn lookup(&self, report_id: i64) -> AppResult<LookupOutcome> {
        let outcome = self.resolve_lookup(report_id).await?;
        REPORT_LOOKUPS.add(1, &[KeyValue::new("outcome", outcome.label())]);
        tracing::info!(report_id, outcome = outcome.label(), "Report lookup");
        Ok(outcome)
    }

    async fn resolve_lookup(&self, report_id: i64) -> AppResult<LookupOutcome> {
        let Some(stored_kind) = self.orders.find_report_type(report_id).await? else {
            return Ok(LookupOutcome::Unknown);
        };
        let kind: ReportKind = stored_kind.parse().map_err(|_| {
            AppError::Internal(format!("report {report_id} has unknown type '{stored_kind}'"))
        })?;

        let file = match kind {
            ReportKind::Basic => ReportFile::BasicPdf,
            ReportKind::Advanced => ReportFile::AdvancedPdf,
        };
        let Some(document) = self.available_document(report_id, file).await? else {
            return Ok(LookupOutcome::NotReady);
        };

        Ok(match kind {
            ReportKind::Basic => LookupOutcome::BasicDocument(document),
            ReportKind::Advanced => LookupOutcome::AdvancedReady,
        })
    }

    /// The report file, or `None` while EagleView is still producing it.
    async fn available_document(
        &self,
        report_id: i64,
        file: ReportFile,
    ) -> AppResult<Option<Bytes>> {
        let token = self.eagleview.access_token().await?;
        match self.eagleview.report_file(&token, report_id, file).await {
            Ok(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
            Ok(_) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(name = "report.document", skip(self))]
    pub async fn report_document(&self, report_id: i64) -> AppResult<Bytes> {
        self.available_document(report_id, ReportFile::AdvancedPdf)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {report_id} is not ready yet")))
    }

    #[instrument(name = "report.status", skip(self))]
    pub async fn status(&self, report_id: i64) -> AppResult<serde_json::Value> {
        let token = self.eagleview.access_token().await?;
        Ok(self.eagleview.report_status(&token, report_id).await?)
    }

    #[instrument(name = "report.results", skip(self))]
    pub async fn results(&self, report_id: i64) -> AppResult<ReportResults> {
        let start = Instant::now();

        let summary = self
            .orders
            .find_summary(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {report_id} not found")))?;

        let token = self.eagleview.access_token().await?;
        let assets = self.fetch_assets(&token, report_id).await;

        let roofs = assets
            .radiance
            .as_ref()
            .map(|model| roof_rows(model, summary.solrad_annual))
            .unwrap_or_default();

        REPORT_PAGE_DURATION.record(start.elapsed().as_secs_f64() * 1000.0, &[]);

        Ok(ReportResults {
            report_id,
            address: summary.address_line(),
            annual_solar: summary.annual_solar(),
            ac_annual: summary.ac_annual,
            azimuth: summary.azimuth,
            tilt: summary.tilt,
            images: assets.images,
            roofs,
            document_ready: assets.document_ready,
        })
    }

    /// Fetches the five views, the report PDF and the radiance deliverable concurrently.
    /// A failed asset is logged and left empty; it never fails the others.
    pub async fn fetch_assets(&self, token: &AccessToken, report_id: i64) -> ReportAssets {
        let [top, north, south, east, west] = ImageView::ALL;
        let (top, north, south, east, west, document, radiance) = tokio::join!(
            self.image(token, report_id, top),
            self.image(token, report_id, north),
            self.image(token, report_id, south),
            self.image(token, report_id, east),
            self.image(token, report_id, west),
            self.eagleview.report_file(token, report_id, ReportFile::AdvancedPdf),
            self.radiance_model(token, report_id),
        );

        let document_ready = match document {
            Ok(bytes) => !bytes.is_empty(),
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                REPORT_ASSET_FAILURES.add(1, &[KeyValue::new("asset", "document")]);
                tracing::warn!(report_id, error = %e, "Report document unavailable");
                false
            }
        };

        let radiance = radiance.unwrap_or_else(|e| {
            REPORT_ASSET_FAILURES.add(1, &[KeyValue::new("asset", "radiance")]);
            tracing::warn!(report_id, error = %e, "Radiance deliverable unavailable");
            None
        });

        ReportAssets {
            images: vec![top, north, south, east, west],
            radiance,
            document_ready,
        }
    }

    async fn image(&self, token: &AccessToken, report_id: i64, view: ImageView) -> ReportImage {
        let png_base64 = match self.fetch_png(token, report_id, view).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                REPORT_ASSET_FAILURES.add(1, &[KeyValue::new("asset", view.label())]);
                tracing::warn!(report_id, view = view.label(), error = %e, "Report image unavailable");
                None
            }
        };
        ReportImage { view, png_base64 }
    }

    async fn fetch_png(&self, token: &AccessToken, report_id: i64, view: ImageView) -> AppResult<String> {
        let bytes = self.eagleview.report_image(token, report_id, view).await?;
        let encoded = tokio::task::spawn_blocking(move || imaging::png_base64(&bytes))
            .await
            .map_err(|e| AppError::Internal(format!("image conversion task failed: {e}")))??;
        Ok(encoded)
    }

    async fn radiance_model(
        &self,
        token: &AccessToken,
        report_id: i64,
    ) -> AppResult<Option<RadianceModel>> {
        if let Some(model) = self.cached_radiance(report_id).await {
            return Ok(Some(model));
        }

        let Some(link) = self.eagleview.radiance_link(token, report_id).await? else {
            return Ok(None);
        };
        let downloaded = self.eagleview.download(&link).await?;
        let model = decode_radiance(downloaded.clone()).await?;

        if let Err(e) = self.radiance_cache.store(report_id, downloaded).await {
            tracing::warn!(report_id, error = %e, "Failed to cache radiance deliverable");
        }

        Ok(Some(model))
    }

    /// A cached deliverable that no longer decodes is evicted so it gets downloaded again.
    async fn cached_radiance(&self, report_id: i64) -> Option<RadianceModel> {
        let bytes = match self.radiance_cache.load(report_id).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                tracing::warn!(report_id, error = %e, "Radiance cache read failed");
                return None;
            }
        };

        match decode_radiance(Bytes::from(bytes)).await {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!(report_id, error = %e, "Discarding unreadable cached deliverable");
                if let Err(e) = self.radiance_cache.evict(report_id).await {
                    tracing::warn!(report_id, error = %e, "Failed to evict cached deliverable");
                }
                None
            }
        }
    }
}

async fn decode_radiance(bytes: Bytes) -> AppResult<RadianceModel> {
    tokio::task::spawn_blocking(move || RadianceModel::from_slice(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("radiance decode task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("radiance deliverable is malformed: {e}")))
}
