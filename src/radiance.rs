//! EagleView radiance deliverable: per-roof-facet irradiance for an Advanced report.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use bytes::Bytes;
use serde::Deserialize;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadianceModel {
    #[serde(default)]
    pub reportid: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub roofs: Vec<Roof>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub northorientation: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Roof {
    #[serde(default)]
    pub designator: String,
    #[serde(default)]
    pub unroundedsize: String,
    #[serde(default)]
    pub pitch: String,
    #[serde(default, rename = "pitchDeg")]
    pub pitch_deg: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub irradiance: Vec<Irradiance>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Irradiance {
    #[serde(rename = "TSRF")]
    pub tsrf: f64,
    #[serde(rename = "SA")]
    pub sa: f64,
}

impl RadianceModel {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// One line of the roof table on the results page.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofRow {
    pub designator: String,
    pub size: String,
    pub pitch: String,
    pub pitch_deg: String,
    pub orientation: String,
    pub tsrf: String,
    pub solar_access: String,
    pub sun_hours: String,
}

const UNAVAILABLE: &str = "n/a";

/// Builds table rows from the first irradiance sample of each roof.
/// Sun hours are `TSRF x daily solar radiation x 365`.
pub fn roof_rows(model: &RadianceModel, solrad_annual: Option<f64>) -> Vec<RoofRow> {
    model
        .roofs
        .iter()
        .map(|roof| {
            let sample = roof.irradiance.first();
            RoofRow {
                designator: roof.designator.clone(),
                size: roof.unroundedsize.clone(),
                pitch: roof.pitch.clone(),
                pitch_deg: roof.pitch_deg.clone(),
                orientation: format!("{:.2}", roof.orientation),
                tsrf: sample.map_or_else(|| UNAVAILABLE.to_string(), |s| format!("{:.2}", s.tsrf)),
                solar_access: sample
                    .map_or_else(|| UNAVAILABLE.to_string(), |s| format!("{:.2}", s.sa)),
                sun_hours: match (sample, solrad_annual) {
                    (Some(s), Some(solrad)) => format!("{:.2}", s.tsrf * solrad * 365.0),
                    _ => UNAVAILABLE.to_string(),
                },
            }
        })
        .collect()
}

/// Downloaded deliverables, one file per report id.
#[derive(Debug, Clone)]
pub struct RadianceCache {
    dir: PathBuf,
}

impl RadianceCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, report_id: i64) -> PathBuf {
        self.dir.join(format!("RadianceModel{report_id}.json"))
    }

    pub async fn load(&self, report_id: i64) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(report_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes through a uniquely named temporary file in the cache directory and renames it
    /// into place, so readers only ever see a complete deliverable.
    pub async fn store(&self, report_id: i64, bytes: Bytes) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let dir = self.dir.clone();
        let target = self.path_for(report_id);

        tokio::task::spawn_blocking(move || {
            let mut file = NamedTempFile::new_in(&dir)?;
            file.write_all(&bytes)?;
            file.persist(&target).map_err(|e| e.error)?;
            Ok::<_, std::io::Error>(())
        })
        .await
        .map_err(std::io::Error::other)?
    }

    pub async fn evict(&self, report_id: i64) -> std::io::Result<()> {
        match tokio::fs::remove_file(self.path_for(report_id)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "reportid": "445566",
        "location": {
            "latitude": 34.15, "longitude": -118.14, "northorientation": 0.0,
            "address": "85 N Raymond Ave", "city": "Pasadena", "postal": "91103", "state": "CA"
        },
        "roofs": [
            {
                "designator": "A", "unroundedsize": "412.7", "pitch": "6/12", "pitchDeg": "26.57",
                "id": "r1", "orientation": 181.456,
                "irradiance": [{ "TSRF": 0.8732, "SA": 0.9121 }, { "TSRF": 0.1, "SA": 0.1 }]
            },
            {
                "designator": "B", "unroundedsize": "98.0", "pitch": "4/12", "pitchDeg": "18.43",
                "id": "r2", "orientation": 90.0, "irradiance": []
            }
        ]
    }"#;

    #[test]
    fn test_decode_deliverable() {
        let model = RadianceModel::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(model.reportid, "445566");
        assert_eq!(model.location.postal, "91103");
        assert_eq!(model.roofs.len(), 2);
        assert_eq!(model.roofs[0].pitch_deg, "26.57");
        assert_eq!(model.roofs[0].irradiance[0].tsrf, 0.8732);
    }

    #[test]
    fn test_roof_rows_use_first_sample() {
        let model = RadianceModel::from_slice(SAMPLE.as_bytes()).unwrap();
        let rows = roof_rows(&model, Some(6.0));

        assert_eq!(
            rows[0],
            RoofRow {
                designator: "A".into(),
                size: "412.7".into(),
                pitch: "6/12".into(),
                pitch_deg: "26.57".into(),
                orientation: "181.46".into(),
                tsrf: "0.87".into(),
                solar_access: "0.91".into(),
                sun_hours: format!("{:.2}", 0.8732 * 6.0 * 365.0),
            }
        );
        assert_eq!(rows[1].tsrf, "n/a");
        assert_eq!(rows[1].sun_hours, "n/a");
    }

    #[test]
    fn test_roof_rows_without_solar_estimate() {
        let model = RadianceModel::from_slice(SAMPLE.as_bytes()).unwrap();
        let rows = roof_rows(&model, None);
        assert_eq!(rows[0].tsrf, "0.87");
        assert_eq!(rows[0].sun_hours, "n/a");
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RadianceCache::new(dir.path().join("radiance"));

        assert!(cache.load(12).await.unwrap().is_none());

        tokio_test::assert_ok!(cache.store(12, Bytes::from_static(SAMPLE.as_bytes())).await);
        let loaded = cache.load(12).await.unwrap().unwrap();
        assert_eq!(loaded, SAMPLE.as_bytes());
        assert!(cache.path_for(12).ends_with("RadianceModel12.json"));
    }

    #[tokio::test]
    async fn test_store_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RadianceCache::new(dir.path());

        let (a, b) = tokio::join!(
            cache.store(5, Bytes::from_static(SAMPLE.as_bytes())),
            cache.store(5, Bytes::from_static(SAMPLE.as_bytes())),
        );
        tokio_test::assert_ok!(a);
        tokio_test::assert_ok!(b);

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["RadianceModel5.json"]);
        assert!(RadianceModel::from_slice(&cache.load(5).await.unwrap().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_evict_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RadianceCache::new(dir.path());

        tokio_test::assert_ok!(cache.evict(9).await);
        cache.store(9, Bytes::from_static(b"{}")).await.unwrap();
        tokio_test::assert_ok!(cache.evict(9).await);
        assert!(cache.load(9).await.unwrap().is_none());
    }
}
