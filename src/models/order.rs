use std::fmt;
use std::str::FromStr;

use sqlx::FromRow;
use time::OffsetDateTime;

use super::PaymentCard;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Basic,
    Advanced,
}

impl ReportKind {
    /// EagleView primary product id.
    pub fn product_id(self) -> i32 {
        match self {
            ReportKind::Basic => 11,
            ReportKind::Advanced => 62,
        }
    }

    pub fn price_usd(self) -> u32 {
        match self {
            ReportKind::Basic => 75,
            ReportKind::Advanced => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Basic => "basic",
            ReportKind::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Basic => "Basic",
            ReportKind::Advanced => "Advanced",
        }
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(ReportKind::Basic),
            "advanced" => Ok(ReportKind::Advanced),
            other => Err(AppError::Validation(format!("unknown report type '{other}'"))),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line address in the form NREL geocodes.
    pub fn address_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer: Customer,
    pub report_kind: ReportKind,
    pub card: PaymentCard,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub order_id: i64,
    pub report_id: i64,
    pub report_type: String,
    pub created_at: OffsetDateTime,
}

/// An order joined with the solar estimate stored for its address.
#[derive(Debug, Clone, FromRow)]
pub struct ReportSummary {
    pub report_id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub azimuth: Option<f64>,
    pub tilt: Option<f64>,
    pub solrad_annual: Option<f64>,
    pub ac_annual: Option<f64>,
}

impl ReportSummary {
    pub fn address_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zipcode)
    }

    /// Daily solar radiation scaled to a year, as shown on the results page.
    pub fn annual_solar(&self) -> Option<f64> {
        self.solrad_annual.map(|s| s * 365.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_parse_is_case_insensitive() {
        assert_eq!("Basic".parse::<ReportKind>().unwrap(), ReportKind::Basic);
        assert_eq!(" advanced ".parse::<ReportKind>().unwrap(), ReportKind::Advanced);
        assert_eq!("ADVANCED".parse::<ReportKind>().unwrap(), ReportKind::Advanced);
    }

    #[test]
    fn test_report_kind_rejects_unknown() {
        assert!(matches!(
            "premium".parse::<ReportKind>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_report_kind_products_and_prices() {
        assert_eq!(ReportKind::Basic.product_id(), 11);
        assert_eq!(ReportKind::Advanced.product_id(), 62);
        assert_eq!(ReportKind::Basic.price_usd(), 75);
        assert_eq!(ReportKind::Advanced.price_usd(), 100);
    }

    #[test]
    fn test_annual_solar_scales_daily_value() {
        let summary = ReportSummary {
            report_id: 1,
            street: "85 n raymond ave".into(),
            city: "pasadena".into(),
            state: "ca".into(),
            zipcode: "91103".into(),
            azimuth: Some(180.0),
            tilt: Some(40.0),
            solrad_annual: Some(5.5),
            ac_annual: Some(120.0),
        };
        assert_eq!(summary.annual_solar(), Some(5.5 * 365.0));
        assert_eq!(summary.address_line(), "85 n raymond ave, pasadena, ca 91103");
    }
}
