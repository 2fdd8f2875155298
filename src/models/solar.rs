/// PVWatts estimate stored alongside an order's address.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarEstimate {
    pub latitude: f64,
    pub longitude: f64,
    pub azimuth: f64,
    pub tilt: f64,
    pub solrad_annual: f64,
    pub ac_annual: f64,
}
