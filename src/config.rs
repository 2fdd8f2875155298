use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: String,
    pub session_key: Option<String>,
    pub eagleview_base_url: String,
    pub eagleview_order_base_url: String,
    pub eagleview_source_id: String,
    pub eagleview_client_secret: String,
    pub eagleview_username: String,
    pub eagleview_password: String,
    pub nrel_base_url: String,
    pub nrel_api_key: String,
    pub upstream_timeout_secs: u64,
    pub static_dir: PathBuf,
    pub radiance_cache_dir: PathBuf,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            session_key: env::var("SESSION_KEY").ok().filter(|k| !k.is_empty()),
            eagleview_base_url: env::var("EAGLEVIEW_BASE_URL")
                .unwrap_or_else(|_| "https://webservices.eagleview.com".to_string()),
            eagleview_order_base_url: env::var("EAGLEVIEW_ORDER_BASE_URL")
                .unwrap_or_else(|_| "https://webservices-integrations.eagleview.com".to_string()),
            eagleview_source_id: env::var("EAGLEVIEW_SOURCE_ID")
                .expect("EAGLEVIEW_SOURCE_ID must be set"),
            eagleview_client_secret: env::var("EAGLEVIEW_CLIENT_SECRET")
                .expect("EAGLEVIEW_CLIENT_SECRET must be set"),
            eagleview_username: env::var("EAGLEVIEW_USERNAME")
                .expect("EAGLEVIEW_USERNAME must be set"),
            eagleview_password: env::var("EAGLEVIEW_PASSWORD")
                .expect("EAGLEVIEW_PASSWORD must be set"),
            nrel_base_url: env::var("NREL_BASE_URL")
                .unwrap_or_else(|_| "https://developer.nrel.gov".to_string()),
            nrel_api_key: env::var("NREL_API_KEY").expect("NREL_API_KEY must be set"),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("UPSTREAM_TIMEOUT_SECS must be a number"),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
            radiance_cache_dir: env::var("RADIANCE_CACHE_DIR")
                .unwrap_or_else(|_| "data/radiance".to_string())
                .into(),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "solar-report-portal".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
