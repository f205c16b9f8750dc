use std::env;
use std::time::Duration;

/// Runtime configuration, built once from the environment in `main` and
/// injected into the collaborators. Endpoints and credentials are never read
/// from ambient globals after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    /// Origin used to build Stripe success/cancel URLs and the CORS allowlist.
    pub public_origin: String,
    /// Units assumed for a (product, date) that has no inventory record yet.
    pub default_total_inventory: i64,
    /// How far ahead the calendar feed reports blocked dates.
    pub calendar_horizon_days: i64,
    pub vat_rate: f64,
    pub store_timeout: Duration,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "DomeBooking";
const DEFAULT_TOTAL_INVENTORY: i64 = 5;
const DEFAULT_CALENDAR_HORIZON_DAYS: i64 = 180;
const DEFAULT_VAT_RATE: f64 = 0.05;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

impl AppConfig {
    /// Panics when a required variable is missing; the service cannot run
    /// without its store and payment credentials.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            mongo_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .expect("STRIPE_SECRET_KEY must be set"),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            public_origin: env::var("PUBLIC_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_total_inventory: env::var("DEFAULT_TOTAL_INVENTORY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOTAL_INVENTORY),
            calendar_horizon_days: env::var("CALENDAR_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CALENDAR_HORIZON_DAYS),
            vat_rate: env::var("VAT_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_VAT_RATE),
            store_timeout: Duration::from_secs(
                env::var("STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS),
            ),
        }
    }
}
