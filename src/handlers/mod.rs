pub mod consultation;
pub mod dashboard;
pub mod health;
pub mod payment;
pub mod subscription;

pub use consultation::consultation_config;
pub use dashboard::dashboard_config;
pub use health::health_config;
pub use payment::payment_config;
pub use subscription::subscription_config;

use crate::error::{AppError, AppResult};
use crate::presentation::Locale;
use actix_web::web;
use serde::Deserialize;

/// `?locale=ru` on any view endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

impl LocaleQuery {
    pub fn resolve(&self) -> AppResult<Option<Locale>> {
        self.locale
            .as_deref()
            .map(|l| l.parse::<Locale>().map_err(AppError::ValidationError))
            .transpose()
    }
}

/// Query strings that do not deserialize at all still get the JSON error body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
