pub mod health;
pub mod helpers;
pub mod metrics;
pub mod redirect;
pub mod shorten;
pub mod types;

pub use health::{HealthService, health_routes};
pub use helpers::{api_result, error_response, success_response};
pub use metrics::{MetricsService, metrics_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{ShortenService, shorten_routes};
pub use types::{ErrorBody, HealthResponse, ShortenRequest};
