use thiserror::Error;

mod app_config;
mod config;
mod products;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    ProductDetail, ProductSummary, Specification, OUTBOUND_LINK_BASE, PLACEHOLDER_IMAGE_URL,
};

/// Errors raised while loading or validating application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
