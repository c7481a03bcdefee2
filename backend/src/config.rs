//! Configuration management for the Marketplace Reports service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MPR_ prefix

use chrono::{FixedOffset, Offset, Utc};
use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Report aggregation and export configuration
    pub reporting: ReportingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    /// Offset from UTC, in minutes, used for buckets and trend windows
    pub utc_offset_minutes: i32,

    /// ISO currency code shown on sales figures
    pub currency: String,

    /// Brand line printed under the export header
    pub brand_name: String,

    /// Footer notice printed on every exported page
    pub confidentiality_notice: String,

    /// Number of shops listed as top sellers
    pub top_seller_limit: usize,
}

impl ReportingConfig {
    /// Reporting offset; out-of-range values fall back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            currency: "LKR".to_string(),
            brand_name: "Marketplace Admin".to_string(),
            confidentiality_notice: "Confidential - For Internal Use Only".to_string(),
            top_seller_limit: 3,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MPR_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let reporting = ReportingConfig::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 600)?
            .set_default("reporting.utc_offset_minutes", reporting.utc_offset_minutes as i64)?
            .set_default("reporting.currency", reporting.currency)?
            .set_default("reporting.brand_name", reporting.brand_name)?
            .set_default("reporting.confidentiality_notice", reporting.confidentiality_notice)?
            .set_default("reporting.top_seller_limit", reporting.top_seller_limit as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MPR_ prefix)
            .add_source(
                Environment::with_prefix("MPR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporting_offset() {
        let reporting = ReportingConfig::default();
        assert_eq!(reporting.offset().local_minus_utc(), 330 * 60);

        let invalid = ReportingConfig {
            utc_offset_minutes: 24 * 60,
            ..ReportingConfig::default()
        };
        assert_eq!(invalid.offset().local_minus_utc(), 0);
    }
}
