//! API configuration

use core_kernel::{Currency, CurrencyFormat, Timezone};
use domain_lending::{BiWeeklyConvention, MonthlyConvention, ScheduleConventions, ValidationPolicy};
use serde::Deserialize;

/// API configuration
///
/// Every field has a default, so any subset of `API_*` variables may be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// Log level
    pub log_level: String,
    /// Currency of every projection and portfolio total
    pub currency: Currency,
    /// Business timezone that decides what "today" is
    pub timezone: Timezone,
    /// How invalid cash-flow parameters are handled
    pub validation_policy: ValidationPolicy,
    pub bi_weekly_convention: BiWeeklyConvention,
    pub monthly_convention: MonthlyConvention,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/lending".to_string(),
            db_max_connections: 10,
            db_min_connections: 2,
            log_level: "info".to_string(),
            currency: Currency::USD,
            timezone: Timezone::default(),
            validation_policy: ValidationPolicy::Lenient,
            bi_weekly_convention: BiWeeklyConvention::default(),
            monthly_convention: MonthlyConvention::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn schedule_conventions(&self) -> ScheduleConventions {
        ScheduleConventions::new(self.bi_weekly_convention, self.monthly_convention)
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::for_currency(self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.validation_policy, ValidationPolicy::Lenient);
        assert_eq!(config.schedule_conventions(), ScheduleConventions::default());
        assert_eq!(config.currency_format().symbol, "$");
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: ApiConfig = config::Config::builder()
            .set_override("port", 9090)
            .and_then(|b| b.set_override("currency", "PHP"))
            .and_then(|b| b.set_override("timezone", "Asia/Manila"))
            .and_then(|b| b.set_override("validation_policy", "strict"))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.currency, Currency::PHP);
        assert_eq!(config.timezone, "Asia/Manila".parse::<Timezone>().unwrap());
        assert_eq!(config.validation_policy, ValidationPolicy::Strict);
        assert_eq!(config.jwt_expiration_secs, 3600);
    }
}
