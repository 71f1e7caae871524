//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ACTIVATION_*` environment variables, and an
//! optional configuration file. The resolved settings are passed into
//! constructors; nothing downstream reads the environment.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use crate::domain::{DEFAULT_WELCOME_BONUS, PositiveAmount};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.paystack.co";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address: {message}")]
    BindAddr { value: String, message: String },
    #[error("gateway_base_url {value:?} is not a valid URL: {message}")]
    GatewayBaseUrl { value: String, message: String },
    #[error("welcome_bonus must be greater than zero, got {value}")]
    WelcomeBonus { value: Decimal },
    #[error("gateway_timeout_secs must be greater than zero")]
    GatewayTimeout,
}

/// Runtime settings for the activation service and its operator tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACTIVATION")]
pub struct AppSettings {
    /// Socket the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it the service runs on fixtures.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Payment gateway API root.
    pub gateway_base_url: Option<String>,
    /// Gateway bearer secret.
    pub gateway_secret_key: Option<String>,
    /// Gateway request timeout in seconds.
    #[ortho_config(default = 10)]
    pub gateway_timeout_secs: u64,
    /// Bonus credited on activation.
    pub welcome_bonus: Option<Decimal>,
}

impl AppSettings {
    /// Listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Gateway API root, falling back to the public Paystack endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::GatewayBaseUrl`] when the value does not parse.
    pub fn gateway_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .gateway_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GATEWAY_BASE_URL);
        Url::parse(raw).map_err(|err| SettingsError::GatewayBaseUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Gateway secret, treating a blank value as unset.
    pub fn gateway_secret_key(&self) -> Option<&str> {
        self.gateway_secret_key
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
    }

    /// Database URL, treating a blank value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Gateway request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::GatewayTimeout`] for a zero timeout.
    pub fn gateway_timeout(&self) -> Result<Duration, SettingsError> {
        if self.gateway_timeout_secs == 0 {
            return Err(SettingsError::GatewayTimeout);
        }
        Ok(Duration::from_secs(self.gateway_timeout_secs))
    }

    /// Welcome bonus, falling back to 3.00.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WelcomeBonus`] for zero or negative amounts.
    pub fn welcome_bonus(&self) -> Result<PositiveAmount, SettingsError> {
        match self.welcome_bonus {
            None => Ok(DEFAULT_WELCOME_BONUS),
            Some(value) => {
                PositiveAmount::new(value).map_err(|_| SettingsError::WelcomeBonus { value })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Defaults and environment overrides.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "ACTIVATION_BIND_ADDR",
        "ACTIVATION_DATABASE_URL",
        "ACTIVATION_DB_MAX_CONNECTIONS",
        "ACTIVATION_RUN_MIGRATIONS",
        "ACTIVATION_GATEWAY_BASE_URL",
        "ACTIVATION_GATEWAY_SECRET_KEY",
        "ACTIVATION_GATEWAY_TIMEOUT_SECS",
        "ACTIVATION_WELCOME_BONUS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("activation-backend")])
            .expect("config should load")
    }

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        KEYS.iter().map(|key| (*key, None)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections, 10);
        assert!(settings.run_migrations);
        assert_eq!(
            settings.gateway_base_url().expect("default parses").as_str(),
            "https://api.paystack.co/"
        );
        assert_eq!(settings.gateway_secret_key(), None);
        assert_eq!(
            settings.gateway_timeout().expect("positive"),
            Duration::from_secs(10)
        );
        assert_eq!(
            settings.welcome_bonus().expect("positive").get(),
            Decimal::new(300, 2)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut env = cleared_env();
        env.extend([
            ("ACTIVATION_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "ACTIVATION_DATABASE_URL",
                Some("postgres://localhost/activation".to_owned()),
            ),
            ("ACTIVATION_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("ACTIVATION_RUN_MIGRATIONS", Some("false".to_owned())),
            (
                "ACTIVATION_GATEWAY_BASE_URL",
                Some("http://127.0.0.1:4010".to_owned()),
            ),
            ("ACTIVATION_GATEWAY_SECRET_KEY", Some("sk_test_1".to_owned())),
            ("ACTIVATION_GATEWAY_TIMEOUT_SECS", Some("3".to_owned())),
            ("ACTIVATION_WELCOME_BONUS", Some("2.5".to_owned())),
        ]);
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9090
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/activation")
        );
        assert_eq!(settings.db_max_connections, 4);
        assert!(!settings.run_migrations);
        assert_eq!(
            settings.gateway_base_url().expect("override parses").port(),
            Some(4010)
        );
        assert_eq!(settings.gateway_secret_key(), Some("sk_test_1"));
        assert_eq!(
            settings.gateway_timeout().expect("positive"),
            Duration::from_secs(3)
        );
        assert_eq!(
            settings.welcome_bonus().expect("positive").get(),
            Decimal::new(25, 1)
        );
    }

    #[rstest]
    fn blank_secret_counts_as_missing() {
        let mut env = cleared_env();
        env.push(("ACTIVATION_GATEWAY_SECRET_KEY", Some("   ".to_owned())));
        let _guard = lock_env(env);

        assert_eq!(load_from_empty_args().gateway_secret_key(), None);
    }

    fn settings_with(mutate: impl FnOnce(&mut AppSettings)) -> AppSettings {
        let mut settings = AppSettings {
            bind_addr: None,
            database_url: None,
            db_max_connections: 10,
            run_migrations: true,
            gateway_base_url: None,
            gateway_secret_key: None,
            gateway_timeout_secs: 10,
            welcome_bonus: None,
        };
        mutate(&mut settings);
        settings
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let bad_addr = settings_with(|s| s.bind_addr = Some("localhost".to_owned()));
        assert!(matches!(
            bad_addr.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));

        let bad_url = settings_with(|s| s.gateway_base_url = Some("not a url".to_owned()));
        assert!(matches!(
            bad_url.gateway_base_url(),
            Err(SettingsError::GatewayBaseUrl { .. })
        ));

        let zero_bonus = settings_with(|s| s.welcome_bonus = Some(Decimal::ZERO));
        assert_eq!(
            zero_bonus.welcome_bonus(),
            Err(SettingsError::WelcomeBonus {
                value: Decimal::ZERO
            })
        );

        let zero_timeout = settings_with(|s| s.gateway_timeout_secs = 0);
        assert_eq!(
            zero_timeout.gateway_timeout(),
            Err(SettingsError::GatewayTimeout)
        );
    }
}
