//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides.
//! The configuration file path defaults to `config.yaml` but can be specified via
//! `-f` flag or `FIELDCTL_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override
//! earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `FIELDCTL_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database_url` if set
//!
//! For nested config values, use double underscores in environment variables. For
//! example, `FIELDCTL_SESSION__COOKIE_NAME=my_session` sets `session.cookie_name`.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "FIELDCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment
/// variables. All fields have sensible defaults defined in the `Default`
/// implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Base URL where the dashboard and portals are accessible
    /// (e.g., "https://app.example.com"). Used for invite links and share URLs.
    pub dashboard_url: String,
    /// PostgreSQL connection URL. Usually provided via DATABASE_URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Secret key for JWT session signing (required for production)
    pub secret_key: Option<String>,
    /// Session cookie configuration
    pub session: SessionConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
    /// Email configuration for portal invites
    pub email: EmailConfig,
    /// Address geocoding (fire-and-forget after customer writes)
    pub geocoding: GeocodingConfig,
    /// Video room provisioning for consultations
    pub video: VideoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3400,
            dashboard_url: "http://localhost:3400".to_string(),
            database_url: None,
            secret_key: None,
            session: SessionConfig::default(),
            cors: CorsConfig::default(),
            email: EmailConfig::default(),
            geocoding: GeocodingConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the HTTP-only session cookie
    pub cookie_name: String,
    /// Session lifetime in seconds
    pub expiry_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "fieldctl_session".to_string(),
            expiry_secs: 60 * 60 * 24 * 7, // one week
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins. "*" allows any origin (credentials disabled by axum in
    /// that case).
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    pub transport: EmailTransportConfig,
    pub from_email: String,
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransportConfig::File {
                path: "/tmp/fieldctl-emails".to_string(),
            },
            from_email: "no-reply@fieldctl.local".to_string(),
            from_name: "fieldctl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmailTransportConfig {
    /// Deliver via SMTP relay
    Smtp {
        host: String,
        port: u16,
        username: String,
        password: String,
        use_tls: bool,
    },
    /// Write emails to files (development/testing)
    File { path: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodingConfig {
    pub enabled: bool,
    /// Nominatim-compatible search endpoint
    pub base_url: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://nominatim.openstreetmap.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub enabled: bool,
    /// Room provisioning API base URL (Daily-compatible)
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.daily.co/v1".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from the YAML file and environment overrides.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("FIELDCTL_").split("__"));

        // DATABASE_URL is the conventional override used by deploy environments
        if let Ok(url) = std::env::var("DATABASE_URL") {
            figment = figment.merge(("database_url", url));
        }

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.secret_key.is_none() {
            anyhow::bail!("secret_key is required (set FIELDCTL_SECRET_KEY or secret_key in config.yaml)");
        }
        if self.database_url.is_none() {
            anyhow::bail!("database_url is required (set DATABASE_URL)");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3400);
        assert_eq!(config.session.cookie_name, "fieldctl_session");
        assert!(!config.geocoding.enabled);
        assert!(!config.video.enabled);
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 9000\nsecret_key: test\ndatabase_url: postgres://x")?;
            jail.set_env("FIELDCTL_SESSION__COOKIE_NAME", "custom_session");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");
            assert_eq!(config.port, 9000);
            assert_eq!(config.session.cookie_name, "custom_session");
            Ok(())
        });
    }

    #[test]
    fn test_missing_secret_key_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "database_url: postgres://x")?;

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            assert!(Config::load(&args).is_err());
            Ok(())
        });
    }
}
