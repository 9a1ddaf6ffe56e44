//! Configuration for the text-to-audio functions
//!
//! Values come from environment variables (a `.env` file is loaded into the
//! environment by `main`), optionally overridden by a YAML file.
//! Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Example
//! ```rust,no_run
//! use text_to_audio::config::AppConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = AppConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = AppConfig::from_file(Path::new("config.yaml"))?;
//!
//! println!("Bucket: {:?}", config.bucket_name);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod yaml;

pub use yaml::YamlConfig;

use crate::core::storage::S3Settings;
use crate::core::tts::PollyEngine;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Read(String),

    #[error("{0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
}

/// Process-wide configuration
#[derive(Clone)]
pub struct AppConfig {
    // Local listener (serve subcommand)
    pub host: String,
    pub port: u16,

    // Storage
    pub bucket_name: Option<String>,
    pub s3_endpoint: Option<String>,

    // Email
    pub sender_email: Option<String>,

    // AWS
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_session_token: Option<String>,

    // Synthesis
    pub polly_engine: Option<PollyEngine>,

    // Pipeline
    pub scratch_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bucket_name", &self.bucket_name)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("sender_email", &self.sender_email)
            .field("aws_region", &self.aws_region)
            .field("has_static_credentials", &self.has_static_credentials())
            .field("polly_engine", &self.polly_engine)
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

/// Implement Drop to zeroize secret fields when AppConfig is dropped.
impl Drop for AppConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.aws_access_key_id {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.aws_secret_access_key {
            secret.zeroize();
        }
        if let Some(ref mut token) = self.aws_session_token {
            token.zeroize();
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string())
}

fn parse_engine(value: &str) -> ConfigResult<PollyEngine> {
    PollyEngine::parse(value).ok_or_else(|| ConfigError::Invalid {
        field: "polly_engine",
        reason: format!("unknown Polly engine '{value}'"),
    })
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self::env_base()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Environment variables provide the base configuration and the YAML
    /// file overrides whatever it specifies. Validation runs on the merged
    /// result.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = Self::env_base()?;
        config.apply_yaml(yaml_config)?;
        config.validate()?;

        Ok(config)
    }

    fn env_base() -> ConfigResult<Self> {
        let port = match env_var("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                field: "port",
                reason: format!("'{port}': {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let polly_engine = env_var("POLLY_ENGINE")
            .filter(|v| !v.is_empty())
            .map(|v| parse_engine(&v))
            .transpose()?;

        Ok(Self {
            host: env_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            bucket_name: env_var("BUCKET_NAME"),
            s3_endpoint: env_var("S3_ENDPOINT"),
            sender_email: env_var("SENDER_EMAIL"),
            aws_region: env_var("AWS_REGION"),
            aws_access_key_id: env_var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: env_var("AWS_SECRET_ACCESS_KEY"),
            aws_session_token: env_var("AWS_SESSION_TOKEN"),
            polly_engine,
            scratch_dir: env_var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        })
    }

    fn apply_yaml(&mut self, yaml: YamlConfig) -> ConfigResult<()> {
        if let Some(server) = yaml.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
        }

        if let Some(storage) = yaml.storage {
            if storage.bucket.is_some() {
                self.bucket_name = storage.bucket;
            }
            if storage.endpoint.is_some() {
                self.s3_endpoint = storage.endpoint;
            }
        }

        if let Some(sender) = yaml.email.and_then(|e| e.sender) {
            self.sender_email = Some(sender);
        }

        if let Some(aws) = yaml.aws {
            if aws.region.is_some() {
                self.aws_region = aws.region;
            }
            if aws.access_key_id.is_some() {
                self.aws_access_key_id = aws.access_key_id;
            }
            if aws.secret_access_key.is_some() {
                self.aws_secret_access_key = aws.secret_access_key;
            }
            if aws.session_token.is_some() {
                self.aws_session_token = aws.session_token;
            }
        }

        if let Some(engine) = yaml.synthesis.and_then(|s| s.engine) {
            self.polly_engine = Some(parse_engine(&engine)?);
        }

        if let Some(dir) = yaml.pipeline.and_then(|p| p.scratch_dir) {
            self.scratch_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(_), None) => {
                return Err(ConfigError::Invalid {
                    field: "aws_secret_access_key",
                    reason: "AWS_ACCESS_KEY_ID is set without AWS_SECRET_ACCESS_KEY".to_string(),
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid {
                    field: "aws_access_key_id",
                    reason: "AWS_SECRET_ACCESS_KEY is set without AWS_ACCESS_KEY_ID".to_string(),
                });
            }
            _ => {}
        }

        if let Some(ref endpoint) = self.s3_endpoint {
            url::Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
                field: "s3_endpoint",
                reason: format!("'{endpoint}': {e}"),
            })?;
        }

        if self.bucket_name.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid {
                field: "bucket_name",
                reason: "must not be empty".to_string(),
            });
        }

        if self.sender_email.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid {
                field: "sender_email",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Bucket receiving uploads. Required by the upload authorizer.
    pub fn require_bucket(&self) -> ConfigResult<&str> {
        self.bucket_name
            .as_deref()
            .ok_or(ConfigError::Missing("BUCKET_NAME"))
    }

    /// Verified SES sender identity. Required by the conversion pipeline.
    pub fn require_sender(&self) -> ConfigResult<&str> {
        self.sender_email
            .as_deref()
            .ok_or(ConfigError::Missing("SENDER_EMAIL"))
    }

    pub fn has_static_credentials(&self) -> bool {
        self.aws_access_key_id.is_some() && self.aws_secret_access_key.is_some()
    }

    /// Get the local listener address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the S3 storage backend.
    pub fn s3_settings(&self) -> S3Settings {
        S3Settings {
            region: self.aws_region.clone(),
            endpoint: self.s3_endpoint.clone(),
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
            session_token: self.aws_session_token.clone(),
        }
    }
}
