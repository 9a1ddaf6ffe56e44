use serde::Deserialize;
use std::path::Path;

use super::{ConfigError, ConfigResult};

/// Complete YAML configuration structure
///
/// All fields are optional so a file can override only part of the
/// environment-derived configuration.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///
/// storage:
///   bucket: "text-to-audio-uploads"
///   endpoint: "http://localhost:9000"
///
/// email:
///   sender: "no-reply@example.com"
///
/// aws:
///   region: "us-east-1"
///   access_key_id: "AKIA..."
///   secret_access_key: "..."
///   session_token: "..."
///
/// synthesis:
///   engine: "neural"
///
/// pipeline:
///   scratch_dir: "/tmp"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub storage: Option<StorageYaml>,
    pub email: Option<EmailYaml>,
    pub aws: Option<AwsYaml>,
    pub synthesis: Option<SynthesisYaml>,
    pub pipeline: Option<PipelineYaml>,
}

/// Local HTTP listener from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Object storage from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub bucket: Option<String>,
    /// Custom S3-compatible endpoint
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EmailYaml {
    pub sender: Option<String>,
}

/// AWS region and static credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AwsYaml {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SynthesisYaml {
    /// Polly engine: standard, neural, long-form or generative
    pub engine: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PipelineYaml {
    pub scratch_dir: Option<String>,
}

impl YamlConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Read(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML config: {e}")))?;

        Ok(config)
    }
}
