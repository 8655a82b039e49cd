use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use xunshubao_client::{Client, Credentials};

/// Resolved connection settings for one CLI invocation.
#[derive(Debug)]
pub struct Settings {
    credentials: Credentials,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    app_key: String,
    sign_secret: String,
    aes_key: String,
    /// Base64-encoded 16-byte SM4 key, as distributed by the operator.
    sm4_key: String,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    /// Loads credentials from a TOML file, or from `XSB_*` environment
    /// variables when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("reading configuration from {}", path.display()))?;
                parse_config(&contents, path)?
            }
            None => from_env()?,
        };

        let credentials = Credentials::new(
            file_cfg.app_key,
            file_cfg.sign_secret,
            &file_cfg.aes_key,
            &file_cfg.sm4_key,
        )
        .context("invalid credential material")?;

        Ok(Self {
            credentials,
            base_url: file_cfg.base_url,
            timeout: file_cfg.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Consumes the settings and builds the API client.
    pub fn into_client(self) -> Result<Client> {
        let mut builder = Client::builder(self.credentials);
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("constructing API client")
    }
}

fn parse_config(contents: &str, path: &Path) -> Result<FileConfig> {
    let deserializer = toml::Deserializer::new(contents);
    let parsed = serde_path_to_error::deserialize(deserializer)
        .with_context(|| format!("parsing configuration at {}", path.display()))?;
    Ok(parsed)
}

fn from_env() -> Result<FileConfig> {
    Ok(FileConfig {
        app_key: require_env("XSB_APP_KEY")?,
        sign_secret: require_env("XSB_SIGN_SECRET")?,
        aes_key: require_env("XSB_AES_KEY")?,
        sm4_key: require_env("XSB_SM4_KEY")?,
        base_url: env::var("XSB_BASE_URL").ok(),
        timeout_secs: env::var("XSB_TIMEOUT_SECS")
            .ok()
            .map(|value| value.parse())
            .transpose()
            .context("XSB_TIMEOUT_SECS must be an integer number of seconds")?,
    })
}

fn require_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} is not set and no --config file was given"))
}
