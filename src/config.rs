use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// Object storage settings. Every field is required.
#[derive(Clone)]
pub struct StorageSettings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub endpoint: String,
    pub timeout: Duration,
}

/// Hosted model settings.
#[derive(Clone)]
pub struct ModelSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Process-wide settings, read once at startup and passed into each component.
#[derive(Clone, Debug)]
pub struct Settings {
    pub storage: StorageSettings,
    pub model: ModelSettings,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    /// All missing required variables are reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| -> String {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let api_key = required("GROQ_API_KEY");
        let region = required("AWS_REGION");
        let access_key_id = required("ACCESS_KEY");
        let secret_access_key = required("SECRET_ACCESS_KEY");
        let bucket = required("DEST_BUCKET");
        let endpoint = required("S3_ENDPOINT");

        if !missing.is_empty() {
            bail!("missing required environment variables: {}", missing.join(", "));
        }

        reqwest::Url::parse(&endpoint)
            .with_context(|| format!("S3_ENDPOINT is not a valid URL: {}", endpoint))?;

        let storage_timeout = parse_or(&lookup, "STORAGE_TIMEOUT_SECS", 30u64)?;
        let model_timeout = parse_or(&lookup, "MODEL_TIMEOUT_SECS", 60u64)?;

        Ok(Self {
            storage: StorageSettings {
                access_key_id,
                secret_access_key,
                region,
                bucket,
                endpoint: endpoint.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(storage_timeout),
            },
            model: ModelSettings {
                api_key,
                model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: lookup("GROQ_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(model_timeout),
            },
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

// Secrets stay out of the logs.
impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
