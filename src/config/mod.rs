use std::env;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Process-wide settings, read once at start-up and shared immutably.
#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub frontend_url: String,
    pub additional_origins: Vec<String>,
    pub cleanup_delay_ms: u64,
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8001,
            max_file_size_mb: 10,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            additional_origins: Vec::new(),
            cleanup_delay_ms: 1000,
            temp_dir: None,
        }
    }
}

// The API key never goes to the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("frontend_url", &self.frontend_url)
            .field("additional_origins", &self.additional_origins)
            .field("cleanup_delay_ms", &self.cleanup_delay_ms)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // PORT is what most hosting platforms inject; it wins over SERVER_PORT.
        let server_port = match lookup("PORT") {
            Some(_) => Self::parse_var(&lookup, "PORT", defaults.server_port),
            None => Self::parse_var(&lookup, "SERVER_PORT", defaults.server_port),
        }
        .context("Failed to parse server port")?;

        let api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let additional_origins = lookup("ADDITIONAL_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| {
                info!("SERVER_HOST not set, using default: {}", defaults.server_host);
                defaults.server_host.clone()
            }),
            server_port,
            max_file_size_mb: Self::parse_var(&lookup, "MAX_FILE_SIZE_MB", defaults.max_file_size_mb)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            api_key,
            api_base: lookup("OPENAI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: lookup("OPENAI_MODEL").unwrap_or(defaults.model),
            frontend_url: lookup("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            additional_origins,
            cleanup_delay_ms: Self::parse_var(&lookup, "PDF_CLEANUP_DELAY_MS", defaults.cleanup_delay_ms)
                .context("Failed to parse PDF_CLEANUP_DELAY_MS")?,
            temp_dir: lookup("TEMP_DIR").map(PathBuf::from),
        };

        config.validate()?;

        if config.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; CV analysis requests will fail");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.api_base.is_empty() {
            return Err(anyhow::anyhow!("OPENAI_API_BASE must not be empty"));
        }
        Ok(())
    }

    /// Frontend origin first, then the additional origins, without duplicates.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        for origin in &self.additional_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
