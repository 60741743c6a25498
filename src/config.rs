use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;

/// Runtime configuration, read once at startup. Values come from the
/// environment; a `.env` file is honored when present.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub upload_dir: PathBuf,
    pub generated_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            Err(_) => 8020,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            generated_dir: env::var("GENERATED_DIR")
                .unwrap_or_else(|_| "./generated".to_string())
                .into(),
        })
    }

    /// Create the upload and output directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.upload_dir).with_context(|| {
            format!("failed to create upload dir {}", self.upload_dir.display())
        })?;
        fs::create_dir_all(&self.generated_dir).with_context(|| {
            format!("failed to create output dir {}", self.generated_dir.display())
        })?;
        Ok(())
    }

    /// Whether an OpenAI API key was supplied. Without one the AI endpoints
    /// stay up but answer every request with a configuration error.
    pub fn openai_configured(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }
}
