use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_MODEL, GEMINI_BASE_URL};
use crate::domain::registry::ScanConfig;

pub const DEFAULT_CONFIG_FILE: &str = "socioscan.toml";
pub const ENV_PREFIX: &str = "SOCIOSCAN_";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_QUESTION: &str = "Analise a tabela de sócios e CNPJs. Existem sócios que se repetem em diferentes empresas? Se sim, quais são, e o que isso pode indicar?";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    pub input: PathBuf,
    pub delimiter: char,
    pub encoding: String,
    pub max_rows: usize,
    pub sample_size: usize,
    pub company_column: usize,
    pub name_column: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            input: scan.input_path,
            delimiter: scan.delimiter as char,
            encoding: scan.encoding,
            max_rows: scan.max_rows,
            sample_size: scan.sample_size,
            company_column: scan.company_column,
            name_column: scan.name_column,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for LLMSettings {
    fn default() -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_secs: 120,
        }
    }
}

/// Layered application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub scan: ScanSettings,
    pub llm: LLMSettings,
    pub question: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scan: ScanSettings::default(),
            llm: LLMSettings::default(),
            question: DEFAULT_QUESTION.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl AppSettings {
    pub fn scan_config(&self) -> Result<ScanConfig> {
        if !self.scan.delimiter.is_ascii() {
            return Err(AppError::ValidationError(format!(
                "delimiter must be ASCII, got {:?}",
                self.scan.delimiter
            )));
        }

        Ok(ScanConfig {
            input_path: self.scan.input.clone(),
            delimiter: self.scan.delimiter as u8,
            encoding: self.scan.encoding.clone(),
            max_rows: self.scan.max_rows,
            sample_size: self.scan.sample_size,
            company_column: self.scan.company_column,
            name_column: self.scan.name_column,
        })
    }

    /// LLM configuration without a key; the key is attached after resolution.
    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.llm.base_url.clone(),
            model: self.llm.model.clone(),
            api_key: None,
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            timeout_secs: self.llm.timeout_secs,
        }
    }
}

pub struct ConfigService {
    config_file: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    /// Defaults, then the TOML file, then `SOCIOSCAN_*` variables
    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Toml::file(&self.config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self) -> Result<AppSettings> {
        if self.config_file.exists() {
            info!(path = %self.config_file.display(), "Loading settings file");
        } else {
            debug!(path = %self.config_file.display(), "No settings file, using defaults");
        }

        let settings: AppSettings = self.figment().extract()?;
        Ok(settings)
    }

    /// Read the API key from the process environment, falling back to a local `.env` file.
    pub fn resolve_api_key(&self, var: &str) -> Result<String> {
        if let Some(key) = read_env(var) {
            return Ok(key);
        }

        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(err) => debug!(error = %err, "No .env file loaded"),
        }

        read_env(var).ok_or_else(|| {
            AppError::MissingCredential(format!(
                "environment variable {} is not set (checked process env and .env)",
                var
            ))
        })
    }
}

fn read_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
