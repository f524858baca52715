use std::path::PathBuf;

use crate::errors::AppError;

/// One Azure OpenAI deployment: where to send requests and how to authenticate.
#[derive(Debug, Clone)]
pub struct AzureDeployment {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub deployment: String,
    pub model: String,
}

/// Application configuration loaded from environment variables.
/// Construction fails if any required variable is missing, before anything is served.
#[derive(Debug, Clone)]
pub struct Config {
    /// Serves `Tier::Primary` calls.
    pub primary: AzureDeployment,
    /// Serves `Tier::Economy` calls.
    pub economy: AzureDeployment,
    pub embedding: AzureDeployment,
    pub port: u16,
    pub rust_log: String,
    /// Parent directory of per-request workspaces.
    pub temp_dir: PathBuf,
    pub latex_bin: String,
    pub llm_timeout_secs: u64,
}

const PRIMARY_KEYS: [&str; 5] = [
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_VERSION",
    "AZURE_OPENAI_DEPLOYMENT",
    "AZURE_OPENAI_MODEL",
];

const ECONOMY_KEYS: [&str; 5] = [
    "MINI_API_KEY",
    "MINI_AZURE_ENDPOINT",
    "MINI_API_VERSION",
    "MINI_DEPLOYMENT_NAME",
    "MINI_MODEL_NAME",
];

const EMBEDDING_KEYS: [&str; 5] = [
    "AZURE_OPENAI_EMBEDDING_API_KEY",
    "AZURE_OPENAI_EMBEDDING_ENDPOINT",
    "AZURE_OPENAI_EMBEDDING_API_VERSION",
    "AZURE_OPENAI_EMBEDDING_DEPLOYMENT",
    "EMBEDDING_MODEL_NAME",
];

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Reports every missing key at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut deployment = |keys: [&'static str; 5]| {
            let mut values = keys.map(|key| {
                lookup(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| {
                        missing.push(key);
                        String::new()
                    })
            });
            AzureDeployment {
                api_key: std::mem::take(&mut values[0]),
                endpoint: std::mem::take(&mut values[1]),
                api_version: std::mem::take(&mut values[2]),
                deployment: std::mem::take(&mut values[3]),
                model: std::mem::take(&mut values[4]),
            }
        };

        let primary = deployment(PRIMARY_KEYS);
        let economy = deployment(ECONOMY_KEYS);
        let embedding = deployment(EMBEDDING_KEYS);

        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "required environment variables are not set: {}",
                missing.join(", ")
            )));
        }

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::Configuration(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => 8001,
        };

        let llm_timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Configuration(format!(
                    "LLM_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => 120,
        };

        Ok(Config {
            primary,
            economy,
            embedding,
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            temp_dir: lookup("RESUME_FLOW_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("resume-flow")),
            latex_bin: lookup("LATEX_BIN").unwrap_or_else(|| "pdflatex".to_string()),
            llm_timeout_secs,
        })
    }
}
