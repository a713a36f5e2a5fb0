use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub generative: GenerativeConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_index_page")]
    pub index_page: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_doc_root")]
    pub root: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_binary")]
    pub binary: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    #[serde(default = "default_summarize_timeout_secs")]
    pub summarize_timeout_secs: u64,

    #[serde(default = "default_answer_timeout_secs")]
    pub answer_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_index_page() -> String {
    "./web/index.html".to_string()
}

fn default_doc_root() -> String {
    "./doc_sets".to_string()
}

fn default_engine_binary() -> String {
    "./search_engine".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_backoff_base_secs() -> u64 {
    1
}

fn default_summarize_timeout_secs() -> u64 {
    30
}

fn default_answer_timeout_secs() -> u64 {
    90
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index_page: default_index_page(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            root: default_doc_root(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_engine_binary(),
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            summarize_timeout_secs: default_summarize_timeout_secs(),
            answer_timeout_secs: default_answer_timeout_secs(),
        }
    }
}

/// Load config from file or use defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        let content =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    } else {
        Ok(Config::default())
    }
}
