//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for gamma
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Gateway service configuration
    pub gateway: GatewayConfig,
    /// Upstream completion provider configuration
    pub provider: ProviderConfig,
    /// Usage limits
    pub limits: LimitsConfig,
    /// Asset cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gateway service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Origins allowed to call the chat endpoint
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// System persona seeded into every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8390
}

fn default_allowed_origins() -> Vec<String> {
    vec!["https://gammac.vercel.app".to_string()]
}

fn default_system_prompt() -> String {
    "You are Gamma, a helpful AI assistant. Answer clearly and concisely, \
     and stay on the user's topic."
        .to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            allowed_origins: default_allowed_origins(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Upstream completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the completions endpoint
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the completions API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Usage limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Questions permitted per usage window
    #[serde(default = "default_question_limit")]
    pub question_limit: u32,
    /// Usage window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Conversation turns kept for upstream context
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_question_limit() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    2 * 60 * 60
}

fn default_max_history() -> usize {
    7
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            question_limit: default_question_limit(),
            window_secs: default_window_secs(),
            max_history: default_max_history(),
        }
    }
}

/// Asset cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Name of the static partition, versioned per release
    #[serde(default = "default_static_partition")]
    pub static_partition: String,
    /// Name of the dynamic partition, versioned per release
    #[serde(default = "default_dynamic_partition")]
    pub dynamic_partition: String,
    /// Assets pre-cached at install time
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,
    /// Build-output path prefix cached as static
    #[serde(default = "default_build_prefix")]
    pub build_prefix: String,
    /// Upper bound on dynamic partition entries
    #[serde(default = "default_max_dynamic_entries")]
    pub max_dynamic_entries: usize,
}

fn default_static_partition() -> String {
    "gamma-static-v1".to_string()
}

fn default_dynamic_partition() -> String {
    "gamma-dynamic-v1".to_string()
}

fn default_static_assets() -> Vec<String> {
    [
        "/",
        "/favicon-32x32.png",
        "/site.webmanifest",
        "/android-chrome-192x192.png",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_build_prefix() -> String {
    "/_next/static/".to_string()
}

fn default_max_dynamic_entries() -> usize {
    64
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            static_partition: default_static_partition(),
            dynamic_partition: default_dynamic_partition(),
            static_assets: default_static_assets(),
            build_prefix: default_build_prefix(),
            max_dynamic_entries: default_max_dynamic_entries(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
