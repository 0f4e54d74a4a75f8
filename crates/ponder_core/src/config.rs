use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Hard cap on stepping iterations before the engine forces a final answer.
pub const DEFAULT_MAX_STEPS: u32 = 25;
pub const DEFAULT_MODEL: &str = "llama3.1";

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PonderConfig {
    pub llm: LlmConfig,
    pub reasoning: ReasoningConfig,
}

impl PonderConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: PonderConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PONDER_PROVIDER") {
            self.llm.provider = v;
        }
        if let Some(v) = lookup("PONDER_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("OLLAMA_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Some(v) = lookup("PONDER_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = lookup("PONDER_MAX_STEPS") {
            if let Ok(n) = v.parse() {
                self.reasoning.max_steps = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `ollama` talks to an OpenAI-compatible endpoint, `mock` replays canned steps.
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub max_steps: u32,
    /// Total attempts per gateway call, including the first.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl ReasoningConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
