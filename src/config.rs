use std::path::PathBuf;

use crate::intelligence::engine::DEFAULT_CACHE_CAPACITY;
use crate::pipeline::bulk_import::ImportConfig;

/// Application-level constants
pub const APP_NAME: &str = "Magistral";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_OLLAMA_URL: &str = "MAGISTRAL_OLLAMA_URL";
pub const ENV_MODEL: &str = "MAGISTRAL_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "MAGISTRAL_LLM_TIMEOUT_SECS";
pub const ENV_REFERENCE_DIR: &str = "MAGISTRAL_REFERENCE_DIR";

pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "magistral_lib=debug,magistral=debug,warn"
    } else {
        "magistral_lib=info,magistral=info,warn"
    }
}

/// Get the application data directory.
/// ~/Magistral/, or ./.magistral when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(".magistral"))
}

/// Directory holding reference JSON files.
pub fn reference_dir() -> PathBuf {
    app_data_dir().join("reference")
}

/// Runtime settings for the engine and the bulk importer.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub llm_timeout_secs: u64,
    pub cache_capacity: usize,
    pub reference_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: ImportConfig::default().model_name,
            llm_timeout_secs: 30,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            reference_dir: reference_dir(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `MAGISTRAL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_OLLAMA_URL) {
            config.ollama_url = url;
        }
        if let Some(model) = get(ENV_MODEL) {
            config.model_name = model;
        }
        if let Some(raw) = get(ENV_LLM_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.llm_timeout_secs = secs,
                _ => tracing::warn!(
                    value = %raw,
                    "Ignoring invalid {ENV_LLM_TIMEOUT_SECS}"
                ),
            }
        }
        if let Some(dir) = get(ENV_REFERENCE_DIR) {
            config.reference_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            model_name: self.model_name.clone(),
            ..ImportConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reference_dir_under_app_data() {
        assert!(reference_dir().starts_with(app_data_dir()));
        assert!(reference_dir().ends_with("reference"));
    }

    #[test]
    fn app_name_is_magistral() {
        assert_eq!(APP_NAME, "Magistral");
    }

    #[test]
    fn defaults_without_env() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.llm_timeout_secs, 30);
    }

    #[test]
    fn env_overrides_applied() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_OLLAMA_URL, "http://gpu-box:11434"),
            (ENV_MODEL, "qwen2.5:14b"),
            (ENV_LLM_TIMEOUT_SECS, "90"),
            (ENV_REFERENCE_DIR, "/srv/magistral/ref"),
        ]));
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.model_name, "qwen2.5:14b");
        assert_eq!(config.llm_timeout_secs, 90);
        assert_eq!(config.reference_dir, PathBuf::from("/srv/magistral/ref"));
        assert_eq!(config.import_config().model_name, "qwen2.5:14b");
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let config = EngineConfig::from_lookup(lookup(&[(ENV_LLM_TIMEOUT_SECS, "soon")]));
        assert_eq!(config.llm_timeout_secs, 30);
        let zero = EngineConfig::from_lookup(lookup(&[(ENV_LLM_TIMEOUT_SECS, "0")]));
        assert_eq!(zero.llm_timeout_secs, 30);
    }

    #[test]
    fn log_filter_targets_crate() {
        assert!(default_log_filter().contains("magistral_lib"));
    }
}
