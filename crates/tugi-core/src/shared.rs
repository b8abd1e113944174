//! Shared configuration used across the Tugi crates.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Origin of the bundled static chat page when served by a local live server.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://127.0.0.1:5500";

/// Base URL of the Generative Language REST API.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which document store backs restaurant lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local Sled tree under `storage_path`.
    #[default]
    Sled,
    /// Remote Firestore collection (`artifacts/{app_id}/public/data/restaurants`).
    Firestore,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sled => "sled",
            StoreBackend::Firestore => "firestore",
        }
    }
}

/// Firestore project coordinates. Only read when `store_backend = "firestore"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    #[serde(default)]
    pub project_id: String,
    /// Application segment of the collection path.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            app_id: default_app_id(),
            api_key: None,
        }
    }
}

fn default_app_id() -> String {
    "ddugi".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
}

/// Global application configuration (gateway + collaborators). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity reported by `/v1/status`.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Interface the gateway binds to.
    pub bind_address: String,
    /// Base directory for the Sled restaurant store.
    pub storage_path: String,
    #[serde(default)]
    pub store_backend: StoreBackend,
    /// JSON array of restaurant records loaded into an empty Sled store at boot.
    #[serde(default)]
    pub seed_path: Option<String>,
    /// LLM mode ("mock" or "live").
    pub llm_mode: String,
    /// Gemini model id used in live mode.
    pub model: String,
    pub gemini_api_base: String,
    /// Falls back to `GEMINI_API_KEY` when unset.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// Origins the browser front end may call from.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub firestore: FirestoreConfig,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `TUGI__*` > `TUGI_CONFIG` path (default `config/gateway`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("TUGI_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Tugi Gateway")?
            .set_default("port", 3000_i64)?
            .set_default("bind_address", "127.0.0.1")?
            .set_default("storage_path", "./data")?
            .set_default("llm_mode", "mock")?
            .set_default("model", "gemini-1.5-flash")?
            .set_default("gemini_api_base", DEFAULT_GEMINI_API_BASE)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder.add_source(config::File::with_name(&config_path).required(false))
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("TUGI")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?;

        let mut config: CoreConfig = built.try_deserialize()?;
        if config.gemini_api_key.as_deref().map_or(true, str::is_empty) {
            config.gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(config)
    }

    /// Directory of the Sled restaurant store.
    pub fn restaurant_store_path(&self) -> std::path::PathBuf {
        Path::new(&self.storage_path).join("tugi_restaurants")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_lowercase_names() {
        let backend: StoreBackend = serde_json::from_str("\"firestore\"").unwrap();
        assert_eq!(backend, StoreBackend::Firestore);
        assert_eq!(StoreBackend::default().as_str(), "sled");
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config: CoreConfig = serde_json::from_value(serde_json::json!({
            "app_name": "Test",
            "port": 3000,
            "bind_address": "127.0.0.1",
            "storage_path": "./data",
            "llm_mode": "mock",
            "model": "gemini-1.5-flash",
            "gemini_api_base": DEFAULT_GEMINI_API_BASE,
        }))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Sled);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
        assert_eq!(config.firestore.app_id, "ddugi");
        assert!(config.restaurant_store_path().ends_with("tugi_restaurants"));
    }

    #[test]
    fn env_overrides_fill_lists_and_numbers() {
        std::env::set_var("TUGI_CONFIG", "config/does-not-exist");
        std::env::set_var("TUGI__ALLOWED_ORIGINS", "http://a.test,http://b.test");
        std::env::set_var("TUGI__PORT", "8080");
        std::env::set_var("TUGI__FIRESTORE__PROJECT_ID", "ddugidata");
        let loaded = CoreConfig::load();
        for key in ["TUGI_CONFIG", "TUGI__ALLOWED_ORIGINS", "TUGI__PORT", "TUGI__FIRESTORE__PROJECT_ID"] {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(config.allowed_origins, vec!["http://a.test".to_string(), "http://b.test".to_string()]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.firestore.project_id, "ddugidata");
        assert_eq!(config.firestore.app_id, "ddugi");
    }
}
