use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::domain::analysis_config::{AnalysisSettings, DataPaths};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use crate::infrastructure::security::keyring::{KeyringManager, SecretStore};

pub const DEFAULT_CONFIG_FILE: &str = "sensor-rca.toml";
pub const ENV_PREFIX: &str = "SENSOR_RCA_";
const KEYRING_SERVICE: &str = "sensor-rca";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub data: DataPaths,
    #[validate(nested)]
    pub llm: LLMConfig,
    #[validate(nested)]
    pub analysis: AnalysisSettings,
}

pub struct ConfigService {
    secrets: Box<dyn SecretStore + Send + Sync>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_store(Box::new(KeyringManager::new(KEYRING_SERVICE)))
    }

    pub fn with_store(secrets: Box<dyn SecretStore + Send + Sync>) -> Self {
        Self { secrets }
    }

    /// Defaults, then the TOML file, then `SENSOR_RCA_*` variables.
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration. An explicitly given file must exist;
    /// the default file is optional.
    pub fn load(&self, explicit_file: Option<&Path>) -> Result<AppConfig> {
        let config_file = match explicit_file {
            Some(path) if !path.exists() => {
                return Err(AppError::ConfigError(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => path,
            None => Path::new(DEFAULT_CONFIG_FILE),
        };
        debug!(config_file = %config_file.display(), "Loading configuration");

        let config: AppConfig = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Fill `llm.api_key` from the keyring when the provider needs one and
    /// neither the file nor the environment supplied it.
    pub fn resolve_api_key(&self, llm: &mut LLMConfig) -> Result<()> {
        if llm.api_key.as_deref().map_or(false, |k| !k.trim().is_empty()) {
            return Ok(());
        }
        if !llm.provider.requires_api_key() {
            return Ok(());
        }

        match self.secrets.get_secret(llm.provider.key_name())? {
            Some(key) => {
                info!(provider = llm.provider.key_name(), "Using API key from keyring");
                llm.api_key = Some(key);
                Ok(())
            }
            None => Err(AppError::ConfigError(format!(
                "Missing API key for provider '{}': set {}LLM__API_KEY or run `sensor-rca set-key --provider {}`",
                llm.provider.key_name(),
                ENV_PREFIX,
                llm.provider.key_name()
            ))),
        }
    }

    pub fn save_api_key(&self, provider: LLMProvider, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(AppError::ValidationError("API key is empty".to_string()));
        }
        self.secrets.set_secret(provider.key_name(), key.trim())
    }

    pub fn delete_api_key(&self, provider: LLMProvider) -> Result<()> {
        self.secrets.delete_secret(provider.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore(Mutex<HashMap<String, String>>);

    impl SecretStore for MemoryStore {
        fn set_secret(&self, key: &str, secret: &str) -> Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), secret.to_string());
            Ok(())
        }

        fn get_secret(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        fn delete_secret(&self, key: &str) -> Result<()> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn test_defaults_without_file() {
        figment::Jail::expect_with(|_jail| {
            let config = ConfigService::with_store(Box::new(MemoryStore::default()))
                .load(None)
                .expect("defaults load");
            assert_eq!(config.data.sensor_config, "sensor_config.csv");
            assert_eq!(config.analysis.trailing_samples, 3);
            assert_eq!(config.analysis.correlation_threshold, 0.9);
            assert_eq!(config.llm.provider, LLMProvider::Local);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [llm]
                provider = "azure"
                base_url = "https://example.openai.azure.com"
                model = "gpt-4o"

                [analysis]
                correlation_threshold = 0.8
                "#,
            )?;
            jail.set_env("SENSOR_RCA_LLM__MODEL", "gpt-4o-mini");
            jail.set_env("SENSOR_RCA_DATA__DIR", "exports");

            let config = ConfigService::with_store(Box::new(MemoryStore::default()))
                .load(None)
                .expect("layered load");
            assert_eq!(config.llm.provider, LLMProvider::AzureOpenAI);
            assert_eq!(config.llm.model, "gpt-4o-mini");
            assert_eq!(config.analysis.correlation_threshold, 0.8);
            assert_eq!(config.data.dir, std::path::PathBuf::from("exports"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SENSOR_RCA_ANALYSIS__CORRELATION_THRESHOLD", "1.5");
            let err = ConfigService::with_store(Box::new(MemoryStore::default()))
                .load(None)
                .unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let service = ConfigService::with_store(Box::new(MemoryStore::default()));
        let err = service
            .load(Some(Path::new("/definitely/not/here.toml")))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_api_key_from_store() {
        let store = MemoryStore::default();
        store.set_secret("azure", "from-keyring").unwrap();
        let service = ConfigService::with_store(Box::new(store));

        let mut llm = LLMConfig {
            provider: LLMProvider::AzureOpenAI,
            ..Default::default()
        };
        service.resolve_api_key(&mut llm).unwrap();
        assert_eq!(llm.api_key.as_deref(), Some("from-keyring"));
    }

    #[test]
    fn test_configured_key_wins() {
        let store = MemoryStore::default();
        store.set_secret("openai", "from-keyring").unwrap();
        let service = ConfigService::with_store(Box::new(store));

        let mut llm = LLMConfig {
            provider: LLMProvider::OpenAI,
            api_key: Some("from-env".to_string()),
            ..Default::default()
        };
        service.resolve_api_key(&mut llm).unwrap();
        assert_eq!(llm.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let service = ConfigService::with_store(Box::new(MemoryStore::default()));
        let mut llm = LLMConfig {
            provider: LLMProvider::OpenAI,
            ..Default::default()
        };
        let err = service.resolve_api_key(&mut llm).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(ref msg) if msg.contains("set-key")));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let service = ConfigService::with_store(Box::new(MemoryStore::default()));
        let mut llm = LLMConfig::default();
        service.resolve_api_key(&mut llm).unwrap();
        assert!(llm.api_key.is_none());
    }
}
