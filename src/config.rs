use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::DEFAULT_TEMPERATURE;
use crate::backend::openai::DEFAULT_BASE_URL;
use crate::logging::DEFAULT_LOG_FILE;
use crate::models::{ModelRegistry, ModelSpec};
use crate::rag::{KnowledgeBase, KnowledgeEntry, RAGConfig, ScorerKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_models")]
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub rag: RagSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Answer from the in-process scripted backend instead of the network
    pub offline: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub model: String,
    pub max_tokens: u32,
    pub top_k: usize,
    pub scorer: ScorerKind,
    /// Instruction template; `{context}` marks where passages go
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Replaces the built-in knowledge base when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<Vec<KnowledgeEntry>>,
}

impl Default for RagSettings {
    fn default() -> Self {
        let defaults = RAGConfig::default();
        Self {
            model: defaults.model,
            max_tokens: defaults.max_tokens,
            top_k: defaults.top_k,
            scorer: ScorerKind::default(),
            template: None,
            knowledge: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory of the request log
    pub dir: PathBuf,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

fn default_models() -> Vec<ModelSpec> {
    ModelRegistry::default().specs().to_vec()
}

impl Config {
    /// Load configuration from `path`, or from the default location
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::config_path()?;
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Invalid TOML")?;
        config.registry()?;
        if config.rag.top_k == 0 {
            bail!("rag.top_k must be at least 1");
        }
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Save to `path` unless a file is already there and `force` is false
    pub fn init(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        self.save(path)
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".fanout-rag").join("config.toml"))
    }

    /// Model registry declared by `[[models]]`
    pub fn registry(&self) -> Result<ModelRegistry> {
        if self.models.is_empty() {
            bail!("at least one [[models]] entry is required");
        }
        ModelRegistry::new(self.models.clone()).context("Invalid model registry")
    }

    /// Knowledge base from `[rag]`, or the built-in one
    pub fn knowledge_base(&self) -> KnowledgeBase {
        match &self.rag.knowledge {
            Some(entries) => KnowledgeBase::new(entries.clone()),
            None => KnowledgeBase::default(),
        }
    }

    /// RAG pipeline settings
    pub fn rag_config(&self) -> RAGConfig {
        RAGConfig {
            model: self.rag.model.clone(),
            max_tokens: self.rag.max_tokens,
            temperature: self.backend.temperature,
            top_k: self.rag.top_k,
        }
    }

    /// Backend request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    /// API key from the configured environment variable
    ///
    /// Offline runs need no key.
    pub fn api_key(&self) -> Result<Option<String>> {
        if self.backend.offline {
            return Ok(None);
        }
        match std::env::var(&self.backend.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            _ => bail!(
                "{} is not set in environment variables (use --offline to run without a backend)",
                self.backend.api_key_env
            ),
        }
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            models: default_models(),
            rag: RagSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.rag.top_k, 2);
        assert_eq!(config.logging.file, "api.log");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.registry().unwrap().len(), 2);
        assert_eq!(config.rag.scorer, ScorerKind::Lexical);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [rag]
            scorer = "random"
            top_k = 1

            [[models]]
            id = "primary"
            fallback = "backup"
            max_tokens = 1000

            [[models]]
            id = "backup"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rag.scorer, ScorerKind::Random);
        assert_eq!(config.rag_config().top_k, 1);

        let registry = config.registry().unwrap();
        assert_eq!(registry.get("backup").unwrap().max_tokens, 4000);
    }

    #[test]
    fn test_dangling_fallback_rejected() {
        let result = Config::from_toml(
            r#"
            [[models]]
            id = "primary"
            fallback = "missing"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        assert!(Config::from_toml("[rag]\ntop_k = 0").is_err());
    }

    #[test]
    fn test_custom_knowledge() {
        let config = Config::from_toml(
            r#"
            [[rag.knowledge]]
            title = "Rust"
            content = "Ownership without a garbage collector."
            "#,
        )
        .unwrap();
        let kb = config.knowledge_base();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.entries()[0].title, "Rust");
    }

    #[test]
    fn test_offline_needs_no_key() {
        let mut config = Config::default();
        config.backend.offline = true;
        assert!(config.api_key().unwrap().is_none());
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let mut config = Config::default();
        config.backend.api_key_env = "FANOUT_RAG_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("FANOUT_RAG_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.port = 9999;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 9999);
        assert_eq!(loaded.models, config.models);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.init(&path, false).unwrap();

        config.server.port = 8081;
        assert!(config.init(&path, false).is_err());
        assert_eq!(Config::load(Some(&path)).unwrap().server.port, 3000);

        config.init(&path, true).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().server.port, 8081);
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("absent.toml"))).is_err());
    }
}
