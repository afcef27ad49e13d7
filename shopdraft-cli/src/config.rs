use serde::{Deserialize, Serialize};
use shopdraft_core::{
    DraftStore, FileCache, HttpRemote, IdStrategy, Normalizer, SyncError, UnknownIdPolicy,
    DEFAULT_CACHE_KEY, DEFAULT_PLACEHOLDER_IMAGE,
};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local draft cache
    pub data_dir: ConfigValue<PathBuf>,
    /// Cache key the draft is stored under
    pub cache_key: ConfigValue<String>,
    /// URL of the published product document
    pub remote_url: ConfigValue<Option<String>>,
    /// Image used for products without a usable one
    pub placeholder_image: ConfigValue<String>,
    pub id_strategy: ConfigValue<IdStrategy>,
    pub unknown_id_policy: ConfigValue<UnknownIdPolicy>,
    /// Phone number orders are sent to
    pub whatsapp_number: ConfigValue<Option<String>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    cache_key: Option<String>,
    remote_url: Option<String>,
    placeholder_image: Option<String>,
    id_strategy: Option<IdStrategy>,
    unknown_id_policy: Option<UnknownIdPolicy>,
    whatsapp_number: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut cache_key = ConfigValue::new(DEFAULT_CACHE_KEY.to_string(), ConfigSource::Default);
        let mut remote_url = ConfigValue::new(None, ConfigSource::Default);
        let mut placeholder_image =
            ConfigValue::new(DEFAULT_PLACEHOLDER_IMAGE.to_string(), ConfigSource::Default);
        let mut id_strategy = ConfigValue::new(IdStrategy::default(), ConfigSource::Default);
        let mut unknown_id_policy =
            ConfigValue::new(UnknownIdPolicy::default(), ConfigSource::Default);
        let mut whatsapp_number = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Relative to the config file, not the working directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(key) = file_config.cache_key {
                cache_key = ConfigValue::new(key, ConfigSource::File);
            }
            if let Some(url) = file_config.remote_url {
                remote_url = ConfigValue::new(Some(url), ConfigSource::File);
            }
            if let Some(image) = file_config.placeholder_image {
                placeholder_image = ConfigValue::new(image, ConfigSource::File);
            }
            if let Some(strategy) = file_config.id_strategy {
                id_strategy = ConfigValue::new(strategy, ConfigSource::File);
            }
            if let Some(policy) = file_config.unknown_id_policy {
                unknown_id_policy = ConfigValue::new(policy, ConfigSource::File);
            }
            if let Some(number) = file_config.whatsapp_number {
                whatsapp_number = ConfigValue::new(Some(number), ConfigSource::File);
            }
        }

        if let Ok(dir) = std::env::var("SHOPDRAFT_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("SHOPDRAFT_CACHE_KEY") {
            cache_key = ConfigValue::new(key, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("SHOPDRAFT_REMOTE_URL") {
            remote_url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }
        if let Ok(image) = std::env::var("SHOPDRAFT_PLACEHOLDER_IMAGE") {
            placeholder_image = ConfigValue::new(image, ConfigSource::Environment);
        }
        if let Ok(number) = std::env::var("SHOPDRAFT_WHATSAPP_NUMBER") {
            whatsapp_number = ConfigValue::new(Some(number), ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            cache_key,
            remote_url,
            placeholder_image,
            id_strategy,
            unknown_id_policy,
            whatsapp_number,
            config_file,
        })
    }

    /// Opens the local draft and loads it from the cache.
    pub fn open_draft(&self) -> DraftStore<FileCache> {
        let mut draft = DraftStore::new(FileCache::new(&self.data_dir.value))
            .with_key(self.cache_key.value.as_str())
            .with_normalizer(Normalizer::new(self.placeholder_image.value.as_str()))
            .with_id_strategy(self.id_strategy.value)
            .with_unknown_id_policy(self.unknown_id_policy.value);
        draft.load();
        draft
    }

    /// Builds the HTTP remote for `remote_url`.
    pub fn remote(&self) -> Result<HttpRemote, ConfigError> {
        let url = self
            .remote_url
            .value
            .as_deref()
            .ok_or(ConfigError::MissingRemoteUrl)?;
        HttpRemote::new(url).map_err(ConfigError::InvalidRemoteUrl)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/shopdraft/
    /// - macOS: ~/Library/Application Support/shopdraft/
    /// - Windows: %APPDATA%/shopdraft/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shopdraft")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/shopdraft/
    /// - macOS: ~/Library/Application Support/shopdraft/
    /// - Windows: %APPDATA%/shopdraft/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shopdraft")
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    MissingRemoteUrl,
    InvalidRemoteUrl(SyncError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::MissingRemoteUrl => write!(
                f,
                "No remote configured. Set remote_url in the config file or SHOPDRAFT_REMOTE_URL."
            ),
            ConfigError::InvalidRemoteUrl(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError(_, e) => Some(e),
            ConfigError::ParseError(_, e) => Some(e),
            ConfigError::InvalidRemoteUrl(e) => Some(e),
            ConfigError::MissingRemoteUrl => None,
        }
    }
}
