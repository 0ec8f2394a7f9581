use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    form: FormLimits,
    #[serde(default)]
    images: ImageSettings,
}

/// Advisory bounds for the course text fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormLimits {
    title_min_len: usize,
    title_max_len: usize,
    description_max_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    max_bytes: u64,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            title_min_len: 3,
            title_max_len: 300,
            description_max_len: 1000,
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(use_local) {
                    Ok(c) => c,
                    Err(ConfigError::ConfigNotFound) => {
                        tracing::debug!("config not found, using defaults");
                        Self::default()
                    }
                    Err(e) => {
                        crate::error::log_error(&e);
                        tracing::error!("Config is invalid.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        let config: Self = toml::from_slice(&bytes)?;
        Ok(config)
    }

    pub fn from_toml(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    #[inline]
    pub fn form(&self) -> &FormLimits {
        &self.form
    }

    #[inline]
    pub fn images(&self) -> &ImageSettings {
        &self.images
    }
}

impl FormLimits {
    pub fn new(title_min_len: usize, title_max_len: usize, description_max_len: usize) -> Self {
        Self {
            title_min_len,
            title_max_len,
            description_max_len,
        }
    }

    #[inline]
    pub fn title_min_len(&self) -> usize {
        self.title_min_len
    }

    #[inline]
    pub fn title_max_len(&self) -> usize {
        self.title_max_len
    }

    #[inline]
    pub fn description_max_len(&self) -> usize {
        self.description_max_len
    }
}

impl ImageSettings {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    #[inline]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}
