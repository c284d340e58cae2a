mod basic;
mod search;

pub use basic::BasicConfig;
pub use search::SearchConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Storage and logging settings (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Remote catalog settings (see `search` table in config.toml).
    #[serde(default)]
    pub search: SearchConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "MIXOLOGY_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// `MIXOLOGY_`-prefixed environment variables (`__` separates tables, e.g.
    /// `MIXOLOGY_SEARCH__TIMEOUT_SECS=3`).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, `config.toml` if present, and the environment.
    pub fn load() -> Self {
        Self::figment()
            .extract()
            .unwrap_or_else(|err| panic!("failed to extract configuration: {err}"))
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);
