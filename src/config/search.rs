use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::matcher::DEFAULT_MAX_DISTANCE;

/// Remote catalog (TheCocktailDB) settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// API root; endpoint paths are joined onto it, so keep the trailing slash.
    /// TOML: `search.base_url`. Default: `https://www.thecocktaildb.com/api/json/v1/1/`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Name search endpoint, queried with `?s=<query>`.
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Full catalog endpoint, queried with `?c=list`.
    #[serde(default = "default_list_path")]
    pub list_path: String,

    /// Per-call timeout for remote requests, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum edit distance for near-miss matches against the cached catalog.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,

    /// Optional upstream HTTP proxy. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Attempts made by the background cache warm-up before giving up.
    #[serde(default = "default_warmup_retry_max_times")]
    pub warmup_retry_max_times: usize,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Same settings, pointed at another API root. Used to aim the client at a local mirror.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            list_path: default_list_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_distance: default_max_distance(),
            proxy: None,
            warmup_retry_max_times: default_warmup_retry_max_times(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://www.thecocktaildb.com/api/json/v1/1/").expect("valid TheCocktailDB base URL")
}

fn default_search_path() -> String {
    "search.php".to_string()
}

fn default_list_path() -> String {
    "list.php".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_max_distance() -> usize {
    DEFAULT_MAX_DISTANCE
}

fn default_warmup_retry_max_times() -> usize {
    3
}
