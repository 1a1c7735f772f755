use serde::Deserialize;

use crate::engine::EngineConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the cleaned movie catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Minimum fuzzy ratio for a query to resolve to a title
    #[serde(default = "default_match_cutoff")]
    pub match_cutoff: f64,

    /// Number of recommendations when the request does not say
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Largest number of recommendations a single request may ask for
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Overview length cap for each recommendation
    #[serde(default = "default_overview_max_chars")]
    pub overview_max_chars: usize,

    /// Number of incremental-search suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Build the similarity index before serving instead of on first request
    #[serde(default = "default_warm_up_on_start")]
    pub warm_up_on_start: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_match_cutoff() -> f64 {
    0.6
}

fn default_top_n() -> usize {
    10
}

fn default_max_top_n() -> usize {
    100
}

fn default_overview_max_chars() -> usize {
    200
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_warm_up_on_start() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            catalog_path: default_catalog_path(),
            match_cutoff: default_match_cutoff(),
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            overview_max_chars: default_overview_max_chars(),
            suggestion_limit: default_suggestion_limit(),
            warm_up_on_start: default_warm_up_on_start(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the engine cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.match_cutoff > 0.0 && self.match_cutoff <= 1.0) {
            anyhow::bail!(
                "MATCH_CUTOFF must be in (0, 1], got {}",
                self.match_cutoff
            );
        }
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be greater than zero");
        }
        if self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N ({}) exceeds MAX_TOP_N ({})",
                self.default_top_n,
                self.max_top_n
            );
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            match_cutoff: self.match_cutoff,
            overview_max_chars: self.overview_max_chars,
        }
    }
}
