use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::UpdaterError;

/// Configuration for the exercise video updater
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file settings
    pub catalog: CatalogConfig,

    /// Search endpoint settings
    pub search: SearchConfig,

    /// Update pass settings
    pub update: UpdateConfig,

    /// Logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog that is read and rewritten in place
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search results page
    pub endpoint: String,

    /// Query string parameter carrying the search terms
    pub query_param: String,

    /// Phrase appended to every search to bias results toward instructional videos
    pub bias_phrase: String,

    /// Prefix joined with an extracted video id to form the stored link
    pub video_base_url: String,

    /// User agent sent with search requests
    pub user_agent: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Substring marking a stand-in `videoUrl`
    pub placeholder_marker: String,

    /// Text appended to the exercise name to form the query
    pub query_suffix: String,

    /// Lower bound of the pause between lookups (seconds)
    pub delay_min_seconds: f64,

    /// Upper bound of the pause between lookups (seconds)
    pub delay_max_seconds: f64,

    /// What to do when a lookup fails with a transient error
    pub on_transient_error: TransientErrorPolicy,

    /// Extra attempts per record under the `retry` policy
    pub max_retries: u32,

    /// Maximum number of eligible records looked up per run (None = all)
    pub limit: Option<usize>,

    /// Run lookups but leave the catalog file untouched
    pub dry_run: bool,
}

/// Driver policy for lookups that failed rather than finding nothing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransientErrorPolicy {
    /// Treat as "no video found" and move on
    Skip,
    /// Retry up to `max_retries` more times, then skip
    Retry,
    /// Stop the pass; updates made so far are still saved
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("exercises.json"),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.youtube.com/results".to_string(),
            query_param: "search_query".to_string(),
            bias_phrase: "exercise tutorial".to_string(),
            video_base_url: "https://www.youtube.com/watch?v=".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            placeholder_marker: "example.com".to_string(),
            query_suffix: "exercise tutorial".to_string(),
            delay_min_seconds: 1.5,
            delay_max_seconds: 3.0,
            on_transient_error: TransientErrorPolicy::Skip,
            max_retries: 2,
            limit: None,
            dry_run: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl UpdateConfig {
    /// Pause bounds; negative or non-finite seconds are a config error
    pub fn delay_range(&self) -> crate::error::Result<(Duration, Duration)> {
        let to_duration = |field: &str, secs: f64| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| UpdaterError::Config(format!("{} = {}: {}", field, secs, e)))
        };
        Ok((
            to_duration("delay_min_seconds", self.delay_min_seconds)?,
            to_duration("delay_max_seconds", self.delay_max_seconds)?,
        ))
    }
}

impl Config {
    /// Load configuration from the first config file found in the working directory.
    ///
    /// Returns the config together with the file it came from, if any. A file that
    /// exists but does not parse is an error.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let config_paths = [
            PathBuf::from("exercise-video-updater.toml"),
            PathBuf::from("config/exercise-video-updater.toml"),
        ];
        Self::load_first(&config_paths)
    }

    /// Load the first existing file of `candidates`, or defaults when none exists
    pub fn load_first(candidates: &[PathBuf]) -> Result<(Self, Option<PathBuf>)> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Ok((Self::load_from(path)?, Some(path.clone()))),
            None => Ok((Self::from_env()?, None)),
        }
    }

    /// Load configuration from an explicit file; a missing or invalid file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("EXERCISE_UPDATER_CATALOG") {
            self.catalog.path = PathBuf::from(path);
        }

        if let Ok(min) = std::env::var("EXERCISE_UPDATER_DELAY_MIN") {
            self.update.delay_min_seconds = min
                .parse()
                .with_context(|| format!("Invalid EXERCISE_UPDATER_DELAY_MIN={}", min))?;
        }

        if let Ok(max) = std::env::var("EXERCISE_UPDATER_DELAY_MAX") {
            self.update.delay_max_seconds = max
                .parse()
                .with_context(|| format!("Invalid EXERCISE_UPDATER_DELAY_MAX={}", max))?;
        }

        if let Ok(log_level) = std::env::var("EXERCISE_UPDATER_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        let update = &self.update;
        if !update.delay_min_seconds.is_finite() || update.delay_min_seconds < 0.0 {
            return Err(UpdaterError::Config(
                "delay_min_seconds must be a non-negative number".to_string(),
            ));
        }
        if !update.delay_max_seconds.is_finite() || update.delay_max_seconds < update.delay_min_seconds {
            return Err(UpdaterError::Config(
                "delay_max_seconds must not be below delay_min_seconds".to_string(),
            ));
        }
        if update.placeholder_marker.is_empty() {
            return Err(UpdaterError::Config(
                "placeholder_marker must not be empty".to_string(),
            ));
        }

        let endpoint = url::Url::parse(&self.search.endpoint)
            .map_err(|e| UpdaterError::Config(format!("search endpoint {}: {}", self.search.endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(UpdaterError::Config(format!(
                "search endpoint must be http(s): {}",
                self.search.endpoint
            )));
        }
        if self.search.query_param.is_empty() {
            return Err(UpdaterError::Config("query_param must not be empty".to_string()));
        }
        if self.search.video_base_url.is_empty() {
            return Err(UpdaterError::Config("video_base_url must not be empty".to_string()));
        }
        if self.search.request_timeout_seconds == 0 {
            return Err(UpdaterError::Config(
                "request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Exercise Video Updater Configuration:\n\
            - Catalog: {}\n\
            - Search Endpoint: {}\n\
            - Query Suffix: {}\n\
            - Placeholder Marker: {}\n\
            - Delay: {:.1}s - {:.1}s\n\
            - Transient Errors: {:?}\n\
            - Dry Run: {}",
            self.catalog.path.display(),
            self.search.endpoint,
            self.update.query_suffix,
            self.update.placeholder_marker,
            self.update.delay_min_seconds,
            self.update.delay_max_seconds,
            self.update.on_transient_error,
            self.update.dry_run
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.config.catalog.path = path;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.search.endpoint = endpoint.into();
        self
    }

    pub fn with_delay_range(mut self, min_seconds: f64, max_seconds: f64) -> Self {
        self.config.update.delay_min_seconds = min_seconds;
        self.config.update.delay_max_seconds = max_seconds;
        self
    }

    pub fn with_query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.update.query_suffix = suffix.into();
        self
    }

    pub fn with_transient_error_policy(mut self, policy: TransientErrorPolicy) -> Self {
        self.config.update.on_transient_error = policy;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.config.update.limit = limit;
        self
    }

    pub fn dry_run(mut self, enable: bool) -> Self {
        self.config.update.dry_run = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
