use std::path::Path;

use serde::Deserialize;

use wordrivers_core::analytics::DEFAULT_MAX_RECORDS;
use wordrivers_core::bridge::TRUSTED_ORIGIN;
use wordrivers_core::page::DEFAULT_UTM_SOURCE;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "wordrivers.toml";

/// Top-level server configuration, loaded from `wordrivers.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub site: SiteConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            web_root: "web".to_string(),
            site: SiteConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Embedding and attribution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// The only origin allowed to frame-message the page, and the only
    /// third-party origin allowed in `frame-src`.
    pub trusted_origin: String,
    /// Appended to embed URLs as `utm_source`. Empty disables tagging.
    pub utm_source: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            trusted_origin: TRUSTED_ORIGIN.to_string(),
            utm_source: DEFAULT_UTM_SOURCE.to_string(),
        }
    }
}

/// Request and storage limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Diagnostic analytics records kept in memory.
    pub max_analytics_records: usize,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    /// POST endpoints: max burst tokens per IP.
    pub submit_rate_limit_burst: usize,
    /// POST endpoints: token refill rate (requests per second) per IP.
    pub submit_rate_limit_per_sec: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_analytics_records: DEFAULT_MAX_RECORDS,
            request_timeout_secs: 10,
            max_body_bytes: 16 * 1024,
            submit_rate_limit_burst: 30,
            submit_rate_limit_per_sec: 1.0,
        }
    }
}

impl ServerConfig {
    /// Problems that make the configuration unusable. Empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!(
                "listen_addr is not a valid socket address: {}",
                self.listen_addr
            ));
        }
        if !(self.site.trusted_origin.starts_with("https://")
            || self.site.trusted_origin.starts_with("http://"))
        {
            problems.push(format!(
                "site.trusted_origin must be an http(s) origin: {}",
                self.site.trusted_origin
            ));
        }
        if self.site.trusted_origin.ends_with('/') {
            problems.push("site.trusted_origin must not end with '/'".to_string());
        }
        if self.limits.max_analytics_records == 0 {
            problems.push("limits.max_analytics_records must be > 0".to_string());
        }
        if self.limits.request_timeout_secs == 0 {
            problems.push("limits.request_timeout_secs must be > 0".to_string());
        }
        if self.limits.max_body_bytes == 0 {
            problems.push("limits.max_body_bytes must be > 0".to_string());
        }
        if self.limits.submit_rate_limit_burst == 0 {
            problems.push("limits.submit_rate_limit_burst must be > 0".to_string());
        }
        if self.limits.submit_rate_limit_per_sec < 0.0 {
            problems.push("limits.submit_rate_limit_per_sec must be >= 0".to_string());
        }

        if !Path::new(&self.web_root).is_dir() {
            tracing::warn!(web_root = %self.web_root, "web_root does not exist, only the API will be served");
        }

        problems
    }

    /// Load `wordrivers.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file(Path::new(CONFIG_FILE));
        config.apply_env();
        config
    }

    /// Parse a config file, falling back to defaults when missing or invalid.
    pub fn load_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to parse config: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                ServerConfig::default()
            },
        }
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("WORDRIVERS_LISTEN_ADDR")
            && !addr.is_empty()
        {
            self.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("WORDRIVERS_WEB_ROOT")
            && !root.is_empty()
        {
            self.web_root = root;
        }
        if let Ok(origin) = std::env::var("WORDRIVERS_TRUSTED_ORIGIN")
            && !origin.is_empty()
        {
            self.site.trusted_origin = origin;
        }
        if let Ok(val) = std::env::var("WORDRIVERS_MAX_ANALYTICS_RECORDS")
            && let Ok(n) = val.parse::<usize>()
        {
            self.limits.max_analytics_records = n;
        }
    }
}
