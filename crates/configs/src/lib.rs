use anyhow::{Context, Result};
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Directory with the browser client; served as a fallback when present.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
        }
    }
}

/// Where reviews live between restarts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process memory only; lost on restart.
    #[default]
    Memory,
    /// A single JSON array file rewritten on every mutation.
    File,
}

/// How new review ids are produced.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Uuid,
}

/// What the file backend does when writing the collection fails.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Log the failure and report success; the in-memory state stands.
    #[default]
    FailOpen,
    /// Surface the failure and leave the in-memory state untouched.
    FailClosed,
}

/// Rating acceptance rule.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RatingPolicy {
    /// Integer in `0..=5`.
    #[default]
    Strict,
    /// Any integer.
    Lenient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_reviews_file")]
    pub file_path: String,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default)]
    pub write_failure: WriteFailurePolicy,
    #[serde(default)]
    pub rating_policy: RatingPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            file_path: default_reviews_file(),
            id_strategy: IdStrategy::default(),
            write_failure: WriteFailurePolicy::default(),
            rating_policy: RatingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_reviews_file() -> String { "data/reviews.json".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {path}"))?;
    load_from_str(&content).with_context(|| format!("invalid config file {path}"))
}

/// Like [`load_from_file`], but a file that does not exist yields the
/// built-in defaults. Any other read or parse failure is returned.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_missing_file(&e) => Ok(AppConfig::default()),
        Err(e) => Err(e),
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file (`CONFIG_PATH` or `config.toml`) if present, built-in
    /// defaults when it is missing; environment variables override either.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path(), |key| std::env::var(key).ok())
    }

    pub fn load_and_validate_from<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = load_or_default(path)?;
        cfg.apply_overrides(lookup)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `SERVER_*`, `REVIEWS_*` and `LOG_FORMAT` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be an integer in 1..=65535, got {port:?}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = threads.trim().parse().ok();
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = dir;
        }
        if let Some(v) = lookup("REVIEWS_BACKEND") {
            self.storage.backend = parse_choice("REVIEWS_BACKEND", &v)?;
        }
        if let Some(v) = lookup("REVIEWS_FILE") {
            self.storage.file_path = v;
        }
        if let Some(v) = lookup("REVIEWS_ID_STRATEGY") {
            self.storage.id_strategy = parse_choice("REVIEWS_ID_STRATEGY", &v)?;
        }
        if let Some(v) = lookup("REVIEWS_WRITE_POLICY") {
            self.storage.write_failure = parse_choice("REVIEWS_WRITE_POLICY", &v)?;
        }
        if let Some(v) = lookup("REVIEWS_RATING_POLICY") {
            self.storage.rating_policy = parse_choice("REVIEWS_RATING_POLICY", &v)?;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = parse_choice("LOG_FORMAT", &v)?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

/// Reuse the serde names of a unit enum for environment values.
fn parse_choice<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    let value = raw.trim().to_ascii_lowercase().replace('-', "_");
    T::deserialize(toml::Value::String(value))
        .map_err(|_| anyhow!("{key} has unsupported value {raw:?}"))
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::File && self.file_path.trim().is_empty() {
            return Err(anyhow!("storage.file_path is required when storage.backend = \"file\""));
        }
        Ok(())
    }
}
