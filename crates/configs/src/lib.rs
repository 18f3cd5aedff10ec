use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// What to do at startup when the data file exists but cannot be decoded.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OnCorrupt {
    /// Refuse to start.
    #[default]
    Abort,
    /// Move the bad file aside and start with an empty store.
    Discard,
}

impl std::str::FromStr for OnCorrupt {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "discard" => Ok(Self::Discard),
            other => Err(anyhow!("storage.on_corrupt must be `abort` or `discard`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default)]
    pub on_corrupt: OnCorrupt,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), on_corrupt: OnCorrupt::default() }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/todos.json")
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); when it is absent, start from
    /// defaults. Env overrides are applied on top, then everything is validated.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (env var name -> value). A value that is
    /// present but does not parse is an error, never silently skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT is not a valid port: {port}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            let w = threads
                .parse()
                .map_err(|_| anyhow!("TOKIO_WORKER_THREADS is not a thread count: {threads}"))?;
            self.server.worker_threads = Some(w);
        }
        if let Some(file) = lookup("TODOS_FILE") {
            self.storage.data_file = PathBuf::from(file);
        }
        if let Some(policy) = lookup("TODOS_ON_CORRUPT") {
            self.storage.on_corrupt = policy.parse()?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file is empty"));
        }
        if self.data_file.is_dir() {
            let path = self.data_file.display();
            return Err(anyhow!("storage.data_file points at a directory: {path}"));
        }
        Ok(())
    }
}
