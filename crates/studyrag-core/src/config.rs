//! Configuration loader and retrieval tuning knobs.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars. Provides helpers to expand `~` and `${VAR}` and to resolve relative
//! paths against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// Tuning knobs for segmentation, encoding, retrieval, and caching.
///
/// Loaded from the `[retrieval]` table when present; every field has a
/// default so a missing config file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub chunk_target_size: usize,
    pub chunk_overlap: usize,
    pub vector_dim: usize,
    pub top_k: usize,
    pub cache_ttl_ms: u64,
    pub cache_max_entries: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_target_size: 600,
            chunk_overlap: 100,
            vector_dim: 100,
            top_k: 3,
            cache_ttl_ms: 86_400_000,
            cache_max_entries: 100,
        }
    }
}

impl RetrievalConfig {
    /// Reads the `retrieval` table, falling back to defaults for absent keys.
    pub fn from_config(config: &Config) -> Self {
        config.get("retrieval").unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_target_size == 0 {
            return Err(Error::InvalidConfig(
                "chunk_target_size must be non-zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_target_size {
            return Err(Error::InvalidConfig(
                "chunk_overlap must be smaller than chunk_target_size".to_string(),
            ));
        }
        if self.vector_dim == 0 {
            return Err(Error::InvalidConfig("vector_dim must be non-zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be non-zero".to_string()));
        }
        if self.cache_max_entries == 0 {
            return Err(Error::InvalidConfig(
                "cache_max_entries must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
