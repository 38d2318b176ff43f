use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_STORE_PATH: &str = "cineshelf.json";

/// How requests to TMDB are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v4 read access token, sent as `Authorization: Bearer`.
    AccessToken(String),
    /// v3 key, sent as the `api_key` query parameter.
    ApiKey(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub tmdb_base: String,
    pub store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty("TMDB_ACCESS_TOKEN"), non_empty("TMDB_API_KEY")) {
            (Some(token), _) => Credentials::AccessToken(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => {
                return Err(anyhow!(
                    "Missing TMDB credentials: set TMDB_ACCESS_TOKEN or TMDB_API_KEY"
                ))
            }
        };
        let tmdb_base = non_empty("TMDB_BASE_URL")
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());
        let store_path = non_empty("CINESHELF_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        Ok(Self {
            credentials,
            tmdb_base,
            store_path,
        })
    }
}
