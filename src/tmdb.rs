use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Config, Credentials, DEFAULT_TMDB_BASE};
use crate::error::CatalogError;
use crate::models::{MovieDetail, MovieSummary};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base: String,
    credentials: Credentials,
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_movie_details(&self, id: &str) -> Result<MovieDetail, CatalogError>;
    async fn fetch_movies(&self, query: Option<&str>) -> Result<Vec<MovieSummary>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct MovieList {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

impl TmdbClient {
    pub fn new(credentials: Credentials, base: impl Into<String>) -> Result<Self, CatalogError> {
        let user_agent = format!("cineshelf/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(CatalogError::Network)?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        Self::new(config.credentials.clone(), config.tmdb_base.clone())
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Self::new(Credentials::ApiKey(api_key.into()), DEFAULT_TMDB_BASE)
    }

    /// Untyped body of `/movie/{id}`, for inspecting what TMDB sends.
    pub async fn fetch_movie_raw(&self, id: &str) -> Result<serde_json::Value, CatalogError> {
        let movie_id = parse_tmdb_id(id).ok_or_else(|| CatalogError::InvalidId(id.to_string()))?;
        self.get_json(&format!("/movie/{movie_id}"), &[], Some(id)).await
    }

    fn request(&self, path: &str, params: &[(&str, &str)]) -> RequestBuilder {
        let mut url = format!("{}{path}?language=en-US", self.base);
        for (k, v) in params {
            url.push_str(&format!("&{k}={}", urlencoding::encode(v)));
        }
        match &self.credentials {
            Credentials::AccessToken(token) => self.client.get(url).bearer_auth(token),
            Credentials::ApiKey(key) => {
                url.push_str(&format!("&api_key={}", urlencoding::encode(key)));
                self.client.get(url)
            }
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        id: Option<&str>,
    ) -> Result<T, CatalogError> {
        let res = self
            .request(path, params)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(CatalogError::Network)?;
        let status = res.status();
        let text = res.text().await.map_err(CatalogError::Network)?;
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                id: id.unwrap_or(path).to_string(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        let parsed: T = serde_json::from_str(&text)?;
        Ok(parsed)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_movie_details(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let movie_id = parse_tmdb_id(id).ok_or_else(|| CatalogError::InvalidId(id.to_string()))?;
        info!("Fetching TMDB details for movie {}", movie_id);
        let detail: MovieDetail = self
            .get_json(&format!("/movie/{movie_id}"), &[], Some(id))
            .await?;
        debug!(tmdb_id = detail.id(), title = %detail.title(), "Fetched movie details");
        Ok(detail)
    }

    async fn fetch_movies(&self, query: Option<&str>) -> Result<Vec<MovieSummary>, CatalogError> {
        let list: MovieList = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                info!("Searching TMDB for '{}'", q);
                self.get_json("/search/movie", &[("query", q)], None).await?
            }
            None => {
                info!("Fetching popular movies from TMDB");
                self.get_json("/discover/movie", &[("sort_by", "popularity.desc")], None)
                    .await?
            }
        };
        Ok(list.results)
    }
}

/// Accepts only a bare numeric TMDB id.
pub fn parse_tmdb_id(input: &str) -> Option<i64> {
    let input = input.trim();
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input.parse().ok();
    }
    None
}
