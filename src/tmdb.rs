use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{StatusCode, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::models::{Candidate, MovieDetails, release_year};

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("That movie could not be found on TMDB.")]
    NotFound,
    #[error("The movie metadata service is unavailable ({0}). Please try again later.")]
    Unavailable(String),
    #[error("The movie metadata service sent an unexpected response ({0}).")]
    Malformed(String),
}

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, access_token, base_url, image_base_url, limiter }
    }

    pub async fn search(&self, title: &str) -> Result<Vec<Candidate>, TmdbError> {
        debug!(title = %title, "searching TMDB");
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self.get_json(&url, &[("query", title)]).await?;
        debug!(title = %title, results = resp.results.len(), "TMDB search complete");
        Ok(resp.results)
    }

    pub async fn fetch(&self, tmdb_id: i64) -> Result<MovieDetails, TmdbError> {
        debug!(tmdb_id = tmdb_id, "fetching TMDB movie");
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), tmdb_id);
        let movie: MovieResponse = self.get_json(&url, &[]).await?;

        let year = movie
            .release_date
            .as_deref()
            .and_then(release_year)
            .ok_or_else(|| TmdbError::Malformed("missing release date".to_string()))?;

        let img_url = match movie.poster_path.as_deref() {
            Some(path) if !path.is_empty() => {
                format!("{}{}", self.image_base_url.trim_end_matches('/'), path)
            },
            _ => String::new(),
        };

        Ok(MovieDetails {
            title: movie.title,
            year,
            description: movie.overview.unwrap_or_default(),
            img_url,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|err| {
                warn!(url = %url, error = %err, "TMDB request failed");
                TmdbError::Unavailable(if err.is_timeout() {
                    "timed out".to_string()
                } else {
                    "connection failed".to_string()
                })
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TmdbError::NotFound);
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "TMDB returned an error status");
            return Err(TmdbError::Unavailable(format!("HTTP {}", status.as_u16())));
        }

        let body = resp.bytes().await.map_err(|err| {
            warn!(url = %url, error = %err, "failed reading TMDB response");
            TmdbError::Unavailable("response interrupted".to_string())
        })?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!(url = %url, error = %err, "unexpected TMDB payload");
            TmdbError::Malformed(err.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}
