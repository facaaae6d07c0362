//! SWAPI client: film listing and name-filtered entity lookups.
//!
//! The client returns whatever the remote service returns for a query; exact
//! name matching is done by the caller.

use std::future::Future;
use std::time::Duration;

use futures_util::future::try_join3;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::error::SwapiError;
use crate::model::{Entity, EntityKind, Film, SwapiPage};

pub use reqwest::StatusCode;

/// Anything that can answer a name-filtered entity lookup.
pub trait EntitySource: Send + Sync + 'static {
    fn search(
        &self,
        kind: EntityKind,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Entity>, SwapiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SwapiClient {
    http: reqwest::Client,
    base_url: String,
    max_pages: usize,
}

impl SwapiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, SwapiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(SwapiError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_pages: config.max_pages.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full film collection.
    pub async fn fetch_films(&self) -> Result<Vec<Film>, SwapiError> {
        let url = format!("{}/films/", self.base_url);
        let films: Vec<Film> = self.fetch_paged(&url, None).await?;
        debug!("[swapi] fetched {} films", films.len());
        Ok(films)
    }

    /// Name-filtered lookup against one entity collection, in source order.
    pub async fn search(&self, kind: EntityKind, term: &str) -> Result<Vec<Entity>, SwapiError> {
        let url = format!("{}/{}/", self.base_url, kind.collection());
        let results: Vec<Entity> = self.fetch_paged(&url, Some(term)).await?;
        debug!(
            "[swapi] search {} {:?} -> {} results",
            kind.collection(),
            term,
            results.len()
        );
        Ok(results)
    }

    /// Run the three entity lookups concurrently: (people, starships, vehicles).
    pub async fn search_all(
        &self,
        term: &str,
    ) -> Result<(Vec<Entity>, Vec<Entity>, Vec<Entity>), SwapiError> {
        try_join3(
            self.search(EntityKind::Person, term),
            self.search(EntityKind::Starship, term),
            self.search(EntityKind::Vehicle, term),
        )
        .await
    }

    /// GET `url` and follow `next` links, up to `max_pages` pages.
    async fn fetch_paged<T: DeserializeOwned>(
        &self,
        url: &str,
        search: Option<&str>,
    ) -> Result<Vec<T>, SwapiError> {
        let mut results = Vec::new();

        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }
        let mut page: SwapiPage<T> = self.send(url, request).await?;

        let mut pages = 1;
        loop {
            results.append(&mut page.results);
            let next = match page.next.take() {
                Some(next) if pages < self.max_pages => next,
                _ => break,
            };
            trace!("[swapi] following next page {}", next);
            let request = self.http.get(&next).header("Accept", "application/json");
            page = self.send(&next, request).await?;
            pages += 1;
        }

        Ok(results)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<SwapiPage<T>, SwapiError> {
        let response = request.send().await.map_err(|source| SwapiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(SwapiError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.json().await.map_err(|source| SwapiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl EntitySource for SwapiClient {
    fn search(
        &self,
        kind: EntityKind,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Entity>, SwapiError>> + Send {
        SwapiClient::search(self, kind, term)
    }
}
