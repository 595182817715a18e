//! Data access for the episode catalog: the [`CatalogSource`] seam, its
//! reqwest-backed implementation, and the character-page loader built on it.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{Character, CharacterPage, EpisodeId, EpisodePage, PageRef},
    error::ApiErrorBody,
    paging::{local_page_info, slice_page, CHARACTERS_PER_PAGE},
    protocol::{EpisodeDetail, EpisodeListResponse},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;

pub use config::{load_settings, ClientConfig};
pub use error::{ConfigError, FetchError, FetchErrorKind};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One page of episodes. `None` is the first page.
    async fn fetch_episodes(&self, page: Option<&PageRef>) -> Result<EpisodePage, FetchError>;
    async fn fetch_episode_character_urls(
        &self,
        episode_id: EpisodeId,
    ) -> Result<Vec<String>, FetchError>;
    async fn fetch_character(&self, url: &str) -> Result<Character, FetchError>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn episode_list_url(&self, page: Option<&PageRef>) -> Result<String, FetchError> {
        let list_url = format!("{}/episode", self.base_url);
        match page {
            None => Ok(list_url),
            Some(PageRef::Link(link)) => Ok(link.clone()),
            Some(PageRef::Number(number)) => {
                let mut url = Url::parse(&list_url).map_err(|source| FetchError::InvalidUrl {
                    url: list_url.clone(),
                    source,
                })?;
                url.query_pairs_mut()
                    .append_pair("page", &number.to_string());
                Ok(url.into())
            }
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let response =
            self.http
                .get(parsed)
                .send()
                .await
                .map_err(|source| FetchError::Network {
                    url: url.to_string(),
                    source,
                })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            warn!(url, status = status.as_u16(), "catalog request rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_episodes(&self, page: Option<&PageRef>) -> Result<EpisodePage, FetchError> {
        let url = self.episode_list_url(page)?;
        debug!(%url, "fetching episode page");
        let response: EpisodeListResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn fetch_episode_character_urls(
        &self,
        episode_id: EpisodeId,
    ) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/episode/{}", self.base_url, episode_id.0);
        let detail: EpisodeDetail = self.get_json(&url).await?;
        Ok(detail.characters)
    }

    async fn fetch_character(&self, url: &str) -> Result<Character, FetchError> {
        self.get_json(url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get_bytes(url).await
    }
}

/// Resolves every character of `episode_id` and returns the requested page.
///
/// All character urls are fetched concurrently and the first failure aborts
/// the whole batch, so a page is either complete or an error.
pub async fn load_character_page<S>(
    source: &S,
    episode_id: EpisodeId,
    page: u32,
) -> Result<CharacterPage, FetchError>
where
    S: CatalogSource + ?Sized,
{
    let urls = source.fetch_episode_character_urls(episode_id).await?;
    let characters = try_join_all(urls.iter().map(|url| source.fetch_character(url))).await?;

    let page = page.max(1);
    let page_info = local_page_info(characters.len(), page, CHARACTERS_PER_PAGE);
    info!(
        episode_id = episode_id.0,
        page,
        total = characters.len(),
        "resolved episode characters"
    );
    Ok(CharacterPage {
        episode_id,
        page,
        characters: slice_page(&characters, page, CHARACTERS_PER_PAGE),
        total_count: page_info.total_count,
        page_info,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
