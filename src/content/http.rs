//! HTTP implementation of the content source

use super::traits::ContentSource;
use crate::config::ContentConfig;
use crate::error::{Error, Result};
use crate::types::{LearningGoal, Uid, UnitOfMeaning};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

const LEARNING_GOALS_PATH: &str = "learning_goals";
const UNITS_OF_MEANING_PATH: &str = "units_of_meaning";

/// Content source backed by the static JSON content host
///
/// Records are served at
/// `{base}/learning_goals/{language}/{uid}.json` and
/// `{base}/units_of_meaning/{language}/{uid}.json`.
#[derive(Clone)]
pub struct HttpContentClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpContentClient {
    /// Create a client for the configured content host
    ///
    /// # Errors
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be created
    pub fn new(config: &ContentConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid content base URL '{}': {}", config.base_url, e),
            key: Some("content.base_url".to_string()),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("content base URL '{}' cannot be a base", config.base_url),
                key: Some("content.base_url".to_string()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self { client, base_url })
    }

    /// Base URL all record paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a learning goal record
    pub fn learning_goal_url(&self, language: &str, uid: &Uid) -> Result<Url> {
        self.record_url(LEARNING_GOALS_PATH, language, uid)
    }

    /// URL of a unit of meaning record, using the language encoded in its uid
    pub fn unit_url(&self, uid: &Uid) -> Result<Url> {
        self.record_url(UNITS_OF_MEANING_PATH, uid.language(), uid)
    }

    fn record_url(&self, collection: &str, language: &str, uid: &Uid) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::Config {
                message: format!("content base URL '{}' cannot be a base", self.base_url),
                key: Some("content.base_url".to_string()),
            })?;
            // Path segments are percent-encoded by the url crate
            segments
                .pop_if_empty()
                .push(collection)
                .push(language)
                .push(&format!("{}.json", uid));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(url = %url, "Fetching content record");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(url = %url, "Content request timed out");
            }
            Error::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ContentSource for HttpContentClient {
    async fn fetch_learning_goal(&self, language: &str, uid: &Uid) -> Result<LearningGoal> {
        let url = self.learning_goal_url(language, uid)?;
        self.get_json(url).await
    }

    async fn fetch_unit(&self, uid: &Uid) -> Result<UnitOfMeaning> {
        let url = self.unit_url(uid)?;
        self.get_json(url).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
