//! # Spotify
//!
//! Catalogue search by proxy, so the client secret never reaches the frontend.
//!
//! ## Flow
//! 1. Client credentials grant against the accounts service for an app token
//! 2. `GET /v1/search` with that token, top 5 hits for the requested type
//! 3. Upstream JSON goes back to the caller untouched
//!
//! A fresh token is requested for every search.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{config::SpotifyConfig, error::AppError};

pub const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Deserialize, Serialize)]
pub struct CatalogueQuery {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(http: Client, config: SpotifyConfig) -> Self {
        Self { http, config }
    }

    async fn access_token(&self) -> Result<String, AppError> {
        let token: TokenResponse = self
            .http
            .post(format!("{}/api/token", self.config.accounts_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(token.access_token)
    }

    pub async fn search(&self, query: &CatalogueQuery) -> Result<Value, AppError> {
        let access_token = self.access_token().await?;

        let results: Value = self
            .http
            .get(format!("{}/v1/search", self.config.api_url))
            .query(&[
                ("q", query.query.as_str()),
                ("type", query.kind.as_str()),
                ("limit", SEARCH_LIMIT),
            ])
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        #[cfg(feature = "verbose")]
        tracing::info!("Spotify search result: {:?}", results);

        Ok(results)
    }
}
