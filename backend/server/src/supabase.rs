//! # Supabase
//!
//! Hosted Postgres (exposed through PostgREST) plus the GoTrue identity service.
//!
//! Only two calls are used:
//! - `GET /rest/v1/profiles?id=eq.<id>`: equality-filtered row fetch
//! - `GET /auth/v1/user`: resolves an access token to its user
//!
//! Every request carries the project's anon key in the `apikey` header.
//! Nothing is cached, every lookup is a round trip.
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

use crate::{
    auth::{AuthUser, BearerToken},
    config::SupabaseConfig,
    database::Profile,
    error::AppError,
};

pub const PROFILES_TABLE: &str = "profiles";
pub const PROFILE_COLUMNS: &str = "id,username,full_name";

const API_KEY_HEADER: &str = "apikey";

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

impl SupabaseClient {
    pub fn new(http: Client, config: &SupabaseConfig) -> Self {
        Self {
            http,
            url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let response = self
            .http
            .get(format!("{}/rest/v1/{PROFILES_TABLE}", self.url))
            .query(&[
                ("select", PROFILE_COLUMNS.to_string()),
                ("id", format!("eq.{user_id}")),
            ])
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        // PostgREST answers 400 when the id can't be cast to the key type (e.g. uuid).
        if response.status() == StatusCode::BAD_REQUEST {
            debug!("Profile query for {user_id} rejected as invalid id");
            return Ok(None);
        }

        let rows: Vec<Profile> = response.error_for_status()?.json().await?;

        debug!("Profile query for {user_id} returned {} rows", rows.len());

        Ok(rows.into_iter().next())
    }

    /// `Ok(None)` when the provider refuses the token with 401/403.
    pub async fn fetch_user(&self, token: &BearerToken) -> Result<Option<AuthUser>, AppError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.url))
            .header(API_KEY_HEADER, &self.anon_key)
            .header(AUTHORIZATION, token.header_value())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Token introspection rejected with {status}");
            return Ok(None);
        }

        let user: UserResponse = response.error_for_status()?.json().await?;

        Ok(Some(AuthUser {
            id: user.id,
            email: user.email,
        }))
    }
}
