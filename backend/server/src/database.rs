//! # Profiles
//!
//! Read-only profile lookup by id.
//!
//! Two stores:
//! - [`StaticProfiles`]: fixed in-memory table, used when no provider is configured
//! - [`SupabaseClient`]: exact-match query against the remote `profiles` table
//!
//! Neither store validates or normalizes the id.
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, supabase::SupabaseClient};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;
}

pub struct StaticProfiles {
    profiles: HashMap<String, Profile>,
}

const DEMO_PROFILES: [(&str, &str, &str); 3] = [
    ("1", "demo_user", "Demo User"),
    ("2", "drake_fan", "Aubrey Listener"),
    ("3", "crate_digger", "Vinyl Collector"),
];

impl StaticProfiles {
    pub fn new() -> Self {
        let profiles = DEMO_PROFILES
            .iter()
            .map(|&(id, username, full_name)| {
                (
                    id.to_string(),
                    Profile {
                        id: id.to_string(),
                        username: username.to_string(),
                        full_name: full_name.to_string(),
                    },
                )
            })
            .collect();

        Self { profiles }
    }
}

impl Default for StaticProfiles {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for StaticProfiles {
    async fn profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.get(user_id).cloned())
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.fetch_profile(user_id).await
    }
}
