use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::{Access, BearerToken},
    database::Profile,
    error::AppError,
    search::{SearchParams, SearchResult, search_songs},
    spotify::CatalogueQuery,
    state::State,
};

pub const ROOT_MESSAGE: &str = "Rust backend is running!";
pub const OPEN_SECRET: &str = "This is static data - no authentication needed";

#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct Secret {
    pub secret: String,
}

pub async fn root_handler() -> Json<Message> {
    Json(Message {
        message: ROOT_MESSAGE,
    })
}

pub async fn profile_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    state
        .profiles
        .profile(&user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn search_handler(Query(params): Query<SearchParams>) -> Json<Vec<SearchResult>> {
    Json(search_songs(&params.query))
}

pub async fn protected_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
) -> Result<Json<Secret>, AppError> {
    let token = BearerToken::from_headers(&headers);

    let secret = match state.verifier.verify(token.as_ref()).await? {
        Access::Open => OPEN_SECRET.to_string(),
        Access::User(user) => {
            debug!("Protected data requested by {}", user.id);
            format!(
                "Protected data for {}",
                user.email.as_deref().unwrap_or(&user.id)
            )
        }
    };

    Ok(Json(Secret { secret }))
}

pub async fn catalogue_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<CatalogueQuery>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let spotify = state.spotify.as_ref().ok_or(AppError::Unavailable)?;

    let Json(query) = payload.map_err(|rejection| {
        debug!("Rejected catalogue payload: {rejection}");
        AppError::MalformedPayload
    })?;

    Ok(Json(spotify.search(&query).await?))
}
