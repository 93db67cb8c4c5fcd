use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use devprofile_lib::{query, Profile, ProfileFields, ProfileStore, DB};
use serde::{Deserialize, Serialize};
use tracing::{event, instrument, Level};

use crate::error::ApiError;

pub type SharedStore<T> = Arc<ProfileStore<T>>;

/// Success body: `{status, [message], [query], data}`
#[derive(Serialize, Debug)]
pub struct Envelope<D> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub data: D,
}

impl<D> Envelope<D> {
    fn success(data: D) -> Self {
        Self {
            status: "success",
            message: None,
            query: None,
            data,
        }
    }

    fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    fn with_query(mut self, query: String) -> Self {
        self.query = Some(query);
        self
    }
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    message: &'static str,
}

#[derive(Deserialize, Debug)]
pub struct SkillParams {
    skill: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    q: Option<String>,
}

type ApiResult<D> = Result<Json<Envelope<D>>, ApiError>;

/// An absent parameter and an empty one are treated the same.
fn required(param: Option<String>, message: &str) -> Result<String, ApiError> {
    match param {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(message)),
    }
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "Server is healthy",
    })
}

#[instrument(skip_all)]
pub async fn create_profile<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
    body: Result<Json<ProfileFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Profile>>), ApiError> {
    event!(Level::INFO, "Processing create request");
    let Json(fields) = body?;
    let profile = store.create(fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(profile).with_message("Profile created")),
    ))
}

#[instrument(skip_all)]
pub async fn get_profile<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
) -> ApiResult<Profile> {
    event!(Level::INFO, "Processing profile request");
    let profile = store.read().await?;
    Ok(Json(Envelope::success(profile)))
}

#[instrument(skip_all)]
pub async fn update_profile<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
    body: Result<Json<ProfileFields>, JsonRejection>,
) -> ApiResult<Profile> {
    event!(Level::INFO, "Processing update request");
    let Json(fields) = body?;
    let profile = store.update(fields).await?;
    Ok(Json(
        Envelope::success(profile).with_message("Profile updated"),
    ))
}

#[instrument(skip_all)]
pub async fn delete_profile<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
) -> ApiResult<Profile> {
    event!(Level::INFO, "Processing delete request");
    let profile = store.delete().await?;
    Ok(Json(
        Envelope::success(profile).with_message("Profile deleted"),
    ))
}

#[instrument(skip_all)]
pub async fn projects_by_skill<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
    params: Result<Query<SkillParams>, QueryRejection>,
) -> ApiResult<query::SkillProjects> {
    let Query(params) = params?;
    event!(Level::INFO, skill = ?params.skill, "Processing projects request");
    // checked before touching the store so a missing skill is always a 400
    let skill = required(params.skill, "Skill query parameter is required")?;
    let profile = store.read().await?;
    Ok(Json(Envelope::success(query::projects_by_skill(
        &profile, &skill,
    )?)))
}

#[instrument(skip_all)]
pub async fn top_skills<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
) -> ApiResult<Vec<query::SkillCount>> {
    event!(Level::INFO, "Processing top skills request");
    let profile = store.read().await?;
    Ok(Json(Envelope::success(query::top_skills(&profile))))
}

#[instrument(skip_all)]
pub async fn search<T: DB + Send + Sync>(
    State(store): State<SharedStore<T>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<query::SearchResults> {
    let Query(params) = params?;
    event!(Level::INFO, q = ?params.q, "Processing search request");
    let q = required(params.q, "Search query is required")?;
    let profile = store.read().await?;
    let results = query::search(&profile, &q)?;
    Ok(Json(
        Envelope::success(results).with_query(q.to_lowercase()),
    ))
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
