//! Job API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use solo_models::Job;
use solo_store::{parse_object_id, JobQuery, SortDirection, StoreError};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct InsertedResponse {
    pub inserted_id: String,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
}

/// POST /add-job
///
/// Create a job. The document is stored as-is, no field validation.
pub async fn add_job(
    State(state): State<AppState>,
    Json(job): Json<Job>,
) -> ApiResult<Json<InsertedResponse>> {
    let id = state.jobs.create(&job).await?;
    Ok(Json(InsertedResponse {
        inserted_id: id.to_hex(),
    }))
}

/// GET /jobs
///
/// List all jobs, unfiltered.
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Job>>> {
    let jobs = state.jobs.get_all(&JobQuery::new()).await?;
    Ok(Json(jobs))
}

/// GET /jobs/:email
///
/// List jobs owned by a buyer. Identity-scoped: the verified claim must
/// match the requested email, checked before any storage call.
pub async fn jobs_by_owner(
    State(state): State<AppState>,
    Path(email): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Job>>> {
    user.require_email(&email)?;

    let jobs = state.jobs.get_by_owner(&email).await?;
    Ok(Json(jobs))
}

/// GET /job/:id
///
/// Fetch a single job.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    let id = parse_object_id(&id)?;
    let job = state
        .jobs
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("job {}", id.to_hex())))?;
    Ok(Json(job))
}

/// Query parameters for the public job listing.
#[derive(Debug, Deserialize)]
pub struct AllJobsQuery {
    /// Exact-match category filter.
    #[serde(default)]
    pub filter: Option<String>,
    /// Case-insensitive title substring search.
    #[serde(default)]
    pub search: Option<String>,
    /// `asc`/`desc` over deadline.
    #[serde(default)]
    pub sort: Option<String>,
}

/// GET /all-jobs?filter=&search=&sort=
///
/// Filtered/searched/sorted job listing. Absent parameters widen the
/// query, never narrow it.
pub async fn all_jobs(
    State(state): State<AppState>,
    Query(params): Query<AllJobsQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    let mut query = JobQuery::new();
    if let Some(category) = params.filter.filter(|c| !c.is_empty()) {
        query = query.category(category);
    }
    if let Some(search) = params.search {
        query = query.search(search);
    }
    if let Some(sort) = params.sort.as_deref().and_then(SortDirection::parse) {
        query = query.sort(sort);
    }

    let jobs = state.jobs.get_all(&query).await?;
    Ok(Json(jobs))
}

/// PUT /update-job/:id
///
/// Upsert the supplied fields onto the job at `id` ($set semantics; fields
/// absent from the payload are retained). Open to any caller under the
/// legacy policy.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<AuthUser>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<UpdatedResponse>> {
    if state.policy.requires_claim_for_mutations() && user.is_none() {
        return Err(ApiError::unauthorized("mutation requires a valid token"));
    }

    let id = parse_object_id(&id)?;

    // Strict mode: an existing job that carries an owner may only be
    // rewritten by that owner. A missing document is a fresh upsert.
    if state.policy.requires_owner_match() {
        if let (Some(user), Some(job)) = (&user, state.jobs.get_by_id(&id).await?) {
            if let Some(owner) = job.owner_email() {
                if owner != user.email() {
                    return Err(ApiError::forbidden("job belongs to another buyer"));
                }
            }
        }
    }

    let fields = bson::to_document(&payload)
        .map_err(|e| ApiError::bad_request(format!("malformed payload: {e}")))?;

    state.jobs.upsert(&id, fields).await?;
    Ok(Json(UpdatedResponse { success: true }))
}

/// DELETE /job/:id
///
/// Delete a job. Requires a verified claim; the legacy policy does not
/// compare the claim against the job's owner, the strict one does.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_object_id(&id)?;

    if state.policy.requires_owner_match() {
        let job = state
            .jobs
            .get_by_id(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("job {}", id.to_hex())))?;
        if let Some(owner) = job.owner_email() {
            if owner != user.email() {
                return Err(ApiError::forbidden("job belongs to another buyer"));
            }
        }
    }

    let deleted_count = state.jobs.delete(&id).await?;
    info!("User {} deleted job {}", user.email(), id.to_hex());
    Ok(Json(DeletedResponse { deleted_count }))
}
