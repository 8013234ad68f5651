//! Bid API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use solo_models::Bid;
use solo_store::parse_object_id;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct InsertedResponse {
    pub inserted_id: String,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub matched_count: u64,
}

/// POST /add-bid
///
/// Place a bid. Duplicate-guarded: a second bid by the same email on the
/// same job is rejected with a 400, and the job's bid counter is bumped
/// only on a successful insert.
pub async fn add_bid(
    State(state): State<AppState>,
    Json(bid): Json<Bid>,
) -> ApiResult<Json<InsertedResponse>> {
    let id = state.bids.place(&bid).await?;
    Ok(Json(InsertedResponse {
        inserted_id: id.to_hex(),
    }))
}

/// Query parameters for the bid listing.
#[derive(Debug, Deserialize)]
pub struct BidsQuery {
    /// Present (and truthy) when listing bids received as a buyer.
    #[serde(default)]
    pub buyer: Option<String>,
}

impl BidsQuery {
    fn as_buyer(&self) -> bool {
        self.buyer
            .as_deref()
            .map(|v| !v.is_empty() && v != "false")
            .unwrap_or(false)
    }
}

/// GET /bids/:email?buyer=
///
/// List bids placed by the user, or — with `buyer` set — bids received on
/// the user's jobs. Identity-scoped: the verified claim must match the
/// requested email, checked before any storage call.
pub async fn bids_for_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(params): Query<BidsQuery>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Bid>>> {
    user.require_email(&email)?;

    let bids = state.bids.list_for_user(&email, params.as_buyer()).await?;
    Ok(Json(bids))
}

/// Status payload for bid updates.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /bid-status-update/:id
///
/// Set a bid's status. The value is stored verbatim and, under the legacy
/// policy, any caller may do this — preserved from the original server and
/// gated only by [`AuthPolicy`](crate::policy::AuthPolicy).
pub async fn update_bid_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<AuthUser>,
    Json(payload): Json<StatusUpdate>,
) -> ApiResult<Json<UpdatedResponse>> {
    if state.policy.requires_claim_for_mutations() && user.is_none() {
        return Err(ApiError::unauthorized("mutation requires a valid token"));
    }

    let id = parse_object_id(&id)?;

    // Strict mode: only the job's buyer (denormalized on the bid) may set
    // its status.
    if state.policy.requires_owner_match() {
        if let (Some(user), Some(bid)) = (&user, state.bids.get_by_id(&id).await?) {
            if let Some(buyer) = bid.buyer.as_deref() {
                if buyer != user.email() {
                    return Err(ApiError::forbidden("bid belongs to another buyer's job"));
                }
            }
        }
    }

    let matched_count = state.bids.update_status(&id, &payload.status).await?;
    info!("Bid {} status set to '{}'", id.to_hex(), payload.status);
    Ok(Json(UpdatedResponse { matched_count }))
}
