//! Member routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
};
use skledger_shared::types::ActorId;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the member routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/members/{member_id}", delete(delete_member))
}

/// DELETE /members/{member_id}
async fn delete_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(member_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .members
        .delete_member(auth.actor_id(), ActorId::from_uuid(member_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
