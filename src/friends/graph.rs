//! Friend Graph State-Machine Operations
//!
//! The invitation state machine: `PENDING -> ACCEPTED`, or
//! `PENDING -> removed`. Removal of an ACCEPTED edge is an unfriend; the
//! pair may invite each other again afterwards.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::friends::db;
use crate::friends::types::{FriendEntry, FriendInvite, FriendInviteStatus};
use crate::pagination::{Page, Pagination};

/// Send a friend invitation
///
/// Rejected when the target is the caller, the target does not exist, or
/// a PENDING/ACCEPTED edge already exists for the unordered pair. The
/// database's partial unique index backs the duplicate check under
/// concurrent sends, surfacing as `Conflict`.
pub async fn send_invite(
    pool: &PgPool,
    inviter_id: Uuid,
    invitee_id: Uuid,
) -> Result<FriendInvite, ServiceError> {
    if inviter_id == invitee_id {
        return Err(ServiceError::validation(
            "cannot send a friend invite to yourself",
        ));
    }

    crate::auth::users::get_user_by_id(pool, invitee_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user not found"))?;

    if let Some(edge) = db::find_live_edge(pool, inviter_id, invitee_id).await? {
        let message = match edge.status {
            FriendInviteStatus::Accepted => "users are already friends",
            FriendInviteStatus::Pending => "a friend invite is already pending",
        };
        return Err(ServiceError::conflict(message));
    }

    let invite = db::insert_invite(pool, inviter_id, invitee_id)
        .await
        .map_err(|e| match &e {
            // Concurrent send lost the race against the unordered-pair index
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ServiceError::conflict("a friend invite already exists for this pair")
            }
            _ => ServiceError::Database(e),
        })?;

    tracing::debug!(invite_id = %invite.id, "friend invite sent");

    Ok(invite)
}

/// Accept a pending invitation
///
/// Only the invitee may accept, and only while the invite is PENDING.
pub async fn accept_invite(
    pool: &PgPool,
    user_id: Uuid,
    invite_id: Uuid,
) -> Result<FriendInvite, ServiceError> {
    let invite = db::get_invite_by_id(pool, invite_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("friend invite not found"))?;

    if invite.invitee_id != user_id {
        return Err(ServiceError::forbidden(
            "only the invited user may accept this invite",
        ));
    }
    if invite.status != FriendInviteStatus::Pending {
        return Err(ServiceError::conflict("invite has already been answered"));
    }

    db::accept_invite_row(pool, invite_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::conflict("invite has already been answered"))
}

/// Remove an invitation edge: decline when PENDING, unfriend when ACCEPTED
///
/// Only a participant of the edge may remove it.
pub async fn remove_invite(
    pool: &PgPool,
    user_id: Uuid,
    invite_id: Uuid,
) -> Result<(), ServiceError> {
    let invite = db::get_invite_by_id(pool, invite_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("friend invite not found"))?;

    if invite.inviter_id != user_id && invite.invitee_id != user_id {
        return Err(ServiceError::forbidden(
            "only a participant may remove this invite",
        ));
    }

    Ok(db::delete_invite(pool, invite_id).await?)
}

/// List the caller's friends
pub async fn list_friends(
    pool: &PgPool,
    user_id: Uuid,
    pagination: Pagination,
) -> Result<Page<FriendEntry>, ServiceError> {
    let total_count = db::count_friends(pool, user_id).await?;
    let items = db::list_friends(pool, user_id, pagination.limit(), pagination.offset()).await?;

    Ok(Page { items, total_count })
}

/// List pending invitations the caller has received
pub async fn list_received_invites(
    pool: &PgPool,
    user_id: Uuid,
    pagination: Pagination,
) -> Result<Page<FriendInvite>, ServiceError> {
    let total_count = db::count_received_invites(pool, user_id).await?;
    let items =
        db::list_received_invites(pool, user_id, pagination.limit(), pagination.offset()).await?;

    Ok(Page { items, total_count })
}

/// List pending invitations the caller has sent
pub async fn list_sent_invites(
    pool: &PgPool,
    user_id: Uuid,
    pagination: Pagination,
) -> Result<Page<FriendInvite>, ServiceError> {
    let total_count = db::count_sent_invites(pool, user_id).await?;
    let items =
        db::list_sent_invites(pool, user_id, pagination.limit(), pagination.offset()).await?;

    Ok(Page { items, total_count })
}
