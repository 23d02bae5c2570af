//! Database operations for friend invitations.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::friends::types::{FriendEntry, FriendInvite, FriendInviteStatus};

fn invite_from_row(row: &PgRow) -> FriendInvite {
    FriendInvite {
        id: row.get("id"),
        inviter_id: row.get("inviter_id"),
        invitee_id: row.get("invitee_id"),
        status: FriendInviteStatus::from_str(row.get::<String, _>("status").as_str())
            .unwrap_or_default(),
        created_at: row.get("created_at"),
        responded_at: row.get("responded_at"),
    }
}

/// Insert a new PENDING invitation
pub async fn insert_invite(
    pool: &PgPool,
    inviter_id: Uuid,
    invitee_id: Uuid,
) -> Result<FriendInvite, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO friend_invites (id, inviter_id, invitee_id, status, created_at, responded_at)
        VALUES ($1, $2, $3, 'PENDING', $4, NULL)
        RETURNING id, inviter_id, invitee_id, status, created_at, responded_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(inviter_id)
    .bind(invitee_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(invite_from_row(&row))
}

/// Get an invitation by ID
pub async fn get_invite_by_id(
    pool: &PgPool,
    invite_id: Uuid,
) -> Result<Option<FriendInvite>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, inviter_id, invitee_id, status, created_at, responded_at
        FROM friend_invites
        WHERE id = $1
        "#,
    )
    .bind(invite_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| invite_from_row(&r)))
}

/// Find the live (PENDING or ACCEPTED) edge for an unordered user pair
///
/// One query expresses the either-direction condition so no concurrent
/// edge update can slip between two directional lookups.
pub async fn find_live_edge(
    pool: &PgPool,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Option<FriendInvite>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, inviter_id, invitee_id, status, created_at, responded_at
        FROM friend_invites
        WHERE status IN ('PENDING', 'ACCEPTED')
          AND ((inviter_id = $1 AND invitee_id = $2)
            OR (inviter_id = $2 AND invitee_id = $1))
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| invite_from_row(&r)))
}

/// Whether an ACCEPTED edge exists between two users, in either direction
pub async fn are_friends(pool: &PgPool, user_a: Uuid, user_b: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM friend_invites
            WHERE status = 'ACCEPTED'
              AND ((inviter_id = $1 AND invitee_id = $2)
                OR (inviter_id = $2 AND invitee_id = $1))
        )
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_one(pool)
    .await
}

/// Mark a PENDING invitation as ACCEPTED
///
/// Returns `None` if the invite no longer exists, is not addressed to
/// `invitee_id`, or has already been answered.
pub async fn accept_invite_row(
    pool: &PgPool,
    invite_id: Uuid,
    invitee_id: Uuid,
) -> Result<Option<FriendInvite>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE friend_invites
        SET status = 'ACCEPTED', responded_at = $1
        WHERE id = $2 AND invitee_id = $3 AND status = 'PENDING'
        RETURNING id, inviter_id, invitee_id, status, created_at, responded_at
        "#,
    )
    .bind(Utc::now())
    .bind(invite_id)
    .bind(invitee_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| invite_from_row(&r)))
}

/// Delete an invitation edge (decline or unfriend)
pub async fn delete_invite(pool: &PgPool, invite_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM friend_invites
        WHERE id = $1
        "#,
    )
    .bind(invite_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count ACCEPTED edges touching a user
pub async fn count_friends(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM friend_invites
        WHERE status = 'ACCEPTED' AND (inviter_id = $1 OR invitee_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Page of a user's friends (the other side of each ACCEPTED edge)
pub async fn list_friends(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FriendEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT fi.id AS invite_id,
               CASE WHEN fi.inviter_id = $1 THEN fi.invitee_id ELSE fi.inviter_id END AS friend_id,
               u.nickname,
               fi.responded_at AS since
        FROM friend_invites fi
        INNER JOIN users u
            ON u.id = CASE WHEN fi.inviter_id = $1 THEN fi.invitee_id ELSE fi.inviter_id END
        WHERE fi.status = 'ACCEPTED' AND (fi.inviter_id = $1 OR fi.invitee_id = $1)
        ORDER BY fi.responded_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| FriendEntry {
            invite_id: row.get("invite_id"),
            friend_id: row.get("friend_id"),
            nickname: row.get("nickname"),
            since: row.get("since"),
        })
        .collect())
}

/// Count PENDING invitations received by a user
pub async fn count_received_invites(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM friend_invites
        WHERE invitee_id = $1 AND status = 'PENDING'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Page of PENDING invitations received by a user, newest first
pub async fn list_received_invites(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FriendInvite>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, inviter_id, invitee_id, status, created_at, responded_at
        FROM friend_invites
        WHERE invitee_id = $1 AND status = 'PENDING'
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(invite_from_row).collect())
}

/// Count PENDING invitations sent by a user
pub async fn count_sent_invites(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM friend_invites
        WHERE inviter_id = $1 AND status = 'PENDING'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Page of PENDING invitations sent by a user, newest first
pub async fn list_sent_invites(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FriendInvite>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, inviter_id, invitee_id, status, created_at, responded_at
        FROM friend_invites
        WHERE inviter_id = $1 AND status = 'PENDING'
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(invite_from_row).collect())
}
