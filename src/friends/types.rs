//! Friend Invitation Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a friend invitation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendInviteStatus {
    /// Sent, awaiting the invitee's response
    Pending,
    /// Accepted; the edge now grants FRIENDS_ONLY visibility
    Accepted,
}

impl Default for FriendInviteStatus {
    fn default() -> Self {
        FriendInviteStatus::Pending
    }
}

impl FriendInviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendInviteStatus::Pending => "PENDING",
            FriendInviteStatus::Accepted => "ACCEPTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(FriendInviteStatus::Pending),
            "ACCEPTED" => Some(FriendInviteStatus::Accepted),
            _ => None,
        }
    }
}

/// A directed friend invitation edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FriendInvite {
    pub id: Uuid,
    /// User who sent the invite
    pub inviter_id: Uuid,
    /// User who received the invite
    pub invitee_id: Uuid,
    #[serde(default)]
    pub status: FriendInviteStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// One entry in the caller's friend list
#[derive(Debug, Clone, Serialize)]
pub struct FriendEntry {
    /// The accepted invitation backing this friendship
    pub invite_id: Uuid,
    /// The other user
    pub friend_id: Uuid,
    pub nickname: String,
    /// When the invitation was accepted
    pub since: Option<DateTime<Utc>>,
}

/// Body of `POST /api/friends/invite`
#[derive(Debug, Deserialize)]
pub struct SendInviteRequest {
    pub friend_id: Uuid,
}
