//! Collection, Bookmark, and Location Data Structures

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;

/// Who may see a collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Owner only
    Private,
    /// Owner plus users with an accepted friend edge
    FriendsOnly,
    /// Everyone
    Public,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::FriendsOnly => "FRIENDS_ONLY",
            Visibility::Public => "PUBLIC",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PRIVATE" => Some(Visibility::Private),
            "FRIENDS_ONLY" => Some(Visibility::FriendsOnly),
            "PUBLIC" => Some(Visibility::Public),
            _ => None,
        }
    }
}

/// A named, visibility-scoped collection owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkCollection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A deduplicated geocoordinate, shared across users
///
/// At most one row exists per exact (latitude, longitude) pair. Locations
/// are created lazily on first reference and never deleted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: Uuid,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub place_id: Option<String>,
}

/// A user-owned note on a location
///
/// Soft-deleted rows keep their tombstone (`deleted_at`) for history and
/// are excluded from all membership queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub content: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A bookmark joined with its location, as listed inside a collection
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkWithLocation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub location: Location,
}

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum bookmark note length in characters
pub const CONTENT_MAX_CHARS: usize = 500;

fn validate_title(title: &str) -> Result<(), ServiceError> {
    let len = title.chars().count();
    if len == 0 || len > TITLE_MAX_CHARS {
        return Err(ServiceError::validation(
            "title must be 1-200 characters",
        ));
    }
    Ok(())
}

/// Body of `POST .../collections`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    pub title: String,
    /// Defaults to PUBLIC when omitted
    #[serde(default)]
    pub visibility: Visibility,
}

impl CreateCollectionRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_title(&self.title)
    }
}

/// One submitted "this place, with this note" entry
#[derive(Debug, Clone, Deserialize)]
pub struct LocationWithContent {
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub content: String,
    #[serde(default)]
    pub place_id: Option<String>,
}

/// Body of `PATCH .../collections/{id}`
///
/// The desired state of the collection: new title/visibility, locations
/// with content to add as fresh bookmarks, and existing bookmark ids to
/// soft-delete.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCollectionRequest {
    pub title: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub locations_with_content: Vec<LocationWithContent>,
    #[serde(default)]
    pub bookmark_ids_to_delete: Vec<Uuid>,
}

impl UpdateCollectionRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_title(&self.title)?;

        for entry in &self.locations_with_content {
            let len = entry.content.chars().count();
            if len == 0 || len > CONTENT_MAX_CHARS {
                return Err(ServiceError::validation(
                    "bookmark content must be 1-500 characters",
                ));
            }
            if entry.latitude.abs() > Decimal::from(90) {
                return Err(ServiceError::validation(
                    "latitude must be between -90 and 90",
                ));
            }
            if entry.longitude.abs() > Decimal::from(180) {
                return Err(ServiceError::validation(
                    "longitude must be between -180 and 180",
                ));
            }
        }

        Ok(())
    }
}
