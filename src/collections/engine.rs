//! The Bookmark Collection Synchronization Engine
//!
//! Reconciles a caller-submitted desired state of a collection against the
//! persisted state. Every mutating operation is one database transaction:
//! a failure in any step rolls the whole sequence back, so the collection
//! can never end up with its title changed but its membership not, or the
//! other way around.
//!
//! # Update sequence
//!
//! 1. Lock the target collection (`FOR UPDATE`); not found -> `NotFound`
//! 2. Ownership guard -> `Forbidden` before any mutation
//! 3. Soft-delete the listed bookmarks and drop their map entries
//! 4. Resolve or create each submitted location by exact (lat, lon)
//! 5. Create one fresh bookmark per resolved location
//! 6. Map the new bookmarks into the collection
//! 7. Update title and visibility
//!
//! Deletions run before insertions so a single call can prune stale
//! entries and add new ones without a transient inconsistency in the map
//! table.
//!
//! # Location dedup under concurrency
//!
//! The uniqueness constraint on (latitude, longitude) is the sole
//! race-proofing mechanism: an insert that loses a concurrent race is
//! retried once as a fetch of the winning row before surfacing `Conflict`.

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::collections::db;
use crate::collections::types::{
    BookmarkCollection, BookmarkWithLocation, CreateCollectionRequest, Location,
    LocationWithContent, UpdateCollectionRequest, Visibility,
};
use crate::error::ServiceError;
use crate::friends;
use crate::pagination::{Page, Pagination};

/// Ownership guard: only the owner may mutate a collection
///
/// Invoked before any mutation in every mutating operation, never
/// interleaved with persistence calls.
pub(crate) fn ensure_owner(
    collection: &BookmarkCollection,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    if collection.user_id != user_id {
        return Err(ServiceError::forbidden(
            "only the collection owner may modify it",
        ));
    }
    Ok(())
}

/// Scale of the coordinate columns (`NUMERIC(10, 7)`)
const COORDINATE_SCALE: u32 = 7;

/// Round a coordinate to the column scale, the way Postgres rounds on
/// insert (midpoint away from zero)
///
/// Lookup, insert, and the uniqueness constraint must all see one value;
/// comparing an unrounded request value against a rounded stored one would
/// make the same submitted pair miss its own row.
fn canonical_coordinate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(COORDINATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Resolve a location by exact coordinate pair, creating it on first
/// reference
///
/// Idempotent across calls: submitting the same pair twice never creates a
/// duplicate row.
async fn resolve_location(
    conn: &mut PgConnection,
    entry: &LocationWithContent,
) -> Result<Location, ServiceError> {
    let latitude = canonical_coordinate(entry.latitude);
    let longitude = canonical_coordinate(entry.longitude);

    if let Some(location) = db::find_location(conn, latitude, longitude).await? {
        return Ok(location);
    }

    if let Some(location) =
        db::try_insert_location(conn, latitude, longitude, entry.place_id.as_deref()).await?
    {
        return Ok(location);
    }

    // Lost the insert race; the winning row is committed and visible now.
    db::find_location(conn, latitude, longitude)
        .await?
        .ok_or_else(|| {
            ServiceError::conflict("location could not be resolved after a concurrent insert")
        })
}

/// Create a new collection
pub async fn create_collection(
    pool: &PgPool,
    user_id: Uuid,
    request: CreateCollectionRequest,
) -> Result<BookmarkCollection, ServiceError> {
    let mut conn = pool.acquire().await?;
    let collection =
        db::insert_collection(&mut conn, user_id, &request.title, request.visibility).await?;

    tracing::debug!(
        collection_id = %collection.id,
        user_id = %user_id,
        "collection created"
    );

    Ok(collection)
}

/// Synchronize a collection with the submitted desired state
///
/// Full-replace semantics: every submitted location+content pair becomes a
/// fresh bookmark; there is no diffing against existing membership.
pub async fn update_collection(
    pool: &PgPool,
    user_id: Uuid,
    collection_id: Uuid,
    request: UpdateCollectionRequest,
) -> Result<BookmarkCollection, ServiceError> {
    let mut tx = pool.begin().await?;

    let collection = db::lock_collection(&mut tx, collection_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("bookmark collection not found"))?;
    ensure_owner(&collection, user_id)?;

    // Deletions first. They are independent of each other, and running
    // them before insertions lets one call prune and add at once.
    for bookmark_id in &request.bookmark_ids_to_delete {
        let tombstoned = db::soft_delete_bookmark(&mut tx, *bookmark_id, user_id).await?;
        if tombstoned == 0 {
            // Unknown, foreign, or already-deleted id: abort the whole
            // update rather than report a partial deletion as success.
            return Err(ServiceError::not_found("bookmark not found"));
        }
        db::remove_map_entry(&mut tx, collection_id, *bookmark_id).await?;
    }

    let mut new_bookmark_ids = Vec::with_capacity(request.locations_with_content.len());
    for entry in &request.locations_with_content {
        let location = resolve_location(&mut tx, entry).await?;
        let bookmark =
            db::insert_bookmark(&mut tx, user_id, location.id, &entry.content).await?;
        new_bookmark_ids.push(bookmark.id);
    }

    db::insert_map_entries(&mut tx, collection_id, &new_bookmark_ids).await?;

    let updated =
        db::update_collection_row(&mut tx, collection_id, &request.title, request.visibility)
            .await?;

    tx.commit().await?;

    tracing::debug!(
        collection_id = %collection_id,
        added = new_bookmark_ids.len(),
        removed = request.bookmark_ids_to_delete.len(),
        "collection synchronized"
    );

    Ok(updated)
}

/// Delete a collection and its exclusively-referenced bookmarks
///
/// Cleanup runs in dependency order: map entries, then the member
/// bookmarks, then the collection row. Locations are shared across users
/// and are never deleted.
pub async fn delete_collection(
    pool: &PgPool,
    user_id: Uuid,
    collection_id: Uuid,
) -> Result<BookmarkCollection, ServiceError> {
    let mut tx = pool.begin().await?;

    let collection = db::lock_collection(&mut tx, collection_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("bookmark collection not found"))?;
    ensure_owner(&collection, user_id)?;

    // Collect member ids before the map rows disappear.
    let member_ids = db::member_bookmark_ids(&mut tx, collection_id).await?;

    db::delete_map_entries_for_collection(&mut tx, collection_id).await?;
    db::delete_bookmarks_by_ids(&mut tx, &member_ids).await?;
    let deleted = db::delete_collection_row(&mut tx, collection_id).await?;

    tx.commit().await?;

    tracing::debug!(
        collection_id = %collection_id,
        bookmarks = member_ids.len(),
        "collection deleted"
    );

    Ok(deleted)
}

/// List the caller's own collections, most recent first
pub async fn list_own_collections(
    pool: &PgPool,
    user_id: Uuid,
    visibility: Option<Visibility>,
    pagination: Pagination,
) -> Result<Page<BookmarkCollection>, ServiceError> {
    let total_count = db::count_own_collections(pool, user_id, visibility).await?;
    let items = db::list_own_collections(
        pool,
        user_id,
        visibility,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Page { items, total_count })
}

/// List another user's collections, restricted to what the viewer may see
///
/// The viewer is always entitled to PUBLIC; FRIENDS_ONLY is added when an
/// accepted friend edge exists between the two users in either direction.
pub async fn list_user_collections(
    pool: &PgPool,
    viewer_id: Uuid,
    owner_id: Uuid,
    pagination: Pagination,
) -> Result<Page<BookmarkCollection>, ServiceError> {
    let visibilities = if viewer_id == owner_id {
        vec![
            Visibility::Private,
            Visibility::FriendsOnly,
            Visibility::Public,
        ]
    } else if friends::db::are_friends(pool, viewer_id, owner_id).await? {
        vec![Visibility::FriendsOnly, Visibility::Public]
    } else {
        vec![Visibility::Public]
    };

    let total_count = db::count_visible_collections(pool, owner_id, &visibilities).await?;
    let items = db::list_visible_collections(
        pool,
        owner_id,
        &visibilities,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Page { items, total_count })
}

/// List the live bookmarks inside one of the caller's collections
pub async fn list_collection_bookmarks(
    pool: &PgPool,
    user_id: Uuid,
    collection_id: Uuid,
) -> Result<Vec<BookmarkWithLocation>, ServiceError> {
    let collection = db::get_collection(pool, collection_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("bookmark collection not found"))?;
    ensure_owner(&collection, user_id)?;

    Ok(db::list_collection_bookmarks(pool, collection_id).await?)
}
