//! Database operations for collections, bookmarks, locations, and the
//! membership map.
//!
//! Mutating operations take `&mut PgConnection` so the engine can run a
//! whole sequence on one transaction; read-only list queries take the pool
//! directly.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::collections::types::{
    Bookmark, BookmarkCollection, BookmarkWithLocation, Location, Visibility,
};

fn collection_from_row(row: &PgRow) -> BookmarkCollection {
    BookmarkCollection {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        visibility: Visibility::from_str(row.get::<String, _>("visibility").as_str())
            .unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn location_from_row(row: &PgRow) -> Location {
    Location {
        id: row.get("id"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        place_id: row.get("place_id"),
    }
}

/// Insert a new collection row
pub async fn insert_collection(
    conn: &mut PgConnection,
    user_id: Uuid,
    title: &str,
    visibility: Visibility,
) -> Result<BookmarkCollection, sqlx::Error> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO bookmark_collections (id, user_id, title, visibility, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, user_id, title, visibility, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(visibility.as_str())
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(collection_from_row(&row))
}

/// Load a collection and take a row lock on it
///
/// `FOR UPDATE` serializes concurrent update/delete calls targeting the
/// same collection for the remainder of the transaction.
pub async fn lock_collection(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<BookmarkCollection>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, title, visibility, created_at, updated_at
        FROM bookmark_collections
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|r| collection_from_row(&r)))
}

/// Load a collection without locking
pub async fn get_collection(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<BookmarkCollection>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, title, visibility, created_at, updated_at
        FROM bookmark_collections
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| collection_from_row(&r)))
}

/// Update a collection's title and visibility
pub async fn update_collection_row(
    conn: &mut PgConnection,
    id: Uuid,
    title: &str,
    visibility: Visibility,
) -> Result<BookmarkCollection, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE bookmark_collections
        SET title = $1, visibility = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, user_id, title, visibility, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(visibility.as_str())
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(collection_from_row(&row))
}

/// Delete a collection row
pub async fn delete_collection_row(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<BookmarkCollection, sqlx::Error> {
    let row = sqlx::query(
        r#"
        DELETE FROM bookmark_collections
        WHERE id = $1
        RETURNING id, user_id, title, visibility, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(collection_from_row(&row))
}

/// Find a location by exact coordinate pair
pub async fn find_location(
    conn: &mut PgConnection,
    latitude: Decimal,
    longitude: Decimal,
) -> Result<Option<Location>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, latitude, longitude, place_id
        FROM locations
        WHERE latitude = $1 AND longitude = $2
        "#,
    )
    .bind(latitude)
    .bind(longitude)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|r| location_from_row(&r)))
}

/// Try to insert a location; returns `None` if a concurrent insert won the
/// (latitude, longitude) uniqueness race
pub async fn try_insert_location(
    conn: &mut PgConnection,
    latitude: Decimal,
    longitude: Decimal,
    place_id: Option<&str>,
) -> Result<Option<Location>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO locations (id, latitude, longitude, place_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (latitude, longitude) DO NOTHING
        RETURNING id, latitude, longitude, place_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(latitude)
    .bind(longitude)
    .bind(place_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|r| location_from_row(&r)))
}

/// Insert a new bookmark owned by `user_id`
pub async fn insert_bookmark(
    conn: &mut PgConnection,
    user_id: Uuid,
    location_id: Uuid,
    content: &str,
) -> Result<Bookmark, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO bookmarks (id, user_id, location_id, content, deleted_at, created_at)
        VALUES ($1, $2, $3, $4, NULL, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(location_id)
    .bind(content)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Bookmark {
        id,
        user_id,
        location_id,
        content: content.to_string(),
        deleted_at: None,
        created_at: now,
    })
}

/// Set the soft-delete tombstone on a bookmark owned by `user_id`
///
/// Returns the number of rows updated: zero when the bookmark does not
/// exist, belongs to someone else, or already carries a tombstone.
pub async fn soft_delete_bookmark(
    conn: &mut PgConnection,
    bookmark_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE bookmarks
        SET deleted_at = $1
        WHERE id = $2 AND user_id = $3 AND deleted_at IS NULL
        "#,
    )
    .bind(Utc::now())
    .bind(bookmark_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Hard-delete bookmarks by id (collection removal cleanup)
pub async fn delete_bookmarks_by_ids(
    conn: &mut PgConnection,
    bookmark_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM bookmarks
        WHERE id = ANY($1)
        "#,
    )
    .bind(bookmark_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert one membership entry per bookmark id
pub async fn insert_map_entries(
    conn: &mut PgConnection,
    collection_id: Uuid,
    bookmark_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if bookmark_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO collection_bookmarks (collection_id, bookmark_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(collection_id)
    .bind(bookmark_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Remove one membership entry
pub async fn remove_map_entry(
    conn: &mut PgConnection,
    collection_id: Uuid,
    bookmark_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM collection_bookmarks
        WHERE collection_id = $1 AND bookmark_id = $2
        "#,
    )
    .bind(collection_id)
    .bind(bookmark_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Remove every membership entry for a collection
pub async fn delete_map_entries_for_collection(
    conn: &mut PgConnection,
    collection_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM collection_bookmarks
        WHERE collection_id = $1
        "#,
    )
    .bind(collection_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Ids of all bookmarks currently mapped into a collection
pub async fn member_bookmark_ids(
    conn: &mut PgConnection,
    collection_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT bookmark_id
        FROM collection_bookmarks
        WHERE collection_id = $1
        "#,
    )
    .bind(collection_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(|r| r.get("bookmark_id")).collect())
}

/// Count a user's own collections, optionally filtered by visibility
pub async fn count_own_collections(
    pool: &PgPool,
    user_id: Uuid,
    visibility: Option<Visibility>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM bookmark_collections
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR visibility = $2)
        "#,
    )
    .bind(user_id)
    .bind(visibility.map(|v| v.as_str()))
    .fetch_one(pool)
    .await
}

/// Page of a user's own collections, most recent first
pub async fn list_own_collections(
    pool: &PgPool,
    user_id: Uuid,
    visibility: Option<Visibility>,
    limit: i64,
    offset: i64,
) -> Result<Vec<BookmarkCollection>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, visibility, created_at, updated_at
        FROM bookmark_collections
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR visibility = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(visibility.map(|v| v.as_str()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(collection_from_row).collect())
}

/// Count another user's collections within a visibility set
pub async fn count_visible_collections(
    pool: &PgPool,
    owner_id: Uuid,
    visibilities: &[Visibility],
) -> Result<i64, sqlx::Error> {
    let names: Vec<String> = visibilities.iter().map(|v| v.as_str().to_string()).collect();

    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM bookmark_collections
        WHERE user_id = $1 AND visibility = ANY($2)
        "#,
    )
    .bind(owner_id)
    .bind(&names)
    .fetch_one(pool)
    .await
}

/// Page of another user's collections within a visibility set
pub async fn list_visible_collections(
    pool: &PgPool,
    owner_id: Uuid,
    visibilities: &[Visibility],
    limit: i64,
    offset: i64,
) -> Result<Vec<BookmarkCollection>, sqlx::Error> {
    let names: Vec<String> = visibilities.iter().map(|v| v.as_str().to_string()).collect();

    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, visibility, created_at, updated_at
        FROM bookmark_collections
        WHERE user_id = $1 AND visibility = ANY($2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(owner_id)
    .bind(&names)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(collection_from_row).collect())
}

/// Live (non-soft-deleted) bookmarks in a collection, with their locations
pub async fn list_collection_bookmarks(
    pool: &PgPool,
    collection_id: Uuid,
) -> Result<Vec<BookmarkWithLocation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT b.id, b.user_id, b.content, b.created_at,
               l.id AS location_id, l.latitude, l.longitude, l.place_id
        FROM collection_bookmarks cb
        INNER JOIN bookmarks b ON b.id = cb.bookmark_id
        INNER JOIN locations l ON l.id = b.location_id
        WHERE cb.collection_id = $1 AND b.deleted_at IS NULL
        ORDER BY b.created_at ASC
        "#,
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| BookmarkWithLocation {
            id: row.get("id"),
            user_id: row.get("user_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            location: Location {
                id: row.get("location_id"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                place_id: row.get("place_id"),
            },
        })
        .collect())
}
