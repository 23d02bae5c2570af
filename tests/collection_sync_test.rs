//! Collection synchronization integration tests
//!
//! Exercises the engine end to end against a real PostgreSQL database:
//! create/update/delete, location dedup, soft-delete tombstones, and
//! visibility gating. Skipped when no test database is configured.

mod common;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::PgPool;
use std::str::FromStr;

use common::database::TestDatabase;
use placemark::collections::engine;
use placemark::collections::types::{
    CreateCollectionRequest, LocationWithContent, UpdateCollectionRequest, Visibility,
};
use placemark::pagination::Pagination;
use placemark::ServiceError;

fn entry(lat: &str, lon: &str, content: &str) -> LocationWithContent {
    LocationWithContent {
        latitude: Decimal::from_str(lat).unwrap(),
        longitude: Decimal::from_str(lon).unwrap(),
        content: content.to_string(),
        place_id: None,
    }
}

fn create_request(title: &str, visibility: Visibility) -> CreateCollectionRequest {
    CreateCollectionRequest {
        title: title.to_string(),
        visibility,
    }
}

fn update_request(title: &str, entries: Vec<LocationWithContent>) -> UpdateCollectionRequest {
    UpdateCollectionRequest {
        title: title.to_string(),
        visibility: Visibility::Public,
        locations_with_content: entries,
        bookmark_ids_to_delete: vec![],
    }
}

async fn table_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn test_create_collection_defaults_to_public() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("creator").await;

    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("강릉 맛집", Visibility::default()),
    )
    .await
    .unwrap();

    assert_eq!(collection.user_id, owner.id);
    assert_eq!(collection.title, "강릉 맛집");
    assert_eq!(collection.visibility, Visibility::Public);
}

#[tokio::test]
#[serial]
async fn test_update_creates_location_bookmark_and_map_entry() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("cafes", Visibility::Public),
    )
    .await
    .unwrap();

    let updated = engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request("cafes", vec![entry("37.7512345", "128.8761234", "good coffee")]),
    )
    .await
    .unwrap();

    assert_eq!(updated.id, collection.id);
    assert_eq!(table_count(db.pool(), "locations").await, 1);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 1);
    assert_eq!(table_count(db.pool(), "collection_bookmarks").await, 1);

    let bookmarks = engine::list_collection_bookmarks(db.pool(), owner.id, collection.id)
        .await
        .unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].content, "good coffee");
    assert_eq!(
        bookmarks[0].location.latitude,
        Decimal::from_str("37.7512345").unwrap()
    );
}

#[tokio::test]
#[serial]
async fn test_same_coordinates_reuse_one_location() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let other = db.create_test_user("other").await;

    let mine = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("mine", Visibility::Public),
    )
    .await
    .unwrap();
    let theirs = engine::create_collection(
        db.pool(),
        other.id,
        create_request("theirs", Visibility::Public),
    )
    .await
    .unwrap();

    // Two users bookmark the exact same coordinate pair.
    engine::update_collection(
        db.pool(),
        owner.id,
        mine.id,
        update_request("mine", vec![entry("37.7512345", "128.8761234", "spot")]),
    )
    .await
    .unwrap();
    engine::update_collection(
        db.pool(),
        other.id,
        theirs.id,
        update_request("theirs", vec![entry("37.7512345", "128.8761234", "same spot")]),
    )
    .await
    .unwrap();

    assert_eq!(table_count(db.pool(), "locations").await, 1);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 2);

    let a = engine::list_collection_bookmarks(db.pool(), owner.id, mine.id)
        .await
        .unwrap();
    let b = engine::list_collection_bookmarks(db.pool(), other.id, theirs.id)
        .await
        .unwrap();
    assert_eq!(a[0].location.id, b[0].location.id);
}

#[tokio::test]
#[serial]
async fn test_high_precision_coordinates_dedup_idempotently() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("precise", Visibility::Public),
    )
    .await
    .unwrap();

    // Eight decimal places: the stored column holds seven, so resubmitting
    // the identical pair must still resolve to the existing row.
    for _ in 0..2 {
        engine::update_collection(
            db.pool(),
            owner.id,
            collection.id,
            update_request("precise", vec![entry("37.75123456", "128.87612344", "spot")]),
        )
        .await
        .unwrap();
    }

    // The pair pre-rounded to column scale is the same location too.
    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request("precise", vec![entry("37.7512346", "128.8761234", "again")]),
    )
    .await
    .unwrap();

    assert_eq!(table_count(db.pool(), "locations").await, 1);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 3);
}

#[tokio::test]
#[serial]
async fn test_differing_coordinates_create_distinct_locations() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("walks", Visibility::Public),
    )
    .await
    .unwrap();

    // Differ in the seventh decimal place only.
    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request(
            "walks",
            vec![
                entry("37.7512345", "128.8761234", "a"),
                entry("37.7512346", "128.8761234", "b"),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(table_count(db.pool(), "locations").await, 2);
}

#[tokio::test]
#[serial]
async fn test_non_owner_update_is_forbidden_and_mutates_nothing() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let intruder = db.create_test_user("intruder").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("original", Visibility::Public),
    )
    .await
    .unwrap();

    let err = engine::update_collection(
        db.pool(),
        intruder.id,
        collection.id,
        update_request("hijacked", vec![entry("1.0000000", "2.0000000", "x")]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    // The guard fired before any persistence step.
    assert_eq!(table_count(db.pool(), "locations").await, 0);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 0);
    let page = engine::list_own_collections(db.pool(), owner.id, None, Pagination::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "original");
}

#[tokio::test]
#[serial]
async fn test_update_of_missing_collection_is_not_found() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;

    let err = engine::update_collection(
        db.pool(),
        owner.id,
        uuid::Uuid::new_v4(),
        update_request("ghost", vec![]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_bookmark_deletion_leaves_tombstone_and_unmaps() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("places", Visibility::Public),
    )
    .await
    .unwrap();

    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request(
            "places",
            vec![
                entry("37.7512345", "128.8761234", "keep"),
                entry("35.1595454", "126.8526012", "drop"),
            ],
        ),
    )
    .await
    .unwrap();

    let bookmarks = engine::list_collection_bookmarks(db.pool(), owner.id, collection.id)
        .await
        .unwrap();
    let doomed = bookmarks.iter().find(|b| b.content == "drop").unwrap().id;

    let mut request = update_request("places", vec![]);
    request.bookmark_ids_to_delete = vec![doomed];
    engine::update_collection(db.pool(), owner.id, collection.id, request)
        .await
        .unwrap();

    // The row persists with a tombstone; the map entry is gone.
    let deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT deleted_at FROM bookmarks WHERE id = $1")
            .bind(doomed)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert!(deleted_at.is_some());
    assert_eq!(table_count(db.pool(), "collection_bookmarks").await, 1);

    let remaining = engine::list_collection_bookmarks(db.pool(), owner.id, collection.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].content, "keep");
}

#[tokio::test]
#[serial]
async fn test_deleting_unknown_bookmark_id_fails_and_rolls_back() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let other = db.create_test_user("other").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("before", Visibility::Public),
    )
    .await
    .unwrap();

    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request("before", vec![entry("37.7512345", "128.8761234", "keep")]),
    )
    .await
    .unwrap();

    // An id that matches no bookmark row aborts the whole update.
    let mut request = update_request("after", vec![]);
    request.bookmark_ids_to_delete = vec![uuid::Uuid::new_v4()];
    let err = engine::update_collection(db.pool(), owner.id, collection.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // The transaction rolled back: title unchanged, bookmark still live.
    let page = engine::list_own_collections(db.pool(), owner.id, None, Pagination::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "before");
    let bookmarks = engine::list_collection_bookmarks(db.pool(), owner.id, collection.id)
        .await
        .unwrap();
    assert_eq!(bookmarks.len(), 1);

    // A bookmark owned by someone else is just as unknown to the caller.
    let theirs = engine::create_collection(
        db.pool(),
        other.id,
        create_request("theirs", Visibility::Public),
    )
    .await
    .unwrap();
    engine::update_collection(
        db.pool(),
        other.id,
        theirs.id,
        update_request("theirs", vec![entry("35.1595454", "126.8526012", "note")]),
    )
    .await
    .unwrap();
    let foreign_id = engine::list_collection_bookmarks(db.pool(), other.id, theirs.id)
        .await
        .unwrap()[0]
        .id;

    let mut request = update_request("before", vec![]);
    request.bookmark_ids_to_delete = vec![foreign_id];
    let err = engine::update_collection(db.pool(), owner.id, collection.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Already-tombstoned ids cannot be deleted twice.
    let own_id = bookmarks[0].id;
    let mut request = update_request("before", vec![]);
    request.bookmark_ids_to_delete = vec![own_id];
    engine::update_collection(db.pool(), owner.id, collection.id, request.clone())
        .await
        .unwrap();
    let err = engine::update_collection(db.pool(), owner.id, collection.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_empty_update_changes_title_and_visibility_only() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("before", Visibility::Public),
    )
    .await
    .unwrap();

    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request("before", vec![entry("37.7512345", "128.8761234", "note")]),
    )
    .await
    .unwrap();

    let mut request = update_request("after", vec![]);
    request.visibility = Visibility::Private;
    let updated = engine::update_collection(db.pool(), owner.id, collection.id, request)
        .await
        .unwrap();

    assert_eq!(updated.title, "after");
    assert_eq!(updated.visibility, Visibility::Private);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 1);
    assert_eq!(table_count(db.pool(), "collection_bookmarks").await, 1);
}

#[tokio::test]
#[serial]
async fn test_delete_collection_removes_members_but_keeps_locations() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("doomed", Visibility::Public),
    )
    .await
    .unwrap();

    engine::update_collection(
        db.pool(),
        owner.id,
        collection.id,
        update_request(
            "doomed",
            vec![
                entry("37.7512345", "128.8761234", "a"),
                entry("35.1595454", "126.8526012", "b"),
            ],
        ),
    )
    .await
    .unwrap();

    let deleted = engine::delete_collection(db.pool(), owner.id, collection.id)
        .await
        .unwrap();
    assert_eq!(deleted.id, collection.id);

    assert_eq!(table_count(db.pool(), "bookmark_collections").await, 0);
    assert_eq!(table_count(db.pool(), "collection_bookmarks").await, 0);
    assert_eq!(table_count(db.pool(), "bookmarks").await, 0);
    // Locations are shared; deletion never touches them.
    assert_eq!(table_count(db.pool(), "locations").await, 2);

    let err = engine::delete_collection(db.pool(), owner.id, collection.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_non_owner_delete_is_forbidden() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let intruder = db.create_test_user("intruder").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("mine", Visibility::Public),
    )
    .await
    .unwrap();

    let err = engine::delete_collection(db.pool(), intruder.id, collection.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert_eq!(table_count(db.pool(), "bookmark_collections").await, 1);
}

#[tokio::test]
#[serial]
async fn test_list_own_collections_paginates_newest_first() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;

    for i in 0..3 {
        engine::create_collection(
            db.pool(),
            owner.id,
            create_request(&format!("c{i}"), Visibility::Public),
        )
        .await
        .unwrap();
    }

    let page = engine::list_own_collections(
        db.pool(),
        owner.id,
        None,
        Pagination::new(Some(1), Some(2)),
    )
    .await
    .unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].created_at >= page.items[1].created_at);

    let last = engine::list_own_collections(
        db.pool(),
        owner.id,
        None,
        Pagination::new(Some(2), Some(2)),
    )
    .await
    .unwrap();
    assert_eq!(last.items.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_list_own_collections_filters_by_visibility() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;

    engine::create_collection(db.pool(), owner.id, create_request("pub", Visibility::Public))
        .await
        .unwrap();
    engine::create_collection(
        db.pool(),
        owner.id,
        create_request("priv", Visibility::Private),
    )
    .await
    .unwrap();

    let page = engine::list_own_collections(
        db.pool(),
        owner.id,
        Some(Visibility::Private),
        Pagination::new(None, None),
    )
    .await
    .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].title, "priv");
}

#[tokio::test]
#[serial]
async fn test_visibility_gating_for_other_users() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let stranger = db.create_test_user("stranger").await;
    let friend = db.create_test_user("friend").await;
    let other_friend = db.create_test_user("other_friend").await;

    for (title, visibility) in [
        ("pub", Visibility::Public),
        ("friends", Visibility::FriendsOnly),
        ("priv", Visibility::Private),
    ] {
        engine::create_collection(db.pool(), owner.id, create_request(title, visibility))
            .await
            .unwrap();
    }

    // Two accepted edges, one in each direction: gating must not depend on
    // which side sent the invite.
    let invite = placemark::friends::graph::send_invite(db.pool(), owner.id, friend.id)
        .await
        .unwrap();
    placemark::friends::graph::accept_invite(db.pool(), friend.id, invite.id)
        .await
        .unwrap();
    let reverse = placemark::friends::graph::send_invite(db.pool(), other_friend.id, owner.id)
        .await
        .unwrap();
    placemark::friends::graph::accept_invite(db.pool(), owner.id, reverse.id)
        .await
        .unwrap();

    let pagination = Pagination::new(None, None);

    let seen_by_stranger =
        engine::list_user_collections(db.pool(), stranger.id, owner.id, pagination)
            .await
            .unwrap();
    assert_eq!(seen_by_stranger.total_count, 1);
    assert_eq!(seen_by_stranger.items[0].title, "pub");

    let seen_by_friend = engine::list_user_collections(db.pool(), friend.id, owner.id, pagination)
        .await
        .unwrap();
    assert_eq!(seen_by_friend.total_count, 2);
    assert!(seen_by_friend.items.iter().all(|c| c.title != "priv"));

    let seen_by_other_friend =
        engine::list_user_collections(db.pool(), other_friend.id, owner.id, pagination)
            .await
            .unwrap();
    assert_eq!(seen_by_other_friend.total_count, 2);

    let seen_by_owner = engine::list_user_collections(db.pool(), owner.id, owner.id, pagination)
        .await
        .unwrap();
    assert_eq!(seen_by_owner.total_count, 3);
}

#[tokio::test]
#[serial]
async fn test_list_bookmarks_of_foreign_collection_is_forbidden() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let owner = db.create_test_user("owner").await;
    let intruder = db.create_test_user("intruder").await;
    let collection = engine::create_collection(
        db.pool(),
        owner.id,
        create_request("mine", Visibility::Public),
    )
    .await
    .unwrap();

    let err = engine::list_collection_bookmarks(db.pool(), intruder.id, collection.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}
