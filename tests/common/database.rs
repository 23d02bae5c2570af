//! Database test fixtures and utilities
//!
//! Provides a migrated, truncated PostgreSQL pool for integration tests.
//! Tests are skipped when no test database is configured, so the unit
//! suite stays runnable without infrastructure.

use sqlx::PgPool;
use uuid::Uuid;

use placemark::auth::users::{create_user, User};

/// Test database fixture
///
/// Connects to `TEST_DATABASE_URL` (falling back to `DATABASE_URL`), runs
/// migrations, and truncates all tables so each test starts clean. Tests
/// using this fixture must be `#[serial]`: they share one database.
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connect to the configured test database, or `None` when no URL is
    /// set (the caller should skip the test).
    pub async fn connect() -> Option<Self> {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()?;

        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        let db = Self { pool };
        db.reset().await;
        Some(db)
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Remove all rows while preserving the schema
    pub async fn reset(&self) {
        sqlx::query(
            "TRUNCATE TABLE collection_bookmarks, bookmarks, locations, \
             bookmark_collections, friend_invites, users CASCADE",
        )
        .execute(&self.pool)
        .await
        .expect("failed to truncate test tables");
    }

    /// Insert a user directly, bypassing the signup handler
    pub async fn create_test_user(&self, nickname: &str) -> User {
        let suffix = Uuid::new_v4().simple().to_string();
        create_user(
            &self.pool,
            nickname,
            &format!("{nickname}-{suffix}@example.com"),
            "$2b$04$testhashtesthashtesthash",
        )
        .await
        .expect("failed to insert test user")
    }
}
