//! Bookmark Collections
//!
//! The core of the service: named, visibility-scoped collections of
//! geotagged bookmarks and the synchronization engine that reconciles a
//! caller-submitted desired state against the persisted one.
//!
//! # Module Structure
//!
//! ```text
//! collections/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Rows, visibility enum, request/response DTOs
//! ├── db.rs       - Store operations (collections, bookmarks, locations, map)
//! ├── engine.rs   - Synchronization engine (transactional orchestration)
//! └── handlers.rs - HTTP handlers
//! ```
//!
//! # Stores
//!
//! Four tables cooperate:
//!
//! - `locations` - shared, deduplicated geocoordinates (never deleted)
//! - `bookmarks` - user-owned notes on a location, soft-deletable
//! - `bookmark_collections` - named, visibility-scoped containers
//! - `collection_bookmarks` - the membership map between the two
//!
//! The engine is the only writer; handlers validate field syntax and
//! delegate.

/// Data types and DTOs
pub mod types;

/// Database operations
pub mod db;

/// The synchronization engine
pub mod engine;

/// HTTP handlers
pub mod handlers;

pub use types::{Bookmark, BookmarkCollection, Location, Visibility};
