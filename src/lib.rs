//! Placemark - Geotagged Bookmark Collection Backend
//!
//! Placemark is a social bookmarking backend built on Axum and PostgreSQL.
//! Users collect geotagged bookmarks (a place plus a free-text note) into
//! named, visibility-scoped collections, and manage friend relationships
//! that gate access to friends-only collections.
//!
//! # Module Structure
//!
//! - **`server`** - Application state, configuration, app construction
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`middleware`** - JWT authentication middleware
//! - **`error`** - Error taxonomy and HTTP response conversion
//! - **`auth`** - User accounts, password hashing, JWT sessions
//! - **`collections`** - Bookmark collections and the synchronization engine
//! - **`friends`** - Friend invitations and the accepted-edge friend graph
//! - **`pagination`** - Offset pagination parameters and result pages
//!
//! # The Synchronization Engine
//!
//! The heart of the crate is [`collections::engine`]: it reconciles a
//! user-submitted desired state of a collection (locations with content to
//! add, bookmark ids to delete) against the persisted state in a single
//! database transaction, deduplicating location rows by exact coordinate
//! pair and soft-deleting removed bookmarks.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication middleware
pub mod middleware;

/// Error types and HTTP conversion
pub mod error;

/// User accounts and JWT sessions
pub mod auth;

/// Bookmark collections and the synchronization engine
pub mod collections;

/// Friend invitations and the friend graph
pub mod friends;

/// Offset pagination
pub mod pagination;

pub use error::ServiceError;
pub use server::create_app;
