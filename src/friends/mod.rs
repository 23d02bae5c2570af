//! Friend Graph
//!
//! Friend relationships are stored as directed invitations:
//! `PENDING -> ACCEPTED`, or `PENDING -> removed` (implicit decline).
//! Only ACCEPTED edges - checked in either direction - grant access to
//! FRIENDS_ONLY collections.
//!
//! At most one PENDING-or-ACCEPTED edge may exist per unordered user pair;
//! a partial unique index on `(LEAST, GREATEST)` backs the application
//! check under concurrency.
//!
//! # Module Structure
//!
//! ```text
//! friends/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Invite row, status enum, DTOs
//! ├── db.rs       - Database operations
//! ├── graph.rs    - State-machine operations (send/accept/remove/list)
//! └── handlers.rs - HTTP handlers
//! ```

/// Data types
pub mod types;

/// Database operations
pub mod db;

/// State-machine operations
pub mod graph;

/// HTTP handlers
pub mod handlers;

pub use types::{FriendInvite, FriendInviteStatus};
