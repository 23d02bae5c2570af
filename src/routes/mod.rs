//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Main router creation
//! └── api_routes.rs - API endpoint handlers
//! ```
//!
//! # Route Organization
//!
//! Routes split into two groups:
//!
//! 1. **Public routes** - signup, login, nickname verification
//! 2. **Protected routes** - everything under a JWT middleware layer
//!
//! # Route Types
//!
//! ## Public Routes
//!
//! - `POST /api/auth/signup` - User registration
//! - `POST /api/auth/login` - User login
//! - `POST /api/users/verify-nickname` - Nickname availability check
//!
//! ## Protected Routes
//!
//! - `GET /api/auth/me` - Get current user
//! - `PATCH /api/users/me/nickname` - Change nickname
//! - `POST /api/users/me/collections` - Create a collection
//! - `GET /api/users/me/collections` - List own collections
//! - `PATCH /api/users/me/collections/{id}` - Synchronize a collection
//! - `DELETE /api/users/me/collections/{id}` - Delete a collection
//! - `GET /api/users/me/collections/{id}/bookmarks` - Collection contents
//! - `GET /api/users/{id}/collections` - Another user's visible collections
//! - `GET /api/friends` - Friend list
//! - `POST /api/friends/invite` - Send a friend invite
//! - `GET /api/friends/invites/received` - Received pending invites
//! - `GET /api/friends/invites/sent` - Sent pending invites
//! - `POST /api/friends/invites/{id}/accept` - Accept an invite
//! - `DELETE /api/friends/invites/{id}` - Decline or unfriend

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
