//! Authentication and nickname integration tests
//!
//! Calls the handlers directly (the extractors are plain tuple structs)
//! against a real PostgreSQL database. Skipped when no test database is
//! configured.

mod common;

use axum::extract::State;
use axum::Json;
use pretty_assertions::assert_eq;
use serial_test::serial;

use common::database::TestDatabase;
use placemark::auth::handlers::{
    change_nickname, login, signup, verify_nickname, LoginRequest, NicknameRequest, SignupRequest,
};
use placemark::auth::sessions::verify_token;
use placemark::middleware::auth::{AuthUser, AuthenticatedUser};
use placemark::ServiceError;

fn signup_request(nickname: &str, email: &str) -> Json<SignupRequest> {
    Json(SignupRequest {
        nickname: nickname.to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
    })
}

#[tokio::test]
#[serial]
async fn test_signup_then_login() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    let Json(created) = signup(
        State(db.pool().clone()),
        signup_request("alice", "alice@example.com"),
    )
    .await
    .unwrap();
    assert_eq!(created.user.nickname, "alice");

    // The token identifies the new user.
    let claims = verify_token(&created.token).unwrap();
    assert_eq!(claims.sub, created.user.id);
    assert_eq!(claims.nickname, "alice");

    let Json(session) = login(
        State(db.pool().clone()),
        Json(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(session.user.id, created.user.id);
}

#[tokio::test]
#[serial]
async fn test_login_rejects_wrong_password() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    signup(
        State(db.pool().clone()),
        signup_request("alice", "alice@example.com"),
    )
    .await
    .unwrap();

    let err = login(
        State(db.pool().clone()),
        Json(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "wrong horse".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
#[serial]
async fn test_duplicate_nickname_and_email_conflict() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    signup(
        State(db.pool().clone()),
        signup_request("alice", "alice@example.com"),
    )
    .await
    .unwrap();

    let err = signup(
        State(db.pool().clone()),
        signup_request("alice", "alice2@example.com"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = signup(
        State(db.pool().clone()),
        signup_request("alice2", "alice@example.com"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = verify_nickname(
        State(db.pool().clone()),
        Json(NicknameRequest {
            nickname: "alice".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn test_change_nickname_to_taken_one_conflicts() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    signup(
        State(db.pool().clone()),
        signup_request("alice", "alice@example.com"),
    )
    .await
    .unwrap();
    let Json(bob) = signup(
        State(db.pool().clone()),
        signup_request("bob", "bob@example.com"),
    )
    .await
    .unwrap();

    let auth = AuthUser(AuthenticatedUser {
        user_id: bob.user.id.parse().unwrap(),
        nickname: bob.user.nickname.clone(),
    });

    let err = change_nickname(
        State(db.pool().clone()),
        auth.clone(),
        Json(NicknameRequest {
            nickname: "alice".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let Json(renamed) = change_nickname(
        State(db.pool().clone()),
        auth,
        Json(NicknameRequest {
            nickname: "robert".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(renamed.nickname, "robert");
}
