//! Defines the endpoints for reading, editing and deleting the caller's
//! profile.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Claims,
    user::{User, deactivate_user, get_user_by_id, nickname_taken},
};

use super::core::update_profile;

/// The editable fields of a profile. `None` fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    /// A new display nickname.
    pub nickname: Option<String>,
    /// A new real name.
    pub name: Option<String>,
    /// A new phone number.
    pub phone_number: Option<String>,
}

/// A route handler that returns the caller's profile.
///
/// Profiles are read far more often than they change, so the response is
/// served from [crate::ReadCache] when possible.
pub async fn get_profile_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<User>, Error> {
    if let Some(user) = state.cache.get_user_profile(claims.sub) {
        return Ok(Json(user));
    }

    let user = {
        let connection = state.lock_connection()?;
        get_user_by_id(claims.sub, &connection)?
    };

    state.cache.put_user_profile(user.clone());

    Ok(Json(user))
}

/// A route handler that updates the caller's profile.
///
/// # Errors
/// Returns [Error::DuplicateNickname] if the new nickname belongs to another
/// user.
pub async fn update_profile_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, Error> {
    let user = {
        let connection = state.lock_connection()?;

        if let Some(nickname) = update.nickname.as_deref()
            && nickname_taken(nickname, Some(claims.sub), &connection)?
        {
            return Err(Error::DuplicateNickname);
        }

        update_profile(
            claims.sub,
            update.nickname.as_deref(),
            update.name.as_deref(),
            update.phone_number.as_deref(),
            &connection,
        )?;

        get_user_by_id(claims.sub, &connection)?
    };

    state.cache.invalidate_user_profile(claims.sub);

    Ok(Json(user))
}

/// A route handler that soft-deletes the caller's account.
///
/// The user row is kept but marked inactive, which invalidates every
/// outstanding refresh token.
pub async fn delete_profile_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, Error> {
    {
        let connection = state.lock_connection()?;
        deactivate_user(claims.sub, &connection)?;
    }

    state.cache.invalidate_user_profile(claims.sub);

    Ok(Json(json!({ "message": "Deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{AppState, build_router, endpoints, user::test_support::create_test_user};

    fn test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let (state, _events) = AppState::new(connection, "42", "http://localhost:3000", false)
            .expect("Could not create app state.");

        let server = TestServer::new(build_router(state.clone()));

        let guard = state.db_connection.lock().unwrap();
        create_test_user("test@test.com", "hunter22hunter22", "tester", true, &guard);
        create_test_user("other@test.com", "hunter22hunter22", "other", true, &guard);

        server
    }

    async fn log_in(server: &TestServer, email: &str) {
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({ "email": email, "password": "hunter22hunter22" }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn profile_omits_password_hash() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server, "test@test.com").await;

        let response = server.get(endpoints::USER_ME).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["email"], "test@test.com");
        assert_eq!(body["nickname"], "tester");
        assert!(body.get("password_hash").is_none());
        assert!(body.get("is_active").is_none());
    }

    #[tokio::test]
    async fn profile_requires_authentication() {
        let server = test_server();

        server
            .get(endpoints::USER_ME)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server, "test@test.com").await;

        let response = server
            .patch(endpoints::USER_ME)
            .content_type("application/json")
            .json(&json!({ "name": "Test Person" }))
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "Test Person");
        assert_eq!(body["nickname"], "tester");
    }

    #[tokio::test]
    async fn update_rejects_taken_nickname() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server, "test@test.com").await;

        server
            .patch(endpoints::USER_ME)
            .content_type("application/json")
            .json(&json!({ "nickname": "other" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn keeping_own_nickname_is_allowed() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server, "test@test.com").await;

        server
            .patch(endpoints::USER_ME)
            .content_type("application/json")
            .json(&json!({ "nickname": "tester" }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn delete_deactivates_the_account() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server, "test@test.com").await;

        server.delete(endpoints::USER_ME).await.assert_status_ok();

        // A deactivated user can no longer log in.
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter22hunter22",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
