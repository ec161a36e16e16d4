//! Defines the endpoint for activating a newly registered user.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{TokenUse, decode_token},
    user::activate_user,
};

/// A route handler that activates the user referenced by an activation token.
///
/// # Errors
/// Returns [Error::Validation] if the token is invalid, expired or is not an
/// activation token.
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, Error> {
    let claims = decode_token(&token, state.decoding_key())
        .map_err(|_| Error::Validation("invalid activation link".to_owned()))?;

    if claims.token_use != TokenUse::Activate {
        return Err(Error::Validation("invalid activation link".to_owned()));
    }

    let connection = state.lock_connection()?;
    activate_user(claims.sub, &connection)?;

    Ok(Json(json!({ "message": "account activated" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, build_router, endpoints,
        mailer::test_support::RecordingMailer,
    };

    fn test_server_with_mailer() -> (TestServer, RecordingMailer) {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let (state, _events) = AppState::new(connection, "42", "http://localhost:3000", false)
            .expect("Could not create app state.");
        let mailer = RecordingMailer::default();
        let state = state.with_mailer(Arc::new(mailer.clone()));

        let server = TestServer::new(build_router(state));

        (server, mailer)
    }

    #[tokio::test]
    async fn emailed_link_activates_the_account() {
        let (server, mailer) = test_server_with_mailer();
        let credentials = json!({
            "email": "test@test.com",
            "password": "averysafeandsecurepassword",
            "nickname": "tester",
        });

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&credentials)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        // Logging in before activation must fail.
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&credentials)
            .await
            .assert_status(axum::http::StatusCode::UNAUTHORIZED);

        let link = mailer.links().pop().unwrap();
        let path = link.strip_prefix("http://localhost:3000").unwrap().to_owned();
        server.get(&path).await.assert_status_ok();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&credentials)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let (server, _) = test_server_with_mailer();

        server
            .get("/api/auth/activate/not-a-real-token")
            .await
            .assert_status_bad_request();
    }
}
