//! Defines the endpoint for registering a new user.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error, endpoints,
    auth::{TokenUse, activation_token_duration, encode_token, hash_password},
    user::{NewUser, insert_user, nickname_taken},
};

/// The minimum number of characters for a password.
const MIN_PASSWORD_LENGTH: usize = 8;

/// The request body for registering a new user.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    /// The email to register, must be unique.
    pub email: String,
    /// The password in plain text.
    pub password: String,
    /// The display nickname, must be unique among users.
    pub nickname: String,
    /// The user's real name.
    #[serde(default)]
    pub name: String,
    /// The user's phone number.
    #[serde(default)]
    pub phone_number: String,
}

/// A route handler for registering a new user.
///
/// The user is created inactive; an activation link is handed to the mailer
/// and the account only becomes usable once the link is visited.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse, Error> {
    if EmailAddress::from_str(&request.email).is_err() {
        return Err(Error::Validation("invalid email address".to_owned()));
    }

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if request.nickname.trim().is_empty() {
        return Err(Error::Validation("nickname must not be empty".to_owned()));
    }

    let password_hash = hash_password(&request.password)?;

    let user = {
        let connection = state.lock_connection()?;

        if nickname_taken(&request.nickname, None, &connection)? {
            return Err(Error::DuplicateNickname);
        }

        insert_user(
            NewUser {
                email: request.email,
                password_hash,
                nickname: request.nickname,
                name: request.name,
                phone_number: request.phone_number,
            },
            &connection,
        )?
    };

    let activation_token = encode_token(
        user.id,
        TokenUse::Activate,
        activation_token_duration(),
        state.encoding_key(),
    )?;
    let activation_link = format!(
        "{}{}",
        state.base_url,
        endpoints::ACTIVATE.replace("{token}", &activation_token)
    );
    state.mailer.send_verification(&user.email, &activation_link);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user registered, visit the emailed activation link to log in",
            "user_id": user.id,
        })),
    ))
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
    async fn sign_up_creates_user_and_sends_activation_link() {
        let (server, mailer) = test_server_with_mailer();

        let response = server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "averysafeandsecurepassword",
                "nickname": "tester",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let links = mailer.links();
        assert_eq!(links.len(), 1);
        assert!(links[0].starts_with("http://localhost:3000/api/auth/activate/"));
    }

    #[tokio::test]
    async fn sign_up_rejects_invalid_email() {
        let (server, _) = test_server_with_mailer();

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "email": "not an email",
                "password": "averysafeandsecurepassword",
                "nickname": "tester",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn sign_up_rejects_short_password() {
        let (server, _) = test_server_with_mailer();

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "short",
                "nickname": "tester",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let (server, _) = test_server_with_mailer();
        let body = json!({
            "email": "test@test.com",
            "password": "averysafeandsecurepassword",
            "nickname": "tester",
        });

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&body)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body = json!({
            "email": "test@test.com",
            "password": "averysafeandsecurepassword",
            "nickname": "tester2",
        });

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&body)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_nickname() {
        let (server, _) = test_server_with_mailer();

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "email": "first@test.com",
                "password": "averysafeandsecurepassword",
                "nickname": "tester",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "email": "second@test.com",
                "password": "averysafeandsecurepassword",
                "nickname": "tester",
            }))
            .await
            .assert_status_bad_request();
    }
}
