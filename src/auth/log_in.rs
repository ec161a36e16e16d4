//! Defines the endpoint for logging in and issuing token cookies.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{
        ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TokenUse, access_token_duration, auth_cookie,
        encode_token, refresh_token_duration, verify_password,
    },
    user::{get_user_by_email, set_last_login},
};

/// How long the browser keeps the token cookies.
fn cookie_max_age() -> time::Duration {
    time::Duration::days(7)
}

/// The request body for logging in.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

/// Handler for sign-in requests.
///
/// On success the access and refresh tokens are set as HttpOnly cookies and
/// the access token is also returned in the body for bearer clients.
///
/// # Errors
/// Returns [Error::InvalidCredentials] for an unknown email or wrong
/// password, and [Error::InactiveUser] when the account has not been
/// activated or has been deleted.
pub async fn log_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<Value>), Error> {
    let user = {
        let connection = state.lock_connection()?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            other => other,
        })?
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    if !user.is_active {
        return Err(Error::InactiveUser);
    }

    let access_token = encode_token(
        user.id,
        TokenUse::Access,
        access_token_duration(),
        state.encoding_key(),
    )?;
    let refresh_token = encode_token(
        user.id,
        TokenUse::Refresh,
        refresh_token_duration(),
        state.encoding_key(),
    )?;

    {
        let connection = state.lock_connection()?;
        set_last_login(user.id, Utc::now(), &connection)?;
    }

    let jar = jar
        .add(auth_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token.clone(),
            cookie_max_age(),
            state.secure_cookies,
        ))
        .add(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            cookie_max_age(),
            state.secure_cookies,
        ));

    Ok((
        jar,
        Json(json!({ "message": "logged in", "access": access_token })),
    ))
}
