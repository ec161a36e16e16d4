//! Defines the endpoint for exchanging a refresh token for a new access token.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{
        ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TokenUse, access_token_duration, auth_cookie,
        decode_token, encode_token,
    },
    user::get_user_by_id,
};

/// A route handler that issues a new access token from the refresh token
/// cookie.
///
/// # Errors
/// Returns [Error::InvalidToken] if the refresh cookie is missing, invalid
/// or is not a refresh token, and [Error::InactiveUser] if the user has been
/// deactivated since the refresh token was issued.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), Error> {
    let token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(Error::InvalidToken)?;

    let claims = decode_token(&token, state.decoding_key())?;

    if claims.token_use != TokenUse::Refresh {
        return Err(Error::InvalidToken);
    }

    {
        let connection = state.lock_connection()?;
        let user = get_user_by_id(claims.sub, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidToken,
            other => other,
        })?;

        if !user.is_active {
            return Err(Error::InactiveUser);
        }
    }

    let access_token = encode_token(
        claims.sub,
        TokenUse::Access,
        access_token_duration(),
        state.encoding_key(),
    )?;

    let jar = jar.add(auth_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token.clone(),
        time::Duration::days(7),
        state.secure_cookies,
    ));

    Ok((
        jar,
        Json(json!({ "message": "token refreshed", "access": access_token })),
    ))
}
