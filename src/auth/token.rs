//! JWT claims, encoding/decoding, and the extractor for protected routes.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, user::UserId};

/// The name of the cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The name of the cookie holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// How long an access token stays valid.
pub fn access_token_duration() -> Duration {
    Duration::minutes(15)
}

/// How long a refresh token stays valid.
pub fn refresh_token_duration() -> Duration {
    Duration::days(7)
}

/// How long an account activation token stays valid.
pub fn activation_token_duration() -> Duration {
    Duration::hours(24)
}

/// What a token may be used for. Each token is valid for exactly one purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Authenticates API requests.
    Access,
    /// Can be exchanged for a new access token.
    Refresh,
    /// Activates a newly registered user.
    Activate,
}

/// The contents of a JSON Web Token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserId,
    /// The expiry time of the token.
    pub exp: usize,
    /// The time the token was issued.
    pub iat: usize,
    /// The purpose the token is valid for.
    pub token_use: TokenUse,
}

/// Create a signed token for `user_id` valid for `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if signing fails.
pub fn encode_token(
    user_id: UserId,
    token_use: TokenUse,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + duration).timestamp() as usize,
        iat: now.timestamp() as usize,
        token_use,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("could not sign token: {error}");
        Error::TokenCreation
    })
}

/// Decode and validate a token, checking its signature and expiry.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, has a bad
/// signature or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| Error::InvalidToken)
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok();

        let token = match bearer {
            Some(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            None => {
                let jar = parts
                    .extract::<CookieJar>()
                    .await
                    .map_err(|_| Error::InvalidToken)?;

                jar.get(ACCESS_TOKEN_COOKIE)
                    .map(|cookie| cookie.value().to_owned())
                    .ok_or(Error::InvalidToken)?
            }
        };

        let state = AppState::from_ref(state);
        let claims = decode_token(&token, state.decoding_key())?;

        // A refresh or activation token must not authenticate API requests.
        if claims.token_use != TokenUse::Access {
            return Err(Error::InvalidToken);
        }

        Ok(claims)
    }
}
