//! Helpers for building the HttpOnly token cookies.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Build an HttpOnly token cookie valid for `max_age`.
pub(crate) fn auth_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Build a cookie that removes the cookie named `name` from the client.
pub(crate) fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}
