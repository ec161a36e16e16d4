//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/api/accounts/{account_id}',
//! use [format_endpoint].

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for registering a new user.
pub const SIGN_UP: &str = "/api/auth/signup";
/// The route for logging in and receiving token cookies.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for logging out and clearing token cookies.
pub const LOG_OUT: &str = "/api/auth/logout";
/// The route for exchanging a refresh token for a new access token.
pub const TOKEN_REFRESH: &str = "/api/auth/token/refresh";
/// The route for activating a newly registered user.
pub const ACTIVATE: &str = "/api/auth/activate/{token}";
/// The route for the logged-in user's profile.
pub const USER_ME: &str = "/api/users/me";
/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to list and create transactions on an account.
pub const TRANSACTIONS: &str = "/api/accounts/{account_id}/transactions";
/// The route to access a single transaction on an account.
pub const TRANSACTION: &str = "/api/accounts/{account_id}/transactions/{transaction_id}";
/// The route to list the logged-in user's notifications.
pub const NOTIFICATIONS: &str = "/api/notifications";
/// The route to mark a notification as read.
pub const NOTIFICATION_READ: &str = "/api/notifications/{notification_id}/read";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace. If no
/// parameter is found, the original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
