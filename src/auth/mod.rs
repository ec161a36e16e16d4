//! User registration, activation and JWT-based session management.
//!
//! Log-in issues an access token (15 minutes) and a refresh token (7 days)
//! as HttpOnly cookies; the access token is also returned in the response
//! body for clients that prefer bearer headers. The [Claims] extractor
//! accepts either.

mod activate;
mod cookie;
mod log_in;
mod log_out;
mod password;
mod refresh;
mod sign_up;
mod token;

pub use activate::activate;
pub use log_in::{Credentials, log_in};
pub use log_out::log_out;
pub use password::{hash_password, verify_password};
pub use refresh::refresh_token;
pub use sign_up::{SignUpRequest, sign_up};
pub use token::{
    ACCESS_TOKEN_COOKIE, Claims, REFRESH_TOKEN_COOKIE, TokenUse, access_token_duration,
    activation_token_duration, decode_token, encode_token, refresh_token_duration,
};

pub(crate) use cookie::{auth_cookie, removal_cookie};
