//! Defines the endpoint for logging out.

use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};

use crate::auth::{ACCESS_TOKEN_COOKIE, Claims, REFRESH_TOKEN_COOKIE, removal_cookie};

/// A route handler that clears the token cookies.
///
/// The tokens themselves stay valid until they expire; logging out only
/// removes them from the browser.
pub async fn log_out(_claims: Claims, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE));

    (jar, Json(json!({ "message": "logged out" })))
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

        server
    }

    #[tokio::test]
    async fn log_out_clears_cookies() {
        let mut server = test_server();
        server.save_cookies();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter22hunter22",
            }))
            .await
            .assert_status_ok();

        server.post(endpoints::LOG_OUT).await.assert_status_ok();

        // The cleared cookie no longer authenticates requests.
        server
            .get(endpoints::USER_ME)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_out_requires_authentication() {
        let server = test_server();

        server
            .post(endpoints::LOG_OUT)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
