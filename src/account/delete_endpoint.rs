//! Defines the endpoint for deleting a bank account.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{AppState, Error, account::delete_account, auth::Claims};

use super::core::AccountId;

/// A route handler that deletes one of the caller's accounts along with its
/// transaction history.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub async fn delete_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Value>, Error> {
    {
        let connection = state.lock_connection()?;
        delete_account(account_id, claims.sub, &connection)?;
    }

    state.cache.invalidate_account(account_id);

    Ok(Json(json!({ "message": "account deleted" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, build_router,
        endpoints::{self, format_endpoint},
        user::test_support::create_test_user,
    };

    fn test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let (state, _events) = AppState::new(connection, "42", "http://localhost:3000", false)
            .expect("Could not create app state.");

        let server = TestServer::new(build_router(state.clone()));

        let guard = state.db_connection.lock().unwrap();
        create_test_user("test@test.com", "hunter22hunter22", "tester", true, &guard);

        server
    }

    async fn log_in(server: &TestServer) {
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter22hunter22",
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn deleted_account_is_gone() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server).await;

        let response = server
            .post(endpoints::ACCOUNTS)
            .content_type("application/json")
            .json(&json!({
                "account_number": "110-1234-5678",
                "bank_code": "088",
                "account_type": "CHECKING",
            }))
            .await;
        let account_id = response.json::<serde_json::Value>()["account_id"]
            .as_i64()
            .unwrap();
        let path = format_endpoint(endpoints::ACCOUNT, account_id);

        // Warm the cache before deleting.
        server.get(&path).await.assert_status_ok();

        server.delete(&path).await.assert_status_ok();

        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_missing_account_is_not_found() {
        let mut server = test_server();
        server.save_cookies();
        log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, 999))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
