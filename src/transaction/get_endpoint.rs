//! Defines the endpoint for reading a single transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, Error, account::AccountId, auth::Claims};

use super::core::{TransactionId, TransactionRecord, get_transaction};

/// A route handler that returns a single transaction on one of the caller's
/// accounts.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction or account is missing or not
/// owned by the caller.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Result<Json<TransactionRecord>, Error> {
    let connection = state.lock_connection()?;
    let record = get_transaction(account_id, transaction_id, claims.sub, &connection)?;

    Ok(Json(record))
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

    async fn log_in_and_create_account(server: &TestServer) -> i64 {
        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter22hunter22",
            }))
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::ACCOUNTS)
            .content_type("application/json")
            .json(&json!({
                "account_number": "110-1234-5678",
                "bank_code": "088",
                "account_type": "CHECKING",
            }))
            .await;
        response.json::<serde_json::Value>()["account_id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn returns_the_full_record() {
        let mut server = test_server();
        server.save_cookies();
        let account_id = log_in_and_create_account(&server).await;

        let response = server
            .post(&format_endpoint(endpoints::TRANSACTIONS, account_id))
            .content_type("application/json")
            .json(&json!({
                "transaction_amount": "123.45",
                "transaction_type": "DEPOSIT",
                "transaction_method": "TRANSFER",
                "transaction_details": "lunch money",
            }))
            .await;
        let transaction_id = response.json::<serde_json::Value>()["transaction_id"]
            .as_i64()
            .unwrap();

        let path = format_endpoint(endpoints::TRANSACTION, account_id)
            .replace("{transaction_id}", &transaction_id.to_string());
        let body = server.get(&path).await.json::<serde_json::Value>();

        assert_eq!(body["transaction_amount"], "123.45");
        assert_eq!(body["post_transaction_amount"], "123.45");
        assert_eq!(body["transaction_details"], "lunch money");
        assert_eq!(body["transaction_method"], "TRANSFER");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let mut server = test_server();
        server.save_cookies();
        let account_id = log_in_and_create_account(&server).await;

        let path = format_endpoint(endpoints::TRANSACTION, account_id)
            .replace("{transaction_id}", "999");
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
}
