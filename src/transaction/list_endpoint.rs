//! Defines the endpoint for listing the transactions on an account.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{AppState, Error, account::AccountId, auth::Claims, pagination::Paginated};

use super::core::{TransactionFilter, TransactionRecord, list_transactions};

/// A route handler that returns a filtered, paged view of an account's
/// transaction history, newest first.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Paginated<TransactionRecord>>, Error> {
    let connection = state.lock_connection()?;
    let page = list_transactions(account_id, claims.sub, &filter, &connection)?;

    Ok(Json(page))
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

    async fn deposit(server: &TestServer, path: &str, amount: &str) {
        server
            .post(path)
            .content_type("application/json")
            .json(&json!({
                "transaction_amount": amount,
                "transaction_type": "DEPOSIT",
                "transaction_method": "ATM",
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn list_includes_count_and_results() {
        let mut server = test_server();
        server.save_cookies();
        let account_id = log_in_and_create_account(&server).await;
        let path = format_endpoint(endpoints::TRANSACTIONS, account_id);
        deposit(&server, &path, "100").await;
        deposit(&server, &path, "200").await;

        let response = server.get(&path).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["count"], 2);
        assert_eq!(body["page"], 1);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn amount_filter_narrows_the_list() {
        let mut server = test_server();
        server.save_cookies();
        let account_id = log_in_and_create_account(&server).await;
        let path = format_endpoint(endpoints::TRANSACTIONS, account_id);
        deposit(&server, &path, "100").await;
        deposit(&server, &path, "5000").await;

        let response = server
            .get(&path)
            .add_query_param("min_amount", "1000")
            .await;

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["transaction_amount"], "5000.00");
    }

    #[tokio::test]
    async fn page_size_is_honored() {
        let mut server = test_server();
        server.save_cookies();
        let account_id = log_in_and_create_account(&server).await;
        let path = format_endpoint(endpoints::TRANSACTIONS, account_id);
        for _ in 0..3 {
            deposit(&server, &path, "100").await;
        }

        let response = server
            .get(&path)
            .add_query_param("page_size", "2")
            .await;

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["count"], 3);
        assert_eq!(body["page_size"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn listing_missing_account_is_not_found() {
        let mut server = test_server();
        server.save_cookies();
        log_in_and_create_account(&server).await;

        server
            .get(&format_endpoint(endpoints::TRANSACTIONS, 999))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
