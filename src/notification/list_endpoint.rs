//! Defines the endpoint for listing the caller's notifications.

use axum::{Json, extract::State};

use crate::{AppState, Error, auth::Claims};

use super::core::{Notification, list_notifications};

/// A route handler that returns all of the caller's notifications, newest
/// first.
pub async fn list_notifications_endpoint(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Notification>>, Error> {
    let connection = state.lock_connection()?;
    let notifications = list_notifications(claims.sub, &connection)?;

    Ok(Json(notifications))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, build_router, endpoints, notification::insert_notification,
        user::test_support::create_test_user,
    };

    #[tokio::test]
    async fn lists_own_notifications_only() {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let (state, _events) = AppState::new(connection, "42", "http://localhost:3000", false)
            .expect("Could not create app state.");
        let mut server = TestServer::new(build_router(state.clone()));
        server.save_cookies();

        {
            let guard = state.db_connection.lock().unwrap();
            let user = create_test_user("test@test.com", "hunter22hunter22", "tester", true, &guard);
            let other = create_test_user("other@test.com", "hunter22hunter22", "other", true, &guard);
            insert_notification(user.id, "for me", &guard).unwrap();
            insert_notification(other.id, "not for me", &guard).unwrap();
        }

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": "hunter22hunter22",
            }))
            .await
            .assert_status_ok();

        let response = server.get(endpoints::NOTIFICATIONS).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        let messages: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|notification| notification["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["for me"]);
    }

    #[tokio::test]
    async fn listing_requires_authentication() {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let (state, _events) = AppState::new(connection, "42", "http://localhost:3000", false)
            .expect("Could not create app state.");
        let server = TestServer::new(build_router(state));

        server
            .get(endpoints::NOTIFICATIONS)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
