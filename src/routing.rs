//! Defines the routing for the REST server.

use axum::{
    Router, http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState, account, auth, endpoints, notification, transaction, user,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::SIGN_UP, post(auth::sign_up))
        .route(endpoints::LOG_IN, post(auth::log_in))
        .route(endpoints::LOG_OUT, post(auth::log_out))
        .route(endpoints::TOKEN_REFRESH, post(auth::refresh_token))
        .route(endpoints::ACTIVATE, get(auth::activate))
        .route(
            endpoints::USER_ME,
            get(user::get_profile_endpoint)
                .patch(user::update_profile_endpoint)
                .delete(user::delete_profile_endpoint),
        )
        .route(
            endpoints::ACCOUNTS,
            get(account::list_accounts_endpoint).post(account::create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(account::get_account_endpoint).delete(account::delete_account_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::list_transactions_endpoint)
                .post(transaction::create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(transaction::get_transaction_endpoint)
                .patch(transaction::edit_transaction_endpoint)
                .delete(transaction::delete_transaction_endpoint),
        )
        .route(
            endpoints::NOTIFICATIONS,
            get(notification::list_notifications_endpoint),
        )
        .route(
            endpoints::NOTIFICATION_READ,
            post(notification::read_notification_endpoint),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> StatusCode {
    StatusCode::IM_A_TEAPOT
}
