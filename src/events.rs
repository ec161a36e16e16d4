//! Domain events emitted by the balance ledger.
//!
//! The ledger does not call into the cache or the notification table itself.
//! It publishes a [LedgerEvent] after each committed balance change and the
//! invalidation worker consumes the stream: it drops the account's cached
//! read views and records a notification for the owning user.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::{cache::ReadCache, notification::insert_notification, transaction::TransactionType};

/// An event describing a committed change to an account's state.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    /// A deposit or withdrawal was committed against an account.
    BalanceChanged {
        /// The user that owns the account.
        user_id: i64,
        /// The account whose balance changed.
        account_id: i64,
        /// The account number, used in the notification message.
        account_number: String,
        /// Whether money was deposited or withdrawn.
        kind: TransactionType,
        /// The transaction amount.
        amount: Decimal,
    },
}

/// The sending half of the ledger event channel.
pub type EventSender = mpsc::UnboundedSender<LedgerEvent>;

/// The receiving half of the ledger event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<LedgerEvent>;

/// Create the ledger event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Consume ledger events until the channel closes.
///
/// For each balance change the worker invalidates the account's cached read
/// view and inserts a notification row for the owning user. Failures are
/// logged and do not stop the worker: a missed notification must never fail
/// the request that produced the event.
pub async fn run_invalidation_worker(
    mut events: EventReceiver,
    cache: ReadCache,
    db_connection: Arc<Mutex<Connection>>,
) {
    while let Some(event) = events.recv().await {
        handle_event(&event, &cache, &db_connection);
    }

    tracing::debug!("ledger event channel closed, stopping invalidation worker");
}

fn handle_event(event: &LedgerEvent, cache: &ReadCache, db_connection: &Arc<Mutex<Connection>>) {
    let LedgerEvent::BalanceChanged {
        user_id,
        account_id,
        account_number,
        kind,
        amount,
    } = event;

    cache.invalidate_account(*account_id);

    let message = format!(
        "{} of {} on account {}",
        kind.display_name(),
        amount,
        account_number
    );

    let connection = match db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire the database lock for a notification: {error}");
            return;
        }
    };

    if let Err(error) = insert_notification(*user_id, &message, &connection) {
        tracing::error!("could not record notification for user {user_id}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use super::{LedgerEvent, channel, run_invalidation_worker};
    use crate::{
        account::{Account, AccountType, BankCode},
        cache::ReadCache,
        db::initialize,
        notification::list_notifications,
        user::{NewUser, insert_user},
    };

    fn test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn test_user_id(connection: &Connection) -> i64 {
        insert_user(
            NewUser {
                email: "worker@test.com".to_owned(),
                password_hash: "hash".to_owned(),
                nickname: "worker".to_owned(),
                name: String::new(),
                phone_number: String::new(),
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn balance_change_invalidates_cache_and_records_notification() {
        let connection = test_connection();
        let user_id = test_user_id(&connection);
        let cache = ReadCache::new();
        cache.put_account(Account {
            id: 1,
            user_id,
            account_number: "9999".to_owned(),
            bank_code: BankCode::KbKookmin,
            account_type: AccountType::Checking,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let db_connection = Arc::new(Mutex::new(connection));

        let (sender, receiver) = channel();
        let worker = tokio::spawn(run_invalidation_worker(
            receiver,
            cache.clone(),
            db_connection.clone(),
        ));

        sender
            .send(LedgerEvent::BalanceChanged {
                user_id,
                account_id: 1,
                account_number: "9999".to_owned(),
                kind: crate::transaction::TransactionType::Deposit,
                amount: Decimal::new(10_000_00, 2),
            })
            .unwrap();
        drop(sender);
        worker.await.unwrap();

        assert!(cache.get_account(1).is_none());

        let connection = db_connection.lock().unwrap();
        let notifications = list_notifications(user_id, &connection).unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("Deposit of 10000.00"));
        assert!(!notifications[0].is_read);
    }

    #[tokio::test]
    async fn send_without_consumer_does_not_panic() {
        let (sender, receiver) = channel();
        drop(receiver);

        let result = sender.send(LedgerEvent::BalanceChanged {
            user_id: 1,
            account_id: 1,
            account_number: "1".to_owned(),
            kind: crate::transaction::TransactionType::Withdraw,
            amount: Decimal::ONE,
        });

        assert!(result.is_err());
    }
}
