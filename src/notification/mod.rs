//! Notifications recorded for users when their balances change.

mod core;
mod list_endpoint;
mod read_endpoint;

pub use core::{
    Notification, NotificationId, create_notification_table, insert_notification,
    list_notifications, mark_notification_read,
};
pub use list_endpoint::list_notifications_endpoint;
pub use read_endpoint::read_notification_endpoint;
