//! The seam for sending account verification email.
//!
//! Actual email delivery is an external collaborator. The production
//! implementation logs the activation link; tests use a recording
//! implementation to capture it.

/// Sends the account verification message for a newly registered user.
pub trait Mailer: Send + Sync {
    /// Deliver the activation link to `email`.
    fn send_verification(&self, email: &str, activation_link: &str);
}

/// A [Mailer] that writes the activation link to the log instead of sending
/// email.
#[derive(Debug, Default, Clone)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send_verification(&self, email: &str, activation_link: &str) {
        tracing::info!("verification email for {email}: {activation_link}");
    }
}
