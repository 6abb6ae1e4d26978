mod inmemory;
mod smtp;

pub use inmemory::{InMemoryMailer, SentMail};
pub use smtp::SmtpMailer;

/// Sends a single email.
///
/// Implementations never return errors: a failed send, including missing
/// credentials, is logged and reported as `false`. There are no retries.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool;
}
