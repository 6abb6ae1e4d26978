use super::IMailer;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Keeps every delivered email in memory. Used when testing.
#[derive(Default)]
pub struct InMemoryMailer {
    sent: Mutex<Vec<SentMail>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `recipient` fails from now on
    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent()
            .into_iter()
            .filter(|mail| mail.to == recipient)
            .collect()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let failing = self
            .failing_recipients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(to);
        if failing {
            return false;
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        true
    }
}
