mod templates;

use actix_web::rt::time::sleep;
use chrono_tz::Tz;
use gatherly_domain::{format_timestamp, DispatchOutcome, Event, NotificationKind, Participant, ID};
use gatherly_infra::{GatherlyContext, IMailer};
use handlebars::{Handlebars, RenderError};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use templates::template_for;
use tracing::{error, info, warn};

/// One email of a batch: who receives it and which `Event` it is about
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub participant_id: ID,
    pub recipient: String,
    pub recipient_name: Option<String>,
    pub event_id: ID,
    pub event_title: String,
    pub event_start_ts: i64,
}

impl BatchEntry {
    pub fn new(event: &Event, participant: &Participant) -> Self {
        Self {
            participant_id: participant.id,
            recipient: participant.email.clone(),
            recipient_name: participant.name.clone(),
            event_id: event.id,
            event_title: event.title.clone(),
            event_start_ts: event.start_ts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub outcome: DispatchOutcome,
    /// `Participant`s whose email was accepted by the mail transport, in send order
    pub delivered: Vec<ID>,
}

/// Told about every email of a batch right after the mail transport accepted it
#[async_trait::async_trait(?Send)]
pub trait DeliveryObserver {
    async fn delivered(&self, entry: &BatchEntry);
}

pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

/// Renders notifications and hands them to the mail transport one by one
pub struct NotificationDispatcher {
    mailer: Arc<dyn IMailer>,
    message_delay: Duration,
    timezone: Tz,
    templates: Handlebars<'static>,
}

impl NotificationDispatcher {
    pub fn new(ctx: &GatherlyContext) -> Self {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);

        Self {
            mailer: ctx.mailer.clone(),
            message_delay: ctx.config.pacing.message_delay,
            timezone: ctx.config.reminder_trigger.timezone(),
            templates,
        }
    }

    pub fn render(
        &self,
        kind: NotificationKind,
        entry: &BatchEntry,
    ) -> Result<RenderedNotification, RenderError> {
        let template = template_for(kind);
        let vars = json!({
            "name": entry.recipient_name.as_deref().unwrap_or(&entry.recipient),
            "title": entry.event_title,
            "start": format_timestamp(entry.event_start_ts, &self.timezone),
        });

        Ok(RenderedNotification {
            subject: self.templates.render_template(template.subject, &vars)?,
            html_body: self.templates.render_template(template.html_body, &vars)?,
        })
    }

    /// Sends one notification. Failures are logged and reported as `false`.
    pub async fn send_one(&self, kind: NotificationKind, entry: &BatchEntry) -> bool {
        let notification = match self.render(kind, entry) {
            Ok(notification) => notification,
            Err(e) => {
                error!(
                    "Unable to render {} for event: {} to: {}. Error: {:?}",
                    kind, entry.event_id, entry.recipient, e
                );
                return false;
            }
        };

        let sent = self
            .mailer
            .send(&entry.recipient, &notification.subject, &notification.html_body)
            .await;
        if sent {
            info!(
                "Sent {} for event: {} to: {}",
                kind, entry.event_id, entry.recipient
            );
        } else {
            warn!(
                "Failed to send {} for event: {} to: {}",
                kind, entry.event_id, entry.recipient
            );
        }
        sent
    }

    /// Sends the entries in order, pausing between two sends.
    /// A failed send never stops the rest of the batch.
    ///
    /// `observer` hears about a delivered entry before the next pause, so a
    /// batch that is dropped halfway has reported every email it sent.
    pub async fn send_batch(
        &self,
        kind: NotificationKind,
        entries: &[BatchEntry],
        observer: &dyn DeliveryObserver,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                pause(self.message_delay).await;
            }
            let sent = self.send_one(kind, entry).await;
            report.outcome.record(sent);
            if sent {
                observer.delivered(entry).await;
                report.delivered.push(entry.participant_id);
            }
        }

        info!(
            "Sent {} {}s, {} failed",
            report.outcome.sent, kind, report.outcome.failed
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{setup, NOW};
    use gatherly_infra::PacingPolicy;
    use std::sync::Mutex;
    use std::time::Instant;

    #[derive(Default)]
    struct RecordDeliveries(Mutex<Vec<String>>);

    #[async_trait::async_trait(?Send)]
    impl DeliveryObserver for RecordDeliveries {
        async fn delivered(&self, entry: &BatchEntry) {
            self.0.lock().unwrap().push(entry.recipient.clone());
        }
    }

    fn entry(email: &str) -> BatchEntry {
        let event = Event::new("Rust & Friends".into(), NOW, None, ID::default(), NOW);
        let participant = Participant::new(event.id, email, None, NOW);
        BatchEntry::new(&event, &participant)
    }

    #[test]
    fn renders_each_kind() {
        let ctx = setup().ctx;
        let dispatcher = NotificationDispatcher::new(&ctx);
        let mut entry = entry("a@x.com");
        entry.recipient_name = Some("Alice".into());

        let confirmation = dispatcher
            .render(NotificationKind::Confirmation, &entry)
            .expect("To render confirmation");
        assert_eq!(confirmation.subject, "You are registered for Rust & Friends");
        assert!(confirmation.html_body.contains("Hi Alice,"));
        assert!(confirmation.html_body.contains("Rust &amp; Friends"));

        let reminder = dispatcher
            .render(NotificationKind::Reminder, &entry)
            .expect("To render reminder");
        assert_eq!(reminder.subject, "Reminder: Rust & Friends starts tomorrow");
        assert!(reminder.html_body.contains("starts tomorrow"));
    }

    #[test]
    fn greets_by_email_without_name() {
        let ctx = setup().ctx;
        let dispatcher = NotificationDispatcher::new(&ctx);
        let reminder = dispatcher
            .render(NotificationKind::Reminder, &entry("a@x.com"))
            .expect("To render reminder");
        assert!(reminder.html_body.contains("Hi a@x.com,"));
    }

    #[actix_web::test]
    async fn batch_continues_after_failed_send() {
        let test_ctx = setup();
        test_ctx.mailer.fail_for("b@x.com");
        let dispatcher = NotificationDispatcher::new(&test_ctx.ctx);
        let observer = RecordDeliveries::default();

        let entries = vec![entry("a@x.com"), entry("b@x.com"), entry("c@x.com")];
        let report = dispatcher
            .send_batch(NotificationKind::Reminder, &entries, &observer)
            .await;

        assert_eq!(report.outcome, DispatchOutcome { sent: 2, failed: 1 });
        assert_eq!(
            report.delivered,
            vec![entries[0].participant_id, entries[2].participant_id]
        );
        let recipients = test_ctx
            .mailer
            .sent()
            .into_iter()
            .map(|mail| mail.to)
            .collect::<Vec<_>>();
        assert_eq!(recipients, vec!["a@x.com", "c@x.com"]);
        assert_eq!(*observer.0.lock().unwrap(), recipients);
    }

    #[actix_web::test]
    async fn pauses_between_sends() {
        let mut test_ctx = setup();
        test_ctx.ctx.config.pacing = PacingPolicy {
            message_delay: Duration::from_millis(40),
            event_delay: Duration::ZERO,
        };
        let dispatcher = NotificationDispatcher::new(&test_ctx.ctx);
        let entries = vec![entry("a@x.com"), entry("b@x.com"), entry("c@x.com")];

        let started = Instant::now();
        let report = dispatcher
            .send_batch(NotificationKind::Reminder, &entries, &RecordDeliveries::default())
            .await;

        assert_eq!(report.outcome.sent, 3);
        // Two pauses for three emails
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[actix_web::test]
    async fn empty_batch_sends_nothing() {
        let test_ctx = setup();
        let dispatcher = NotificationDispatcher::new(&test_ctx.ctx);
        let report = dispatcher
            .send_batch(NotificationKind::Reminder, &[], &RecordDeliveries::default())
            .await;
        assert_eq!(report, DispatchReport::default());
        assert!(test_ctx.mailer.sent().is_empty());
    }
}
