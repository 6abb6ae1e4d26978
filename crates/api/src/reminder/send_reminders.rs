use crate::notification::{pause, BatchEntry, DeliveryObserver, NotificationDispatcher};
use crate::shared::usecase::UseCase;
use gatherly_domain::{DispatchOutcome, Event, NotificationKind, ReminderWindow, ID};
use gatherly_infra::GatherlyContext;
use tracing::{error, info};

/// Flags a `Participant` as notified as soon as its reminder went out
struct MarkNotified<'a> {
    ctx: &'a GatherlyContext,
}

#[async_trait::async_trait(?Send)]
impl DeliveryObserver for MarkNotified<'_> {
    async fn delivered(&self, entry: &BatchEntry) {
        // The mail is already out, so a failed write is only logged
        if let Err(e) = self
            .ctx
            .repos
            .participants
            .set_notified(&entry.participant_id)
            .await
        {
            error!(
                "Unable to mark participant: {} of event: {} as notified. Error: {:?}",
                entry.participant_id, entry.event_id, e
            );
        }
    }
}

/// Sends a reminder to every not yet notified `Participant` of `event`
/// and marks the ones that were delivered as notified.
async fn remind_participants(
    ctx: &GatherlyContext,
    dispatcher: &NotificationDispatcher,
    event: &Event,
) -> anyhow::Result<DispatchOutcome> {
    let participants = ctx
        .repos
        .participants
        .find_unnotified_by_event(&event.id)
        .await?;
    if participants.is_empty() {
        info!("No participants left to remind for event: {}", event.id);
        return Ok(DispatchOutcome::default());
    }

    let entries = participants
        .iter()
        .map(|p| BatchEntry::new(event, p))
        .collect::<Vec<_>>();
    let report = dispatcher
        .send_batch(
            NotificationKind::Reminder,
            &entries,
            &MarkNotified { ctx },
        )
        .await;

    Ok(report.outcome)
}

/// Reminds the participants of every `Event` starting within the
/// `ReminderWindow` of now.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

#[derive(Debug, PartialEq)]
pub enum SendDueRemindersError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = DispatchOutcome;

    type Error = SendDueRemindersError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        let window = ReminderWindow::for_pass_at(ctx.sys.get_timestamp_millis());
        let events = ctx
            .repos
            .events
            .find_in_window(&window)
            .await
            .map_err(|e| {
                error!(
                    "Unable to find events starting between {} and {}. Error: {:?}",
                    window.start(),
                    window.end(),
                    e
                );
                SendDueRemindersError::StorageError
            })?;
        info!(
            "Found {} events starting between {} and {}",
            events.len(),
            window.start(),
            window.end()
        );

        let dispatcher = NotificationDispatcher::new(ctx);
        let mut outcome = DispatchOutcome::default();
        for (i, event) in events.iter().enumerate() {
            if i > 0 {
                pause(ctx.config.pacing.event_delay).await;
            }
            match remind_participants(ctx, &dispatcher, event).await {
                Ok(event_outcome) => outcome.merge(event_outcome),
                Err(e) => error!(
                    "Unable to send reminders for event: {}. Error: {:?}",
                    event.id, e
                ),
            }
        }

        Ok(outcome)
    }
}

/// Reminds the participants of a single `Event`, regardless of when it starts
#[derive(Debug)]
pub struct SendEventRemindersUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum SendEventRemindersError {
    NotFound(ID),
    NoParticipants(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEventRemindersUseCase {
    type Response = DispatchOutcome;

    type Error = SendEventRemindersError;

    const NAME: &'static str = "SendEventReminders";

    async fn execute(&mut self, ctx: &GatherlyContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(SendEventRemindersError::NotFound(self.event_id)),
        };

        let participants = ctx
            .repos
            .participants
            .count_by_event(&event.id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to count the participants of event: {}. Error: {:?}",
                    event.id, e
                );
                SendEventRemindersError::StorageError
            })?;
        if participants == 0 {
            return Err(SendEventRemindersError::NoParticipants(event.id));
        }

        let dispatcher = NotificationDispatcher::new(ctx);
        remind_participants(ctx, &dispatcher, &event)
            .await
            .map_err(|e| {
                error!(
                    "Unable to send reminders for event: {}. Error: {:?}",
                    event.id, e
                );
                SendEventRemindersError::StorageError
            })
    }
}
