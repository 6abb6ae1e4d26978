use super::send_reminders::{
    SendDueRemindersUseCase, SendEventRemindersError, SendEventRemindersUseCase,
};
use crate::shared::usecase::execute;
use actix_web::rt::{task::JoinHandle, time::sleep};
use gatherly_domain::{DispatchOutcome, ID};
use gatherly_infra::GatherlyContext;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    /// Human readable time of the next daily pass, only known while running
    pub next_run_description: Option<String>,
}

impl SchedulerStatus {
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }
}

/// Result of a reminder pass that was requested by an operator
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub success: bool,
    pub message: String,
    pub outcome: DispatchOutcome,
}

impl PassReport {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            outcome: DispatchOutcome::default(),
        }
    }
}

/// Runs the reminder pass once a day at the configured wall clock time
pub struct ReminderScheduler {
    ctx: GatherlyContext,
    job: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(ctx: GatherlyContext) -> Self {
        Self {
            ctx,
            job: Mutex::new(None),
        }
    }

    fn job(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.job.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the daily job. Does nothing when it is already running.
    pub fn start(&self) {
        let mut job = self.job();
        if job.as_ref().map(|j| !j.is_finished()).unwrap_or(false) {
            info!("Reminder scheduler is already running");
            return;
        }

        let ctx = self.ctx.clone();
        *job = Some(actix_web::rt::spawn(run_daily(ctx)));
        info!(
            "Reminder scheduler started. Next run: {}",
            self.next_run_description().unwrap_or_else(|| "unknown".into())
        );
    }

    /// Prevents future daily passes. A pass that already started runs to completion.
    pub fn stop(&self) {
        if let Some(job) = self.job().take() {
            job.abort();
            info!("Reminder scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.job()
            .as_ref()
            .map(|job| !job.is_finished())
            .unwrap_or(false)
    }

    pub fn status(&self) -> SchedulerStatus {
        if self.is_running() {
            SchedulerStatus {
                state: SchedulerState::Running,
                next_run_description: self.next_run_description(),
            }
        } else {
            SchedulerStatus {
                state: SchedulerState::Stopped,
                next_run_description: None,
            }
        }
    }

    fn next_run_description(&self) -> Option<String> {
        self.ctx
            .config
            .reminder_trigger
            .describe_next_fire(self.ctx.sys.get_timestamp_millis())
    }

    /// Runs one reminder pass right away, whether or not the daily job is running
    pub async fn run_manual_pass(&self) -> PassReport {
        run_pass(&self.ctx).await
    }

    /// Reminds the participants of one `Event` right away
    pub async fn run_for_event(&self, event_id: ID) -> Result<PassReport, SendEventRemindersError> {
        let usecase = SendEventRemindersUseCase { event_id };
        match execute(usecase, &self.ctx).await {
            Ok(outcome) if outcome.attempted() == 0 => Ok(PassReport {
                success: true,
                message: "All participants have already been reminded, nothing was sent".into(),
                outcome,
            }),
            Ok(outcome) => Ok(PassReport {
                success: true,
                message: format!(
                    "Sent {} reminders, {} failed",
                    outcome.sent, outcome.failed
                ),
                outcome,
            }),
            Err(SendEventRemindersError::NotFound(event_id)) => {
                Err(SendEventRemindersError::NotFound(event_id))
            }
            Err(SendEventRemindersError::NoParticipants(event_id)) => Ok(PassReport::failed(
                format!("The event with id: {}, has no participants", event_id),
            )),
            Err(SendEventRemindersError::StorageError) => Ok(PassReport::failed(
                "Unable to load the participants of the event".into(),
            )),
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_pass(ctx: &GatherlyContext) -> PassReport {
    match execute(SendDueRemindersUseCase, ctx).await {
        Ok(outcome) => PassReport {
            success: true,
            message: format!(
                "Reminder pass completed: {} sent, {} failed",
                outcome.sent, outcome.failed
            ),
            outcome,
        },
        Err(_) => PassReport::failed("Unable to load the events starting tomorrow".into()),
    }
}

async fn run_daily(ctx: GatherlyContext) {
    loop {
        let now = ctx.sys.get_timestamp_millis();
        let millis_to_next_run = match ctx.config.reminder_trigger.millis_until_next_fire(now) {
            Some(millis) => millis,
            None => {
                error!("Unable to compute the next reminder pass, stopping the daily job");
                return;
            }
        };

        sleep(Duration::from_millis(millis_to_next_run as u64)).await;
        // Detached from the daily job so that `stop` never cuts a pass short
        let pass_ctx = ctx.clone();
        actix_web::rt::spawn(async move {
            let report = run_pass(&pass_ctx).await;
            info!("Daily reminder pass finished: {}", report.message);
        });
    }
}
