use chrono_tz::Tz;
use gatherly_domain::DailyTrigger;
use std::{fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Wall clock time of the daily reminder pass
    pub reminder_trigger: DailyTrigger,
    /// Throttling of outgoing emails
    pub pacing: PacingPolicy,
    /// Start the reminder scheduler together with the server
    pub autostart_reminder_scheduler: bool,
    /// `None` when the SMTP credentials are not configured, in which case
    /// every email send fails.
    pub smtp: Option<SmtpSettings>,
}

/// Delays inserted between outgoing emails to stay below mail provider rate limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingPolicy {
    /// Pause after each email of a batch
    pub message_delay: Duration,
    /// Pause after each `Event` processed by a reminder pass
    pub event_delay: Duration,
}

impl PacingPolicy {
    pub fn none() -> Self {
        Self {
            message_delay: Duration::ZERO,
            event_delay: Duration::ZERO,
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            message_delay: Duration::from_millis(1000),
            event_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `Gatherly <noreply@gatherly.app>`
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("from", &self.from)
            .finish()
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn smtp_settings_from_env() -> Option<SmtpSettings> {
    let host = std::env::var("SMTP_HOST").ok();
    let username = std::env::var("SMTP_USERNAME").ok();
    let password = std::env::var("SMTP_PASSWORD").ok();
    match (host, username, password) {
        (Some(host), Some(username), Some(password)) => Some(SmtpSettings {
            port: parse_env("SMTP_PORT", 587),
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| username.clone()),
            host,
            username,
            password,
        }),
        _ => {
            warn!("SMTP_HOST, SMTP_USERNAME and SMTP_PASSWORD are not all set. Emails will not be sent.");
            None
        }
    }
}

fn reminder_trigger_from_env() -> DailyTrigger {
    let default_timezone = Tz::UTC;
    let timezone = match std::env::var("REMINDER_TIMEZONE") {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "The given REMINDER_TIMEZONE: {} is not a known timezone, falling back to: {}.",
                name, default_timezone
            );
            default_timezone
        }),
        Err(_) => default_timezone,
    };
    let hour = parse_env("REMINDER_HOUR", 9);
    let minute = parse_env("REMINDER_MINUTE", 0);

    match DailyTrigger::new(hour, minute, timezone) {
        Ok(trigger) => trigger,
        Err(e) => {
            warn!("{}. Falling back to 09:00 for the reminder pass.", e);
            DailyTrigger::morning(timezone)
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env("PORT", 5000);
        let reminder_trigger = reminder_trigger_from_env();
        let pacing = PacingPolicy {
            message_delay: Duration::from_millis(parse_env("REMINDER_MESSAGE_DELAY_MS", 1000)),
            event_delay: Duration::from_millis(parse_env("REMINDER_EVENT_DELAY_MS", 2000)),
        };
        let autostart_reminder_scheduler = parse_env("REMINDER_SCHEDULER_AUTOSTART", true);
        info!(
            "Reminder pass is scheduled daily at {:?} with pacing: {:?}",
            reminder_trigger, pacing
        );

        Self {
            port,
            reminder_trigger,
            pacing,
            autostart_reminder_scheduler,
            smtp: smtp_settings_from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
