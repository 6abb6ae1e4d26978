use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidDailyTriggerError {
    #[error("Hour: {0} is not between 0 and 23")]
    Hour(u32),
    #[error("Minute: {0} is not between 0 and 59")]
    Minute(u32),
}

/// A fixed wall clock time in a named timezone that fires once per calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTrigger {
    hour: u32,
    minute: u32,
    timezone: Tz,
}

impl DailyTrigger {
    pub fn new(hour: u32, minute: u32, timezone: Tz) -> Result<Self, InvalidDailyTriggerError> {
        if hour > 23 {
            return Err(InvalidDailyTriggerError::Hour(hour));
        }
        if minute > 59 {
            return Err(InvalidDailyTriggerError::Minute(minute));
        }
        Ok(Self {
            hour,
            minute,
            timezone,
        })
    }

    /// Fires at 09:00 every day
    pub fn morning(timezone: Tz) -> Self {
        Self {
            hour: 9,
            minute: 0,
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The first instant strictly after `now_millis` at which the trigger fires.
    ///
    /// Days where the wall clock time does not exist (DST gap) are skipped.
    /// When it exists twice (DST overlap) the earliest instant is used.
    pub fn next_fire_after(&self, now_millis: i64) -> Option<DateTime<Tz>> {
        let now = DateTime::<Utc>::from_timestamp_millis(now_millis)?.with_timezone(&self.timezone);
        let mut date = now.date_naive();
        // A gap can at most swallow one day so a few candidates are always enough
        for _ in 0..4 {
            let local = date.and_hms_opt(self.hour, self.minute, 0)?;
            if let Some(candidate) = self.timezone.from_local_datetime(&local).earliest() {
                if candidate > now {
                    return Some(candidate);
                }
            }
            date = date.succ_opt()?;
        }
        None
    }

    pub fn millis_until_next_fire(&self, now_millis: i64) -> Option<i64> {
        self.next_fire_after(now_millis)
            .map(|fire| fire.timestamp_millis() - now_millis)
    }

    /// Human readable description of the next fire, e.g.
    /// `2021-02-22 09:00 Europe/Oslo (in 3h 15m)`
    pub fn describe_next_fire(&self, now_millis: i64) -> Option<String> {
        let fire = self.next_fire_after(now_millis)?;
        let until = Duration::milliseconds(fire.timestamp_millis() - now_millis);
        Some(format!(
            "{} {} (in {}h {}m)",
            fire.format("%F %H:%M"),
            self.timezone.name(),
            until.num_hours(),
            until.num_minutes() % 60
        ))
    }
}

/// Formats a unix millis timestamp as `YYYY-MM-DD HH:MM <timezone>`
pub fn format_timestamp(ts: i64, timezone: &Tz) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts) {
        Some(dt) => format!(
            "{} {}",
            dt.with_timezone(timezone).format("%F %H:%M"),
            timezone.name()
        ),
        None => ts.to_string(),
    }
}
