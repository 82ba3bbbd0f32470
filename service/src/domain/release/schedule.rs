use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::domain::release::error::LifecycleError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Combine the picked calendar date and time-of-day into one UTC instant.
pub fn parse_schedule(
    date: Option<&str>,
    time: Option<&str>,
) -> Result<DateTime<Utc>, LifecycleError> {
    let (date, time) = match (date.map(str::trim), time.map(str::trim)) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => (date, time),
        _ => return Err(LifecycleError::MissingSchedule),
    };

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        LifecycleError::MalformedSchedule {
            field: "date",
            value: date.to_string(),
        }
    })?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
        .ok_or_else(|| LifecycleError::MalformedSchedule {
            field: "time",
            value: time.to_string(),
        })?;

    Ok(date.and_time(time).and_utc())
}

/// Period in which a candidate version may be activated: strictly after
/// now and no later than midnight UTC starting the release date, plus the
/// window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    release_date: NaiveDate,
    window_days: u32,
}

impl ScheduleWindow {
    pub fn new(release_date: NaiveDate, window_days: u32) -> Self {
        Self {
            release_date,
            window_days,
        }
    }

    /// Latest accepted instant
    pub fn closes_at(&self) -> Option<DateTime<Utc>> {
        self.release_date
            .and_time(NaiveTime::MIN)
            .and_utc()
            .checked_add_days(Days::new(u64::from(self.window_days)))
    }

    pub fn check(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        if at <= now {
            return Err(LifecycleError::ScheduleInPast);
        }
        match self.closes_at() {
            Some(closes_at) if at <= closes_at => Ok(()),
            _ => Err(LifecycleError::ScheduleBeyondWindow {
                window_days: self.window_days,
            }),
        }
    }
}
