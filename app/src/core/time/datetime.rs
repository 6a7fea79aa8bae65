use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use tokio::task_local;

use super::{Duration, Time};

task_local! {
    pub static FIXED_NOW: DateTime;
}

//vendor timestamps, first matching format wins
const READING_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d.%m.%Y %H:%M:%S"];

/// Local wall-clock time exactly as reported by the meter, without timezone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: NaiveDateTime,
}

impl DateTime {
    fn new(delegate: NaiveDateTime) -> Self {
        Self { delegate }
    }

    pub fn now() -> Self {
        FIXED_NOW
            .try_with(|t| *t)
            .unwrap_or_else(|_| Self::new(chrono::Local::now().naive_local()))
    }

    pub fn parse_reading_time(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        READING_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(Self::new)
    }

    pub fn time(&self) -> Time {
        Time::new(self.delegate.time())
    }

    pub fn start_of_day(&self) -> Self {
        Self::new(self.delegate.date().and_time(NaiveTime::MIN))
    }

    pub fn start_of_week(&self) -> Self {
        let days_since_monday = self.delegate.weekday().num_days_from_monday() as i64;
        self.start_of_day() - Duration::days(days_since_monday)
    }

    pub fn start_of_month(&self) -> Self {
        let days_since_first = self.delegate.day0() as i64;
        self.start_of_day() - Duration::days(days_since_first)
    }

    pub fn to_iso_string(&self) -> String {
        self.delegate.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    pub fn to_human_readable(&self) -> String {
        chrono_humanize::HumanTime::from(self.delegate - Self::now().delegate).to_string()
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate)
    }
}

impl Add<Duration> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate + rhs.delegate)
    }
}

impl Sub<Duration> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate - rhs.delegate)
    }
}


#[cfg(test)]
mod calendar {
    use super::*;

    fn dt(value: &str) -> DateTime {
        DateTime::parse_reading_time(value).unwrap()
    }

    #[test]
    fn start_of_day() {
        assert_eq!(dt("2024-01-17 14:35:12").start_of_day(), dt("2024-01-17 00:00:00"));
    }

    #[test]
    fn start_of_week_is_monday() {
        //2024-01-17 is a Wednesday
        assert_eq!(dt("2024-01-17 14:35:12").start_of_week(), dt("2024-01-15 00:00:00"));
        assert_eq!(dt("2024-01-15 00:00:01").start_of_week(), dt("2024-01-15 00:00:00"));
        assert_eq!(dt("2024-01-21 23:59:59").start_of_week(), dt("2024-01-15 00:00:00"));
    }

    #[test]
    fn start_of_week_across_month_boundary() {
        //2024-03-01 is a Friday
        assert_eq!(dt("2024-03-01 08:00:00").start_of_week(), dt("2024-02-26 00:00:00"));
    }

    #[test]
    fn start_of_month() {
        assert_eq!(dt("2024-02-29 10:00:00").start_of_month(), dt("2024-02-01 00:00:00"));
        assert_eq!(dt("2024-02-01 00:00:00").start_of_month(), dt("2024-02-01 00:00:00"));
    }

    #[tokio::test]
    async fn fixed_now_overrides_clock() {
        let fake_now = dt("2024-01-17 14:35:12");

        let now = FIXED_NOW.scope(fake_now, async { DateTime::now() }).await;

        assert_eq!(now, fake_now);
    }
}
