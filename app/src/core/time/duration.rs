#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    pub(super) delegate: chrono::Duration,
}

impl Duration {
    fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub fn days(days: i64) -> Self {
        Self::new(chrono::Duration::days(days))
    }

    pub fn hours(hours: i64) -> Self {
        Self::new(chrono::Duration::hours(hours))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self::new(chrono::Duration::minutes(minutes))
    }

    pub fn as_minutes(&self) -> i64 {
        self.delegate.num_minutes()
    }

    //negative durations collapse to zero, tokio intervals reject them
    pub fn to_std(&self) -> std::time::Duration {
        self.delegate.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.as_minutes())
    }
}
