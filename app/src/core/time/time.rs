use std::fmt::Display;

use anyhow::Context;

/// Time of day on the meter's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    delegate: chrono::NaiveTime,
}

impl Time {
    pub(super) fn new(delegate: chrono::NaiveTime) -> Self {
        Self { delegate }
    }

    pub fn at(hour: u32, minute: u32) -> anyhow::Result<Self> {
        chrono::NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self::new)
            .with_context(|| format!("Invalid time of day {}:{:02}", hour, minute))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Time::at(24, 0).is_err());
        assert!(Time::at(5, 60).is_err());
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(Time::at(1, 5).unwrap().to_string(), "01:05");
    }
}
