use std::{f64, fmt::Display};

use serde::Serialize;

use super::Percent;

pub fn p(value: f64) -> Probability {
    Probability(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }

    pub fn as_percent(&self) -> Percent {
        Percent(self.0 * 100.0)
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl From<&Probability> for f64 {
    fn from(value: &Probability) -> Self {
        value.0
    }
}

impl Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_unit_interval() {
        assert_eq!(p(1.15).clamped(), p(1.0));
        assert_eq!(p(-0.2).clamped(), p(0.0));
        assert_eq!(p(0.42).clamped(), p(0.42));
    }

    #[test]
    fn percent_conversion() {
        assert_eq!(p(0.805).as_percent().rounded(1), Percent(80.5));
    }
}
