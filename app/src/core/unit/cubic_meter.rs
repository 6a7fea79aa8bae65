use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

/// Water volume. Hourly flow is expressed as the volume drawn within one reading interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeter(pub f64);

impl CubicMeter {
    pub fn rounded(self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        Self((self.0 * factor).round() / factor)
    }
}

impl From<&CubicMeter> for f64 {
    fn from(value: &CubicMeter) -> Self {
        value.0
    }
}

impl From<CubicMeter> for f64 {
    fn from(value: CubicMeter) -> Self {
        value.0
    }
}

impl From<f64> for CubicMeter {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Display for CubicMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} m³", self.0)
    }
}

impl Sub for CubicMeter {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        CubicMeter(self.0 - rhs.0)
    }
}

impl Add for CubicMeter {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        CubicMeter(self.0 + rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(CubicMeter(1.23456).rounded(4), CubicMeter(1.2346));
        assert_eq!(CubicMeter(1.23449).rounded(3), CubicMeter(1.234));
        assert_eq!(CubicMeter(-0.0004).rounded(3), CubicMeter(-0.0));
    }

    #[test]
    fn display() {
        assert_eq!(CubicMeter(0.05).to_string(), "0.0500 m³");
    }
}
