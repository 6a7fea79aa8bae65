use std::ops::AddAssign;

use crate::core::unit::{Probability, p};

pub const LEAK_CUTOFF: f64 = 50.0;

/// Points accumulated by triggered leak indicators. The sum may exceed 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct LeakScore(f64);

impl LeakScore {
    pub fn new(points: f64) -> Self {
        Self(points)
    }

    pub fn points(&self) -> f64 {
        self.0
    }

    pub fn confidence(&self) -> Probability {
        p((self.0 / 100.0).min(1.0)).clamped()
    }

    pub fn is_leak(&self) -> bool {
        self.0 >= LEAK_CUTOFF
    }
}

impl AddAssign<f64> for LeakScore {
    fn add_assign(&mut self, points: f64) {
        self.0 += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_inclusive() {
        assert!(LeakScore::new(50.0).is_leak());
        assert!(!LeakScore::new(49.999).is_leak());
        assert!(!LeakScore::default().is_leak());
    }

    #[test]
    fn confidence_saturates() {
        assert_eq!(LeakScore::new(115.0).confidence(), p(1.0));
        assert_eq!(LeakScore::new(100.0).confidence(), p(1.0));
    }

    #[test]
    fn confidence_is_score_over_hundred() {
        assert_eq!(LeakScore::new(45.0).confidence(), p(0.45));
        assert_eq!(LeakScore::default().confidence(), p(0.0));
    }

    #[test]
    fn negative_points_never_give_negative_confidence() {
        assert_eq!(LeakScore::new(-12.5).confidence(), p(0.0));
    }

    #[test]
    fn accumulates_points() {
        let mut score = LeakScore::default();
        score += 30.0;
        score += 15.0;

        assert_eq!(score.points(), 45.0);
    }
}
