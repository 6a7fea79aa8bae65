mod cubic_meter;
mod percent;
mod probability;

pub use cubic_meter::CubicMeter;
pub use percent::Percent;
pub use probability::Probability;
pub use probability::p;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! v {
        ($x:literal m3) => {
            CubicMeter($x as f64)
        };
        ($x:literal %) => {
            Percent($x as f64)
        };
    }

    #[test]
    fn test_cubic_meter() {
        assert_eq!(v!(2 m3), CubicMeter(2.0));
        assert_eq!(v!(0.5 m3) - v!(0.25 m3), CubicMeter(0.25));
    }

    #[test]
    fn test_percent() {
        assert_eq!(v!(50 %), Percent(50.0));
        assert_eq!(p(0.5).as_percent(), v!(50 %));
    }
}
