#[macro_export]
macro_rules! t {
    (now) => {{
        $crate::core::time::DateTime::now()
    }};

    ($from_hour:literal : $from_minute:literal - $to_hour:literal : $to_minute:literal) => {{
        $crate::core::time::DailyTimeRange::new(t!($from_hour:$from_minute), t!($to_hour:$to_minute))
    }};

    //literals only, a bad value is a programming error
    ($hour:literal : $minute:literal) => {{
        $crate::core::time::Time::at($hour, $minute).unwrap()
    }};

    ($amount:literal minutes) => {{
        $crate::core::time::Duration::minutes($amount)
    }};
    ($amount:literal hours) => {{
        $crate::core::time::Duration::hours($amount)
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::time::*;

    #[test]
    fn time_of_day() {
        assert_eq!(t!(5:34).to_string(), "05:34");
    }

    #[test]
    fn durations() {
        assert_eq!(t!(90 minutes).as_minutes(), 90);
        assert_eq!(t!(2 hours).as_minutes(), 120);
    }

    #[test]
    fn negative_duration_to_std_is_zero() {
        assert_eq!(t!(15 minutes).to_std(), std::time::Duration::from_secs(900));
        assert_eq!(Duration::hours(-1).to_std(), std::time::Duration::ZERO);
    }
}
