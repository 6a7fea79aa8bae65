use crate::core::time::DateTime;

/// A value with an optional temporal position. Values without a timestamp still take part
/// in arithmetic but are skipped by every time-of-day check.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint<V> {
    pub value: V,
    pub timestamp: Option<DateTime>,
}

impl<V> DataPoint<V> {
    pub fn new(value: V, timestamp: Option<DateTime>) -> Self {
        Self { value, timestamp }
    }
}

impl<V: std::fmt::Display> std::fmt::Display for DataPoint<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.timestamp {
            Some(timestamp) => write!(f, "{} @ {}", self.value, timestamp),
            None => write!(f, "{} @ unknown time", self.value),
        }
    }
}
