pub mod builder;
mod datetime;
mod duration;
mod range;
mod time;

pub use datetime::DateTime;
pub use duration::Duration;
pub use range::DailyTimeRange;
pub use time::Time;

#[cfg(test)]
pub use datetime::FIXED_NOW;
