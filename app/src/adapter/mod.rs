pub mod apavital;
pub mod diagnostics;
pub mod homeassistant;
