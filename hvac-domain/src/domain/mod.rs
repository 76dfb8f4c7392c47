pub mod reading;
pub mod scenario;
pub mod tariff;

pub use reading::{Reading, ReadingError, YearMonth};
pub use scenario::{DailySavings, ScenarioKind, ScenarioResult, ScenarioSet};
pub use tariff::Tariff;
