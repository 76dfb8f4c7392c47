//! Filtered baseline views over a [`Dataset`](crate::Dataset).
//!
//! A [`ReadingFilter`] picks the readings, the resulting [`Selection`] rolls
//! them up. Scenario results never go through here: they always cover the
//! full dataset.

pub mod energy;
pub mod filter;
pub mod operation;

pub use energy::{DailyEnergy, EnergyOverview, MonthlyEnergy};
pub use filter::{BusinessHoursMode, ReadingFilter, Selection, WeekendMode};
pub use operation::{PowerPoint, TemperaturePoint};
