use std::{fmt, str::FromStr};

use time::{Date, PrimitiveDateTime};

/// Calendar month label used for monthly rollups, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid year-month '{0}', expected YYYY-MM")]
pub struct ParseYearMonthError(String);

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One sample of the HVAC time series.
///
/// `date` and `year_month` are always the calendar date and month of
/// `timestamp`; [`Reading::validate`] rejects anything else. Optional fields
/// are `None` when the source had no such column (or, for the power and
/// temperature readings, an empty cell).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub timestamp: PrimitiveDateTime,
    pub date: Date,
    pub year_month: YearMonth,
    /// Energy consumed during the 5-minute interval ending at `timestamp`.
    pub energy_kwh: f64,
    pub active_power_real: Option<f64>,
    pub active_power_pred: Option<f64>,
    pub on_off: Option<bool>,
    pub is_business_hours: Option<bool>,
    pub is_weekend: Option<bool>,
    pub outside_temp: Option<f64>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    #[error("energy must be finite, got {0}")]
    NonFiniteEnergy(f64),
    #[error("energy must be non-negative, got {0}")]
    NegativeEnergy(f64),
    #[error("date {date} does not match timestamp {timestamp}")]
    InconsistentDate {
        date: Date,
        timestamp: PrimitiveDateTime,
    },
    #[error("year_month {year_month} does not match timestamp {timestamp}")]
    InconsistentYearMonth {
        year_month: YearMonth,
        timestamp: PrimitiveDateTime,
    },
}

impl Reading {
    /// A reading with `date` and `year_month` derived from `timestamp` and no
    /// optional columns.
    pub fn new(timestamp: PrimitiveDateTime, energy_kwh: f64) -> Self {
        let date = timestamp.date();
        Self {
            timestamp,
            date,
            year_month: YearMonth::of(date),
            energy_kwh,
            active_power_real: None,
            active_power_pred: None,
            on_off: None,
            is_business_hours: None,
            is_weekend: None,
            outside_temp: None,
        }
    }

    pub fn with_on_off(mut self, on: bool) -> Self {
        self.on_off = Some(on);
        self
    }

    pub fn with_business_hours(mut self, business: bool) -> Self {
        self.is_business_hours = Some(business);
        self
    }

    pub fn with_weekend(mut self, weekend: bool) -> Self {
        self.is_weekend = Some(weekend);
        self
    }

    pub fn with_power(mut self, real: f64, pred: f64) -> Self {
        self.active_power_real = Some(real);
        self.active_power_pred = Some(pred);
        self
    }

    pub fn with_outside_temp(mut self, temp: f64) -> Self {
        self.outside_temp = Some(temp);
        self
    }

    pub fn is_on(&self) -> bool {
        self.on_off == Some(true)
    }

    /// Checks the per-reading invariants: finite, non-negative energy and
    /// `date`/`year_month` consistent with `timestamp`.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if !self.energy_kwh.is_finite() {
            return Err(ReadingError::NonFiniteEnergy(self.energy_kwh));
        }
        if self.energy_kwh < 0.0 {
            return Err(ReadingError::NegativeEnergy(self.energy_kwh));
        }
        if self.date != self.timestamp.date() {
            return Err(ReadingError::InconsistentDate {
                date: self.date,
                timestamp: self.timestamp,
            });
        }
        if self.year_month != YearMonth::of(self.timestamp.date()) {
            return Err(ReadingError::InconsistentYearMonth {
                year_month: self.year_month,
                timestamp: self.timestamp,
            });
        }
        Ok(())
    }
}
