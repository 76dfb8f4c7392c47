use time::Date;

use crate::{
    dataset::{Column, ColumnSet, Dataset, DatasetError},
    domain::Reading,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusinessHoursMode {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "all"))]
    All,
    #[cfg_attr(feature = "serde", serde(rename = "business"))]
    BusinessOnly,
    #[cfg_attr(feature = "serde", serde(rename = "outside"))]
    OutsideOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum WeekendMode {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "all"))]
    All,
    #[cfg_attr(feature = "serde", serde(rename = "weekdays"))]
    WeekdaysOnly,
    #[cfg_attr(feature = "serde", serde(rename = "weekend"))]
    WeekendOnly,
}

impl BusinessHoursMode {
    fn accepts(self, flag: Option<bool>) -> bool {
        match self {
            Self::All => true,
            Self::BusinessOnly => flag == Some(true),
            Self::OutsideOnly => flag == Some(false),
        }
    }
}

impl WeekendMode {
    fn accepts(self, flag: Option<bool>) -> bool {
        match self {
            Self::All => true,
            Self::WeekdaysOnly => flag == Some(false),
            Self::WeekendOnly => flag == Some(true),
        }
    }
}

/// Date range (inclusive on both ends) plus business-hours and weekend modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub business: BusinessHoursMode,
    pub weekend: WeekendMode,
}

impl ReadingFilter {
    pub fn matches(&self, r: &Reading) -> bool {
        self.start.map_or(true, |s| r.date >= s)
            && self.end.map_or(true, |e| r.date <= e)
            && self.business.accepts(r.is_business_hours)
            && self.weekend.accepts(r.is_weekend)
    }

    /// Applies the filter. A non-`All` mode needs its flag column; an empty
    /// result is `EmptySelection`.
    pub fn select<'a>(&self, dataset: &'a Dataset) -> Result<Selection<'a>, DatasetError> {
        if self.business != BusinessHoursMode::All {
            dataset.require(Column::IsBusinessHours)?;
        }
        if self.weekend != WeekendMode::All {
            dataset.require(Column::IsWeekend)?;
        }

        let readings: Vec<&Reading> = dataset
            .readings()
            .iter()
            .filter(|r| self.matches(r))
            .collect();

        if readings.is_empty() {
            return Err(DatasetError::EmptySelection);
        }

        Ok(Selection {
            readings,
            columns: dataset.columns(),
        })
    }
}

/// Non-empty, timestamp-ordered subset of a dataset.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub(crate) readings: Vec<&'a Reading>,
    pub(crate) columns: &'a ColumnSet,
}

impl<'a> Selection<'a> {
    pub fn readings(&self) -> &[&'a Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub(crate) fn require(&self, column: Column) -> Result<(), DatasetError> {
        if self.columns.contains(column) {
            Ok(())
        } else {
            Err(DatasetError::MissingColumn(column))
        }
    }
}
