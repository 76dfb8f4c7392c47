//! Dataset normalizer: raw CSV rows to [`Reading`]s.
//!
//! Normalization runs in two stages. [`ColumnPlan::from_headers`] looks at
//! the header once and decides, per optional column, whether values are
//! derived, read from the source, or left empty. [`ColumnPlan::normalize`]
//! then applies that plan to every row.

pub mod parse;

use csv::StringRecord;
use hvac_domain::{
    domain::{Reading, YearMonth},
    Column, ColumnSet,
};
use time::PrimitiveDateTime;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("missing required column '{0}'")]
    MissingColumn(Column),
    #[error("row {row}, column '{column}': cannot coerce {value:?}: {reason}")]
    MalformedValue {
        row: usize,
        column: Column,
        value: String,
        reason: String,
    },
}

/// How a calendar column is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Not in the source: computed from the timestamp.
    Derive,
    /// In the source at this index. The cell must parse, but the value kept
    /// is still the one derived from the timestamp.
    Supplied(usize),
}

/// Per-dataset decision on where each column comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    timestamp: usize,
    energy: usize,
    date: Calendar,
    year_month: Calendar,
    on_off: Option<usize>,
    is_business_hours: Option<usize>,
    is_weekend: Option<usize>,
    active_power_real: Option<usize>,
    active_power_pred: Option<usize>,
    outside_temp: Option<usize>,
}

impl ColumnPlan {
    pub fn from_headers(headers: &StringRecord) -> Result<Self, NormalizeError> {
        let find = |column: Column| headers.iter().position(|h| h.trim() == column.name());
        let required =
            |column: Column| find(column).ok_or(NormalizeError::MissingColumn(column));
        let calendar = |column: Column| find(column).map_or(Calendar::Derive, Calendar::Supplied);

        Ok(Self {
            timestamp: required(Column::Timestamp)?,
            energy: required(Column::Energy)?,
            date: calendar(Column::Date),
            year_month: calendar(Column::YearMonth),
            on_off: find(Column::OnOff),
            is_business_hours: find(Column::IsBusinessHours),
            is_weekend: find(Column::IsWeekend),
            active_power_real: find(Column::ActivePowerReal),
            active_power_pred: find(Column::ActivePowerPred),
            outside_temp: find(Column::OutsideTemp),
        })
    }

    pub fn date(&self) -> Calendar {
        self.date
    }

    pub fn year_month(&self) -> Calendar {
        self.year_month
    }

    /// Columns every normalized reading will carry.
    pub fn columns(&self) -> ColumnSet {
        let mut set = ColumnSet::base();
        for (column, idx) in [
            (Column::OnOff, self.on_off),
            (Column::IsBusinessHours, self.is_business_hours),
            (Column::IsWeekend, self.is_weekend),
            (Column::ActivePowerReal, self.active_power_real),
            (Column::ActivePowerPred, self.active_power_pred),
            (Column::OutsideTemp, self.outside_temp),
        ] {
            if idx.is_some() {
                set.insert(column);
            }
        }
        set
    }

    pub fn normalize(&self, row: usize, record: &StringRecord) -> Result<Reading, NormalizeError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let timestamp = parse::parse_timestamp(cell(self.timestamp))
            .map_err(|reason| malformed(row, Column::Timestamp, cell(self.timestamp), reason))?;
        let energy_kwh = parse::parse_f64(cell(self.energy))
            .map_err(|reason| malformed(row, Column::Energy, cell(self.energy), reason))?;
        let mut reading = Reading::new(timestamp, energy_kwh);

        if let Calendar::Supplied(idx) = self.date {
            let date = parse::parse_date(cell(idx))
                .map_err(|reason| malformed(row, Column::Date, cell(idx), reason))?;
            if date != reading.date {
                calendar_override(row, Column::Date, &date, &reading.date, timestamp);
            }
        }

        if let Calendar::Supplied(idx) = self.year_month {
            let ym: YearMonth = parse::parse_year_month(cell(idx))
                .map_err(|reason| malformed(row, Column::YearMonth, cell(idx), reason))?;
            if ym != reading.year_month {
                calendar_override(row, Column::YearMonth, &ym, &reading.year_month, timestamp);
            }
        }

        let flag = |column: Column, idx: Option<usize>| -> Result<Option<bool>, NormalizeError> {
            idx.map(|i| {
                parse::parse_flag(cell(i)).map_err(|reason| malformed(row, column, cell(i), reason))
            })
            .transpose()
        };
        let number = |column: Column, idx: Option<usize>| -> Result<Option<f64>, NormalizeError> {
            match idx {
                Some(i) => parse::parse_optional_f64(cell(i))
                    .map_err(|reason| malformed(row, column, cell(i), reason)),
                None => Ok(None),
            }
        };

        reading.on_off = flag(Column::OnOff, self.on_off)?;
        reading.is_business_hours = flag(Column::IsBusinessHours, self.is_business_hours)?;
        reading.is_weekend = flag(Column::IsWeekend, self.is_weekend)?;
        reading.active_power_real = number(Column::ActivePowerReal, self.active_power_real)?;
        reading.active_power_pred = number(Column::ActivePowerPred, self.active_power_pred)?;
        reading.outside_temp = number(Column::OutsideTemp, self.outside_temp)?;

        Ok(reading)
    }
}

fn calendar_override(
    row: usize,
    column: Column,
    supplied: &dyn std::fmt::Display,
    derived: &dyn std::fmt::Display,
    timestamp: PrimitiveDateTime,
) {
    metrics::counter!("hvac_calendar_overrides_total", "column" => column.name()).increment(1);
    tracing::warn!(
        row,
        %column,
        %supplied,
        %derived,
        %timestamp,
        "supplied calendar value disagrees with timestamp; using derived value"
    );
}

fn malformed(row: usize, column: Column, value: &str, reason: String) -> NormalizeError {
    NormalizeError::MalformedValue {
        row,
        column,
        value: value.to_string(),
        reason,
    }
}
