use std::{collections::BTreeSet, fmt};

use time::{Date, PrimitiveDateTime};

use crate::domain::{Reading, ReadingError};

/// Source columns of the HVAC CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Timestamp,
    Energy,
    Date,
    YearMonth,
    OnOff,
    IsBusinessHours,
    IsWeekend,
    ActivePowerReal,
    ActivePowerPred,
    OutsideTemp,
}

impl Column {
    /// Header name in the source CSV.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Energy => "energy_5min_real_kWh",
            Column::Date => "date",
            Column::YearMonth => "year_month",
            Column::OnOff => "on_off",
            Column::IsBusinessHours => "is_business_hours",
            Column::IsWeekend => "is_weekend",
            Column::ActivePowerReal => "active_power_real",
            Column::ActivePowerPred => "active_power_pred",
            Column::OutsideTemp => "outside_temp",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns available on every reading of a dataset.
///
/// Timestamp, energy, date and year_month are always available once a dataset
/// exists; the rest are present only if the source carried them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    pub fn base() -> Self {
        Self(BTreeSet::from([
            Column::Timestamp,
            Column::Energy,
            Column::Date,
            Column::YearMonth,
        ]))
    }

    pub fn with(mut self, column: Column) -> Self {
        self.0.insert(column);
        self
    }

    pub fn insert(&mut self, column: Column) {
        self.0.insert(column);
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::base()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("missing column '{0}'")]
    MissingColumn(Column),
    #[error("column '{column}' is present but reading at {timestamp} has no value")]
    IncompleteColumn {
        column: Column,
        timestamp: PrimitiveDateTime,
    },
    #[error("reading at {current} comes after a later reading at {previous}")]
    UnorderedTimestamps {
        previous: PrimitiveDateTime,
        current: PrimitiveDateTime,
    },
    #[error("more than one reading at {0}")]
    DuplicateTimestamp(PrimitiveDateTime),
    #[error("invalid reading #{index}: {source}")]
    InvalidReading {
        index: usize,
        #[source]
        source: ReadingError,
    },
    #[error("no readings match the selected filters")]
    EmptySelection,
}

/// The canonical, immutable reading sequence.
///
/// Readings are strictly ordered by timestamp and satisfy
/// [`Reading::validate`]. Flag columns listed in the column set carry a value
/// on every reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
    columns: ColumnSet,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>, columns: ColumnSet) -> Result<Self, DatasetError> {
        let mut previous: Option<PrimitiveDateTime> = None;

        for (index, reading) in readings.iter().enumerate() {
            reading
                .validate()
                .map_err(|source| DatasetError::InvalidReading { index, source })?;

            if let Some(prev) = previous {
                if reading.timestamp == prev {
                    return Err(DatasetError::DuplicateTimestamp(prev));
                }
                if reading.timestamp < prev {
                    return Err(DatasetError::UnorderedTimestamps {
                        previous: prev,
                        current: reading.timestamp,
                    });
                }
            }
            previous = Some(reading.timestamp);

            for (column, value) in [
                (Column::OnOff, reading.on_off),
                (Column::IsBusinessHours, reading.is_business_hours),
                (Column::IsWeekend, reading.is_weekend),
            ] {
                if value.is_none() && columns.contains(column) {
                    return Err(DatasetError::IncompleteColumn {
                        column,
                        timestamp: reading.timestamp,
                    });
                }
            }
        }

        Ok(Self { readings, columns })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    /// Fails with `MissingColumn` unless the source carried `column`.
    pub fn require(&self, column: Column) -> Result<(), DatasetError> {
        if self.has(column) {
            Ok(())
        } else {
            Err(DatasetError::MissingColumn(column))
        }
    }

    /// First and last calendar date covered.
    pub fn date_span(&self) -> Option<(Date, Date)> {
        Some((self.readings.first()?.date, self.readings.last()?.date))
    }

    /// Content hash over every field of every reading, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut h = blake3::Hasher::new();
        for column in self.columns.iter() {
            hash_str(&mut h, column.name());
        }
        for r in &self.readings {
            h.update(&r.timestamp.date().to_julian_day().to_le_bytes());
            let (hour, minute, second, nano) = r.timestamp.time().as_hms_nano();
            h.update(&[hour, minute, second]);
            h.update(&nano.to_le_bytes());
            h.update(&r.date.to_julian_day().to_le_bytes());
            hash_str(&mut h, &r.year_month.to_string());
            hash_f64(&mut h, r.energy_kwh);
            hash_opt_f64(&mut h, r.active_power_real);
            hash_opt_f64(&mut h, r.active_power_pred);
            hash_opt_bool(&mut h, r.on_off);
            hash_opt_bool(&mut h, r.is_business_hours);
            hash_opt_bool(&mut h, r.is_weekend);
            hash_opt_f64(&mut h, r.outside_temp);
        }
        h.finalize().to_hex().to_string()
    }
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    let len = s.len() as u32;
    hasher.update(&len.to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_f64(hasher: &mut blake3::Hasher, v: f64) {
    hasher.update(&v.to_bits().to_le_bytes());
}

fn hash_opt_f64(hasher: &mut blake3::Hasher, v: Option<f64>) {
    match v {
        Some(x) => {
            hasher.update(&[1]);
            hash_f64(hasher, x);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn hash_opt_bool(hasher: &mut blake3::Hasher, v: Option<bool>) {
    let tag = match v {
        None => 0,
        Some(false) => 1,
        Some(true) => 2,
    };
    hasher.update(&[tag]);
}
