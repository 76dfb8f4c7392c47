use time::PrimitiveDateTime;

use super::filter::Selection;
use crate::dataset::{Column, DatasetError};

/// Real vs AI-predicted active power at one instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PowerPoint {
    pub timestamp: PrimitiveDateTime,
    pub active_power_real: Option<f64>,
    pub active_power_pred: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TemperaturePoint {
    pub outside_temp: f64,
    pub active_power_real: f64,
    pub is_business_hours: Option<bool>,
}

impl Selection<'_> {
    /// Power series restricted to the inclusive zoom window `[from, to]`.
    /// An empty window is not an error.
    pub fn power_series(
        &self,
        from: Option<PrimitiveDateTime>,
        to: Option<PrimitiveDateTime>,
    ) -> Result<Vec<PowerPoint>, DatasetError> {
        self.require(Column::ActivePowerReal)?;
        self.require(Column::ActivePowerPred)?;

        Ok(self
            .readings
            .iter()
            .filter(|r| from.map_or(true, |f| r.timestamp >= f))
            .filter(|r| to.map_or(true, |t| r.timestamp <= t))
            .map(|r| PowerPoint {
                timestamp: r.timestamp,
                active_power_real: r.active_power_real,
                active_power_pred: r.active_power_pred,
            })
            .collect())
    }

    /// Power vs outside temperature for readings carrying both values.
    ///
    /// More than `max_points` points are thinned by a uniform stride, so the
    /// same selection always yields the same sample.
    pub fn temperature_scatter(&self, max_points: usize) -> Result<Vec<TemperaturePoint>, DatasetError> {
        self.require(Column::OutsideTemp)?;
        self.require(Column::ActivePowerReal)?;

        let points: Vec<TemperaturePoint> = self
            .readings
            .iter()
            .filter_map(|r| {
                Some(TemperaturePoint {
                    outside_temp: r.outside_temp.filter(|v| v.is_finite())?,
                    active_power_real: r.active_power_real.filter(|v| v.is_finite())?,
                    is_business_hours: r.is_business_hours,
                })
            })
            .collect();

        if points.len() <= max_points {
            return Ok(points);
        }

        let n = points.len();
        Ok((0..max_points)
            .map(|i| points[i * n / max_points].clone())
            .collect())
    }
}
