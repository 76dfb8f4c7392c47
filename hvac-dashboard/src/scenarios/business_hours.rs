use hvac_domain::domain::Reading;

/// Per-reading energy if the unit only ran during business hours.
///
/// Readings flagged `is_business_hours = 0` are zeroed; the rest keep their
/// baseline energy whatever their `on_off` state.
pub fn scenario_energy(readings: &[Reading]) -> Vec<f64> {
    readings
        .iter()
        .map(|r| match r.is_business_hours {
            Some(false) => 0.0,
            _ => r.energy_kwh,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn keeps_business_hours_regardless_of_on_off() {
        let readings = vec![
            Reading::new(datetime!(2022-06-01 07:55), 0.7)
                .with_business_hours(false)
                .with_on_off(true),
            Reading::new(datetime!(2022-06-01 08:00), 0.8)
                .with_business_hours(true)
                .with_on_off(false),
            Reading::new(datetime!(2022-06-01 08:05), 0.9)
                .with_business_hours(true)
                .with_on_off(true),
        ];

        assert_eq!(scenario_energy(&readings), [0.0, 0.8, 0.9]);
    }
}
