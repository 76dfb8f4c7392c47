use hvac_domain::domain::Reading;
use time::Duration;

use super::day_index::DayIndex;

/// Per-reading energy if the unit had been switched off `window` before the
/// last "on" reading of each day.
///
/// For every day, readings with `on_off = 1` in `(last_on - window, last_on]`
/// are zeroed. The window is wall-clock time, so a day whose on-period is
/// shorter than the window loses all of it. Days without any "on" reading are
/// left untouched.
pub fn scenario_energy(readings: &[Reading], days: &DayIndex, window: Duration) -> Vec<f64> {
    let mut energy: Vec<f64> = readings.iter().map(|r| r.energy_kwh).collect();

    for (_, indices) in days.iter() {
        let on: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| readings[i].is_on())
            .collect();

        let Some(last_on) = on.iter().map(|&i| readings[i].timestamp).max() else {
            continue;
        };
        let cutoff = last_on - window;

        for i in on {
            let ts = readings[i].timestamp;
            if ts > cutoff && ts <= last_on {
                energy[i] = 0.0;
            }
        }
    }

    energy
}
