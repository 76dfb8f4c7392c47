use std::collections::BTreeMap;

use hvac_domain::domain::Reading;
use time::Date;

/// Reading indices grouped by calendar date, in date order.
///
/// Built once per engine run and shared by every scenario, so no scenario has
/// to rescan the whole table per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIndex {
    days: BTreeMap<Date, Vec<usize>>,
}

impl DayIndex {
    pub fn build(readings: &[Reading]) -> Self {
        let mut days: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
        for (i, r) in readings.iter().enumerate() {
            days.entry(r.date).or_default().push(i);
        }
        Self { days }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, &[usize])> + '_ {
        self.days.iter().map(|(d, idx)| (*d, idx.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn groups_indices_by_date() {
        let readings = vec![
            Reading::new(datetime!(2022-06-01 23:55), 1.0),
            Reading::new(datetime!(2022-06-02 00:00), 1.0),
            Reading::new(datetime!(2022-06-02 00:05), 1.0),
        ];
        let index = DayIndex::build(&readings);

        let days: Vec<_> = index.iter().collect();
        assert_eq!(
            days,
            [
                (date!(2022 - 06 - 01), &[0][..]),
                (date!(2022 - 06 - 02), &[1, 2][..]),
            ]
        );
        assert_eq!(index.len(), 2);
    }
}
