use hvac_domain::query::{BusinessHoursMode, ReadingFilter, WeekendMode};
use serde::Deserialize;
use time::PrimitiveDateTime;

use super::error::ApiError;
use crate::normalize::parse;

/// Query string shared by the baseline views.
///
/// `start`/`end` are `YYYY-MM-DD`; `from`/`to` bound the power series zoom
/// window and take the same timestamp forms as the CSV.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub business: Option<BusinessHoursMode>,
    pub weekend: Option<WeekendMode>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ViewParams {
    pub fn filter(&self) -> Result<ReadingFilter, ApiError> {
        let date = |name: &str, v: &Option<String>| {
            v.as_deref()
                .map(|s| parse::parse_date(s).map_err(|e| ApiError::BadRequest(format!("{name}: {e}"))))
                .transpose()
        };

        let filter = ReadingFilter {
            start: date("start", &self.start)?,
            end: date("end", &self.end)?,
            business: self.business.unwrap_or_default(),
            weekend: self.weekend.unwrap_or_default(),
        };

        if let (Some(s), Some(e)) = (filter.start, filter.end) {
            if s > e {
                return Err(ApiError::BadRequest(format!("start {s} is after end {e}")));
            }
        }
        Ok(filter)
    }

    pub fn zoom(&self) -> Result<(Option<PrimitiveDateTime>, Option<PrimitiveDateTime>), ApiError> {
        let ts = |name: &str, v: &Option<String>| {
            v.as_deref()
                .map(|s| parse::parse_timestamp(s).map_err(|e| ApiError::BadRequest(format!("{name}: {e}"))))
                .transpose()
        };
        Ok((ts("from", &self.from)?, ts("to", &self.to)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn empty_params_mean_no_filtering() {
        assert_eq!(ViewParams::default().filter().unwrap(), ReadingFilter::default());
        assert_eq!(ViewParams::default().zoom().unwrap(), (None, None));
    }

    #[test]
    fn parses_dates_and_modes() {
        let params = ViewParams {
            start: Some("2022-06-01".into()),
            end: Some("2022-06-30".into()),
            business: Some(BusinessHoursMode::OutsideOnly),
            to: Some("2022-06-02 12:00".into()),
            ..Default::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.start, Some(date!(2022 - 06 - 01)));
        assert_eq!(filter.end, Some(date!(2022 - 06 - 30)));
        assert_eq!(filter.business, BusinessHoursMode::OutsideOnly);
        assert_eq!(filter.weekend, WeekendMode::All);
        assert_eq!(params.zoom().unwrap(), (None, Some(datetime!(2022-06-02 12:00))));
    }

    #[test]
    fn rejects_bad_dates_and_reversed_range() {
        let params = ViewParams {
            start: Some("June".into()),
            ..Default::default()
        };
        assert!(matches!(params.filter(), Err(ApiError::BadRequest(_))));

        let params = ViewParams {
            start: Some("2022-07-01".into()),
            end: Some("2022-06-01".into()),
            ..Default::default()
        };
        assert!(matches!(params.filter(), Err(ApiError::BadRequest(_))));
    }
}
