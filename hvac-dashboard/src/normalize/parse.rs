//! Cell-level coercions for the HVAC CSV.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use hvac_domain::domain::YearMonth;

/// Parses a wall-clock timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` with either a space or `T` between
/// date and time, and RFC 3339. An RFC 3339 offset is dropped and the local
/// wall clock kept as-is.
pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, String> {
    let s = s.trim();
    if let Ok(odt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(PrimitiveDateTime::new(odt.date(), odt.time()));
    }

    let normalized = match s.as_bytes().get(10) {
        Some(b'T') => format!("{} {}", &s[..10], &s[11..]),
        _ => s.to_string(),
    };
    PrimitiveDateTime::parse(
        &normalized,
        format_description!(
            "[year]-[month]-[day] [hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
        ),
    )
    .map_err(|e| e.to_string())
}

/// Parses a calendar date, either `YYYY-MM-DD` or any timestamp accepted by
/// [`parse_timestamp`] (its date part).
pub fn parse_date(s: &str) -> Result<Date, String> {
    let s = s.trim();
    match Date::parse(s, format_description!("[year]-[month]-[day]")) {
        Ok(d) => Ok(d),
        Err(date_err) => parse_timestamp(s)
            .map(|ts| ts.date())
            .map_err(|_| date_err.to_string()),
    }
}

/// Parses `YYYY-MM`, falling back to the month of a date or timestamp.
pub fn parse_year_month(s: &str) -> Result<YearMonth, String> {
    match s.trim().parse::<YearMonth>() {
        Ok(ym) => Ok(ym),
        Err(ym_err) => parse_date(s)
            .map(YearMonth::of)
            .map_err(|_| ym_err.to_string()),
    }
}

/// Coerces a 0/1 flag. Accepts integer, float and boolean spellings; any
/// other value (including blank) is rejected.
pub fn parse_flag(s: &str) -> Result<bool, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    match s.parse::<f64>() {
        Ok(v) if v == 1.0 => Ok(true),
        Ok(v) if v == 0.0 => Ok(false),
        Ok(v) => Err(format!("flag must be 0 or 1, got {v}")),
        Err(e) => Err(e.to_string()),
    }
}

pub fn parse_f64(s: &str) -> Result<f64, String> {
    s.trim().parse::<f64>().map_err(|e| e.to_string())
}

/// Blank cells and non-finite numbers (`NaN`, `inf`) are "no value";
/// anything else must be a number.
pub fn parse_optional_f64(s: &str) -> Result<Option<f64>, String> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    parse_f64(s).map(|v| v.is_finite().then_some(v))
}
