use chrono::NaiveDate;

// Task dates are stored in ISO form, which orders lexicographically, so the
// month/year listing filters reduce to half-open string ranges.

pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
    Some((start, end))
}

/// Anchored pattern matching one calendar month in any year. Only used when
/// a month filter arrives without a year, where no range form exists.
pub fn month_pattern(month: u32) -> Option<String> {
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("^[0-9]{{4}}-{:02}-", month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_are_half_open() {
        let (start, end) = month_bounds(2024, 3).unwrap();
        assert_eq!(start.to_string(), "2024-03-01");
        assert_eq!(end.to_string(), "2024-04-01");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_string(), "2024-12-01");
        assert_eq!(end.to_string(), "2025-01-01");
    }

    #[test]
    fn invalid_month_yields_nothing() {
        assert!(month_bounds(2024, 13).is_none());
        assert!(month_pattern(0).is_none());
    }

    #[test]
    fn year_bounds_span_the_year() {
        let (start, end) = year_bounds(2023).unwrap();
        assert_eq!(start.to_string(), "2023-01-01");
        assert_eq!(end.to_string(), "2024-01-01");
    }

    #[test]
    fn month_pattern_is_zero_padded() {
        assert_eq!(month_pattern(3).unwrap(), "^[0-9]{4}-03-");
        assert_eq!(month_pattern(11).unwrap(), "^[0-9]{4}-11-");
    }
}
