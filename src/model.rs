use chrono::{Datelike, NaiveDate};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    #[error("year {0} cannot be represented by the date system")]
    UnrepresentableYear(i32),
    #[error("cannot extend an empty date range")]
    EmptyRange,
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Every day of `year` from Jan 1 to Dec 31, ascending.
///
/// Leap years come out of chrono: Feb 29 is present exactly when the year
/// is divisible by 4, and not by 100 unless also by 400.
pub fn generate_year(year: i32) -> Result<Vec<NaiveDate>, CalendarError> {
    let start =
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalendarError::UnrepresentableYear(year))?;
    let end =
        NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CalendarError::UnrepresentableYear(year))?;
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// The owned, append-only day sequence the whole app renders from.
///
/// Invariant: strictly ascending by one day per step, covering whole years.
/// The only mutation is appending one more whole year at the end.
#[derive(Debug, Clone)]
pub struct DateRange {
    days: Vec<NaiveDate>,
}

impl DateRange {
    /// Builds the initial range covering `[center - span, center + span]`.
    ///
    /// Years chrono cannot represent are skipped rather than failing the
    /// whole window. A negative span is a caller bug and is rejected before
    /// any generation happens.
    pub fn load_initial(center: i32, span: i32) -> Result<Self, CalendarError> {
        if span < 0 {
            return Err(CalendarError::Configuration(format!(
                "span must be non-negative, got {}",
                span
            )));
        }
        let mut days = Vec::new();
        for year in center.saturating_sub(span)..=center.saturating_add(span) {
            match generate_year(year) {
                Ok(mut year_days) => days.append(&mut year_days),
                Err(CalendarError::UnrepresentableYear(_)) => continue,
                Err(other) => return Err(other),
            }
        }
        Ok(DateRange { days })
    }

    /// Appends the year after the current last day, returning the year added.
    pub fn extend_by_one_year(&mut self) -> Result<i32, CalendarError> {
        let last = self.days.last().ok_or(CalendarError::EmptyRange)?;
        let next_year = last.year() + 1;
        let mut year_days = generate_year(next_year)?;
        self.days.append(&mut year_days);
        Ok(next_year)
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn leap_year_has_366_days() {
        let days = generate_year(2024).unwrap();
        assert_eq!(days.len(), 366);
        assert_eq!(days[0], ymd(2024, 1, 1));
        assert_eq!(*days.last().unwrap(), ymd(2024, 12, 31));
    }

    #[test]
    fn common_year_has_365_days() {
        assert_eq!(generate_year(2023).unwrap().len(), 365);
    }

    #[test]
    fn century_leap_rule() {
        assert_eq!(generate_year(1900).unwrap().len(), 365);
        assert_eq!(generate_year(2000).unwrap().len(), 366);
    }

    #[test]
    fn generated_days_are_gapless() {
        let days = generate_year(2023).unwrap();
        for pair in days.windows(2) {
            assert_eq!(pair[0].succ_opt().unwrap(), pair[1]);
        }
    }

    #[test]
    fn unrepresentable_year_errors() {
        assert_eq!(
            generate_year(i32::MAX).unwrap_err(),
            CalendarError::UnrepresentableYear(i32::MAX)
        );
    }

    #[test]
    fn initial_range_covers_window() {
        let range = DateRange::load_initial(2024, 1).unwrap();
        assert_eq!(range.first().unwrap(), ymd(2023, 1, 1));
        assert_eq!(range.last().unwrap(), ymd(2025, 12, 31));
        // 2023 + 2024 (leap) + 2025
        assert_eq!(range.days().len(), 365 + 366 + 365);
    }

    #[test]
    fn zero_span_is_one_year() {
        let range = DateRange::load_initial(2023, 0).unwrap();
        assert_eq!(range.days().len(), 365);
    }

    #[test]
    fn negative_span_rejected() {
        assert!(matches!(
            DateRange::load_initial(2024, -1),
            Err(CalendarError::Configuration(_))
        ));
    }

    #[test]
    fn unrepresentable_years_in_window_are_skipped() {
        let range = DateRange::load_initial(i32::MAX - 1, 1).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn extend_appends_next_year() {
        let mut range = DateRange::load_initial(2024, 0).unwrap();
        let added = range.extend_by_one_year().unwrap();
        assert_eq!(added, 2025);
        assert_eq!(range.days().len(), 366 + 365);
        assert_eq!(range.last().unwrap(), ymd(2025, 12, 31));
        assert_eq!(range.days()[366], ymd(2025, 1, 1));
    }

    #[test]
    fn extend_empty_range_errors() {
        let mut range = DateRange { days: Vec::new() };
        assert_eq!(
            range.extend_by_one_year().unwrap_err(),
            CalendarError::EmptyRange
        );
    }
}
