use crate::grid::month_key;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Logical scroll target for the presentation layer.
///
/// `Month` addresses a rendered month by its `yyyymm` key; `Today` is the
/// fixed sentinel for the exact current day, so a two-stage scroll (month
/// first, then the day) stays possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrollAnchor {
    Month(String),
    Today,
}

impl ScrollAnchor {
    pub fn month_of(date: NaiveDate) -> Self {
        ScrollAnchor::Month(month_key(date))
    }
}

impl fmt::Display for ScrollAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollAnchor::Month(key) => f.write_str(key),
            ScrollAnchor::Today => f.write_str("today"),
        }
    }
}

/// Month anchor for `now`, if `now`'s month exists in the sequence.
///
/// Returns `None` when the month is absent; whether to fall back to the
/// nearest month or do nothing is the caller's policy, not decided here.
pub fn resolve_today_target(days: &[NaiveDate], now: NaiveDate) -> Option<ScrollAnchor> {
    let present = days
        .iter()
        .any(|d| d.year() == now.year() && d.month() == now.month());
    present.then(|| ScrollAnchor::month_of(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateRange;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn resolves_to_month_anchor_when_present() {
        let range = DateRange::load_initial(2024, 1).unwrap();
        assert_eq!(
            resolve_today_target(range.days(), ymd(2024, 9, 15)),
            Some(ScrollAnchor::Month("202409".into()))
        );
    }

    #[test]
    fn absent_month_resolves_to_none() {
        let range = DateRange::load_initial(2024, 0).unwrap();
        assert_eq!(resolve_today_target(range.days(), ymd(2030, 6, 1)), None);
    }

    #[test]
    fn empty_sequence_resolves_to_none() {
        assert_eq!(resolve_today_target(&[], ymd(2024, 9, 15)), None);
    }

    #[test]
    fn today_sentinel_is_stable() {
        assert_eq!(ScrollAnchor::Today.to_string(), "today");
        assert_eq!(ScrollAnchor::month_of(ymd(2024, 9, 1)).to_string(), "202409");
    }
}
