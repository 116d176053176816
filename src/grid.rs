use crate::lunar::LunarCalendar;
use chrono::{Datelike, NaiveDate};

/// A contiguous run of days sharing the same (year, month).
///
/// Derived from the day sequence on demand; never stored or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub days: Vec<NaiveDate>,
}

impl MonthGroup {
    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    Day(DayCell),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub lunar: Option<String>,
}

/// Splits an ascending day sequence into month groups.
///
/// The split keys on the (year, month) pair, not the bare month number, so
/// two runs with the same month number from different years can never merge
/// even if the input were ever stitched together out of order.
pub fn group_by_month(days: &[NaiveDate]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for &day in days {
        match groups.last_mut() {
            Some(group) if group.year == day.year() && group.month == day.month() => {
                group.days.push(day);
            }
            _ => groups.push(MonthGroup {
                year: day.year(),
                month: day.month(),
                days: vec![day],
            }),
        }
    }
    groups
}

/// Pads one month into complete Sunday-aligned weeks.
///
/// Leading `Empty` cells shift the first day to its weekday column
/// (Sunday = 0); trailing `Empty` cells round the total up to a multiple
/// of 7. When a lunar converter is supplied each day carries its lunar
/// label: the month name on a lunar first, the day name otherwise.
pub fn pad_to_weeks(group: &MonthGroup, lunar: Option<&dyn LunarCalendar>) -> Vec<GridCell> {
    if group.days.is_empty() {
        return Vec::new();
    }
    let offset = group.first_day().weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(offset + group.days.len() + 6);
    cells.resize(offset, GridCell::Empty);
    for &date in &group.days {
        let label = lunar
            .and_then(|conv| conv.lunar_date(date))
            .map(|ld| ld.label().to_string());
        cells.push(GridCell::Day(DayCell { date, lunar: label }));
    }
    let remainder = cells.len() % 7;
    if remainder != 0 {
        cells.resize(cells.len() + 7 - remainder, GridCell::Empty);
    }
    cells
}

/// Stable identifier for a calendar month: 4-digit year then zero-padded
/// 2-digit month, e.g. 2024-09 -> "202409".
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}{:02}", date.year(), date.month())
}
