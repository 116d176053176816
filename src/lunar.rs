use chrono::NaiveDate;

/// Conversion capability from solar dates into a lunar calendar system.
///
/// The grid only ever asks for the (month, day) pair of a date; `None`
/// means the date is outside the converter's supported range and the cell
/// is rendered without an annotation.
pub trait LunarCalendar {
    fn lunar_date(&self, date: NaiveDate) -> Option<LunarDate>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub year: i32,
    /// Lunar month, 1..=12. A leap month repeats its base month number.
    pub month: u32,
    /// Lunar day, 1..=30.
    pub day: u32,
    pub leap: bool,
}

pub const LUNAR_MONTH_NAMES: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

pub const LUNAR_DAY_NAMES: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十", "十一", "十二",
    "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十", "廿一", "廿二", "廿三", "廿四",
    "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

impl LunarDate {
    /// Display label: the month name on the first day, the day name after.
    pub fn label(&self) -> &'static str {
        if self.day == 1 {
            LUNAR_MONTH_NAMES[(self.month - 1) as usize]
        } else {
            LUNAR_DAY_NAMES[(self.day - 1) as usize]
        }
    }
}

/// Table-driven Chinese lunisolar calendar, valid 1900-01-31..=2100.
///
/// One packed word per lunar year: low nibble is the leap month (0 for
/// none), bits 4..=15 flag 30-day months 12..=1, bit 16 flags a 30-day
/// leap month.
pub struct ChineseLunar;

const BASE_YEAR: i32 = 1900;
const LAST_YEAR: i32 = 2100;

#[rustfmt::skip]
const LUNAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2,
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977,
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970,
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950,
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557,
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0,
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0,
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6,
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570,
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0,
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5,
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930,
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530,
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45,
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0,
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0,
    0x0a2e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4,
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0,
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160,
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252,
    0x0d520,
];

fn info(year: i32) -> u32 {
    LUNAR_INFO[(year - BASE_YEAR) as usize]
}

fn leap_month(year: i32) -> u32 {
    info(year) & 0xf
}

fn leap_month_days(year: i32) -> i64 {
    if leap_month(year) == 0 {
        0
    } else if info(year) & 0x10000 != 0 {
        30
    } else {
        29
    }
}

fn month_days(year: i32, month: u32) -> i64 {
    if info(year) & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

fn year_days(year: i32) -> i64 {
    let mut sum = 348;
    let mut bit = 0x8000;
    while bit > 0x8 {
        if info(year) & bit != 0 {
            sum += 1;
        }
        bit >>= 1;
    }
    sum + leap_month_days(year)
}

impl LunarCalendar for ChineseLunar {
    fn lunar_date(&self, date: NaiveDate) -> Option<LunarDate> {
        // Lunar 1900-01-01 fell on this solar date.
        let epoch = NaiveDate::from_ymd_opt(1900, 1, 31)?;
        let mut offset = (date - epoch).num_days();
        if offset < 0 {
            return None;
        }

        let mut year = BASE_YEAR;
        loop {
            if year > LAST_YEAR {
                return None;
            }
            let len = year_days(year);
            if offset < len {
                break;
            }
            offset -= len;
            year += 1;
        }

        let leap = leap_month(year);
        let mut month = 1;
        let mut in_leap = false;
        loop {
            let len = if in_leap {
                leap_month_days(year)
            } else {
                month_days(year, month)
            };
            if offset < len {
                break;
            }
            offset -= len;
            if !in_leap && month == leap {
                in_leap = true;
            } else {
                in_leap = false;
                month += 1;
            }
        }

        Some(LunarDate {
            year,
            month,
            day: offset as u32 + 1,
            leap: in_leap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunar(year: i32, month: u32, day: u32) -> LunarDate {
        ChineseLunar
            .lunar_date(NaiveDate::from_ymd_opt(year, month, day).unwrap())
            .unwrap()
    }

    #[test]
    fn epoch_is_first_month_first_day() {
        let ld = lunar(1900, 1, 31);
        assert_eq!((ld.year, ld.month, ld.day, ld.leap), (1900, 1, 1, false));
    }

    #[test]
    fn millennium_day() {
        let ld = lunar(2000, 1, 1);
        assert_eq!((ld.year, ld.month, ld.day, ld.leap), (1999, 11, 25, false));
    }

    #[test]
    fn chinese_new_year_2024() {
        let ld = lunar(2024, 2, 10);
        assert_eq!((ld.year, ld.month, ld.day, ld.leap), (2024, 1, 1, false));
        assert_eq!(ld.label(), "正月");
    }

    #[test]
    fn mid_autumn_2024() {
        let ld = lunar(2024, 9, 17);
        assert_eq!((ld.year, ld.month, ld.day), (2024, 8, 15));
        assert_eq!(ld.label(), "十五");
    }

    #[test]
    fn leap_month_2023() {
        // The leap second month of 2023 began on March 22.
        let ld = lunar(2023, 3, 22);
        assert_eq!((ld.year, ld.month, ld.day, ld.leap), (2023, 2, 1, true));
        assert_eq!(ld.label(), "二月");
    }

    #[test]
    fn out_of_range_is_none() {
        let before = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
        let after = NaiveDate::from_ymd_opt(2200, 1, 1).unwrap();
        assert_eq!(ChineseLunar.lunar_date(before), None);
        assert_eq!(ChineseLunar.lunar_date(after), None);
    }

    #[test]
    fn label_uses_day_names_after_the_first() {
        let ld = LunarDate {
            year: 2024,
            month: 11,
            day: 1,
            leap: false,
        };
        assert_eq!(ld.label(), "冬月");
        let ld = LunarDate {
            year: 2024,
            month: 12,
            day: 30,
            leap: false,
        };
        assert_eq!(ld.label(), "三十");
    }

    #[test]
    fn year_lengths_are_plausible() {
        // Common lunar years run 353-355 days, leap years 383-385.
        for year in BASE_YEAR..=LAST_YEAR {
            let len = year_days(year);
            if leap_month(year) == 0 {
                assert!((353..=355).contains(&len), "{} has {} days", year, len);
            } else {
                assert!((383..=385).contains(&len), "{} has {} days", year, len);
            }
        }
    }

    #[test]
    fn lunar_days_advance_without_gaps() {
        // Consecutive solar days never skip a lunar day.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut prev = ChineseLunar.lunar_date(start).unwrap();
        for date in start.iter_days().skip(1).take(730) {
            let cur = ChineseLunar.lunar_date(date).unwrap();
            if cur.month == prev.month && cur.leap == prev.leap && cur.year == prev.year {
                assert_eq!(cur.day, prev.day + 1);
            } else {
                assert_eq!(cur.day, 1);
            }
            prev = cur;
        }
    }
}
