use crate::cli::Cli;
use crate::grid::{group_by_month, pad_to_weeks, GridCell};
use crate::lunar::{ChineseLunar, LunarCalendar};
use crate::model::DateRange;
use crate::ui;
use anyhow::Result;
use chrono::{Datelike, Local};

const WIDE_SPAN: i32 = 100;
const CELL: usize = 6;

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub span: i32,
    pub lunar: bool,
}

impl Options {
    pub fn from_args(args: &Cli) -> Self {
        Options {
            span: if args.all { WIDE_SPAN } else { args.span as i32 },
            lunar: !args.no_lunar,
        }
    }
}

pub fn tui(options: Options) -> Result<()> {
    let today = Local::now().date_naive();
    let range = DateRange::load_initial(today.year(), options.span)?;
    ui::run(range, options.lunar)
}

pub fn print_year(year: Option<i32>, options: Options) -> Result<()> {
    let year = year.unwrap_or_else(|| Local::now().date_naive().year());
    let range = DateRange::load_initial(year, 0)?;
    let converter = ChineseLunar;
    let lunar: Option<&dyn LunarCalendar> = if options.lunar {
        Some(&converter)
    } else {
        None
    };

    for group in group_by_month(range.days()) {
        println!("{} {}", group.first_day().format("%B"), group.year);
        for heading in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
            print!("{:<width$}", heading, width = CELL);
        }
        println!();
        let cells = pad_to_weeks(&group, lunar);
        for week in cells.chunks(7) {
            for cell in week {
                match cell {
                    GridCell::Day(day) => print!("{:<width$}", day.date.day(), width = CELL),
                    GridCell::Empty => print!("{:width$}", "", width = CELL),
                }
            }
            println!();
            if options.lunar {
                for cell in week {
                    match cell {
                        // CJK labels are two chars wide on screen; pad by hand.
                        GridCell::Day(day) => match &day.lunar {
                            Some(label) => print!("{}  ", label),
                            None => print!("{:width$}", "", width = CELL),
                        },
                        GridCell::Empty => print!("{:width$}", "", width = CELL),
                    }
                }
                println!();
            }
        }
        println!();
    }
    Ok(())
}
