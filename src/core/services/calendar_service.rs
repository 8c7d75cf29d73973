//! Week-aligned month grids for calendar display.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ledger::YearMonth;

use super::monthly_service::DailySummary;
use super::ServiceResult;

pub const DAYS_PER_WEEK: usize = 7;

/// One cell of the grid. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum CalendarCell<'a> {
    Blank,
    Day {
        day: u32,
        date: NaiveDate,
        /// `None` when nothing was recorded that day.
        summary: Option<&'a DailySummary>,
    },
}

impl<'a> CalendarCell<'a> {
    pub fn is_blank(&self) -> bool {
        matches!(self, CalendarCell::Blank)
    }

    pub fn day(&self) -> Option<u32> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn summary(&self) -> Option<&'a DailySummary> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day { summary, .. } => *summary,
        }
    }
}

pub type Week<'a> = [CalendarCell<'a>; DAYS_PER_WEEK];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CalendarGrid<'a> {
    pub year_month: YearMonth,
    pub weeks: Vec<Week<'a>>,
}

impl<'a> CalendarGrid<'a> {
    /// Number of non-blank cells, equal to the days in the month.
    pub fn day_count(&self) -> usize {
        self.cells().filter(|cell| !cell.is_blank()).count()
    }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell<'a>> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    /// Blank cells before day 1.
    pub fn leading_blanks(&self) -> usize {
        self.cells().take_while(|cell| cell.is_blank()).count()
    }

    pub fn trailing_blanks(&self) -> usize {
        self.weeks
            .last()
            .map(|week| week.iter().rev().take_while(|cell| cell.is_blank()).count())
            .unwrap_or(0)
    }
}

pub struct CalendarService;

impl CalendarService {
    /// Weekday of the first of the month, 0 = Sunday through 6 = Saturday.
    pub fn first_weekday(year_month: YearMonth) -> u32 {
        year_month.first_day().weekday().num_days_from_sunday()
    }

    /// Lays `year`/`month` out in Sunday-first weeks, attaching each day's summary.
    pub fn build_grid(
        year: i32,
        month: u32,
        summaries: &[DailySummary],
    ) -> ServiceResult<CalendarGrid<'_>> {
        let year_month = YearMonth::new(year, month)?;
        let mut by_day: HashMap<u32, &DailySummary> = HashMap::with_capacity(summaries.len());
        for summary in summaries {
            by_day.entry(summary.day).or_insert(summary);
        }

        let leading = Self::first_weekday(year_month) as usize;
        let mut cells: Vec<CalendarCell<'_>> = vec![CalendarCell::Blank; leading];
        for date in year_month.first_day().iter_days().take_while(|d| year_month.contains(*d)) {
            let day = date.day();
            cells.push(CalendarCell::Day {
                day,
                date,
                summary: by_day.get(&day).copied(),
            });
        }
        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat(CalendarCell::Blank).take(trailing));

        let weeks: Vec<Week<'_>> = cells
            .chunks_exact(DAYS_PER_WEEK)
            .map(|chunk| {
                let mut week = [CalendarCell::Blank; DAYS_PER_WEEK];
                week.copy_from_slice(chunk);
                week
            })
            .collect();
        tracing::debug!(month = %year_month, weeks = weeks.len(), leading, trailing, "built grid");

        Ok(CalendarGrid { year_month, weeks })
    }
}
