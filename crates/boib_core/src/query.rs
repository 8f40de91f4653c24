use std::fmt;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("a day ({day}) was given without a month")]
    DayWithoutMonth { day: u32 },
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
    #[error("day {0} is outside 1..=31")]
    DayOutOfRange(u32),
}

/// Calendar selection: a whole year, one month of it, or one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateQuery {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateQuery {
    /// Validates the combination; a day is only looked up inside a month.
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> Result<Self, QueryError> {
        if let Some(month) = month {
            if !(1..=12).contains(&month) {
                return Err(QueryError::MonthOutOfRange(month));
            }
        }
        if let Some(day) = day {
            if month.is_none() {
                return Err(QueryError::DayWithoutMonth { day });
            }
            if !(1..=31).contains(&day) {
                return Err(QueryError::DayOutOfRange(day));
            }
        }
        Ok(Self { year, month, day })
    }

    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Result<Self, QueryError> {
        Self::new(year, Some(month), None)
    }

    pub fn day(year: i32, month: u32, day: u32) -> Result<Self, QueryError> {
        Self::new(year, Some(month), Some(day))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    pub fn year_value(&self) -> i32 {
        self.year
    }

    pub fn month_value(&self) -> Option<u32> {
        self.month
    }

    pub fn day_value(&self) -> Option<u32> {
        self.day
    }

    /// Whether `date` falls inside the selected period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
            && self.month.is_none_or(|month| date.month() == month)
            && self.day.is_none_or(|day| date.day() == day)
    }
}

impl fmt::Display for DateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
        }
        if let Some(day) = self.day {
            write!(f, "-{day:02}")?;
        }
        Ok(())
    }
}
