//! Calendar month keys used to bucket operations.

use std::{cmp::Ordering, fmt::Display};

use time::{Date, Month};

/// A calendar month, e.g. January 2024.
///
/// Ordering is chronological, which matches the lexicographic order of the
/// zero-padded `YYYY-MM` form produced by [Display].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    year: i32,
    month: Month,
}

impl MonthKey {
    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year of the month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.month
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        *self == Self::from_date(date)
    }

    /// A short label for chart axes and table headers, e.g. "Jan 2024".
    pub fn short_label(&self) -> String {
        let name = match self.month {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        };

        format!("{name} {}", self.year)
    }
}

// `time::Month` has no ordering of its own, so compare by month number.
impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| (self.month as u8).cmp(&(other.month as u8)))
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}
