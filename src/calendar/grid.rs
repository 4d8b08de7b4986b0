use thiserror::Error;
use time::{
    error::{ComponentRange, Parse},
    format_description::BorrowedFormatItem,
    macros::format_description,
    Date, Month,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub(crate) static WEEKDAY_NAMES: [&str; DAYS_IN_WEEK] =
    ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A date as handed over by a caller.  The components are not checked until
/// the date is passed to [`build_month_grid()`], so this may name a day that
/// does not exist.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CalendarDate {
    year: i32,
    /// Zero-based: 0 is January
    month: u8,
    day: u8,
}

impl CalendarDate {
    pub(crate) fn new(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate { year, month, day }
    }

    /// Parse a `YYYY-MM-DD` string, as produced by a date input
    pub(crate) fn parse(s: &str) -> Result<CalendarDate, InvalidDateError> {
        match Date::parse(s, &YMD_FMT) {
            Ok(date) => Ok(CalendarDate::from(date)),
            Err(source) => Err(InvalidDateError::Unparseable {
                input: s.to_owned(),
                source,
            }),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month0(&self) -> u8 {
        self.month
    }

    pub(crate) fn day(&self) -> u8 {
        self.day
    }

    pub(crate) fn to_date(self) -> Result<Date, InvalidDateError> {
        let month = month_from_index0(self.month)?;
        Ok(Date::from_calendar_date(self.year, month, self.day)?)
    }
}

impl From<Date> for CalendarDate {
    fn from(date: Date) -> CalendarDate {
        CalendarDate {
            year: date.year(),
            month: u8::from(date.month()) - 1,
            day: date.day(),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum InvalidDateError {
    #[error("invalid date provided to calendar: {input:?} is not a YYYY-MM-DD date")]
    Unparseable { input: String, source: Parse },
    #[error("invalid date provided to calendar: month index {0} is not in 0..=11")]
    Month(u8),
    #[error("invalid date provided to calendar")]
    OutOfRange(#[from] ComponentRange),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum DayCell {
    Blank,
    Day { day: u8, selected: bool },
}

impl DayCell {
    pub(crate) fn day(&self) -> Option<u8> {
        match self {
            DayCell::Blank => None,
            DayCell::Day { day, .. } => Some(*day),
        }
    }

    pub(crate) fn in_month(&self) -> bool {
        matches!(self, DayCell::Day { .. })
    }

    pub(crate) fn is_selected(&self) -> bool {
        matches!(self, DayCell::Day { selected: true, .. })
    }

    /// Human-readable label for assistive technology
    pub(crate) fn label(&self) -> String {
        match self {
            DayCell::Blank => String::from("Empty"),
            DayCell::Day { day, .. } => format!("Day {day}"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month_name: &'static str,
    year: i32,
    // Invariant: Zero or more `Blank`s followed by `Day`s numbered 1 through
    // the length of the month
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub(crate) fn month_name(&self) -> &'static str {
        self.month_name
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// `"{month name} {year}"`, e.g. "October 2022"
    pub(crate) fn title(&self) -> String {
        format!("{} {}", self.month_name(), self.year())
    }

    pub(crate) fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| !c.in_month()).count()
    }

    pub(crate) fn day_count(&self) -> usize {
        self.cells.iter().filter(|c| c.in_month()).count()
    }

    pub(crate) fn selected_day(&self) -> Option<u8> {
        self.cells
            .iter()
            .find(|c| c.is_selected())
            .and_then(DayCell::day)
    }

    /// The cells split into calendar rows, Sunday first.  The last row is
    /// short unless the month ends on a Saturday.
    pub(crate) fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_IN_WEEK)
    }
}

/// Lay out the month containing `date`, with `date`'s day selected
pub(crate) fn build_month_grid(date: CalendarDate) -> Result<MonthGrid, InvalidDateError> {
    let valid = date.to_date()?;
    let month = valid.month();
    let year = valid.year();
    let blanks = usize::from(first_weekday(year, month)?);
    let cells = std::iter::repeat(DayCell::Blank)
        .take(blanks)
        .chain(day_cells(days_in_month(year, month)?, valid.day()))
        .collect::<Vec<_>>();
    tracing::debug!(
        year,
        month = %month,
        blanks,
        days = cells.len() - blanks,
        "built month grid"
    );
    Ok(MonthGrid {
        month_name: MONTH_NAMES[usize::from(date.month0())],
        year,
        cells,
    })
}

// If `selected` is past the end of the month, nothing is selected.
fn day_cells(days: u8, selected: u8) -> impl Iterator<Item = DayCell> {
    (1..=days).map(move |day| DayCell::Day {
        day,
        selected: day == selected,
    })
}

/// Number of days in the given month, found as the day before the first of
/// the following month
pub(crate) fn days_in_month(year: i32, month: Month) -> Result<u8, InvalidDateError> {
    if month == Month::December {
        // The day after December always starts a new year, which may be past
        // the last representable one.
        return Ok(31);
    }
    let next_first = Date::from_calendar_date(year, month.next(), 1)?;
    match next_first.previous_day() {
        Some(last) => Ok(last.day()),
        None => Err(InvalidDateError::Month(u8::from(month) - 1)),
    }
}

/// Weekday of the first of the month as a number from 0 (Sunday) through 6
/// (Saturday)
pub(crate) fn first_weekday(year: i32, month: Month) -> Result<u8, InvalidDateError> {
    Ok(Date::from_calendar_date(year, month, 1)?
        .weekday()
        .number_days_from_sunday())
}

pub(crate) fn month_from_index0(month: u8) -> Result<Month, InvalidDateError> {
    month
        .checked_add(1)
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(InvalidDateError::Month(month))
}
