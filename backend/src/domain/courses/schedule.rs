//! Weekly session calendar derived from a course's date range.

use chrono::{Days, NaiveDate};

const DAYS_PER_WEEK: u64 = 7;

/// A session date produced by [`generate_sessions`], not yet bound to a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionDraft {
    /// Calendar date the session takes place on.
    pub date: NaiveDate,
}

/// Iterator over weekly session dates in `[start, end)`.
///
/// Anchored on the start date's weekday; stops before the first date that is
/// not strictly earlier than `end`, or when the calendar overflows.
#[derive(Debug, Clone)]
pub struct WeeklySchedule {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl WeeklySchedule {
    /// Schedule sessions from `start` (inclusive) up to `end` (exclusive).
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            cursor: Some(start),
            end,
        }
    }
}

impl Iterator for WeeklySchedule {
    type Item = SessionDraft;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.cursor.filter(|date| *date < self.end)?;
        self.cursor = date.checked_add_days(Days::new(DAYS_PER_WEEK));
        Some(SessionDraft { date })
    }
}

impl std::iter::FusedIterator for WeeklySchedule {}

/// Generate the ordered weekly sessions for a course running from `start`
/// until the day before `end`.
///
/// An empty result is valid: a course whose start is not before its end has
/// no sessions.
///
/// # Examples
/// ```
/// use attendance::domain::generate_sessions;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
/// let end = NaiveDate::from_ymd_opt(2024, 1, 22).expect("valid date");
/// let dates: Vec<_> = generate_sessions(start, end).iter().map(|s| s.date).collect();
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates.last(), NaiveDate::from_ymd_opt(2024, 1, 15).as_ref());
/// ```
pub fn generate_sessions(start: NaiveDate, end: NaiveDate) -> Vec<SessionDraft> {
    WeeklySchedule::new(start, end).collect()
}
