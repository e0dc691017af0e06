//! Course aggregate types and weekly schedule generation.
//!
//! A course is the authoritative side of its department, lecturer and
//! enrollment links; the roster records keep inverse indexes. Sessions are
//! derived from the course's date range when the course is created and are
//! never edited afterwards.

use std::fmt;

mod course;
mod schedule;

pub use course::{Course, CourseCode, CourseDetails, Session};
pub use schedule::{SessionDraft, WeeklySchedule, generate_sessions};

/// Validation errors raised by course constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Course code was blank.
    EmptyCode,
    /// Course name was blank.
    EmptyName,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "course code must not be empty"),
            Self::EmptyName => write!(f, "course name must not be empty"),
        }
    }
}

impl std::error::Error for CourseValidationError {}
