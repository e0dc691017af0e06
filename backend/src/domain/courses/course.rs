//! The course entity and its generated sessions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::natural_key::natural_key;
use crate::domain::{CourseId, DepartmentId, LecturerId, SessionId, StudentId};

use super::{CourseValidationError, generate_sessions};

natural_key!(
    /// Unique course code such as `CS101`.
    CourseCode, CourseValidationError::EmptyCode
);

/// Editable descriptive fields of a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetails {
    /// Display name.
    pub name: String,
    /// First day of teaching.
    pub start_date: NaiveDate,
    /// Day after the last possible session.
    pub end_date: NaiveDate,
}

impl CourseDetails {
    fn validated(self) -> Result<Self, CourseValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            ..self
        })
    }
}

/// One weekly meeting of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    course_id: CourseId,
    date: NaiveDate,
}

impl Session {
    /// Surrogate identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Owning course.
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// Date of the meeting.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A course aggregate root.
///
/// ## Invariants
/// - Exactly one department and one lecturer are referenced at all times.
/// - `enrolled_students` holds each student at most once.
/// - `sessions` are strictly increasing weekly dates in
///   `[start_date, end_date)` as of creation.
///
/// Courses are only built through [`Course::new`], so they serialise but
/// never deserialise:
///
/// ```compile_fail
/// use attendance::domain::Course;
///
/// let course: Course = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    code: CourseCode,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    department_id: DepartmentId,
    lecturer_id: LecturerId,
    enrolled_students: BTreeSet<StudentId>,
    sessions: Vec<Session>,
    version: u64,
}

impl Course {
    /// Create a course owned by `department_id`, taught by `lecturer_id`, with
    /// its weekly sessions generated from the date range.
    pub fn new(
        id: CourseId,
        code: CourseCode,
        details: CourseDetails,
        department_id: DepartmentId,
        lecturer_id: LecturerId,
    ) -> Result<Self, CourseValidationError> {
        let details = details.validated()?;
        let sessions = generate_sessions(details.start_date, details.end_date)
            .into_iter()
            .map(|draft| Session {
                id: SessionId::random(),
                course_id: id,
                date: draft.date,
            })
            .collect();
        Ok(Self {
            id,
            code,
            name: details.name,
            start_date: details.start_date,
            end_date: details.end_date,
            department_id,
            lecturer_id,
            enrolled_students: BTreeSet::new(),
            sessions,
            version: 0,
        })
    }

    /// Surrogate identifier.
    pub fn id(&self) -> CourseId {
        self.id
    }

    /// Unique course code.
    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// First day of teaching.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// End of the course's date range (exclusive for sessions).
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Owning department.
    pub fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    /// Assigned lecturer.
    pub fn lecturer_id(&self) -> LecturerId {
        self.lecturer_id
    }

    /// Students currently enrolled.
    pub fn enrolled_students(&self) -> &BTreeSet<StudentId> {
        &self.enrolled_students
    }

    /// Whether `student` is enrolled, compared by student id.
    pub fn is_enrolled(&self, student: &StudentId) -> bool {
        self.enrolled_students.contains(student)
    }

    /// Generated sessions in date order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Optimistic concurrency version assigned by the store.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Return the course stamped with a stored version.
    ///
    /// Persistence adapters call this when they write the record.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Replace the descriptive fields. Sessions are left as generated.
    pub fn apply_details(&mut self, details: CourseDetails) -> Result<(), CourseValidationError> {
        let details = details.validated()?;
        self.name = details.name;
        self.start_date = details.start_date;
        self.end_date = details.end_date;
        Ok(())
    }

    pub(crate) fn assign_department(&mut self, department: DepartmentId) {
        self.department_id = department;
    }

    pub(crate) fn assign_lecturer(&mut self, lecturer: LecturerId) {
        self.lecturer_id = lecturer;
    }

    pub(crate) fn add_student(&mut self, student: StudentId) -> bool {
        self.enrolled_students.insert(student)
    }

    pub(crate) fn remove_student(&mut self, student: &StudentId) -> bool {
        self.enrolled_students.remove(student)
    }
}
