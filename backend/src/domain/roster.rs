//! Departments, lecturers and students.
//!
//! These records own no course state of their own. Each keeps the set of
//! courses pointing at it as a back-reference index that is only ever changed
//! through [`crate::domain::reconciliation`] and
//! [`crate::domain::enrollment`], so it always mirrors the course side.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::natural_key::natural_key;
use super::{CourseId, DepartmentId, LecturerId};

/// Validation errors raised by roster value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterValidationError {
    /// Department name was blank.
    EmptyDepartmentName,
    /// Email was blank.
    EmptyEmail,
    /// Email lacked a local part or domain.
    MalformedEmail,
    /// Student id was blank.
    EmptyStudentId,
}

impl fmt::Display for RosterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDepartmentName => write!(f, "department name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must look like local@domain"),
            Self::EmptyStudentId => write!(f, "student id must not be empty"),
        }
    }
}

impl std::error::Error for RosterValidationError {}

fn check_email(value: &str) -> Result<(), RosterValidationError> {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(RosterValidationError::MalformedEmail),
    }
}

natural_key!(
    /// Unique department name.
    DepartmentName, RosterValidationError::EmptyDepartmentName
);

natural_key!(
    /// Unique email address identifying lecturers and callers.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::Email;
    ///
    /// let email = Email::new("Ada@Uni.example").expect("valid email");
    /// assert_eq!(email, Email::new("ada@uni.example").expect("valid email"));
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    Email, RosterValidationError::EmptyEmail, check = check_email
);

natural_key!(
    /// Unique student number, also the student's natural key.
    StudentId, RosterValidationError::EmptyStudentId
);

/// A department owning courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    id: DepartmentId,
    name: DepartmentName,
    courses: BTreeSet<CourseId>,
}

impl Department {
    /// A new department without courses.
    pub fn new(id: DepartmentId, name: DepartmentName) -> Self {
        Self::restore(id, name, BTreeSet::new())
    }

    /// Rebuild a stored department together with its course index.
    pub fn restore(id: DepartmentId, name: DepartmentName, courses: BTreeSet<CourseId>) -> Self {
        Self { id, name, courses }
    }

    /// Surrogate identifier.
    pub fn id(&self) -> DepartmentId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &DepartmentName {
        &self.name
    }

    /// Courses owned by this department.
    pub fn courses(&self) -> &BTreeSet<CourseId> {
        &self.courses
    }

    pub(crate) fn attach_course(&mut self, course: CourseId) {
        self.courses.insert(course);
    }

    pub(crate) fn detach_course(&mut self, course: CourseId) {
        self.courses.remove(&course);
    }
}

/// A lecturer teaching courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    id: LecturerId,
    email: Email,
    courses: BTreeSet<CourseId>,
}

impl Lecturer {
    /// A new lecturer without courses.
    pub fn new(id: LecturerId, email: Email) -> Self {
        Self::restore(id, email, BTreeSet::new())
    }

    /// Rebuild a stored lecturer together with its course index.
    pub fn restore(id: LecturerId, email: Email, courses: BTreeSet<CourseId>) -> Self {
        Self { id, email, courses }
    }

    /// Surrogate identifier.
    pub fn id(&self) -> LecturerId {
        self.id
    }

    /// Unique email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Courses taught by this lecturer.
    pub fn courses(&self) -> &BTreeSet<CourseId> {
        &self.courses
    }

    pub(crate) fn attach_course(&mut self, course: CourseId) {
        self.courses.insert(course);
    }

    pub(crate) fn detach_course(&mut self, course: CourseId) {
        self.courses.remove(&course);
    }
}

/// A student who can enroll in courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    id: StudentId,
    email: Email,
    courses: BTreeSet<CourseId>,
}

impl Student {
    /// A new student without enrollments.
    pub fn new(id: StudentId, email: Email) -> Self {
        Self::restore(id, email, BTreeSet::new())
    }

    /// Rebuild a stored student together with its enrollment index.
    pub fn restore(id: StudentId, email: Email, courses: BTreeSet<CourseId>) -> Self {
        Self { id, email, courses }
    }

    /// Student number.
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    /// Contact email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Courses this student is enrolled in.
    pub fn courses(&self) -> &BTreeSet<CourseId> {
        &self.courses
    }

    pub(crate) fn enroll_in(&mut self, course: CourseId) {
        self.courses.insert(course);
    }

    pub(crate) fn unenroll_from(&mut self, course: CourseId) {
        self.courses.remove(&course);
    }
}
