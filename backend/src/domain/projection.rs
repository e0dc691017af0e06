//! Role-scoped views of a course.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Caller, CourseLinks, Error, Role, SessionId};

/// A generated session as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session identifier.
    pub session_id: SessionId,
    /// Date of the session.
    pub session_date: NaiveDate,
}

/// An enrolled student as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudentView {
    /// Student number.
    pub student_id: String,
    /// Contact email.
    pub email: String,
}

/// Outward-facing course payload.
///
/// Minimal views carry only the code, name and department name. Detailed
/// views add the lecturer, the date range, the session calendar and the
/// roster, except that students never receive the calendar or roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    /// Unique course code.
    pub course_code: String,
    /// Display name.
    pub course_name: String,
    /// Owning department's name.
    pub department_name: String,
    /// Assigned lecturer, in detailed views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lecturer_email: Option<String>,
    /// First day of teaching, in detailed views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End of the date range, in detailed views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Session calendar, in detailed non-student views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_sessions: Option<Vec<SessionView>>,
    /// Enrolled students, in detailed non-student views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_students: Option<Vec<EnrolledStudentView>>,
}

impl CourseView {
    fn minimal(links: &CourseLinks) -> Self {
        Self {
            course_code: links.course.code().to_string(),
            course_name: links.course.name().to_owned(),
            department_name: links.department.name().to_string(),
            lecturer_email: None,
            start_date: None,
            end_date: None,
            course_sessions: None,
            enrolled_students: None,
        }
    }

    fn detailed(links: &CourseLinks) -> Self {
        let course = &links.course;
        Self {
            lecturer_email: Some(links.lecturer.email().to_string()),
            start_date: Some(course.start_date()),
            end_date: Some(course.end_date()),
            course_sessions: Some(
                course
                    .sessions()
                    .iter()
                    .map(|session| SessionView {
                        session_id: session.id(),
                        session_date: session.date(),
                    })
                    .collect(),
            ),
            enrolled_students: Some(
                links
                    .students
                    .values()
                    .map(|student| EnrolledStudentView {
                        student_id: student.id().to_string(),
                        email: student.email().to_string(),
                    })
                    .collect(),
            ),
            ..Self::minimal(links)
        }
    }

    fn without_rosters(self) -> Self {
        Self {
            course_sessions: None,
            enrolled_students: None,
            ..self
        }
    }
}

/// Shape `links` into the view `caller` is entitled to.
///
/// - Students always receive a view without sessions or enrolled students.
/// - Lecturers see only courses assigned to them (matched by email) and fail
///   with [`crate::domain::ErrorCode::InvalidCredentials`] otherwise.
/// - Editors receive whatever `include_details` asks for.
///
/// `include_details == false` yields the minimal view for every role.
pub fn project(links: &CourseLinks, caller: &Caller, include_details: bool) -> Result<CourseView, Error> {
    let view = if include_details {
        CourseView::detailed(links)
    } else {
        CourseView::minimal(links)
    };
    match caller.role() {
        Role::Student => Ok(view.without_rosters()),
        Role::Lecturer if links.lecturer.email() == caller.email() => Ok(view),
        Role::Lecturer => Err(Error::invalid_credentials()),
        Role::Editor => Ok(view),
    }
}
