//! Driving port for course mutations.
//!
//! Inbound adapters call this port to create courses, reconcile a course
//! against an edited draft and enroll students, without knowing which
//! storage backs the aggregate.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccessToken, Course, CourseCode, CourseDetails, CourseId, DepartmentId, DepartmentName, Email,
    Error, LecturerId, LinkChange, StudentId,
};

/// Editable course fields plus the natural keys of its owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub code: CourseCode,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub department_name: DepartmentName,
    pub lecturer_email: Email,
}

impl CourseDraft {
    /// Name and date range as course details.
    pub fn details(&self) -> CourseDetails {
        CourseDetails {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Request to create a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub draft: CourseDraft,
}

/// Response from creating a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseResponse {
    pub course_id: CourseId,
    pub session_count: usize,
}

/// Request to reconcile an existing course with an edited draft.
///
/// The course is located by `draft.code`; `enrolled_students` is the full
/// target roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCourseRequest {
    pub draft: CourseDraft,
    pub enrolled_students: Vec<StudentId>,
    pub token: AccessToken,
}

/// Response from updating a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseResponse {
    pub updated: bool,
    pub changes: Vec<LinkChange>,
}

/// Request to enroll one student in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollStudentRequest {
    pub course_code: CourseCode,
    pub student_id: StudentId,
}

/// Response from enrolling a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollStudentResponse {
    pub enrolled: bool,
}

/// Driving port for course write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCommand: Send + Sync {
    /// Create a course, generate its weekly sessions and link it to its
    /// department and lecturer.
    ///
    /// Fails with `NotFound` when the lecturer email or department name does
    /// not resolve and with `AlreadyExists` when the code is taken.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use chrono::NaiveDate;
    /// # use attendance::domain::{CourseCode, DepartmentName, Email};
    /// # use attendance::domain::ports::{
    /// #     CourseCommand, CourseDraft, CreateCourseRequest, FixtureCourseCommand,
    /// # };
    /// # async fn example() -> Result<(), attendance::domain::Error> {
    /// let command = FixtureCourseCommand;
    /// let response = command
    ///     .create_course(CreateCourseRequest {
    ///         draft: CourseDraft {
    ///             code: CourseCode::new("CS101").expect("code"),
    ///             name: "Algorithms".to_owned(),
    ///             start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
    ///             end_date: NaiveDate::from_ymd_opt(2024, 1, 22).expect("date"),
    ///             department_name: DepartmentName::new("Computer Science").expect("name"),
    ///             lecturer_email: Email::new("turing@uni.example").expect("email"),
    ///         },
    ///     })
    ///     .await?;
    /// assert_eq!(response.session_count, 3);
    /// # Ok(())
    /// # }
    /// ```
    async fn create_course(
        &self,
        request: CreateCourseRequest,
    ) -> Result<CreateCourseResponse, Error>;

    /// Reconcile a course with the draft's details, owners and roster.
    ///
    /// Lecturers may only update their own courses. Every reference is
    /// resolved before anything changes and the result is committed
    /// atomically.
    async fn update_course(
        &self,
        request: UpdateCourseRequest,
    ) -> Result<UpdateCourseResponse, Error>;

    /// Enroll a student, failing with `AlreadyEnrolled` on duplicates.
    async fn enroll_student(
        &self,
        request: EnrollStudentRequest,
    ) -> Result<EnrollStudentResponse, Error>;
}

/// Fixture command that validates drafts without storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCourseCommand;

#[async_trait]
impl CourseCommand for FixtureCourseCommand {
    async fn create_course(
        &self,
        request: CreateCourseRequest,
    ) -> Result<CreateCourseResponse, Error> {
        let draft = request.draft;
        let course = Course::new(
            CourseId::random(),
            draft.code.clone(),
            draft.details(),
            DepartmentId::random(),
            LecturerId::random(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid course draft: {err}")))?;
        Ok(CreateCourseResponse {
            course_id: course.id(),
            session_count: course.sessions().len(),
        })
    }

    async fn update_course(
        &self,
        _request: UpdateCourseRequest,
    ) -> Result<UpdateCourseResponse, Error> {
        Ok(UpdateCourseResponse {
            updated: true,
            changes: Vec::new(),
        })
    }

    async fn enroll_student(
        &self,
        _request: EnrollStudentRequest,
    ) -> Result<EnrollStudentResponse, Error> {
        Ok(EnrollStudentResponse { enrolled: true })
    }
}
