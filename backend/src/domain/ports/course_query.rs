//! Driving port for course reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, CourseCode, CourseView, Error};

/// Request for one page of courses visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCoursesRequest {
    /// Zero-based page number.
    pub page_number: u32,
    /// Sort by course code ascending when true, descending otherwise.
    pub ascending: bool,
    pub token: AccessToken,
}

/// One page of minimal course views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    pub courses: Vec<CourseView>,
}

/// Request for a single course by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCourseRequest {
    pub course_code: CourseCode,
    pub include_details: bool,
    pub token: AccessToken,
}

/// Role-scoped view of a single course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCourseResponse {
    pub course: CourseView,
}

/// Number of course pages at the configured page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCountResponse {
    pub pages: u64,
}

/// Driving port for course read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// List a page of courses sorted by code.
    ///
    /// Editors and students page through every course; lecturers page
    /// through their own.
    async fn list_courses(&self, request: ListCoursesRequest)
    -> Result<ListCoursesResponse, Error>;

    /// Fetch one course projected for the caller's role.
    async fn get_course(&self, request: GetCourseRequest) -> Result<GetCourseResponse, Error>;

    /// Count pages of courses.
    async fn page_count(&self) -> Result<PageCountResponse, Error>;
}

/// Fixture query reporting an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCourseQuery;

#[async_trait]
impl CourseQuery for FixtureCourseQuery {
    async fn list_courses(
        &self,
        _request: ListCoursesRequest,
    ) -> Result<ListCoursesResponse, Error> {
        Ok(ListCoursesResponse {
            courses: Vec::new(),
        })
    }

    async fn get_course(&self, request: GetCourseRequest) -> Result<GetCourseResponse, Error> {
        Err(Error::resource_not_found(
            crate::domain::EntityKind::Course,
            "courseCode",
            request.course_code,
        ))
    }

    async fn page_count(&self) -> Result<PageCountResponse, Error> {
        Ok(PageCountResponse { pages: 0 })
    }
}
