//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`CourseCommand`, `CourseQuery`, `RosterCommand`) are what
//! inbound adapters call. Driven ports (`CourseRepository`,
//! `RosterRepository`, `TokenValidator`) are what the services call.

mod course_command;
mod course_query;
mod course_repository;
mod roster_command;
mod roster_repository;
mod token_validator;

#[cfg(test)]
pub use course_command::MockCourseCommand;
pub use course_command::{
    CourseCommand, CourseDraft, CreateCourseRequest, CreateCourseResponse, EnrollStudentRequest,
    EnrollStudentResponse, FixtureCourseCommand, UpdateCourseRequest, UpdateCourseResponse,
};
#[cfg(test)]
pub use course_query::MockCourseQuery;
pub use course_query::{
    CourseQuery, FixtureCourseQuery, GetCourseRequest, GetCourseResponse, ListCoursesRequest,
    ListCoursesResponse, PageCountResponse,
};
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{
    CourseChangeset, CourseRepository, CourseRepositoryError, FixtureCourseRepository,
};
#[cfg(test)]
pub use roster_command::MockRosterCommand;
pub use roster_command::{
    FixtureRosterCommand, RegisterDepartmentRequest, RegisterDepartmentResponse,
    RegisterLecturerRequest, RegisterLecturerResponse, RegisterStudentRequest,
    RegisterStudentResponse, RosterCommand,
};
#[cfg(test)]
pub use roster_repository::MockRosterRepository;
pub use roster_repository::{FixtureRosterRepository, RosterRepository, RosterRepositoryError};
#[cfg(test)]
pub use token_validator::MockTokenValidator;
pub use token_validator::{FixtureTokenValidator, TokenValidator};
