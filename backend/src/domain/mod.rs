//! Domain primitives, aggregates and services.
//!
//! Purpose: model courses, their weekly sessions and their links to
//! departments, lecturers and students, and orchestrate the course use-cases
//! over the ports in [`ports`]. Nothing here knows which storage or transport
//! backs it.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Course (alias to `courses::Course`): the course aggregate root.
//! - reconcile / enroll / project: the link and view engines.
//! - CourseService / RosterService: driving port implementations.

pub mod courses;
pub mod error;
pub mod ports;

mod caller;
mod course_service;
mod enrollment;
mod ids;
mod natural_key;
mod projection;
mod reconciliation;
mod roster;
mod roster_service;

pub use self::caller::{AccessToken, Caller, EmptyAccessToken, ParseRoleError, Role};
pub use self::course_service::CourseService;
pub use self::courses::{
    Course, CourseCode, CourseDetails, CourseValidationError, Session, SessionDraft,
    WeeklySchedule, generate_sessions,
};
pub use self::enrollment::enroll;
pub use self::error::{EntityKind, Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CourseId, DepartmentId, LecturerId, SessionId};
pub use self::projection::{CourseView, EnrolledStudentView, SessionView, project};
pub use self::reconciliation::{CourseLinks, LinkChange, LinkTargets, Reconciled, reconcile};
pub use self::roster::{
    Department, DepartmentName, Email, Lecturer, RosterValidationError, Student, StudentId,
};
pub use self::roster_service::RosterService;
