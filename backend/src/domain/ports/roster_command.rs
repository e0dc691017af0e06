//! Driving port for registering departments, lecturers and students.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DepartmentId, DepartmentName, Email, Error, LecturerId, StudentId};

/// Request to register a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDepartmentRequest {
    pub name: DepartmentName,
}

/// Request to register a lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLecturerRequest {
    pub email: Email,
}

/// Request to register a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentRequest {
    pub student_id: StudentId,
    pub email: Email,
}

/// Response from registering a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDepartmentResponse {
    pub department_id: DepartmentId,
}

/// Response from registering a lecturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLecturerResponse {
    pub lecturer_id: LecturerId,
}

/// Response from registering a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentResponse {
    pub student_id: StudentId,
}

/// Driving port for roster registration.
///
/// Each operation fails with `AlreadyExists` when the natural key is taken.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterCommand: Send + Sync {
    /// Register a department under a unique name.
    async fn register_department(
        &self,
        request: RegisterDepartmentRequest,
    ) -> Result<RegisterDepartmentResponse, Error>;

    /// Register a lecturer under a unique email.
    async fn register_lecturer(
        &self,
        request: RegisterLecturerRequest,
    ) -> Result<RegisterLecturerResponse, Error>;

    /// Register a student under a unique student id.
    async fn register_student(
        &self,
        request: RegisterStudentRequest,
    ) -> Result<RegisterStudentResponse, Error>;
}

/// Fixture command that accepts every registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterCommand;

#[async_trait]
impl RosterCommand for FixtureRosterCommand {
    async fn register_department(
        &self,
        _request: RegisterDepartmentRequest,
    ) -> Result<RegisterDepartmentResponse, Error> {
        Ok(RegisterDepartmentResponse {
            department_id: DepartmentId::random(),
        })
    }

    async fn register_lecturer(
        &self,
        _request: RegisterLecturerRequest,
    ) -> Result<RegisterLecturerResponse, Error> {
        Ok(RegisterLecturerResponse {
            lecturer_id: LecturerId::random(),
        })
    }

    async fn register_student(
        &self,
        request: RegisterStudentRequest,
    ) -> Result<RegisterStudentResponse, Error> {
        Ok(RegisterStudentResponse {
            student_id: request.student_id,
        })
    }
}
