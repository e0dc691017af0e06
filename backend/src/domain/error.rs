//! Domain-level error types.
//!
//! These errors are transport agnostic. Boundary layers map the stable
//! [`ErrorCode`] to status codes or any other protocol-specific envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The caller's role or identity does not authorise the operation.
    InvalidCredentials,
    /// A referenced course, department, lecturer or student does not exist.
    NotFound,
    /// A natural key is already taken by another record.
    AlreadyExists,
    /// The student is already enrolled in the course.
    AlreadyEnrolled,
    /// The aggregate changed underneath the caller.
    Conflict,
    /// A collaborator is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Kinds of entity referenced by not-found and collision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A course aggregate.
    Course,
    /// An owning department.
    Department,
    /// A teaching lecturer.
    Lecturer,
    /// An enrollable student.
    Student,
}

impl EntityKind {
    /// Name used in messages and error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Course => "Course",
            Self::Department => "Department",
            Self::Lecturer => "Lecturer",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use attendance::domain::{EntityKind, Error, ErrorCode};
///
/// let err = Error::resource_not_found(EntityKind::Course, "courseCode", "CS101");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "Course not found with courseCode 'CS101'");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was blank.
    EmptyMessage,
}

impl fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A referenced entity could not be resolved by `field`.
    pub fn resource_not_found(
        entity: EntityKind,
        field: &str,
        value: impl fmt::Display,
    ) -> Self {
        let value = value.to_string();
        Self::new(
            ErrorCode::NotFound,
            format!("{entity} not found with {field} '{value}'"),
        )
        .with_details(json!({
            "entity": entity.as_str(),
            "field": field,
            "value": value,
        }))
    }

    /// A record with the same natural key already exists.
    pub fn already_exists(entity: EntityKind) -> Self {
        Self::new(ErrorCode::AlreadyExists, format!("{entity} already exists"))
            .with_details(json!({ "entity": entity.as_str() }))
    }

    /// The student is already linked to the course.
    pub fn already_enrolled(student_id: impl fmt::Display, course_code: impl fmt::Display) -> Self {
        let student_id = student_id.to_string();
        let course_code = course_code.to_string();
        Self::new(
            ErrorCode::AlreadyEnrolled,
            format!("student '{student_id}' is already enrolled in course '{course_code}'"),
        )
        .with_details(json!({
            "studentId": student_id,
            "courseCode": course_code,
        }))
    }

    /// The caller may not see or change the requested course.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidCredentials,
            "Credentials are invalid. Please try again.",
        )
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
