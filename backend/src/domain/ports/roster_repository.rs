//! Port for department, lecturer and student records.

use async_trait::async_trait;

use crate::domain::{
    Department, DepartmentId, DepartmentName, Email, Lecturer, LecturerId, Student, StudentId,
};

/// Errors raised by roster repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterRepositoryError {
    /// Repository connection could not be established.
    #[error("roster repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("roster repository query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
    /// A record with the same natural key is already stored.
    #[error("roster key '{key}' is already taken")]
    DuplicateKey {
        /// The contested natural key.
        key: String,
    },
}

impl RosterRepositoryError {
    /// The store could not be reached.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// The store rejected or failed the operation.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// `key` already names a stored department, lecturer or student.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }
}

/// Port for roster lookups and registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Find a department by name, ignoring case.
    async fn find_department_by_name(
        &self,
        name: &DepartmentName,
    ) -> Result<Option<Department>, RosterRepositoryError>;

    /// Find a lecturer by email, ignoring case.
    async fn find_lecturer_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Lecturer>, RosterRepositoryError>;

    /// Find a student by student id, ignoring case.
    async fn find_student_by_id(
        &self,
        id: &StudentId,
    ) -> Result<Option<Student>, RosterRepositoryError>;

    /// Find a department by surrogate id.
    async fn find_department(
        &self,
        id: DepartmentId,
    ) -> Result<Option<Department>, RosterRepositoryError>;

    /// Find a lecturer by surrogate id.
    async fn find_lecturer(&self, id: LecturerId)
    -> Result<Option<Lecturer>, RosterRepositoryError>;

    /// Store a new department.
    async fn insert_department(&self, department: &Department)
    -> Result<(), RosterRepositoryError>;

    /// Store a new lecturer.
    async fn insert_lecturer(&self, lecturer: &Lecturer) -> Result<(), RosterRepositoryError>;

    /// Store a new student.
    async fn insert_student(&self, student: &Student) -> Result<(), RosterRepositoryError>;
}

/// Fixture implementation for tests that do not exercise roster storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterRepository;

#[async_trait]
impl RosterRepository for FixtureRosterRepository {
    async fn find_department_by_name(
        &self,
        _name: &DepartmentName,
    ) -> Result<Option<Department>, RosterRepositoryError> {
        Ok(None)
    }

    async fn find_lecturer_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<Lecturer>, RosterRepositoryError> {
        Ok(None)
    }

    async fn find_student_by_id(
        &self,
        _id: &StudentId,
    ) -> Result<Option<Student>, RosterRepositoryError> {
        Ok(None)
    }

    async fn find_department(
        &self,
        _id: DepartmentId,
    ) -> Result<Option<Department>, RosterRepositoryError> {
        Ok(None)
    }

    async fn find_lecturer(
        &self,
        _id: LecturerId,
    ) -> Result<Option<Lecturer>, RosterRepositoryError> {
        Ok(None)
    }

    async fn insert_department(
        &self,
        _department: &Department,
    ) -> Result<(), RosterRepositoryError> {
        Ok(())
    }

    async fn insert_lecturer(&self, _lecturer: &Lecturer) -> Result<(), RosterRepositoryError> {
        Ok(())
    }

    async fn insert_student(&self, _student: &Student) -> Result<(), RosterRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let repo = FixtureRosterRepository;
        let email = Email::new("ada@uni.example").expect("valid email");

        assert!(
            repo.find_lecturer_by_email(&email)
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            repo.find_department(DepartmentId::random())
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[rstest]
    #[case(
        RosterRepositoryError::connection("refused"),
        "roster repository connection failed: refused"
    )]
    #[case(
        RosterRepositoryError::query(String::from("timeout")),
        "roster repository query failed: timeout"
    )]
    fn constructors_accept_borrowed_and_owned_messages(
        #[case] err: RosterRepositoryError,
        #[case] expected: &str,
    ) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn duplicate_key_formats_message() {
        let err = RosterRepositoryError::duplicate_key("ada@uni.example");
        assert!(err.to_string().contains("ada@uni.example"));
    }
}
