//! Roster registration service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    RegisterDepartmentRequest, RegisterDepartmentResponse, RegisterLecturerRequest,
    RegisterLecturerResponse, RegisterStudentRequest, RegisterStudentResponse, RosterCommand,
    RosterRepository, RosterRepositoryError,
};
use crate::domain::{Department, DepartmentId, EntityKind, Error, Lecturer, LecturerId, Student};

fn map_repository_error(error: RosterRepositoryError, entity: EntityKind) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster repository unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            Error::internal(format!("roster repository error: {message}"))
        }
        RosterRepositoryError::DuplicateKey { .. } => Error::already_exists(entity),
    }
}

/// Roster service implementing [`RosterCommand`].
#[derive(Clone)]
pub struct RosterService<R> {
    roster: Arc<R>,
}

impl<R> RosterService<R> {
    /// Create a new service with the roster repository.
    pub fn new(roster: Arc<R>) -> Self {
        Self { roster }
    }
}

#[async_trait]
impl<R> RosterCommand for RosterService<R>
where
    R: RosterRepository,
{
    async fn register_department(
        &self,
        request: RegisterDepartmentRequest,
    ) -> Result<RegisterDepartmentResponse, Error> {
        let entity = EntityKind::Department;
        let existing = self
            .roster
            .find_department_by_name(&request.name)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        if existing.is_some() {
            return Err(Error::already_exists(entity));
        }

        let department = Department::new(DepartmentId::random(), request.name);
        self.roster
            .insert_department(&department)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        info!(name = %department.name(), "department registered");
        Ok(RegisterDepartmentResponse {
            department_id: department.id(),
        })
    }

    async fn register_lecturer(
        &self,
        request: RegisterLecturerRequest,
    ) -> Result<RegisterLecturerResponse, Error> {
        let entity = EntityKind::Lecturer;
        let existing = self
            .roster
            .find_lecturer_by_email(&request.email)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        if existing.is_some() {
            return Err(Error::already_exists(entity));
        }

        let lecturer = Lecturer::new(LecturerId::random(), request.email);
        self.roster
            .insert_lecturer(&lecturer)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        info!(email = %lecturer.email(), "lecturer registered");
        Ok(RegisterLecturerResponse {
            lecturer_id: lecturer.id(),
        })
    }

    async fn register_student(
        &self,
        request: RegisterStudentRequest,
    ) -> Result<RegisterStudentResponse, Error> {
        let entity = EntityKind::Student;
        let existing = self
            .roster
            .find_student_by_id(&request.student_id)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        if existing.is_some() {
            return Err(Error::already_exists(entity));
        }

        let student = Student::new(request.student_id, request.email);
        self.roster
            .insert_student(&student)
            .await
            .map_err(|err| map_repository_error(err, entity))?;
        info!(student_id = %student.id(), "student registered");
        Ok(RegisterStudentResponse {
            student_id: student.id().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockRosterRepository;
    use crate::domain::{DepartmentName, Email, ErrorCode, StudentId};

    #[rstest]
    #[tokio::test]
    async fn register_department_inserts_new_names() {
        let mut repo = MockRosterRepository::new();
        repo.expect_find_department_by_name()
            .return_once(|_| Ok(None));
        repo.expect_insert_department()
            .withf(|department| department.name().as_ref() == "Physics")
            .times(1)
            .return_once(|_| Ok(()));

        RosterService::new(Arc::new(repo))
            .register_department(RegisterDepartmentRequest {
                name: DepartmentName::new("Physics").expect("valid name"),
            })
            .await
            .expect("registration succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn register_lecturer_rejects_taken_email() {
        let mut repo = MockRosterRepository::new();
        repo.expect_find_lecturer_by_email().return_once(|email| {
            Ok(Some(Lecturer::new(LecturerId::random(), email.clone())))
        });
        repo.expect_insert_lecturer().times(0);

        let error = RosterService::new(Arc::new(repo))
            .register_lecturer(RegisterLecturerRequest {
                email: Email::new("turing@uni.example").expect("valid email"),
            })
            .await
            .expect_err("duplicate email");

        assert_eq!(error.code(), ErrorCode::AlreadyExists);
        assert_eq!(error.message(), "Lecturer already exists");
    }

    #[rstest]
    #[tokio::test]
    async fn insert_collisions_surface_as_already_exists() {
        let mut repo = MockRosterRepository::new();
        repo.expect_find_student_by_id().return_once(|_| Ok(None));
        repo.expect_insert_student()
            .return_once(|_| Err(RosterRepositoryError::duplicate_key("s-1")));

        let error = RosterService::new(Arc::new(repo))
            .register_student(RegisterStudentRequest {
                student_id: StudentId::new("s-1").expect("valid id"),
                email: Email::new("s1@uni.example").expect("valid email"),
            })
            .await
            .expect_err("raced insert");

        assert_eq!(error.code(), ErrorCode::AlreadyExists);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_become_service_unavailable() {
        let mut repo = MockRosterRepository::new();
        repo.expect_find_department_by_name()
            .return_once(|_| Err(RosterRepositoryError::connection("offline")));

        let error = RosterService::new(Arc::new(repo))
            .register_department(RegisterDepartmentRequest {
                name: DepartmentName::new("Physics").expect("valid name"),
            })
            .await
            .expect_err("offline");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
