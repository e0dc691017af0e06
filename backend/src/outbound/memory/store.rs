//! In-memory implementation of the course and roster repositories.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{
    CourseChangeset, CourseRepository, CourseRepositoryError, RosterRepository,
    RosterRepositoryError,
};
use crate::domain::{
    Course, CourseCode, Department, DepartmentId, DepartmentName, Email, Lecturer, LecturerId,
    Student, StudentId,
};

use super::state::StoreState;

/// Academic records held in process memory.
///
/// All reads and writes go through one lock, so each changeset commit is
/// atomic and serialised with every other write. Clones share the same
/// state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAcademicStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryAcademicStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryAcademicStore {
    async fn find_by_code(
        &self,
        code: &CourseCode,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        Ok(self.state.lock().await.course_by_code(code))
    }

    async fn list_page(
        &self,
        lecturer: Option<LecturerId>,
        page: PageRequest,
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        Ok(self.state.lock().await.course_page(lecturer, page))
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        Ok(self.state.lock().await.course_count())
    }

    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let result = self.state.lock().await.insert_course(course);
        match &result {
            Ok(()) => debug!(course_code = %course.code(), "course inserted"),
            Err(err) => debug!(course_code = %course.code(), %err, "course insert rejected"),
        }
        result
    }

    async fn commit(&self, changeset: &CourseChangeset) -> Result<u64, CourseRepositoryError> {
        let result = self.state.lock().await.commit(changeset);
        match &result {
            Ok(version) => debug!(
                course_code = %changeset.course.code(),
                changes = changeset.changes.len(),
                version,
                "course changeset committed"
            ),
            Err(err) => debug!(
                course_code = %changeset.course.code(),
                %err,
                "course changeset rejected"
            ),
        }
        result
    }
}

#[async_trait]
impl RosterRepository for InMemoryAcademicStore {
    async fn find_department_by_name(
        &self,
        name: &DepartmentName,
    ) -> Result<Option<Department>, RosterRepositoryError> {
        Ok(self.state.lock().await.department_by_name(name))
    }

    async fn find_lecturer_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Lecturer>, RosterRepositoryError> {
        Ok(self.state.lock().await.lecturer_by_email(email))
    }

    async fn find_student_by_id(
        &self,
        id: &StudentId,
    ) -> Result<Option<Student>, RosterRepositoryError> {
        Ok(self.state.lock().await.student(id))
    }

    async fn find_department(
        &self,
        id: DepartmentId,
    ) -> Result<Option<Department>, RosterRepositoryError> {
        Ok(self.state.lock().await.department(id))
    }

    async fn find_lecturer(
        &self,
        id: LecturerId,
    ) -> Result<Option<Lecturer>, RosterRepositoryError> {
        Ok(self.state.lock().await.lecturer(id))
    }

    async fn insert_department(
        &self,
        department: &Department,
    ) -> Result<(), RosterRepositoryError> {
        self.state.lock().await.insert_department(department)
    }

    async fn insert_lecturer(&self, lecturer: &Lecturer) -> Result<(), RosterRepositoryError> {
        self.state.lock().await.insert_lecturer(lecturer)
    }

    async fn insert_student(&self, student: &Student) -> Result<(), RosterRepositoryError> {
        self.state.lock().await.insert_student(student)
    }
}
