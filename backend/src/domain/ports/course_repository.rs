//! Port for course aggregate persistence.
//!
//! Updates are written as one [`CourseChangeset`]: the rewritten course plus
//! the ordered link changes to mirror onto departments, lecturers and
//! students. Adapters apply a changeset atomically and reject it when the
//! stored course version no longer matches the version it was loaded at, or
//! when the declared link changes are not exactly those that separate the
//! stored course from the one in the changeset.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Course, CourseCode, EntityKind, LecturerId, LinkChange};

/// Errors raised by course repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseRepositoryError {
    /// Repository connection could not be established.
    #[error("course repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution, including changesets
    /// whose link changes disagree with the course they carry.
    #[error("course repository query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Another course already uses the code.
    #[error("course code '{code}' is already taken")]
    DuplicateCourseCode {
        /// The contested code.
        code: String,
    },
    /// The stored course moved on since it was loaded.
    #[error("course version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// Version the changeset was built from.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },
    /// A linked record is not stored.
    #[error("{entity} '{key}' referenced by the course is not stored")]
    MissingReference {
        /// Kind of the missing record.
        entity: EntityKind,
        /// Natural key or identifier that did not resolve.
        key: String,
    },
}

impl CourseRepositoryError {
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

    /// `code` is taken by another course.
    pub fn duplicate_course_code(code: impl Into<String>) -> Self {
        Self::DuplicateCourseCode { code: code.into() }
    }

    /// The changeset was built from version `expected`; `actual` is stored.
    pub const fn version_conflict(expected: u64, actual: u64) -> Self {
        Self::VersionConflict { expected, actual }
    }

    /// The `entity` identified by `key` is not stored.
    pub fn missing_reference(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::MissingReference {
            entity,
            key: key.into(),
        }
    }
}

/// Atomic update of one course aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseChangeset {
    /// Course as it should be stored.
    pub course: Course,
    /// Version the course had when it was loaded.
    pub expected_version: u64,
    /// Link changes, in the order they were applied.
    pub changes: Vec<LinkChange>,
}

impl CourseChangeset {
    /// Build a changeset expecting the course's current version.
    pub fn new(course: Course, changes: Vec<LinkChange>) -> Self {
        let expected_version = course.version();
        Self {
            course,
            expected_version,
            changes,
        }
    }
}

/// Port for reading and writing course aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find a course by its code, ignoring case.
    async fn find_by_code(&self, code: &CourseCode)
    -> Result<Option<Course>, CourseRepositoryError>;

    /// Read one page of courses sorted by code.
    ///
    /// When `lecturer` is set only that lecturer's courses are considered.
    async fn list_page(
        &self,
        lecturer: Option<LecturerId>,
        page: PageRequest,
    ) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Count every stored course.
    async fn count(&self) -> Result<u64, CourseRepositoryError>;

    /// Store a new course with its sessions and owner back-references.
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Apply a changeset atomically and return the new course version.
    ///
    /// Fails with [`CourseRepositoryError::Query`] and applies nothing when
    /// `changeset.changes` does not match the stored course's links moved
    /// onto `changeset.course`.
    async fn commit(&self, changeset: &CourseChangeset) -> Result<u64, CourseRepositoryError>;
}

/// Fixture implementation for tests that do not exercise course storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCourseRepository;

#[async_trait]
impl CourseRepository for FixtureCourseRepository {
    async fn find_by_code(
        &self,
        _code: &CourseCode,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        Ok(None)
    }

    async fn list_page(
        &self,
        _lecturer: Option<LecturerId>,
        _page: PageRequest,
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        Ok(0)
    }

    async fn insert(&self, _course: &Course) -> Result<(), CourseRepositoryError> {
        Ok(())
    }

    async fn commit(&self, changeset: &CourseChangeset) -> Result<u64, CourseRepositoryError> {
        Ok(changeset.expected_version + 1)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use pagination::{PageSize, SortDirection};
    use rstest::rstest;

    use super::*;

    fn first_page() -> PageRequest {
        PageRequest::new(
            0,
            PageSize::new(10).expect("non-zero size"),
            SortDirection::Ascending,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_are_empty() {
        let repo = FixtureCourseRepository;
        let code = CourseCode::new("CS101").expect("valid code");

        assert!(repo.find_by_code(&code).await.expect("lookup").is_none());
        assert!(
            repo.list_page(None, first_page())
                .await
                .expect("list")
                .is_empty()
        );
        assert_eq!(repo.count().await.expect("count"), 0);
    }

    #[rstest]
    fn version_conflict_formats_both_versions() {
        let err = CourseRepositoryError::version_conflict(2_u64, 5_u64);
        assert_eq!(
            err.to_string(),
            "course version conflict: expected 2, found 5"
        );
    }

    #[rstest]
    fn missing_reference_names_the_entity() {
        let err = CourseRepositoryError::missing_reference(EntityKind::Student, "s-9");
        assert_eq!(
            err.to_string(),
            "Student 's-9' referenced by the course is not stored"
        );
    }
}
