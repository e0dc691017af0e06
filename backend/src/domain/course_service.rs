//! Course aggregate service.
//!
//! Implements the course driving ports on top of the course and roster
//! repositories and the token validator. Every update resolves its
//! references first, reconciles an in-memory copy of the aggregate and
//! persists the outcome as one versioned changeset.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, PageSize, SortDirection};
use tracing::{info, warn};

use crate::domain::ports::{
    CourseChangeset, CourseCommand, CourseQuery, CourseRepository, CourseRepositoryError,
    CreateCourseRequest, CreateCourseResponse, EnrollStudentRequest, EnrollStudentResponse,
    GetCourseRequest, GetCourseResponse, ListCoursesRequest, ListCoursesResponse,
    PageCountResponse, RosterRepository, RosterRepositoryError, TokenValidator,
    UpdateCourseRequest, UpdateCourseResponse,
};
use crate::domain::{
    AccessToken, Caller, Course, CourseCode, CourseId, CourseLinks, Department, DepartmentId,
    DepartmentName, Email, EntityKind, Error, Lecturer, LecturerId, LinkTargets, Role, Student,
    StudentId, enroll, project, reconcile,
};

fn map_course_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        CourseRepositoryError::Query { message } => {
            Error::internal(format!("course repository error: {message}"))
        }
        CourseRepositoryError::DuplicateCourseCode { .. } => {
            Error::already_exists(EntityKind::Course)
        }
        CourseRepositoryError::VersionConflict { expected, actual } => {
            warn!(expected, actual, "course changed concurrently");
            Error::conflict(format!(
                "course was modified concurrently (expected version {expected}, found {actual})"
            ))
        }
        CourseRepositoryError::MissingReference { entity, key } => {
            Error::resource_not_found(entity, "id", key)
        }
    }
}

fn map_roster_error(error: RosterRepositoryError) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster repository unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            Error::internal(format!("roster repository error: {message}"))
        }
        RosterRepositoryError::DuplicateKey { key } => {
            Error::conflict(format!("roster key '{key}' is already taken"))
        }
    }
}

/// Course service implementing [`CourseCommand`] and [`CourseQuery`].
#[derive(Clone)]
pub struct CourseService<C, R, T> {
    courses: Arc<C>,
    roster: Arc<R>,
    tokens: Arc<T>,
    page_size: PageSize,
}

impl<C, R, T> CourseService<C, R, T> {
    /// Create a service over the given collaborators.
    pub fn new(courses: Arc<C>, roster: Arc<R>, tokens: Arc<T>, page_size: PageSize) -> Self {
        Self {
            courses,
            roster,
            tokens,
            page_size,
        }
    }
}

impl<C, R, T> CourseService<C, R, T>
where
    C: CourseRepository,
    R: RosterRepository,
    T: TokenValidator,
{
    async fn caller(&self, token: &AccessToken) -> Result<Caller, Error> {
        self.tokens.resolve(token).await
    }

    async fn course_by_code(&self, code: &CourseCode) -> Result<Course, Error> {
        self.courses
            .find_by_code(code)
            .await
            .map_err(map_course_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Course, "courseCode", code))
    }

    async fn department_by_name(&self, name: &DepartmentName) -> Result<Department, Error> {
        self.roster
            .find_department_by_name(name)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Department, "name", name))
    }

    async fn lecturer_by_email(&self, email: &Email) -> Result<Lecturer, Error> {
        self.roster
            .find_lecturer_by_email(email)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Lecturer, "email", email))
    }

    async fn student_by_id(&self, id: &StudentId) -> Result<Student, Error> {
        self.roster
            .find_student_by_id(id)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Student, "studentId", id))
    }

    async fn department(&self, id: DepartmentId) -> Result<Department, Error> {
        self.roster
            .find_department(id)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Department, "id", id))
    }

    async fn lecturer(&self, id: LecturerId) -> Result<Lecturer, Error> {
        self.roster
            .find_lecturer(id)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::resource_not_found(EntityKind::Lecturer, "id", id))
    }

    /// Load the course's owners and, when asked, its enrolled students.
    async fn links(&self, course: Course, with_students: bool) -> Result<CourseLinks, Error> {
        let department = self.department(course.department_id()).await?;
        let lecturer = self.lecturer(course.lecturer_id()).await?;
        let mut students = BTreeMap::new();
        if with_students {
            for id in course.enrolled_students() {
                let student = self.student_by_id(id).await?;
                students.insert(id.clone(), student);
            }
        }
        Ok(CourseLinks {
            course,
            department,
            lecturer,
            students,
        })
    }

    /// Resolve the target roster, reusing students already enrolled.
    async fn target_students(
        &self,
        current: &BTreeMap<StudentId, Student>,
        ids: Vec<StudentId>,
    ) -> Result<BTreeMap<StudentId, Student>, Error> {
        let mut targets = BTreeMap::new();
        for id in ids {
            if targets.contains_key(&id) {
                continue;
            }
            let student = match current.get(&id) {
                Some(enrolled) => enrolled.clone(),
                None => self.student_by_id(&id).await?,
            };
            targets.insert(id, student);
        }
        Ok(targets)
    }
}

fn ensure_may_edit(caller: &Caller, links: &CourseLinks) -> Result<(), Error> {
    match caller.role() {
        Role::Lecturer if links.lecturer.email() != caller.email() => {
            warn!(
                course_code = %links.course.code(),
                caller = %caller.email(),
                "lecturer denied update of a course they do not teach"
            );
            Err(Error::invalid_credentials())
        }
        Role::Lecturer | Role::Editor | Role::Student => Ok(()),
    }
}

#[async_trait]
impl<C, R, T> CourseCommand for CourseService<C, R, T>
where
    C: CourseRepository,
    R: RosterRepository,
    T: TokenValidator,
{
    async fn create_course(
        &self,
        request: CreateCourseRequest,
    ) -> Result<CreateCourseResponse, Error> {
        let draft = request.draft;
        let lecturer = self.lecturer_by_email(&draft.lecturer_email).await?;
        let department = self.department_by_name(&draft.department_name).await?;
        if self
            .courses
            .find_by_code(&draft.code)
            .await
            .map_err(map_course_error)?
            .is_some()
        {
            return Err(Error::already_exists(EntityKind::Course));
        }

        let course = Course::new(
            CourseId::random(),
            draft.code.clone(),
            draft.details(),
            department.id(),
            lecturer.id(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid course draft: {err}")))?;
        self.courses
            .insert(&course)
            .await
            .map_err(map_course_error)?;

        info!(
            course_code = %course.code(),
            sessions = course.sessions().len(),
            "course created"
        );
        Ok(CreateCourseResponse {
            course_id: course.id(),
            session_count: course.sessions().len(),
        })
    }

    async fn update_course(
        &self,
        request: UpdateCourseRequest,
    ) -> Result<UpdateCourseResponse, Error> {
        let caller = self.caller(&request.token).await?;
        let UpdateCourseRequest {
            draft,
            enrolled_students,
            ..
        } = request;

        let course = self.course_by_code(&draft.code).await?;
        let mut current = self.links(course, true).await?;
        ensure_may_edit(&caller, &current)?;

        let targets = LinkTargets {
            department: self.department_by_name(&draft.department_name).await?,
            lecturer: self.lecturer_by_email(&draft.lecturer_email).await?,
            students: self
                .target_students(&current.students, enrolled_students)
                .await?,
        };

        current
            .course
            .apply_details(draft.details())
            .map_err(|err| Error::invalid_request(format!("invalid course draft: {err}")))?;
        let outcome = reconcile(current, targets);
        let changes = outcome.changes;
        let changeset = CourseChangeset::new(outcome.links.course, changes.clone());
        let version = self
            .courses
            .commit(&changeset)
            .await
            .map_err(map_course_error)?;

        info!(
            course_code = %changeset.course.code(),
            changes = changes.len(),
            version,
            "course updated"
        );
        Ok(UpdateCourseResponse {
            updated: true,
            changes,
        })
    }

    async fn enroll_student(
        &self,
        request: EnrollStudentRequest,
    ) -> Result<EnrollStudentResponse, Error> {
        let mut course = self.course_by_code(&request.course_code).await?;
        let mut student = self.student_by_id(&request.student_id).await?;
        let change = enroll(&mut course, &mut student).inspect_err(|_| {
            warn!(
                course_code = %request.course_code,
                student_id = %request.student_id,
                "duplicate enrollment rejected"
            );
        })?;

        let changeset = CourseChangeset::new(course, vec![change]);
        self.courses
            .commit(&changeset)
            .await
            .map_err(map_course_error)?;

        info!(
            course_code = %changeset.course.code(),
            student_id = %student.id(),
            "student enrolled"
        );
        Ok(EnrollStudentResponse { enrolled: true })
    }
}

#[async_trait]
impl<C, R, T> CourseQuery for CourseService<C, R, T>
where
    C: CourseRepository,
    R: RosterRepository,
    T: TokenValidator,
{
    async fn list_courses(
        &self,
        request: ListCoursesRequest,
    ) -> Result<ListCoursesResponse, Error> {
        let caller = self.caller(&request.token).await?;
        let lecturer = match caller.role() {
            Role::Editor | Role::Student => None,
            Role::Lecturer => Some(self.lecturer_by_email(caller.email()).await?),
        };
        let page = PageRequest::new(
            request.page_number,
            self.page_size,
            SortDirection::from_ascending(request.ascending),
        );
        let courses = self
            .courses
            .list_page(lecturer.as_ref().map(Lecturer::id), page)
            .await
            .map_err(map_course_error)?;

        let mut departments: BTreeMap<DepartmentId, Department> = BTreeMap::new();
        let mut lecturers: BTreeMap<LecturerId, Lecturer> = BTreeMap::new();
        if let Some(own) = lecturer {
            lecturers.insert(own.id(), own);
        }
        let mut views = Vec::with_capacity(courses.len());
        for course in courses {
            let department = match departments.get(&course.department_id()) {
                Some(cached) => cached.clone(),
                None => {
                    let loaded = self.department(course.department_id()).await?;
                    departments.insert(loaded.id(), loaded.clone());
                    loaded
                }
            };
            let lecturer = match lecturers.get(&course.lecturer_id()) {
                Some(cached) => cached.clone(),
                None => {
                    let loaded = self.lecturer(course.lecturer_id()).await?;
                    lecturers.insert(loaded.id(), loaded.clone());
                    loaded
                }
            };
            let links = CourseLinks {
                course,
                department,
                lecturer,
                students: BTreeMap::new(),
            };
            views.push(project(&links, &caller, false)?);
        }
        Ok(ListCoursesResponse { courses: views })
    }

    async fn get_course(&self, request: GetCourseRequest) -> Result<GetCourseResponse, Error> {
        let caller = self.caller(&request.token).await?;
        let course = self.course_by_code(&request.course_code).await?;
        let with_students = request.include_details && caller.role() != Role::Student;
        let links = self.links(course, with_students).await?;
        let view = project(&links, &caller, request.include_details).inspect_err(|_| {
            warn!(
                course_code = %request.course_code,
                caller = %caller.email(),
                "course view denied"
            );
        })?;
        Ok(GetCourseResponse { course: view })
    }

    async fn page_count(&self) -> Result<PageCountResponse, Error> {
        let total = self.courses.count().await.map_err(map_course_error)?;
        Ok(PageCountResponse {
            pages: pagination::page_count(total, self.page_size),
        })
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
