//! Arena and relationship indexes behind the in-memory academic store.
//!
//! Records are stored once by identifier. Department, lecturer and student
//! course sets are kept as separate index maps and folded back into the
//! domain entities on read. Every write validates all of its references
//! before touching any map, so a rejected write leaves the state unchanged.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use pagination::PageRequest;

use crate::domain::ports::{CourseChangeset, CourseRepositoryError, RosterRepositoryError};
use crate::domain::{
    Course, CourseCode, CourseId, Department, DepartmentId, DepartmentName, Email, EntityKind,
    Lecturer, LecturerId, LinkChange, Student, StudentId,
};

#[derive(Debug, Default)]
pub(super) struct StoreState {
    courses: HashMap<CourseId, Course>,
    departments: HashMap<DepartmentId, DepartmentName>,
    lecturers: HashMap<LecturerId, Email>,
    students: HashMap<StudentId, Email>,
    course_codes: BTreeMap<CourseCode, CourseId>,
    department_names: HashMap<DepartmentName, DepartmentId>,
    lecturer_emails: HashMap<Email, LecturerId>,
    department_courses: HashMap<DepartmentId, BTreeSet<CourseId>>,
    lecturer_courses: HashMap<LecturerId, BTreeSet<CourseId>>,
    student_courses: HashMap<StudentId, BTreeSet<CourseId>>,
}

fn courses_of<K>(index: &HashMap<K, BTreeSet<CourseId>>, key: &K) -> BTreeSet<CourseId>
where
    K: std::hash::Hash + Eq,
{
    index.get(key).cloned().unwrap_or_default()
}

impl StoreState {
    pub(super) fn course_by_code(&self, code: &CourseCode) -> Option<Course> {
        self.course_codes
            .get(code)
            .and_then(|id| self.courses.get(id))
            .cloned()
    }

    pub(super) fn course_page(
        &self,
        lecturer: Option<LecturerId>,
        page: PageRequest,
    ) -> Vec<Course> {
        let mut matching: Vec<&Course> = match lecturer {
            Some(id) => self
                .lecturer_courses
                .get(&id)
                .into_iter()
                .flatten()
                .filter_map(|course| self.courses.get(course))
                .collect(),
            None => self.courses.values().collect(),
        };
        matching.sort_by(|a, b| page.direction().apply(a.code().cmp(b.code())));
        page.slice(&matching)
            .iter()
            .map(|course| (*course).clone())
            .collect()
    }

    pub(super) fn course_count(&self) -> u64 {
        self.courses.len() as u64
    }

    pub(super) fn department(&self, id: DepartmentId) -> Option<Department> {
        let name = self.departments.get(&id)?;
        Some(Department::restore(
            id,
            name.clone(),
            courses_of(&self.department_courses, &id),
        ))
    }

    pub(super) fn department_by_name(&self, name: &DepartmentName) -> Option<Department> {
        self.department_names
            .get(name)
            .and_then(|id| self.department(*id))
    }

    pub(super) fn lecturer(&self, id: LecturerId) -> Option<Lecturer> {
        let email = self.lecturers.get(&id)?;
        Some(Lecturer::restore(
            id,
            email.clone(),
            courses_of(&self.lecturer_courses, &id),
        ))
    }

    pub(super) fn lecturer_by_email(&self, email: &Email) -> Option<Lecturer> {
        self.lecturer_emails
            .get(email)
            .and_then(|id| self.lecturer(*id))
    }

    pub(super) fn student(&self, id: &StudentId) -> Option<Student> {
        let (stored_id, email) = self.students.get_key_value(id)?;
        Some(Student::restore(
            stored_id.clone(),
            email.clone(),
            courses_of(&self.student_courses, stored_id),
        ))
    }

    pub(super) fn insert_department(
        &mut self,
        department: &Department,
    ) -> Result<(), RosterRepositoryError> {
        if self.department_names.contains_key(department.name())
            || self.departments.contains_key(&department.id())
        {
            return Err(RosterRepositoryError::duplicate_key(
                department.name().to_string(),
            ));
        }
        self.departments
            .insert(department.id(), department.name().clone());
        self.department_names
            .insert(department.name().clone(), department.id());
        Ok(())
    }

    pub(super) fn insert_lecturer(&mut self, lecturer: &Lecturer) -> Result<(), RosterRepositoryError> {
        if self.lecturer_emails.contains_key(lecturer.email())
            || self.lecturers.contains_key(&lecturer.id())
        {
            return Err(RosterRepositoryError::duplicate_key(
                lecturer.email().to_string(),
            ));
        }
        self.lecturers.insert(lecturer.id(), lecturer.email().clone());
        self.lecturer_emails
            .insert(lecturer.email().clone(), lecturer.id());
        Ok(())
    }

    pub(super) fn insert_student(&mut self, student: &Student) -> Result<(), RosterRepositoryError> {
        if self.students.contains_key(student.id()) {
            return Err(RosterRepositoryError::duplicate_key(student.id().to_string()));
        }
        self.students
            .insert(student.id().clone(), student.email().clone());
        Ok(())
    }

    fn require_department(&self, id: DepartmentId) -> Result<(), CourseRepositoryError> {
        if self.departments.contains_key(&id) {
            Ok(())
        } else {
            Err(CourseRepositoryError::missing_reference(
                EntityKind::Department,
                id.to_string(),
            ))
        }
    }

    fn require_lecturer(&self, id: LecturerId) -> Result<(), CourseRepositoryError> {
        if self.lecturers.contains_key(&id) {
            Ok(())
        } else {
            Err(CourseRepositoryError::missing_reference(
                EntityKind::Lecturer,
                id.to_string(),
            ))
        }
    }

    fn require_student(&self, id: &StudentId) -> Result<(), CourseRepositoryError> {
        if self.students.contains_key(id) {
            Ok(())
        } else {
            Err(CourseRepositoryError::missing_reference(
                EntityKind::Student,
                id.to_string(),
            ))
        }
    }

    pub(super) fn insert_course(&mut self, course: &Course) -> Result<(), CourseRepositoryError> {
        if self.course_codes.contains_key(course.code()) || self.courses.contains_key(&course.id())
        {
            return Err(CourseRepositoryError::duplicate_course_code(
                course.code().to_string(),
            ));
        }
        self.require_department(course.department_id())?;
        self.require_lecturer(course.lecturer_id())?;
        for student in course.enrolled_students() {
            self.require_student(student)?;
        }

        let id = course.id();
        self.department_courses
            .entry(course.department_id())
            .or_default()
            .insert(id);
        self.lecturer_courses
            .entry(course.lecturer_id())
            .or_default()
            .insert(id);
        for student in course.enrolled_students() {
            self.student_courses
                .entry(student.clone())
                .or_default()
                .insert(id);
        }
        self.course_codes.insert(course.code().clone(), id);
        self.courses.insert(id, course.clone());
        Ok(())
    }

    /// Validate `changeset` against the stored course and return the link
    /// changes it implies.
    ///
    /// The declared `changes` must be exactly the difference between the
    /// stored course and `changeset.course`, in any order. Anything else
    /// would leave a link on one side only.
    fn validate(&self, changeset: &CourseChangeset) -> Result<Vec<LinkChange>, CourseRepositoryError> {
        let course = &changeset.course;
        let stored = self.courses.get(&course.id()).ok_or_else(|| {
            CourseRepositoryError::missing_reference(EntityKind::Course, course.id().to_string())
        })?;
        if stored.version() != changeset.expected_version {
            return Err(CourseRepositoryError::version_conflict(
                changeset.expected_version,
                stored.version(),
            ));
        }
        if stored.code() != course.code() {
            return Err(CourseRepositoryError::query(format!(
                "course code cannot change from '{}' to '{}'",
                stored.code(),
                course.code()
            )));
        }
        let implied = link_diff(stored, course);
        let declared = &changeset.changes;
        if declared.len() != implied.len() || !implied.iter().all(|c| declared.contains(c)) {
            return Err(CourseRepositoryError::query(format!(
                "changeset for course '{}' declares {} link changes but the course implies {}",
                course.code(),
                declared.len(),
                implied.len()
            )));
        }
        self.require_department(course.department_id())?;
        self.require_lecturer(course.lecturer_id())?;
        for change in &implied {
            if let LinkChange::Unenroll { student } | LinkChange::Enroll { student } = change {
                self.require_student(student)?;
            }
        }
        Ok(implied)
    }

    /// Apply `changeset` in full or not at all, returning the new version.
    pub(super) fn commit(&mut self, changeset: &CourseChangeset) -> Result<u64, CourseRepositoryError> {
        let changes = self.validate(changeset)?;

        let id = changeset.course.id();
        for change in changes {
            match change {
                LinkChange::MoveDepartment { from, to } => {
                    if let Some(owned) = self.department_courses.get_mut(&from) {
                        owned.remove(&id);
                    }
                    self.department_courses.entry(to).or_default().insert(id);
                }
                LinkChange::MoveLecturer { from, to } => {
                    if let Some(owned) = self.lecturer_courses.get_mut(&from) {
                        owned.remove(&id);
                    }
                    self.lecturer_courses.entry(to).or_default().insert(id);
                }
                LinkChange::Unenroll { student } => {
                    if let Some(enrolled) = self.student_courses.get_mut(&student) {
                        enrolled.remove(&id);
                    }
                }
                LinkChange::Enroll { student } => {
                    self.student_courses.entry(student).or_default().insert(id);
                }
            }
        }

        let version = changeset.expected_version + 1;
        self.courses
            .insert(id, changeset.course.clone().with_version(version));
        Ok(version)
    }
}

/// Link changes that move `stored` onto `updated`.
fn link_diff(stored: &Course, updated: &Course) -> Vec<LinkChange> {
    let mut changes = Vec::new();
    if stored.department_id() != updated.department_id() {
        changes.push(LinkChange::MoveDepartment {
            from: stored.department_id(),
            to: updated.department_id(),
        });
    }
    if stored.lecturer_id() != updated.lecturer_id() {
        changes.push(LinkChange::MoveLecturer {
            from: stored.lecturer_id(),
            to: updated.lecturer_id(),
        });
    }
    let before = stored.enrolled_students();
    let after = updated.enrolled_students();
    changes.extend(
        before
            .difference(after)
            .map(|student| LinkChange::Unenroll {
                student: student.clone(),
            }),
    );
    changes.extend(after.difference(before).map(|student| LinkChange::Enroll {
        student: student.clone(),
    }));
    changes
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
