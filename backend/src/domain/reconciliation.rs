//! Reconciliation of a course's department, lecturer and enrollment links.
//!
//! Callers resolve every target reference before calling [`reconcile`], so
//! the function itself cannot fail part-way. It mutates in-memory copies of
//! the aggregate; the resulting [`LinkChange`] list is then persisted by the
//! course repository in a single atomic commit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enrollment::{link, unlink};
use super::{Course, Department, DepartmentId, Lecturer, LecturerId, Student, StudentId};

/// One link mutation applied to both sides of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LinkChange {
    /// The course moved to another department.
    MoveDepartment {
        /// Previous owner.
        from: DepartmentId,
        /// New owner.
        to: DepartmentId,
    },
    /// The course was reassigned to another lecturer.
    MoveLecturer {
        /// Previous lecturer.
        from: LecturerId,
        /// New lecturer.
        to: LecturerId,
    },
    /// The student left the course.
    Unenroll {
        /// Student removed from the course.
        student: StudentId,
    },
    /// The student joined the course.
    Enroll {
        /// Student added to the course.
        student: StudentId,
    },
}

/// A course together with every record it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLinks {
    /// The aggregate root.
    pub course: Course,
    /// Owning department.
    pub department: Department,
    /// Assigned lecturer.
    pub lecturer: Lecturer,
    /// Enrolled students keyed by student id.
    pub students: BTreeMap<StudentId, Student>,
}

impl CourseLinks {
    /// Whether every link is present on both sides.
    pub fn is_consistent(&self) -> bool {
        let course_id = self.course.id();
        let department_linked = self.course.department_id() == self.department.id()
            && self.department.courses().contains(&course_id);
        let lecturer_linked = self.course.lecturer_id() == self.lecturer.id()
            && self.lecturer.courses().contains(&course_id);
        let roster_matches = self
            .course
            .enrolled_students()
            .iter()
            .eq(self.students.keys());
        let students_linked = self
            .students
            .values()
            .all(|student| student.courses().contains(&course_id));
        department_linked && lecturer_linked && roster_matches && students_linked
    }
}

/// Desired department, lecturer and student set for a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets {
    /// Department that should own the course.
    pub department: Department,
    /// Lecturer who should teach the course.
    pub lecturer: Lecturer,
    /// Students who should be enrolled, keyed by student id.
    pub students: BTreeMap<StudentId, Student>,
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The aggregate as it now stands, linked to its targets.
    pub links: CourseLinks,
    /// Former department with the course detached, when it changed.
    pub released_department: Option<Department>,
    /// Former lecturer with the course detached, when it changed.
    pub released_lecturer: Option<Lecturer>,
    /// Students removed from the course, with the course detached.
    pub released_students: Vec<Student>,
    /// Applied mutations in order.
    pub changes: Vec<LinkChange>,
}

/// Move `current` onto `target`, applying the minimal set of link changes.
///
/// Department and lecturer are compared by identifier and swapped only when
/// they differ. Students are compared as sets of ids: those only in the
/// current set are unenrolled, those only in the target set are enrolled and
/// students present in both are left untouched. Reconciling an aggregate
/// against its own state yields no changes.
pub fn reconcile(current: CourseLinks, target: LinkTargets) -> Reconciled {
    let CourseLinks {
        mut course,
        department,
        lecturer,
        students,
    } = current;
    let mut changes = Vec::new();

    let (department, released_department) =
        swap_department(&mut course, department, target.department, &mut changes);
    let (lecturer, released_lecturer) =
        swap_lecturer(&mut course, lecturer, target.lecturer, &mut changes);

    let mut kept = BTreeMap::new();
    let mut released_students = Vec::new();
    for (id, mut student) in students {
        if target.students.contains_key(&id) {
            kept.insert(id, student);
        } else {
            changes.push(unlink(&mut course, &mut student));
            released_students.push(student);
        }
    }
    for (id, mut student) in target.students {
        if kept.contains_key(&id) {
            continue;
        }
        changes.push(link(&mut course, &mut student));
        kept.insert(id, student);
    }

    Reconciled {
        links: CourseLinks {
            course,
            department,
            lecturer,
            students: kept,
        },
        released_department,
        released_lecturer,
        released_students,
        changes,
    }
}

fn swap_department(
    course: &mut Course,
    mut current: Department,
    mut target: Department,
    changes: &mut Vec<LinkChange>,
) -> (Department, Option<Department>) {
    if current.id() == target.id() {
        return (current, None);
    }
    current.detach_course(course.id());
    course.assign_department(target.id());
    target.attach_course(course.id());
    changes.push(LinkChange::MoveDepartment {
        from: current.id(),
        to: target.id(),
    });
    (target, Some(current))
}

fn swap_lecturer(
    course: &mut Course,
    mut current: Lecturer,
    mut target: Lecturer,
    changes: &mut Vec<LinkChange>,
) -> (Lecturer, Option<Lecturer>) {
    if current.id() == target.id() {
        return (current, None);
    }
    current.detach_course(course.id());
    course.assign_lecturer(target.id());
    target.attach_course(course.id());
    changes.push(LinkChange::MoveLecturer {
        from: current.id(),
        to: target.id(),
    });
    (target, Some(current))
}

#[cfg(test)]
#[path = "reconciliation_tests.rs"]
mod tests;
