//! Course–student enrollment links.
//!
//! Both sides of an enrollment change together: the course's enrolled set and
//! the student's course index are only ever edited by the pair functions in
//! this module.

use super::{Course, Error, LinkChange, Student};

/// Enroll `student` in `course`, linking both sides.
///
/// Fails with [`crate::domain::ErrorCode::AlreadyEnrolled`] when the student
/// id is already in the course's enrolled set; neither side is touched then.
///
/// # Examples
/// ```
/// use attendance::domain::{
///     Course, CourseCode, CourseDetails, CourseId, DepartmentId, Email, ErrorCode,
///     LecturerId, Student, StudentId, enroll,
/// };
/// use chrono::NaiveDate;
///
/// let mut course = Course::new(
///     CourseId::random(),
///     CourseCode::new("CS101").expect("code"),
///     CourseDetails {
///         name: "Algorithms".to_owned(),
///         start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
///         end_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"),
///     },
///     DepartmentId::random(),
///     LecturerId::random(),
/// )
/// .expect("valid course");
/// let mut student = Student::new(
///     StudentId::new("s-1").expect("id"),
///     Email::new("s1@uni.example").expect("email"),
/// );
///
/// enroll(&mut course, &mut student).expect("first enrollment");
/// let err = enroll(&mut course, &mut student).expect_err("duplicate");
/// assert_eq!(err.code(), ErrorCode::AlreadyEnrolled);
/// ```
pub fn enroll(course: &mut Course, student: &mut Student) -> Result<LinkChange, Error> {
    if course.is_enrolled(student.id()) {
        return Err(Error::already_enrolled(student.id(), course.code()));
    }
    Ok(link(course, student))
}

/// Add the bidirectional link. Callers have already ruled out duplicates.
pub(crate) fn link(course: &mut Course, student: &mut Student) -> LinkChange {
    course.add_student(student.id().clone());
    student.enroll_in(course.id());
    LinkChange::Enroll {
        student: student.id().clone(),
    }
}

/// Remove the bidirectional link.
pub(crate) fn unlink(course: &mut Course, student: &mut Student) -> LinkChange {
    course.remove_student(student.id());
    student.unenroll_from(course.id());
    LinkChange::Unenroll {
        student: student.id().clone(),
    }
}
