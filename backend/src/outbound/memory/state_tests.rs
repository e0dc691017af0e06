//! Tests for the in-memory store state.

use chrono::NaiveDate;
use pagination::{PageSize, SortDirection};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::CourseDetails;

struct Seeded {
    state: StoreState,
    department: DepartmentId,
    lecturer: LecturerId,
}

fn course(code: &str, department: DepartmentId, lecturer: LecturerId) -> Course {
    Course::new(
        CourseId::random(),
        CourseCode::new(code).expect("valid code"),
        CourseDetails {
            name: format!("{code} course"),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
        },
        department,
        lecturer,
    )
    .expect("valid course")
}

fn student(id: &str) -> Student {
    Student::new(
        StudentId::new(id).expect("valid id"),
        Email::new(format!("{id}@uni.example")).expect("valid email"),
    )
}

#[fixture]
fn seeded() -> Seeded {
    let mut state = StoreState::default();
    let department = Department::new(
        DepartmentId::random(),
        DepartmentName::new("Computer Science").expect("valid name"),
    );
    let lecturer = Lecturer::new(
        LecturerId::random(),
        Email::new("turing@uni.example").expect("valid email"),
    );
    state
        .insert_department(&department)
        .expect("department stored");
    state.insert_lecturer(&lecturer).expect("lecturer stored");
    state.insert_student(&student("s-1")).expect("student stored");
    Seeded {
        state,
        department: department.id(),
        lecturer: lecturer.id(),
    }
}

fn page(number: u32, size: u32, direction: SortDirection) -> PageRequest {
    PageRequest::new(number, PageSize::new(size).expect("non-zero size"), direction)
}

#[rstest]
fn inserted_course_appears_in_owner_indexes(mut seeded: Seeded) {
    let course = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&course).expect("course stored");

    let department = seeded
        .state
        .department(seeded.department)
        .expect("department present");
    let lecturer = seeded
        .state
        .lecturer(seeded.lecturer)
        .expect("lecturer present");
    assert!(department.courses().contains(&course.id()));
    assert!(lecturer.courses().contains(&course.id()));
    let found = seeded
        .state
        .course_by_code(&CourseCode::new("cs101").expect("valid code"))
        .expect("lookup ignores case");
    assert_eq!(found.id(), course.id());
}

#[rstest]
fn duplicate_codes_are_rejected(mut seeded: Seeded) {
    let first = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&first).expect("course stored");
    let second = course("cs101", seeded.department, seeded.lecturer);

    let err = seeded
        .state
        .insert_course(&second)
        .expect_err("code taken");
    assert!(matches!(
        err,
        CourseRepositoryError::DuplicateCourseCode { .. }
    ));
    assert_eq!(seeded.state.course_count(), 1);
}

#[rstest]
fn courses_with_unknown_owners_are_rejected(mut seeded: Seeded) {
    let orphan = course("CS101", DepartmentId::random(), seeded.lecturer);

    let err = seeded
        .state
        .insert_course(&orphan)
        .expect_err("unknown department");
    assert!(matches!(
        err,
        CourseRepositoryError::MissingReference {
            entity: EntityKind::Department,
            ..
        }
    ));
    assert_eq!(seeded.state.course_count(), 0);
    let lecturer = seeded
        .state
        .lecturer(seeded.lecturer)
        .expect("lecturer present");
    assert!(lecturer.courses().is_empty());
}

#[rstest]
fn commit_applies_links_and_bumps_version(mut seeded: Seeded) {
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    let mut updated = stored.clone();
    let mut enrolled = student("s-1");
    let change = crate::domain::enroll(&mut updated, &mut enrolled).expect("enrollment");

    let version = seeded
        .state
        .commit(&CourseChangeset::new(updated, vec![change]))
        .expect("commit succeeds");

    assert_eq!(version, 1);
    let student = seeded
        .state
        .student(&StudentId::new("S-1").expect("valid id"))
        .expect("student present");
    assert!(student.courses().contains(&stored.id()));
    let course = seeded
        .state
        .course_by_code(stored.code())
        .expect("course present");
    assert_eq!(course.version(), 1);
    assert!(course.is_enrolled(student.id()));
}

#[rstest]
fn stale_changesets_are_rejected_without_changes(mut seeded: Seeded) {
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    seeded
        .state
        .commit(&CourseChangeset::new(stored.clone(), Vec::new()))
        .expect("first commit");

    let mut stale = stored.clone();
    let mut enrolled = student("s-1");
    let change = crate::domain::enroll(&mut stale, &mut enrolled).expect("enrollment");
    let err = seeded
        .state
        .commit(&CourseChangeset::new(stale, vec![change]))
        .expect_err("stale version");

    assert_eq!(err, CourseRepositoryError::version_conflict(0_u64, 1_u64));
    let student = seeded
        .state
        .student(&StudentId::new("s-1").expect("valid id"))
        .expect("student present");
    assert!(student.courses().is_empty());
}

#[rstest]
fn missing_reference_aborts_whole_commit(mut seeded: Seeded) {
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    let mut updated = stored.clone();
    let mut known = student("s-1");
    let mut unknown = student("s-404");
    let changes = vec![
        crate::domain::enroll(&mut updated, &mut known).expect("enrollment"),
        crate::domain::enroll(&mut updated, &mut unknown).expect("enrollment"),
    ];

    let err = seeded
        .state
        .commit(&CourseChangeset::new(updated, changes))
        .expect_err("unknown student");

    assert!(matches!(
        err,
        CourseRepositoryError::MissingReference {
            entity: EntityKind::Student,
            ..
        }
    ));
    let known = seeded
        .state
        .student(&StudentId::new("s-1").expect("valid id"))
        .expect("student present");
    assert!(known.courses().is_empty());
    let course = seeded
        .state
        .course_by_code(stored.code())
        .expect("course present");
    assert_eq!(course, stored);
}

#[rstest]
fn changesets_must_declare_every_link_the_course_gained(mut seeded: Seeded) {
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    let mut updated = stored.clone();
    let mut enrolled = student("s-1");
    crate::domain::enroll(&mut updated, &mut enrolled).expect("enrollment");

    let err = seeded
        .state
        .commit(&CourseChangeset::new(updated, Vec::new()))
        .expect_err("undeclared enrollment");

    assert!(matches!(err, CourseRepositoryError::Query { .. }));
    let course = seeded
        .state
        .course_by_code(stored.code())
        .expect("course present");
    assert_eq!(course, stored);
    let student = seeded
        .state
        .student(&StudentId::new("s-1").expect("valid id"))
        .expect("student present");
    assert!(student.courses().is_empty());
}

#[rstest]
fn changesets_cannot_declare_links_the_course_lacks(mut seeded: Seeded) {
    let other = Department::new(
        DepartmentId::random(),
        DepartmentName::new("Mathematics").expect("valid name"),
    );
    seeded
        .state
        .insert_department(&other)
        .expect("department stored");
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    let changes = vec![
        LinkChange::MoveDepartment {
            from: seeded.department,
            to: other.id(),
        },
        LinkChange::Enroll {
            student: StudentId::new("s-1").expect("valid id"),
        },
    ];

    let err = seeded
        .state
        .commit(&CourseChangeset::new(stored.clone(), changes))
        .expect_err("course unchanged");

    assert!(matches!(err, CourseRepositoryError::Query { .. }));
    let moved_to = seeded
        .state
        .department(other.id())
        .expect("department present");
    assert!(moved_to.courses().is_empty());
    let owner = seeded
        .state
        .department(seeded.department)
        .expect("department present");
    assert!(owner.courses().contains(&stored.id()));
}

#[rstest]
fn declared_changes_may_come_in_any_order(mut seeded: Seeded) {
    seeded
        .state
        .insert_student(&student("s-2"))
        .expect("student stored");
    let stored = course("CS101", seeded.department, seeded.lecturer);
    seeded.state.insert_course(&stored).expect("course stored");
    let mut updated = stored.clone();
    let mut first = student("s-1");
    let mut second = student("s-2");
    let mut changes = vec![
        crate::domain::enroll(&mut updated, &mut first).expect("enrollment"),
        crate::domain::enroll(&mut updated, &mut second).expect("enrollment"),
    ];
    changes.reverse();

    let version = seeded
        .state
        .commit(&CourseChangeset::new(updated, changes))
        .expect("commit succeeds");

    assert_eq!(version, 1);
    for id in ["s-1", "s-2"] {
        let enrolled = seeded
            .state
            .student(&StudentId::new(id).expect("valid id"))
            .expect("student present");
        assert!(enrolled.courses().contains(&stored.id()));
    }
}

#[rstest]
#[case(SortDirection::Ascending, 0, vec!["CS101", "cs102"])]
#[case(SortDirection::Ascending, 1, vec!["MA201"])]
#[case(SortDirection::Descending, 0, vec!["MA201", "cs102"])]
#[case(SortDirection::Ascending, 2, vec![])]
fn pages_are_sorted_by_folded_code(
    mut seeded: Seeded,
    #[case] direction: SortDirection,
    #[case] number: u32,
    #[case] expected: Vec<&str>,
) {
    for code in ["MA201", "cs102", "CS101"] {
        seeded
            .state
            .insert_course(&course(code, seeded.department, seeded.lecturer))
            .expect("course stored");
    }

    let listed: Vec<String> = seeded
        .state
        .course_page(None, page(number, 2, direction))
        .iter()
        .map(|course| course.code().to_string())
        .collect();

    assert_eq!(listed, expected);
}

#[rstest]
fn lecturer_pages_only_hold_their_courses(mut seeded: Seeded) {
    let other = Lecturer::new(
        LecturerId::random(),
        Email::new("hopper@uni.example").expect("valid email"),
    );
    seeded.state.insert_lecturer(&other).expect("lecturer stored");
    seeded
        .state
        .insert_course(&course("CS101", seeded.department, seeded.lecturer))
        .expect("course stored");
    seeded
        .state
        .insert_course(&course("CS102", seeded.department, other.id()))
        .expect("course stored");

    let listed = seeded.state.course_page(
        Some(other.id()),
        page(0, 10, SortDirection::Ascending),
    );

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code().as_ref(), "CS102");
}

#[rstest]
fn roster_natural_keys_are_unique(mut seeded: Seeded) {
    let err = seeded
        .state
        .insert_student(&student("S-1"))
        .expect_err("student id taken");
    assert_eq!(err, RosterRepositoryError::duplicate_key("S-1"));

    let clash = Lecturer::new(
        LecturerId::random(),
        Email::new("TURING@uni.example").expect("valid email"),
    );
    assert!(seeded.state.insert_lecturer(&clash).is_err());
}
