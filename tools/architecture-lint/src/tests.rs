//! Unit tests for the boundary lint.

use std::path::PathBuf;

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

fn rules_broken(file: &str, contents: &str) -> Vec<Rule> {
    match lint_one(file, contents) {
        Ok(()) => Vec::new(),
        Err(ArchitectureLintError::Violations(found)) => {
            found.into_iter().map(|violation| violation.rule).collect()
        }
        Err(other) => panic!("unexpected lint failure: {other}"),
    }
}

#[rstest]
#[case(
    "outbound/memory/store.rs",
    "use crate::domain::ports::CourseRepository; fn adapter() {}"
)]
#[case(
    "domain/course_service.rs",
    "use super::ports::CourseRepository; use pagination::PageSize; fn service() {}"
)]
#[case(
    "domain/projection.rs",
    "fn view(config: u32) -> u32 { config }"
)]
#[case(
    "domain/enrollment.rs",
    "pub fn link(course: &mut Course, student: &mut Student) { course.add_student(student.id().clone()); student.enroll_in(course.id()); }"
)]
#[case(
    "domain/reconciliation.rs",
    "fn swap(course: &mut Course, target: &mut Department) { course.assign_department(target.id()); target.attach_course(course.id()); }"
)]
fn allowed_sources_pass(#[case] file: &str, #[case] contents: &str) {
    assert_eq!(rules_broken(file, contents), Vec::new());
}

#[rstest]
#[case(
    "domain/course_service.rs",
    "use crate::outbound::memory::InMemoryAcademicStore; fn service() {}"
)]
#[case(
    "domain/course_service.rs",
    "use outbound::memory::InMemoryAcademicStore; fn service() {}"
)]
#[case(
    "domain/course_service.rs",
    "fn service() { let _ = attendance::outbound::memory::InMemoryAcademicStore::new(); }"
)]
#[case(
    "domain/courses/course.rs",
    "fn page_size() -> u32 { super::super::super::config::DEFAULT_PAGE_SIZE }"
)]
#[case("domain/courses/course.rs", "use ortho_config::OrthoConfig;")]
#[case(
    "outbound/memory/state.rs",
    "use crate::config::CourseSettings; fn thing() {}"
)]
#[case(
    "outbound/memory/state.rs",
    "fn thing() { let _ = clap::Command::new(\"x\"); }"
)]
fn layer_crossings_are_reported(#[case] file: &str, #[case] contents: &str) {
    assert_eq!(rules_broken(file, contents), vec![Rule::Layering]);
}

#[rstest]
#[case(
    "domain/course_service.rs",
    "fn sneak(course: &mut Course, id: StudentId) { course.add_student(id); }"
)]
#[case(
    "outbound/memory/store.rs",
    "fn sneak(student: &mut Student, id: CourseId) { student.enroll_in(id); }"
)]
#[case(
    "domain/roster_service.rs",
    "fn sneak(d: &mut Department, id: CourseId) { Department::detach_course(d, id); }"
)]
fn one_sided_link_edits_are_reported(#[case] file: &str, #[case] contents: &str) {
    assert_eq!(rules_broken(file, contents), vec![Rule::PairedLinkEdit]);
}

#[rstest]
#[case(
    "domain/roster.rs",
    "#[cfg(test)] mod tests { fn setup(d: &mut Department, id: CourseId) { d.attach_course(id); } }"
)]
#[case(
    "domain/course_service_tests.rs",
    "fn world(d: &mut Department, id: CourseId) { d.attach_course(id); }"
)]
#[case(
    "domain/courses/tests.rs",
    "fn dedup(c: &mut Course, id: StudentId) { c.add_student(id); }"
)]
#[case(
    "domain/ports/tests/helpers.rs",
    "fn helper(l: &mut Lecturer, id: CourseId) { l.attach_course(id); }"
)]
fn test_code_may_edit_one_side(#[case] file: &str, #[case] contents: &str) {
    assert_eq!(rules_broken(file, contents), Vec::new());
}

#[rstest]
fn test_only_imports_are_ignored() {
    let contents = "#[cfg(test)] use crate::outbound::memory::InMemoryAcademicStore; fn f() {}";
    assert!(lint_one("domain/course_service.rs", contents).is_ok());
}

#[rstest]
fn files_outside_known_layers_are_rejected() {
    let result = lint_one("config.rs", "pub struct CourseSettings;");
    assert!(matches!(
        result,
        Err(ArchitectureLintError::UnknownLayer { file }) if file == PathBuf::from("config.rs")
    ));
}

#[rstest]
fn violations_are_sorted_and_deduplicated() {
    let sources = [
        LintSource {
            file: PathBuf::from("outbound/memory/store.rs"),
            contents: "use crate::config::A; use crate::config::B;".to_owned(),
        },
        LintSource {
            file: PathBuf::from("domain/course_service.rs"),
            contents: "use ortho_config::OrthoConfig; fn f(c: &mut Course, s: StudentId) { c.remove_student(&s); }"
                .to_owned(),
        },
    ];

    let Err(ArchitectureLintError::Violations(found)) = lint_sources(&sources) else {
        panic!("expected violations");
    };

    let summary: Vec<(String, Rule)> = found
        .iter()
        .map(|violation| (violation.file.display().to_string(), violation.rule))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("domain/course_service.rs".to_owned(), Rule::Layering),
            ("domain/course_service.rs".to_owned(), Rule::PairedLinkEdit),
            ("outbound/memory/store.rs".to_owned(), Rule::Layering),
        ]
    );
}

#[rstest]
#[case(&["crate", "domain", "Course"], Some(Target::Module("domain")))]
#[case(&["super", "super", "config", "X"], Some(Target::Module("config")))]
#[case(&["attendance", "outbound"], Some(Target::Module("outbound")))]
#[case(&["clap", "Parser"], Some(Target::Crate("clap")))]
#[case(&["crate"], None)]
fn targets_resolve_from_leading_segments(
    #[case] segments: &[&str],
    #[case] expected: Option<Target<'static>>,
) {
    let owned: Vec<String> = segments.iter().map(|s| (*s).to_owned()).collect();
    assert_eq!(target(&owned), expected);
}
