use registrar_core::db::{close_db, open_db_in_memory};
use registrar_core::{
    create_course, enroll_student, get_enrollment_roster, EnrollmentError, EnrollmentService,
    NewCourse, SqliteCourseRepository, StorageErrorKind, ValidationError,
};
use rusqlite::Connection;

fn seed_course(conn: &Connection, code: &str, title: &str, capacity: i64) {
    create_course(conn, &NewCourse::new(code, title, capacity)).unwrap();
}

#[test]
fn create_course_persists_and_normalizes_code_and_title() {
    let conn = open_db_in_memory().unwrap();

    let saved = create_course(
        &conn,
        &NewCourse::new(" qual2000 ", "  Integration Testing  ", 2),
    )
    .unwrap();

    assert!(saved.id > 0);
    assert_eq!(saved.code, "QUAL2000");
    assert_eq!(saved.title, "Integration Testing");
    assert_eq!(saved.capacity, 2);

    let (code, title): (String, String) = conn
        .query_row(
            "SELECT code, title FROM courses WHERE id = ?1;",
            [saved.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(code, "QUAL2000");
    assert_eq!(title, "Integration Testing");

    close_db(conn).unwrap();
}

#[test]
fn enroll_student_creates_records_and_roster_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 3);

    let first = enroll_student(&conn, "  Alex  ", "qual2000").unwrap();
    let second = enroll_student(&conn, "Sam", "QUAL2000").unwrap();

    assert!(first.id > 0);
    assert!(second.id > first.id);
    assert_eq!(first.student_name, "Alex");
    assert_eq!(first.course_id, second.course_id);

    let roster = get_enrollment_roster(&conn, " qual2000 ").unwrap();
    let rows: Vec<_> = roster
        .iter()
        .map(|entry| (entry.id, entry.student_name.as_str(), entry.course_code.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (first.id, "Alex", "QUAL2000"),
            (second.id, "Sam", "QUAL2000"),
        ]
    );
}

#[test]
fn enroll_student_rejects_missing_course() {
    let conn = open_db_in_memory().unwrap();

    let err = enroll_student(&conn, "Alex", "MISSING101").unwrap_err();
    assert!(matches!(
        err,
        EnrollmentError::CourseNotFound { ref code } if code == "MISSING101"
    ));
}

#[test]
fn enroll_student_rejects_when_course_is_full() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 2);

    enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    enroll_student(&conn, "Sam", "QUAL2000").unwrap();

    let err = enroll_student(&conn, "Jordan", "QUAL2000").unwrap_err();
    assert!(matches!(
        err,
        EnrollmentError::CourseFull { capacity: 2, .. }
    ));
    assert_eq!(err.to_string(), "course is full: QUAL2000 (capacity 2)");
    assert_eq!(get_enrollment_roster(&conn, "QUAL2000").unwrap().len(), 2);
}

#[test]
fn duplicate_enrollment_in_same_course_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 3);

    enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    let err = enroll_student(&conn, " Alex ", "qual2000").unwrap_err();

    assert!(matches!(err, EnrollmentError::Storage(_)));
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::UniqueViolation));
    assert_eq!(get_enrollment_roster(&conn, "QUAL2000").unwrap().len(), 1);
}

#[test]
fn duplicate_enrollment_does_not_consume_capacity() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 2);

    enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    enroll_student(&conn, "Alex", "QUAL2000").unwrap_err();
    enroll_student(&conn, "Sam", "QUAL2000").unwrap();
}

#[test]
fn student_name_matching_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 3);

    enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    enroll_student(&conn, "alex", "QUAL2000").unwrap();

    let names: Vec<_> = get_enrollment_roster(&conn, "QUAL2000")
        .unwrap()
        .into_iter()
        .map(|entry| entry.student_name)
        .collect();
    assert_eq!(names, vec!["Alex", "alex"]);
}

#[test]
fn same_student_can_enroll_in_different_courses() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 3);
    seed_course(&conn, "qual3000", "Automation", 3);

    enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    enroll_student(&conn, "Alex", "QUAL3000").unwrap();

    for code in ["QUAL2000", "qual3000"] {
        let names: Vec<_> = get_enrollment_roster(&conn, code)
            .unwrap()
            .into_iter()
            .map(|entry| entry.student_name)
            .collect();
        assert_eq!(names, vec!["Alex"]);
    }
}

#[test]
fn duplicate_course_code_surfaces_storage_error() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "QUAL2000", "Integration Testing", 3);

    let err = create_course(&conn, &NewCourse::new(" qual2000", "Again", 1)).unwrap_err();
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::UniqueViolation));
}

#[test]
fn roster_for_unknown_or_empty_course_is_empty() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 3);

    assert!(get_enrollment_roster(&conn, "QUAL2000").unwrap().is_empty());
    assert!(get_enrollment_roster(&conn, "NOPE999").unwrap().is_empty());
}

#[test]
fn invalid_inputs_fail_with_validation_error_and_write_nothing() {
    let conn = open_db_in_memory().unwrap();

    for input in [
        NewCourse::new("", "T", 1),
        NewCourse::new("QUAL2000", "", 1),
        NewCourse::new("QUAL2000", "T", 0),
    ] {
        let err = create_course(&conn, &input).unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)), "{input:?}");
    }

    seed_course(&conn, "qual2000", "Integration Testing", 1);

    let blank_name = enroll_student(&conn, "", "QUAL2000").unwrap_err();
    assert!(matches!(
        blank_name,
        EnrollmentError::Validation(ValidationError::Blank {
            field: "student_name"
        })
    ));
    let blank_code = enroll_student(&conn, "Alex", "").unwrap_err();
    assert!(matches!(blank_code, EnrollmentError::Validation(_)));
    let blank_roster = get_enrollment_roster(&conn, "").unwrap_err();
    assert!(matches!(blank_roster, EnrollmentError::Validation(_)));

    let courses: i64 = conn
        .query_row("SELECT COUNT(*) FROM courses;", [], |row| row.get(0))
        .unwrap();
    let enrollments: i64 = conn
        .query_row("SELECT COUNT(*) FROM enrollments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(courses, 1);
    assert_eq!(enrollments, 0);
}

#[test]
fn service_works_over_checked_repository() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let service = EnrollmentService::new(repo);

    service
        .create_course(&NewCourse::new("qual2000", "Integration Testing", 1))
        .unwrap();
    service.enroll_student("Alex", "qual2000").unwrap();

    let roster = service.get_enrollment_roster("QUAL2000").unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].course_code, "QUAL2000");
}

#[test]
fn records_serialize_with_camel_case_fields() {
    let conn = open_db_in_memory().unwrap();
    seed_course(&conn, "qual2000", "Integration Testing", 2);
    let enrollment = enroll_student(&conn, "Alex", "QUAL2000").unwrap();
    let roster = get_enrollment_roster(&conn, "QUAL2000").unwrap();

    let enrollment_json = serde_json::to_value(&enrollment).unwrap();
    assert_eq!(enrollment_json["studentName"], "Alex");
    assert_eq!(enrollment_json["courseId"], enrollment.course_id);

    let roster_json = serde_json::to_value(&roster).unwrap();
    assert_eq!(
        roster_json,
        serde_json::json!([
            { "id": enrollment.id, "studentName": "Alex", "courseCode": "QUAL2000" }
        ])
    );
}
