//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `registrar_core` wiring end to end against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use registrar_core::db::{close_db, open_db_in_memory};
use registrar_core::{create_course, enroll_student, get_enrollment_roster, NewCourse};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("registrar_core ping={}", registrar_core::ping());
    println!("registrar_core version={}", registrar_core::core_version());

    match run_sample_registration() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("registrar smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_sample_registration() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;

    let course = create_course(&conn, &NewCourse::new(" qual2000 ", " Integration Testing ", 2))?;
    enroll_student(&conn, "  Alex  ", "qual2000")?;
    enroll_student(&conn, "Sam", "QUAL2000")?;

    match enroll_student(&conn, "Jordan", &course.code) {
        Ok(_) => return Err("capacity was not enforced".into()),
        Err(err) => println!("registrar_core third_enrollment={err}"),
    }

    let roster = get_enrollment_roster(&conn, &course.code)?;
    println!("{}", serde_json::to_string_pretty(&roster)?);

    close_db(conn)?;
    Ok(())
}
