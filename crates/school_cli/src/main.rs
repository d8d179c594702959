//! CLI smoke entry point.
//!
//! Opens the database given as the first argument (or an in-memory one),
//! then prints the core version, schema version and row counts.

use school_core::db::migrations::latest_version;
use school_core::db::{open_db, open_db_in_memory};
use school_core::{core_version, SchoolConfig, SqliteSchoolRepository, StudentService};
use std::process::ExitCode;

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    let opened = match path.as_deref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open school database: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("school_core version={}", core_version());
    println!("school_core schema_version={}", latest_version());

    let summary = SqliteSchoolRepository::try_new(&conn)
        .map_err(school_core::ServiceError::from)
        .and_then(|repo| {
            let service = StudentService::new(repo, SchoolConfig::default());
            Ok((service.number_of_students()?, service.gender_groups()?))
        });

    match summary {
        Ok((students, groups)) => {
            println!("students={students}");
            for group in groups {
                println!("gender={} count={}", group.gender.as_str(), group.count);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to read school database: {err}");
            ExitCode::FAILURE
        }
    }
}
