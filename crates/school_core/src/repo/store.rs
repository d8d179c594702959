//! SQLite-backed store shared by all entity repositories.
//!
//! # Invariants
//! - A store is only constructed over a connection migrated to the latest
//!   schema version.
//! - `in_transaction` commits only when the operation returns `Ok`; any error
//!   rolls back every statement issued inside it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::EntityKind;
use crate::repo::address_repo::AddressRepository;
use crate::repo::course_repo::CourseRepository;
use crate::repo::student_repo::StudentRepository;
use log::{debug, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_TABLES: [&str; 4] = ["students", "courses", "addresses", "course_students"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for school record persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No row with this id exists for the entity kind.
    NotFound { kind: EntityKind, id: i64 },
    /// Persisted data cannot be converted into a valid entity.
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} with ID: {id} could not be found"),
            Self::InvalidData(message) => write!(f, "invalid persisted school data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "school repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "school repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Unit-of-work boundary for operations spanning several writes.
pub trait TransactionScope {
    /// Runs `operation` in one transaction, committing only on success.
    ///
    /// Must not be nested.
    fn in_transaction<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// Everything the school services need from storage.
pub trait SchoolRepository:
    StudentRepository + CourseRepository + AddressRepository + TransactionScope
{
}

impl<T> SchoolRepository for T where
    T: StudentRepository + CourseRepository + AddressRepository + TransactionScope
{
}

/// SQLite implementation of all school repositories over one connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteSchoolRepository<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteSchoolRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when the schema was tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TransactionScope for SqliteSchoolRepository<'_> {
    fn in_transaction<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(RepoError::from)?;
        match operation() {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                // Dropping `tx` rolls back.
                debug!("event=tx_rollback module=repo status=ok");
                Err(err)
            }
        }
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        warn!(
            "event=repo_init module=repo status=error error_code=schema_mismatch expected={expected_version} actual={actual_version}"
        );
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Converts a SQLite count into `u64`, rejecting negative values.
pub(crate) fn count_from_db(value: i64, column: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` in {column}")))
}
