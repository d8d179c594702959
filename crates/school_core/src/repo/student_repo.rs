//! Student repository contract and SQLite implementation.
//!
//! # Invariants
//! - Students are listed in id order, which is the store iteration order.
//! - `save_student` replaces the student's enrollment rows with
//!   `Student::course_ids`.
//! - Deleting a student that still has enrollment rows fails at the foreign
//!   key; detach first.

use crate::model::course::CourseId;
use crate::model::student::{Gender, Student, StudentId};
use crate::model::EntityKind;
use crate::repo::store::{count_from_db, RepoError, RepoResult, SqliteSchoolRepository};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Params, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    gender,
    birth_date,
    address_id
FROM students";

/// Number of students per gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender: Gender,
    pub count: u64,
}

/// Repository interface for student records.
pub trait StudentRepository {
    fn find_all_students(&self) -> RepoResult<Vec<Student>>;
    fn find_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Inserts when `student.id` is `None`, otherwise updates.
    ///
    /// Returns the stored student with its id assigned.
    fn save_student(&self, student: &Student) -> RepoResult<Student>;
    fn delete_student_by_id(&self, id: StudentId) -> RepoResult<()>;
    /// Exact, case-sensitive name match.
    fn find_students_by_name(&self, name: &str) -> RepoResult<Vec<Student>>;
    fn count_students(&self) -> RepoResult<u64>;
    /// Gender groups with at least one student, ordered by gender label.
    fn group_by_gender(&self) -> RepoResult<Vec<GenderCount>>;
}

impl StudentRepository for SqliteSchoolRepository<'_> {
    fn find_all_students(&self) -> RepoResult<Vec<Student>> {
        query_students(
            self.conn,
            &format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"),
            [],
        )
    }

    fn find_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut students = query_students(
            self.conn,
            &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )?;
        Ok(students.pop())
    }

    fn save_student(&self, student: &Student) -> RepoResult<Student> {
        let id = match student.id {
            None => {
                self.conn.execute(
                    "INSERT INTO students (name, gender, birth_date, address_id)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        student.name.as_str(),
                        student.gender.as_str(),
                        student.birth_date,
                        student.address_id,
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE students
                     SET
                        name = ?2,
                        gender = ?3,
                        birth_date = ?4,
                        address_id = ?5
                     WHERE id = ?1;",
                    params![
                        id,
                        student.name.as_str(),
                        student.gender.as_str(),
                        student.birth_date,
                        student.address_id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::Student,
                        id,
                    });
                }
                id
            }
        };

        self.conn.execute(
            "DELETE FROM course_students WHERE student_id = ?1;",
            [id],
        )?;
        for course_id in &student.course_ids {
            self.conn.execute(
                "INSERT INTO course_students (course_id, student_id) VALUES (?1, ?2);",
                params![course_id, id],
            )?;
        }

        let mut saved = student.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn delete_student_by_id(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Student,
                id,
            });
        }
        Ok(())
    }

    fn find_students_by_name(&self, name: &str) -> RepoResult<Vec<Student>> {
        query_students(
            self.conn,
            &format!("{STUDENT_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC;"),
            [name],
        )
    }

    fn count_students(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        count_from_db(count, "students")
    }

    fn group_by_gender(&self) -> RepoResult<Vec<GenderCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT gender, COUNT(*) AS total
             FROM students
             GROUP BY gender
             ORDER BY gender ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            let label: String = row.get("gender")?;
            let gender = parse_gender(&label)?;
            let count = count_from_db(row.get("total")?, "students.gender group")?;
            groups.push(GenderCount { gender, count });
        }
        Ok(groups)
    }
}

fn query_students<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Student>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut students = Vec::new();
    while let Some(row) = rows.next()? {
        let mut student = parse_student_row(row)?;
        if let Some(id) = student.id {
            student.course_ids = load_course_ids_for_student(conn, id)?;
        }
        students.push(student);
    }
    Ok(students)
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let gender_text: String = row.get("gender")?;
    let birth_date: NaiveDate = row.get("birth_date").map_err(|err| {
        RepoError::InvalidData(format!("invalid date in students.birth_date: {err}"))
    })?;

    Ok(Student {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        gender: parse_gender(&gender_text)?,
        birth_date,
        address_id: row.get("address_id")?,
        course_ids: BTreeSet::new(),
    })
}

fn parse_gender(value: &str) -> RepoResult<Gender> {
    Gender::parse(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid gender `{value}` in students.gender")))
}

fn load_course_ids_for_student(
    conn: &Connection,
    student_id: StudentId,
) -> RepoResult<BTreeSet<CourseId>> {
    let mut stmt = conn.prepare(
        "SELECT course_id
         FROM course_students
         WHERE student_id = ?1
         ORDER BY course_id ASC;",
    )?;
    let mut rows = stmt.query([student_id])?;
    let mut course_ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        course_ids.insert(row.get(0)?);
    }
    Ok(course_ids)
}
