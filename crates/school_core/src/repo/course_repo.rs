//! Course repository contract and SQLite implementation.
//!
//! # Invariants
//! - `save_course` replaces the course's enrollment rows with
//!   `Course::student_ids` and never touches the instructor assignment.
//! - The instructor id is only reachable through `instructor_id_of_course`.

use crate::model::course::{Course, CourseId, InstructorId};
use crate::model::student::StudentId;
use crate::model::EntityKind;
use crate::repo::store::{RepoError, RepoResult, SqliteSchoolRepository};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::collections::BTreeSet;

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    name,
    code,
    credits
FROM courses";

/// Repository interface for course records.
pub trait CourseRepository {
    fn find_all_courses(&self) -> RepoResult<Vec<Course>>;
    fn find_course_by_id(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Inserts when `course.id` is `None`, otherwise updates.
    fn save_course(&self, course: &Course) -> RepoResult<Course>;
    fn delete_course_by_id(&self, id: CourseId) -> RepoResult<()>;
    /// Instructor assigned to the course; `NotFound` if the course is absent.
    fn instructor_id_of_course(&self, id: CourseId) -> RepoResult<Option<InstructorId>>;
    fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<InstructorId>,
    ) -> RepoResult<()>;
}

impl CourseRepository for SqliteSchoolRepository<'_> {
    fn find_all_courses(&self) -> RepoResult<Vec<Course>> {
        query_courses(
            self.conn,
            &format!("{COURSE_SELECT_SQL} ORDER BY id ASC;"),
            [],
        )
    }

    fn find_course_by_id(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut courses = query_courses(
            self.conn,
            &format!("{COURSE_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )?;
        Ok(courses.pop())
    }

    fn save_course(&self, course: &Course) -> RepoResult<Course> {
        let id = match course.id {
            None => {
                self.conn.execute(
                    "INSERT INTO courses (name, code, credits) VALUES (?1, ?2, ?3);",
                    params![course.name.as_str(), course.code.as_str(), course.credits],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE courses
                     SET
                        name = ?2,
                        code = ?3,
                        credits = ?4
                     WHERE id = ?1;",
                    params![id, course.name.as_str(), course.code.as_str(), course.credits],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        kind: EntityKind::Course,
                        id,
                    });
                }
                id
            }
        };

        self.conn
            .execute("DELETE FROM course_students WHERE course_id = ?1;", [id])?;
        for student_id in &course.student_ids {
            self.conn.execute(
                "INSERT INTO course_students (course_id, student_id) VALUES (?1, ?2);",
                params![id, student_id],
            )?;
        }

        let mut saved = course.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn delete_course_by_id(&self, id: CourseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Course,
                id,
            });
        }
        Ok(())
    }

    fn instructor_id_of_course(&self, id: CourseId) -> RepoResult<Option<InstructorId>> {
        let instructor: Option<Option<InstructorId>> = self
            .conn
            .query_row(
                "SELECT instructor_id FROM courses WHERE id = ?1;",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        instructor.ok_or(RepoError::NotFound {
            kind: EntityKind::Course,
            id,
        })
    }

    fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<InstructorId>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE courses SET instructor_id = ?2 WHERE id = ?1;",
            params![id, instructor_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Course,
                id,
            });
        }
        Ok(())
    }
}

fn query_courses<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Course>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next()? {
        let mut course = parse_course_row(row)?;
        if let Some(id) = course.id {
            course.student_ids = load_student_ids_for_course(conn, id)?;
        }
        courses.push(course);
    }
    Ok(courses)
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let credits: i64 = row.get("credits")?;
    let credits = u32::try_from(credits).map_err(|_| {
        RepoError::InvalidData(format!("invalid credits `{credits}` in courses.credits"))
    })?;

    Ok(Course {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        code: row.get("code")?,
        credits,
        student_ids: BTreeSet::new(),
    })
}

fn load_student_ids_for_course(
    conn: &Connection,
    course_id: CourseId,
) -> RepoResult<BTreeSet<StudentId>> {
    let mut stmt = conn.prepare(
        "SELECT student_id
         FROM course_students
         WHERE course_id = ?1
         ORDER BY student_id ASC;",
    )?;
    let mut rows = stmt.query([course_id])?;
    let mut student_ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        student_ids.insert(row.get(0)?);
    }
    Ok(student_ids)
}
