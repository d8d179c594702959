//! Student entity and the age rule.
//!
//! # Invariants
//! - Age is the calendar-year difference between `today` and `birth_date`.
//! - A student may only be created or updated while that age is within
//!   `MIN_STUDENT_AGE..=MAX_STUDENT_AGE`.

use crate::model::address::AddressId;
use crate::model::course::CourseId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned student identifier.
pub type StudentId = i64;

pub const MIN_STUDENT_AGE: i32 = 18;
pub const MAX_STUDENT_AGE: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Parses a storage label; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Business-rule violation for student writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    AgeOutOfRange { age: i32 },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgeOutOfRange { age } => write!(
                f,
                "student age must be between {MIN_STUDENT_AGE} and {MAX_STUDENT_AGE}, got {age}"
            ),
        }
    }
}

impl Error for StudentValidationError {}

/// Student with its address reference and course memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: Option<StudentId>,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    /// Owned address, if one is assigned.
    pub address_id: Option<AddressId>,
    /// Ids of courses this student is enrolled in.
    pub course_ids: BTreeSet<CourseId>,
}

impl Student {
    /// Creates an unsaved student with no address and no courses.
    pub fn new(name: impl Into<String>, gender: Gender, birth_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            gender,
            birth_date,
            address_id: None,
            course_ids: BTreeSet::new(),
        }
    }

    /// Age in whole calendar years as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        today.year() - self.birth_date.year()
    }

    /// Checks the age rule and returns the computed age.
    pub fn validate_age(&self, today: NaiveDate) -> Result<i32, StudentValidationError> {
        let age = self.age_on(today);
        if (MIN_STUDENT_AGE..=MAX_STUDENT_AGE).contains(&age) {
            Ok(age)
        } else {
            Err(StudentValidationError::AgeOutOfRange { age })
        }
    }

    pub fn is_enrolled_in(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Gender, Student, StudentValidationError};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    }

    #[test]
    fn age_uses_calendar_year_difference() {
        let student = Student::new("Ada", Gender::Female, date(2000, 12, 31));
        assert_eq!(student.age_on(date(2024, 1, 1)), 24);
    }

    #[test]
    fn validate_age_accepts_inclusive_bounds() {
        let today = date(2024, 6, 1);
        for birth_year in [1984, 2000, 2006] {
            let student = Student::new("Ada", Gender::Female, date(birth_year, 1, 1));
            assert!(student.validate_age(today).is_ok(), "year {birth_year}");
        }
    }

    #[test]
    fn validate_age_rejects_too_young_and_too_old() {
        let today = date(2024, 6, 1);
        let young = Student::new("Kid", Gender::Male, date(2010, 1, 1));
        assert_eq!(
            young.validate_age(today),
            Err(StudentValidationError::AgeOutOfRange { age: 14 })
        );

        let old = Student::new("Elder", Gender::Other, date(1983, 1, 1));
        assert_eq!(
            old.validate_age(today),
            Err(StudentValidationError::AgeOutOfRange { age: 41 })
        );
    }

    #[test]
    fn gender_labels_roundtrip() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
        }
        assert_eq!(Gender::parse("MALE"), None);
    }
}
