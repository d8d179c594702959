//! Caller-facing record shapes.
//!
//! Field names serialize in camelCase to match the external schema.

use crate::model::address::AddressId;
use crate::model::course::{CourseId, InstructorId};
use crate::model::student::{Gender, StudentId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plain student fields, used for create/update input and flat listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

/// Course fields plus values derived when the record is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CourseId>,
    pub name: String,
    pub code: String,
    pub credits: u32,
    /// Derived; ignored when the record is used as input.
    #[serde(default)]
    pub number_of_students: u64,
    /// Derived; ignored when the record is used as input.
    #[serde(default)]
    pub instructor_id: Option<InstructorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub street: String,
    pub city: String,
    pub country: String,
}

/// Student together with its address and mapped courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithCoursesRecord {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub address: Option<AddressRecord>,
    pub courses: Vec<CourseRecord>,
}
