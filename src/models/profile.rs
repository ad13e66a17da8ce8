// src/models/profile.rs
//! Rows read from storage to assemble certificate facts.
//!
//! These mirror the profile, course and enrollment tables owned by the
//! persistence layer. The services only ever read them.

use serde::{Deserialize, Serialize};

/// Role attached to a profile.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Professor,
    Student,
    Admin,
}

/// A person known to the platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Profile {
    /// Display name as printed on the certificate: `"{first_name} {last_name}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A course taught by a professor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub professor_id: String,
    /// Skills in the order the course lists them. `None` when never set.
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    InProgress,
    Completed,
    Dropped,
}

/// Links a student to a course.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub student_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }
}
