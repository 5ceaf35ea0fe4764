use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A clinic user profile. The row id is the opaque identifier issued by the
/// hosted auth service; the profile row is created alongside registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub age: i32,
    pub role: Role,
    pub health_insurance: Option<String>,
    pub specialty: Option<String>,
    pub avatar_url: Option<String>,
    pub account_enabled: bool,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Specialist,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Specialist => write!(f, "specialist"),
            Role::Administrator => write!(f, "administrator"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecialtyRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAccountEnabledRequest {
    pub account_enabled: bool,
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized access to profile data")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),
}
