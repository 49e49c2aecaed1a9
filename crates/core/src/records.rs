//! Typed master-data records as submitted to (and exported from) the
//! persistence layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_form: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRole {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
}

/// Anything with a `name` key that the duplicate check runs against.
pub trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),* $(,)?) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(Degree, Designation, Department, JobRole, JobType);
