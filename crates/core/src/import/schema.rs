//! Declarative field schemas for the importable master-data entities.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Six-digit hex color, e.g. `#1A2B3C`.
pub const HEX_COLOR_PATTERN: &str = r"^#[0-9A-Fa-f]{6}$";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEX_COLOR_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Entity kind
// ---------------------------------------------------------------------------

/// Master-data entity types that can be bulk-imported from CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Degree,
    Designation,
    Department,
    JobRole,
    JobType,
}

impl EntityKind {
    /// Every importable entity kind.
    pub const ALL: [EntityKind; 5] = [
        Self::Degree,
        Self::Designation,
        Self::Department,
        Self::JobRole,
        Self::JobType,
    ];

    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Designation => "designation",
            Self::Department => "department",
            Self::JobRole => "job_role",
            Self::JobType => "job_type",
        }
    }

    /// Parse an entity kind string.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown entity kind '{s}'. Must be one of: {}",
                    Self::ALL.map(|k| k.as_str()).join(", ")
                ))
            })
    }

    /// Lowercase noun used inside messages ("job role").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Designation => "designation",
            Self::Department => "department",
            Self::JobRole => "job role",
            Self::JobType => "job type",
        }
    }

    /// Capitalized noun used at the start of messages ("Job role").
    pub fn title(&self) -> &'static str {
        match self {
            Self::Degree => "Degree",
            Self::Designation => "Designation",
            Self::Department => "Department",
            Self::JobRole => "Job role",
            Self::JobType => "Job type",
        }
    }

    /// The import schema for this entity kind.
    pub fn schema(&self) -> FieldSchema {
        match self {
            Self::Degree => FieldSchema::new(
                *self,
                vec![
                    FieldDef::required_unique("name", "Name"),
                    FieldDef::optional("full_form", "Full form"),
                ],
            ),
            Self::Designation => {
                FieldSchema::new(*self, vec![FieldDef::required_unique("name", "Name")])
            }
            Self::Department => FieldSchema::new(
                *self,
                vec![
                    FieldDef::required_unique("name", "Name"),
                    FieldDef::optional("purpose", "Purpose"),
                ],
            ),
            Self::JobRole => FieldSchema::new(
                *self,
                vec![
                    FieldDef::required_unique("name", "Name"),
                    FieldDef::optional("responsibilities", "Responsibilities"),
                ],
            ),
            Self::JobType => FieldSchema::new(
                *self,
                vec![
                    FieldDef::required_unique("name", "Name"),
                    FieldDef::optional("color_code", "Color code")
                        .with_format(FieldFormat::HexColor),
                ],
            ),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field format
// ---------------------------------------------------------------------------

/// Value-format constraints a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    HexColor,
}

impl FieldFormat {
    /// Whether an already-trimmed, non-empty value conforms.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::HexColor => HEX_COLOR_RE.is_match(value),
        }
    }

    /// Human-readable hint appended to format errors.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::HexColor => "Must be a hex color like #1A2B3C",
        }
    }
}

// ---------------------------------------------------------------------------
// Field definitions
// ---------------------------------------------------------------------------

/// Definition of a single importable column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column header and record key.
    pub name: String,
    /// Human-readable label used in messages.
    pub label: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    /// Checked for duplicates within the file and against existing records.
    pub unique: bool,
}

impl FieldDef {
    pub fn optional(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            format: None,
            unique: false,
        }
    }

    pub fn required(name: &str, label: &str) -> Self {
        Self {
            required: true,
            ..Self::optional(name, label)
        }
    }

    pub fn required_unique(name: &str, label: &str) -> Self {
        Self {
            unique: true,
            ..Self::required(name, label)
        }
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Ordered field list for one entity kind.
///
/// Field order determines CSV column order on export and the order in which
/// violations are reported within a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub entity: EntityKind,
    pub fields: Vec<FieldDef>,
}

impl FieldSchema {
    pub fn new(entity: EntityKind, fields: Vec<FieldDef>) -> Self {
        Self { entity, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.unique)
    }
}
