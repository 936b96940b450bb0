//! Team member model.
//!
//! # Responsibility
//! - Define the canonical member record and its creation draft.
//! - Own the department vocabulary used by filters.
//!
//! # Invariants
//! - `id` is assigned by the repository and never reassigned.
//! - `skills` is an ordered set (no blanks, no duplicates).

use crate::model::validation::{normalize_label_set, require_non_empty, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable member identifier (client-generated, timestamp based).
pub type MemberId = i64;

/// Avatar used when a draft does not pick one.
pub const DEFAULT_AVATAR: &str = "👨‍💼";

/// Avatars offered by the add-member form.
pub const AVATAR_OPTIONS: [&str; 8] = [
    "👨‍💼", "👩‍💼", "👨‍💻", "👩‍💻", "👨‍🎨", "👩‍🎨", "👨‍🔬", "👩‍🔬",
];

/// Organizational unit a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Design,
    Product,
    Marketing,
    Sales,
}

impl Department {
    /// All departments in display order.
    pub const ALL: [Department; 5] = [
        Department::Engineering,
        Department::Design,
        Department::Product,
        Department::Marketing,
        Department::Sales,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Design => "Design",
            Self::Product => "Product",
            Self::Marketing => "Marketing",
            Self::Sales => "Sales",
        }
    }

    /// Parses the exact department name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|department| department.as_str() == value)
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical member record as persisted and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar: String,
    pub department: Department,
    /// Calendar date (UTC) the member was added.
    pub join_date: NaiveDate,
    pub skills: Vec<String>,
}

/// Form input for creating a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    pub name: String,
    pub role: String,
    pub email: String,
    pub department: Department,
    pub avatar: String,
    pub skills: Vec<String>,
}

impl Default for MemberDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            email: String::new(),
            department: Department::Engineering,
            avatar: DEFAULT_AVATAR.to_string(),
            skills: Vec::new(),
        }
    }
}

impl MemberDraft {
    /// Creates a draft with the three required fields and form defaults.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_department(mut self, department: Department) -> Self {
        self.department = department;
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Appends one skill; blanks and duplicates are ignored.
    pub fn with_skill(mut self, skill: impl AsRef<str>) -> Self {
        self.skills.push(skill.as_ref().to_string());
        self.skills = normalize_label_set(&self.skills);
        self
    }

    /// Checks that `name`, `role` and `email` are all present.
    ///
    /// No format or uniqueness checks are applied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("role", &self.role)?;
        require_non_empty("email", &self.email)?;
        Ok(())
    }

    /// Builds the member record from this draft.
    pub(crate) fn into_member(self, id: MemberId, join_date: NaiveDate) -> Member {
        let avatar = if self.avatar.trim().is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            self.avatar
        };
        Member {
            id,
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            email: self.email.trim().to_string(),
            avatar,
            department: self.department,
            join_date,
            skills: normalize_label_set(&self.skills),
        }
    }
}
