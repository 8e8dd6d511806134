//! Members and group rosters.
//!
//! A `Group` is the roster supplied by the external group store. Every
//! request or assignment that names a member resolves the name against the
//! group, so unknown names are rejected when the value is built rather than
//! when it is submitted.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A member of a group, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Member(String);

impl Member {
    /// Creates a member from a name. Surrounding whitespace is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "member",
                reason: "name cannot be blank".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the member name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Member {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Member> for String {
    fn from(member: Member) -> Self {
        member.0
    }
}

/// A named roster of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    members: BTreeSet<Member>,
}

impl Group {
    /// Creates a group. Duplicate member names collapse into one member.
    ///
    /// # Errors
    ///
    /// Returns an error if the group name or any member name is blank.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "group",
                reason: "name cannot be blank".to_string(),
            });
        }
        let members = members
            .into_iter()
            .map(Member::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { name, members })
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over members in name order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Returns true if the member belongs to this group.
    #[must_use]
    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }

    /// Resolves a member name against the roster.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownMember` if the name is not on the roster.
    pub fn resolve(&self, name: &str) -> Result<Member, ValidationError> {
        let member = Member::new(name)?;
        if self.members.contains(&member) {
            Ok(member)
        } else {
            Err(ValidationError::UnknownMember {
                group: self.name.clone(),
                member: member.0,
            })
        }
    }

    /// Checks that an already-built member belongs to this group.
    pub(crate) fn ensure_member(&self, member: &Member) -> Result<(), ValidationError> {
        if self.contains(member) {
            Ok(())
        } else {
            Err(ValidationError::UnknownMember {
                group: self.name.clone(),
                member: member.to_string(),
            })
        }
    }
}
