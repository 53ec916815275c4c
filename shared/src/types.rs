//! Core types used throughout the pet registry
//!
//! Identifiers, the `Sex` choice and the serialized views returned by the
//! HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Identifier of a pet row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

/// Identifier of a group row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

/// Identifier of a trait row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PetId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(PetId)
            .ok_or_else(|| SharedError::InvalidId { input: s.to_string() })
    }
}

/// Sex of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "Male")]
    Male,
    #[serde(rename = "Female")]
    Female,
    #[default]
    #[serde(rename = "Not Informed")]
    NotInformed,
}

impl Sex {
    pub const CHOICES: [Sex; 3] = [Sex::Male, Sex::Female, Sex::NotInformed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::NotInformed => "Not Informed",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = SharedError;

    /// Choices are matched exactly, the same way they are serialized
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sex::CHOICES
            .into_iter()
            .find(|choice| choice.as_str() == s)
            .ok_or_else(|| SharedError::InvalidChoice {
                field: "sex".to_string(),
                value: s.to_string(),
            })
    }
}

/// Serialized group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: GroupId,
    pub scientific_name: String,
    pub created_at: DateTime<Utc>,
}

/// Serialized trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitView {
    pub id: TraitId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Serialized pet with its group and traits expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetView {
    pub id: PetId,
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub sex: Sex,
    pub group: GroupView,
    pub traits: Vec<TraitView>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
