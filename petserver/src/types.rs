//! Type definitions for the pet server
//!
//! Store-level records and the typed inputs produced by validation. Records
//! reference each other by id; views with expanded relations live in `shared`.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

use shared::{GroupId, GroupView, PetId, Sex, TraitId, TraitView};

/// Stored group row
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    pub id: GroupId,
    pub scientific_name: String,
    pub created_at: DateTime<Utc>,
}

impl GroupRecord {
    pub fn to_view(&self) -> GroupView {
        GroupView {
            id: self.id,
            scientific_name: self.scientific_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Stored trait row
#[derive(Debug, Clone, PartialEq)]
pub struct TraitRecord {
    pub id: TraitId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TraitRecord {
    pub fn to_view(&self) -> TraitView {
        TraitView {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Stored pet row; `trait_ids` is the pet-trait relation
#[derive(Debug, Clone, PartialEq)]
pub struct PetRecord {
    pub id: PetId,
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub sex: Sex,
    pub group_id: GroupId,
    pub trait_ids: BTreeSet<TraitId>,
}

/// Pet row before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewPetRecord {
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub sex: Sex,
    pub group_id: GroupId,
    pub trait_ids: BTreeSet<TraitId>,
}

impl NewPetRecord {
    pub fn with_id(self, id: PetId) -> PetRecord {
        PetRecord {
            id,
            name: self.name,
            age: self.age,
            weight: self.weight,
            sex: self.sex,
            group_id: self.group_id,
            trait_ids: self.trait_ids,
        }
    }
}

/// Validated create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub sex: Sex,
    pub group: String,
    pub traits: Vec<String>,
}

/// Validated partial-update payload; `None` means the field was absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub sex: Option<Sex>,
    pub group: Option<String>,
    pub traits: Option<Vec<String>>,
}

impl PetPatch {
    pub fn is_empty(&self) -> bool {
        *self == PetPatch::default()
    }
}

/// Which pets a listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetFilter {
    All,
    WithTrait(TraitId),
    /// The requested trait does not exist, so nothing matches
    NoSuchTrait,
}

/// Kinds of normalized entities a pet refers to by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Group,
    Trait,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Group => write!(f, "group"),
            EntityKind::Trait => write!(f, "trait"),
        }
    }
}

/// Reference to a reconciled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Group(GroupId),
    Trait(TraitId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Group(_) => EntityKind::Group,
            EntityRef::Trait(_) => EntityKind::Trait,
        }
    }
}

/// Case-insensitive key used by the unique name indexes
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}
