//! Repository trait definitions for dependency injection
//!
//! All store access goes through these traits so the services can be tested
//! with mockall mocks instead of a real store.

use async_trait::async_trait;
use std::collections::BTreeSet;

use shared::{GroupId, PetId, TraitId};
use crate::error::PetServerResult;
use crate::types::{GroupRecord, NewPetRecord, PetFilter, PetRecord, TraitRecord};

/// Group table access
#[mockall::automock]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Atomically return the group matching `scientific_name` case-insensitively,
    /// inserting it with the given casing if none exists
    async fn get_or_create(&self, scientific_name: &str) -> PetServerResult<GroupRecord>;

    /// Fetch a group by id
    async fn get(&self, id: GroupId) -> PetServerResult<Option<GroupRecord>>;

    /// Number of stored groups
    async fn count(&self) -> PetServerResult<usize>;
}

/// Trait table access
#[mockall::automock]
#[async_trait]
pub trait TraitRepository: Send + Sync {
    /// Case-insensitive exact match on the trait name
    async fn find_by_name(&self, name: &str) -> PetServerResult<Option<TraitRecord>>;

    /// Atomically return the trait matching `name` case-insensitively,
    /// inserting it with the given casing if none exists
    async fn get_or_create(&self, name: &str) -> PetServerResult<TraitRecord>;

    /// Fetch the traits with the given ids, ordered by id
    async fn get_many(&self, ids: &BTreeSet<TraitId>) -> PetServerResult<Vec<TraitRecord>>;

    /// Number of stored traits
    async fn count(&self) -> PetServerResult<usize>;
}

/// Pet table and pet-trait relation access
#[mockall::automock]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a pet together with its trait relations
    async fn insert(&self, pet: NewPetRecord) -> PetServerResult<PetRecord>;

    /// Fetch a pet by id
    async fn get(&self, id: PetId) -> PetServerResult<Option<PetRecord>>;

    /// Replace the stored row and its trait relations in one step
    async fn save(&self, pet: PetRecord) -> PetServerResult<()>;

    /// Remove a pet; returns false if it did not exist
    async fn delete(&self, id: PetId) -> PetServerResult<bool>;

    /// Number of pets matching the filter
    async fn count(&self, filter: &PetFilter) -> PetServerResult<usize>;

    /// Pets matching the filter ordered by id, skipping `offset` and returning at most `limit`
    async fn list(&self, filter: &PetFilter, offset: usize, limit: usize) -> PetServerResult<Vec<PetRecord>>;
}
