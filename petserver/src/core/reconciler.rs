//! Entity reconciliation
//!
//! Resolves the free-text group and trait names of a pet payload to stored
//! rows, creating rows on first reference. Matching is case-insensitive and
//! the stored casing is whatever the first writer used.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::PetServerResult;
use crate::traits::{GroupRepository, TraitRepository};
use crate::types::{EntityKind, EntityRef, GroupRecord, TraitRecord};

pub struct EntityReconciler<G, T> {
    groups: Arc<G>,
    traits: Arc<T>,
}

impl<G, T> Clone for EntityReconciler<G, T> {
    fn clone(&self) -> Self {
        Self {
            groups: Arc::clone(&self.groups),
            traits: Arc::clone(&self.traits),
        }
    }
}

impl<G, T> EntityReconciler<G, T>
where
    G: GroupRepository,
    T: TraitRepository,
{
    pub fn new(groups: Arc<G>, traits: Arc<T>) -> Self {
        Self { groups, traits }
    }

    /// Find-or-create the entity of `kind` named `name`
    pub async fn reconcile(&self, kind: EntityKind, name: &str) -> PetServerResult<EntityRef> {
        match kind {
            EntityKind::Group => Ok(EntityRef::Group(self.reconcile_group(name).await?.id)),
            EntityKind::Trait => Ok(EntityRef::Trait(self.traits.get_or_create(name).await?.id)),
        }
    }

    pub async fn reconcile_group(&self, scientific_name: &str) -> PetServerResult<GroupRecord> {
        self.groups.get_or_create(scientific_name).await
    }

    /// Reconciles every name, dropping repeats that resolve to the same trait.
    /// Order of first appearance is kept.
    pub async fn reconcile_traits(&self, names: &[String]) -> PetServerResult<Vec<TraitRecord>> {
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(names.len());

        for name in names {
            let record = self.traits.get_or_create(name).await?;
            if seen.insert(record.id) {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Lookup without creating, used by filters
    pub async fn find_trait(&self, name: &str) -> PetServerResult<Option<TraitRecord>> {
        self.traits.find_by_name(name).await
    }

    pub fn groups(&self) -> &Arc<G> {
        &self.groups
    }

    pub fn traits(&self) -> &Arc<T> {
        &self.traits
    }
}
