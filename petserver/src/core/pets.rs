//! Pet record service
//!
//! Create, retrieve, partial-update and delete of pets. Group and trait
//! names are resolved through the `EntityReconciler`; all writes of a pet row
//! and its trait relation go through a single repository call.

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

use shared::{Component, PetId, PetView, TraitId, service_info};
use crate::core::reconciler::EntityReconciler;
use crate::core::validation;
use crate::error::{PetServerError, PetServerResult};
use crate::traits::{GroupRepository, PetRepository, TraitRepository};
use crate::types::{NewPet, NewPetRecord, PetPatch, PetRecord, TraitRecord};

pub struct PetService<G, T, P> {
    reconciler: EntityReconciler<G, T>,
    pets: Arc<P>,
}

fn trait_ids(records: Vec<TraitRecord>) -> BTreeSet<TraitId> {
    records.into_iter().map(|record| record.id).collect()
}

fn pet_not_found(id: PetId) -> PetServerError {
    PetServerError::not_found(format!("Pet {id}"))
}

impl<G, T, P> PetService<G, T, P>
where
    G: GroupRepository,
    T: TraitRepository,
    P: PetRepository,
{
    pub fn new(groups: Arc<G>, traits: Arc<T>, pets: Arc<P>) -> Self {
        Self {
            reconciler: EntityReconciler::new(groups, traits),
            pets,
        }
    }

    pub fn reconciler(&self) -> &EntityReconciler<G, T> {
        &self.reconciler
    }

    pub fn pets(&self) -> &Arc<P> {
        &self.pets
    }

    pub async fn create(&self, new_pet: NewPet) -> PetServerResult<PetView> {
        let group = self.reconciler.reconcile_group(&new_pet.group).await?;
        let traits = self.reconciler.reconcile_traits(&new_pet.traits).await?;

        let record = self
            .pets
            .insert(NewPetRecord {
                name: new_pet.name,
                age: new_pet.age,
                weight: new_pet.weight,
                sex: new_pet.sex,
                group_id: group.id,
                trait_ids: trait_ids(traits),
            })
            .await?;

        service_info!(Component::Api, "Created pet {} '{}' in group '{}'", record.id, record.name, group.scientific_name);
        self.render(record).await
    }

    /// Validates and creates from a raw request body
    pub async fn create_from_json(&self, body: &Value) -> PetServerResult<PetView> {
        let new_pet = validation::validate_new_pet(body)?;
        self.create(new_pet).await
    }

    pub async fn retrieve(&self, id: PetId) -> PetServerResult<PetView> {
        let record = self.pets.get(id).await?.ok_or_else(|| pet_not_found(id))?;
        self.render(record).await
    }

    pub async fn update(&self, id: PetId, patch: PetPatch) -> PetServerResult<PetView> {
        let record = self.pets.get(id).await?.ok_or_else(|| pet_not_found(id))?;
        self.apply_patch(record, patch).await
    }

    /// Unknown ids are reported before the body is validated
    pub async fn update_from_json(&self, id: PetId, body: &Value) -> PetServerResult<PetView> {
        let record = self.pets.get(id).await?.ok_or_else(|| pet_not_found(id))?;
        let patch = validation::validate_patch(body)?;
        self.apply_patch(record, patch).await
    }

    async fn apply_patch(&self, mut record: PetRecord, patch: PetPatch) -> PetServerResult<PetView> {
        if patch.is_empty() {
            return self.render(record).await;
        }

        if let Some(group) = patch.group {
            record.group_id = self.reconciler.reconcile_group(&group).await?.id;
        }
        if let Some(traits) = patch.traits {
            // Full replace: the previous relation is discarded, not merged
            record.trait_ids = trait_ids(self.reconciler.reconcile_traits(&traits).await?);
        }
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(age) = patch.age {
            record.age = age;
        }
        if let Some(weight) = patch.weight {
            record.weight = weight;
        }
        if let Some(sex) = patch.sex {
            record.sex = sex;
        }

        self.pets.save(record.clone()).await?;
        service_info!(Component::Api, "Updated pet {}", record.id);
        self.render(record).await
    }

    pub async fn delete(&self, id: PetId) -> PetServerResult<()> {
        if !self.pets.delete(id).await? {
            return Err(pet_not_found(id));
        }
        service_info!(Component::Api, "Deleted pet {}", id);
        Ok(())
    }

    /// Expand a stored row into its serialized form
    pub async fn render(&self, record: PetRecord) -> PetServerResult<PetView> {
        let group = self
            .reconciler
            .groups()
            .get(record.group_id)
            .await?
            .ok_or_else(|| PetServerError::store(format!("dangling group reference {}", record.group_id)))?;
        let traits = self.reconciler.traits().get_many(&record.trait_ids).await?;

        Ok(PetView {
            id: record.id,
            name: record.name,
            age: record.age,
            weight: record.weight,
            sex: record.sex,
            group: group.to_view(),
            traits: traits.iter().map(TraitRecord::to_view).collect(),
        })
    }
}
