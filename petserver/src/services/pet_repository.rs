//! In-memory pet repository
//!
//! Pet rows hold their trait ids directly, so replacing a row in `save`
//! rewrites the pet-trait relation in the same write.

use async_trait::async_trait;
use std::sync::Arc;

use shared::{Component, PetId, service_debug};
use crate::error::{PetServerError, PetServerResult};
use crate::state::StoreState;
use crate::traits::PetRepository;
use crate::types::{NewPetRecord, PetFilter, PetRecord};

/// Pet repository backed by the shared store state
#[derive(Clone)]
pub struct RealPetRepository {
    state: Arc<StoreState>,
}

impl RealPetRepository {
    pub fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }
}

fn matches(pet: &PetRecord, filter: &PetFilter) -> bool {
    match filter {
        PetFilter::All => true,
        PetFilter::WithTrait(trait_id) => pet.trait_ids.contains(trait_id),
        PetFilter::NoSuchTrait => false,
    }
}

#[async_trait]
impl PetRepository for RealPetRepository {
    async fn insert(&self, pet: NewPetRecord) -> PetServerResult<PetRecord> {
        let mut pets = self.state.pets.write().await;
        let id = pets.allocate_id();
        let record = pet.with_id(id);
        pets.rows.insert(id, record.clone());

        service_debug!(Component::Store, "Inserted pet {} with {} traits", id, record.trait_ids.len());
        Ok(record)
    }

    async fn get(&self, id: PetId) -> PetServerResult<Option<PetRecord>> {
        let pets = self.state.pets.read().await;
        Ok(pets.rows.get(&id).cloned())
    }

    async fn save(&self, pet: PetRecord) -> PetServerResult<()> {
        let mut pets = self.state.pets.write().await;
        match pets.rows.get_mut(&pet.id) {
            Some(row) => {
                *row = pet;
                Ok(())
            }
            // Deleted between the caller's read and this write
            None => Err(PetServerError::not_found(format!("Pet {}", pet.id))),
        }
    }

    async fn delete(&self, id: PetId) -> PetServerResult<bool> {
        let mut pets = self.state.pets.write().await;
        let removed = pets.rows.remove(&id).is_some();
        if removed {
            service_debug!(Component::Store, "Deleted pet {}", id);
        }
        Ok(removed)
    }

    async fn count(&self, filter: &PetFilter) -> PetServerResult<usize> {
        let pets = self.state.pets.read().await;
        Ok(pets.rows.values().filter(|pet| matches(pet, filter)).count())
    }

    async fn list(&self, filter: &PetFilter, offset: usize, limit: usize) -> PetServerResult<Vec<PetRecord>> {
        let pets = self.state.pets.read().await;
        Ok(pets
            .rows
            .values()
            .filter(|pet| matches(pet, filter))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
