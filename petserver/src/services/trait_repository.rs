//! In-memory trait repository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;

use shared::{Component, TraitId, service_debug};
use crate::error::{PetServerError, PetServerResult};
use crate::state::StoreState;
use crate::traits::TraitRepository;
use crate::types::TraitRecord;

/// Trait repository backed by the shared store state
#[derive(Clone)]
pub struct RealTraitRepository {
    state: Arc<StoreState>,
}

impl RealTraitRepository {
    pub fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl TraitRepository for RealTraitRepository {
    async fn find_by_name(&self, name: &str) -> PetServerResult<Option<TraitRecord>> {
        let traits = self.state.traits.read().await;
        Ok(traits.find(name).cloned())
    }

    async fn get_or_create(&self, name: &str) -> PetServerResult<TraitRecord> {
        let mut traits = self.state.traits.write().await;
        let (record, created) = traits.get_or_insert_with(name, |id| TraitRecord {
            id: TraitId(id),
            name: name.to_string(),
            created_at: Utc::now(),
        });

        if created {
            service_debug!(Component::Store, "Created trait {} '{}'", record.id, record.name);
        }
        Ok(record)
    }

    async fn get_many(&self, ids: &BTreeSet<TraitId>) -> PetServerResult<Vec<TraitRecord>> {
        let traits = self.state.traits.read().await;
        ids.iter()
            .map(|id| {
                traits
                    .get(id.0)
                    .cloned()
                    .ok_or_else(|| PetServerError::store(format!("dangling trait reference {id}")))
            })
            .collect()
    }

    async fn count(&self) -> PetServerResult<usize> {
        Ok(self.state.traits.read().await.len())
    }
}
