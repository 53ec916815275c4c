//! In-memory group repository

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use shared::{Component, GroupId, service_debug};
use crate::error::PetServerResult;
use crate::state::StoreState;
use crate::traits::GroupRepository;
use crate::types::GroupRecord;

/// Group repository backed by the shared store state
#[derive(Clone)]
pub struct RealGroupRepository {
    state: Arc<StoreState>,
}

impl RealGroupRepository {
    pub fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl GroupRepository for RealGroupRepository {
    async fn get_or_create(&self, scientific_name: &str) -> PetServerResult<GroupRecord> {
        let mut groups = self.state.groups.write().await;
        let (group, created) = groups.get_or_insert_with(scientific_name, |id| GroupRecord {
            id: GroupId(id),
            scientific_name: scientific_name.to_string(),
            created_at: Utc::now(),
        });

        if created {
            service_debug!(Component::Store, "Created group {} '{}'", group.id, group.scientific_name);
        }
        Ok(group)
    }

    async fn get(&self, id: GroupId) -> PetServerResult<Option<GroupRecord>> {
        let groups = self.state.groups.read().await;
        Ok(groups.get(id.0).cloned())
    }

    async fn count(&self) -> PetServerResult<usize> {
        Ok(self.state.groups.read().await.len())
    }
}
