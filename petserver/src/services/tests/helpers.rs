//! Test helpers for repository tests

use std::sync::Arc;

use crate::services::{RealGroupRepository, RealPetRepository, RealTraitRepository};
use crate::state::StoreState;

/// Create a fresh store state for testing
pub fn create_test_state() -> Arc<StoreState> {
    Arc::new(StoreState::new())
}

/// Repositories sharing one fresh store
pub fn create_test_repositories() -> (RealGroupRepository, RealTraitRepository, RealPetRepository) {
    let state = create_test_state();
    (
        RealGroupRepository::new(state.clone()),
        RealTraitRepository::new(state.clone()),
        RealPetRepository::new(state),
    )
}
