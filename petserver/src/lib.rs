//! Pet registry server library
//!
//! CRUD HTTP API over pets and their lazily-created groups and traits,
//! built on injected repository traits so the services run against either
//! the in-memory store or mocks.

pub mod config;
pub mod core;
pub mod error;
pub mod server_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{Args, ServerConfig};
pub use error::{PetServerError, PetServerResult};
pub use server_impl::{AppState, InMemoryPetServer, PetServer};
pub use state::StoreState;
pub use types::*;

// Re-export trait definitions
pub use traits::{GroupRepository, PetRepository, TraitRepository};

// Re-export service implementations
pub use services::{RealGroupRepository, RealPetRepository, RealTraitRepository};
