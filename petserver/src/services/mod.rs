//! Service implementations
//!
//! In-memory repository implementations used in production and in the
//! integration tests.

pub mod group_repository;
pub mod pet_repository;
pub mod trait_repository;

#[cfg(test)]
mod tests;

pub use group_repository::RealGroupRepository;
pub use pet_repository::RealPetRepository;
pub use trait_repository::RealTraitRepository;
