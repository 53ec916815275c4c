//! Core business logic
//!
//! Pure service logic over the repository traits; no HTTP types in here.

pub mod listing;
pub mod pets;
pub mod reconciler;
pub mod validation;

pub use listing::{DEFAULT_PAGE_SIZE, ListParams, PetListing};
pub use pets::PetService;
pub use reconciler::EntityReconciler;
