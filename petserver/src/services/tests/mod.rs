//! Service tests for the in-memory repositories

pub mod helpers;
