//! Main server implementation
//!
//! `PetServer` wires the repositories into the services and the services into
//! the axum router, using dependency injection over the repository traits.

use axum::{Router, routing::get};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use shared::{Component, logging, service_info};
use crate::config::{PETS_PATH, ServerConfig};
use crate::core::{PetListing, PetService};
use crate::error::{PetServerError, PetServerResult};
use crate::services::{RealGroupRepository, RealPetRepository, RealTraitRepository};
use crate::state::StoreState;
use crate::traits::{GroupRepository, PetRepository, TraitRepository};
use crate::web::handlers::{health, pets};

/// State handed to every handler
pub struct AppState<G, T, P> {
    pub service: Arc<PetService<G, T, P>>,
    pub listing: Arc<PetListing<G, T, P>>,
    pub started_at: Instant,
}

impl<G, T, P> Clone for AppState<G, T, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            listing: Arc::clone(&self.listing),
            started_at: self.started_at,
        }
    }
}

/// Pet server with injected repositories
pub struct PetServer<G, T, P> {
    config: ServerConfig,
    state: AppState<G, T, P>,
}

/// Server backed by the in-memory store
pub type InMemoryPetServer = PetServer<RealGroupRepository, RealTraitRepository, RealPetRepository>;

impl InMemoryPetServer {
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = Arc::new(StoreState::new());
        Self::new(
            config,
            RealGroupRepository::new(store.clone()),
            RealTraitRepository::new(store.clone()),
            RealPetRepository::new(store),
        )
    }
}

impl<G, T, P> PetServer<G, T, P>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    pub fn new(config: ServerConfig, groups: G, traits: T, pets: P) -> Self {
        let service = Arc::new(PetService::new(Arc::new(groups), Arc::new(traits), Arc::new(pets)));
        let listing = Arc::new(PetListing::new(service.clone(), config.page_size, PETS_PATH));

        Self {
            config,
            state: AppState {
                service,
                listing,
                started_at: Instant::now(),
            },
        }
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route(
                PETS_PATH,
                get(pets::list_pets::<G, T, P>).post(pets::create_pet::<G, T, P>),
            )
            .route(
                &format!("{PETS_PATH}/:pet_id"),
                get(pets::retrieve_pet::<G, T, P>)
                    .patch(pets::update_pet::<G, T, P>)
                    .delete(pets::delete_pet::<G, T, P>),
            )
            .route("/health", get(health::health_check::<G, T, P>))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(self.state.clone())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState<G, T, P> {
        &self.state
    }

    /// Serve until Ctrl+C
    pub async fn run(&self) -> PetServerResult<()> {
        let router = self.build_router();
        let address = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|e| PetServerError::ServerStartup(format!("Failed to bind to {address}: {e}")))?;

        service_info!(Component::Api, "🌐 Pet registry listening on http://{}{}", address, PETS_PATH);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(Component::Api, "Received Ctrl+C signal"),
        Err(err) => logging::log_error(Component::Api, "Signal handling", &err),
    }
}
