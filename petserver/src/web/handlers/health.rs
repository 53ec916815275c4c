//! Health check endpoint

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{Value, json};

use crate::error::PetServerResult;
use crate::server_impl::AppState;
use crate::traits::{GroupRepository, PetRepository, TraitRepository};
use crate::types::PetFilter;

/// GET /health
pub async fn health_check<G, T, P>(State(state): State<AppState<G, T, P>>) -> PetServerResult<Json<Value>>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let pets = state.service.pets().count(&PetFilter::All).await?;
    let groups = state.service.reconciler().groups().count().await?;
    let traits = state.service.reconciler().traits().count().await?;

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "uptime": state.started_at.elapsed().as_secs(),
        "pets": pets,
        "groups": groups,
        "traits": traits,
        "version": env!("CARGO_PKG_VERSION")
    })))
}
