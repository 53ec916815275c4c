//! Pet REST handlers
//!
//! Thin adapters between axum extractors and the pet services. Bodies are
//! taken as untyped JSON so validation can report every field at once.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use shared::{Component, Page, PetId, PetView, service_debug};
use crate::core::ListParams;
use crate::error::{PetServerError, PetServerResult};
use crate::server_impl::AppState;
use crate::traits::{GroupRepository, PetRepository, TraitRepository};

/// Non-numeric ids cannot name a pet, so they are reported as not found
fn parse_pet_id(raw: &str) -> PetServerResult<PetId> {
    raw.parse::<PetId>().map_err(|_| PetServerError::not_found(format!("Pet {raw}")))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> PetServerResult<Value> {
    body.map(|Json(value)| value).map_err(|rejection| PetServerError::MalformedBody {
        details: rejection.body_text(),
    })
}

fn list_query(query: Result<Query<ListParams>, QueryRejection>) -> PetServerResult<ListParams> {
    query.map(|Query(params)| params).map_err(|rejection| PetServerError::MalformedQuery {
        details: rejection.body_text(),
    })
}

/// POST /api/pets
pub async fn create_pet<G, T, P>(
    State(state): State<AppState<G, T, P>>,
    body: Result<Json<Value>, JsonRejection>,
) -> PetServerResult<(StatusCode, Json<PetView>)>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let body = json_body(body)?;
    let pet = state.service.create_from_json(&body).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// GET /api/pets?trait=<name>&page=<n>
pub async fn list_pets<G, T, P>(
    State(state): State<AppState<G, T, P>>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> PetServerResult<Json<Page<PetView>>>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let params = list_query(query)?;
    service_debug!(Component::Api, "Listing pets with {:?}", params);
    let page = state.listing.list(&params).await?;
    Ok(Json(page))
}

/// GET /api/pets/:pet_id
pub async fn retrieve_pet<G, T, P>(
    State(state): State<AppState<G, T, P>>,
    Path(pet_id): Path<String>,
) -> PetServerResult<Json<PetView>>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let id = parse_pet_id(&pet_id)?;
    Ok(Json(state.service.retrieve(id).await?))
}

/// PATCH /api/pets/:pet_id
pub async fn update_pet<G, T, P>(
    State(state): State<AppState<G, T, P>>,
    Path(pet_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> PetServerResult<Json<PetView>>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let id = parse_pet_id(&pet_id)?;
    let body = json_body(body)?;
    Ok(Json(state.service.update_from_json(id, &body).await?))
}

/// DELETE /api/pets/:pet_id
pub async fn delete_pet<G, T, P>(
    State(state): State<AppState<G, T, P>>,
    Path(pet_id): Path<String>,
) -> PetServerResult<StatusCode>
where
    G: GroupRepository + 'static,
    T: TraitRepository + 'static,
    P: PetRepository + 'static,
{
    let id = parse_pet_id(&pet_id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
