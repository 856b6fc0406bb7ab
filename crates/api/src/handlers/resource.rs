//! Generic CRUD handlers shared by genres, directors and movies.
//!
//! Every handler is parameterised by a [`Resource`]: the entity type picks
//! its repository out of the [`reel_db::Store`] and carries the permission
//! policy that gates each operation. Routes instantiate them per entity, e.g.
//! `get(resource::list::<Genre>)`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reel_core::error::CoreError;
use reel_core::pagination::Page;
use reel_core::permission::{Operation, Requester, ResourcePolicy};
use reel_core::types::DbId;
use reel_core::validation::{validate_payload, WriteMode};
use reel_db::models::director::Director;
use reel_db::models::genre::Genre;
use reel_db::models::movie::Movie;
use reel_db::{Entity, Repository};

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::RequestIdentity;
use crate::query::PaginationParams;
use crate::response::DeleteAck;
use crate::state::AppState;

/// An entity served over HTTP, with the rules for who may do what to it.
pub trait Resource: Entity {
    const POLICY: ResourcePolicy;
}

impl Resource for Genre {
    const POLICY: ResourcePolicy = ResourcePolicy::CATALOG;
}

impl Resource for Director {
    const POLICY: ResourcePolicy = ResourcePolicy::CATALOG;
}

impl Resource for Movie {
    const POLICY: ResourcePolicy = ResourcePolicy::CATALOG;
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// GET /api/{resource}?limit=&offset=
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    QueryParams(params): QueryParams<PaginationParams>,
) -> AppResult<Json<Page<R>>> {
    R::POLICY.authorize(Operation::List, &requester, None)?;

    let repo = R::repository(&state.store);
    let count = repo.count().await?;
    let window = state
        .config
        .pagination
        .resolve(count, params.limit, params.offset)?;
    let data = repo.list(window.limit, window.skip()).await?;

    Ok(Json(Page::new(window, data)))
}

/// POST /api/{resource}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    JsonBody(input): JsonBody<R::Payload>,
) -> AppResult<(StatusCode, Json<R>)> {
    R::POLICY.authorize(Operation::Create, &requester, None)?;
    validate_payload(&input, WriteMode::Full)?;

    let entity = R::repository(&state.store)
        .create(&input, requester.user_id())
        .await?;

    tracing::info!(
        entity = R::NAME,
        id = entity.id(),
        user_id = ?requester.user_id(),
        "Entity created"
    );
    Ok((StatusCode::CREATED, Json(entity)))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /api/{resource}/{id}
pub async fn retrieve<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<R>> {
    let entity = find::<R>(R::repository(&state.store), id).await?;
    R::POLICY.authorize(Operation::Retrieve, &requester, entity.owner_id())?;
    Ok(Json(entity))
}

/// PUT /api/{resource}/{id}
///
/// Every required field must be supplied.
pub async fn replace<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<R::Payload>,
) -> AppResult<Json<R>> {
    update::<R>(&state, &requester, id, &input, WriteMode::Full).await
}

/// PATCH /api/{resource}/{id}
///
/// Only the supplied fields are validated and written.
pub async fn patch<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    PathParam(id): PathParam<DbId>,
    JsonBody(input): JsonBody<R::Payload>,
) -> AppResult<Json<R>> {
    update::<R>(&state, &requester, id, &input, WriteMode::Partial).await
}

/// DELETE /api/{resource}/{id}
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    RequestIdentity(requester): RequestIdentity,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<DeleteAck>> {
    let repo = R::repository(&state.store);
    let entity = find::<R>(repo, id).await?;

    if let Err(err) = R::POLICY.authorize(Operation::Delete, &requester, entity.owner_id()) {
        tracing::warn!(
            entity = R::NAME,
            id,
            user_id = ?requester.user_id(),
            "Delete denied"
        );
        return Err(err.into());
    }

    if !repo.delete(id).await? {
        return Err(not_found::<R>(id));
    }

    tracing::info!(entity = R::NAME, id, user_id = ?requester.user_id(), "Entity deleted");
    Ok(Json(DeleteAck::deleted()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn update<R: Resource>(
    state: &AppState,
    requester: &Requester,
    id: DbId,
    input: &R::Payload,
    mode: WriteMode,
) -> AppResult<Json<R>> {
    let repo = R::repository(&state.store);
    let existing = find::<R>(repo, id).await?;
    R::POLICY.authorize(Operation::Update, requester, existing.owner_id())?;
    validate_payload(input, mode)?;

    let entity = repo
        .update(id, input)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    let partial = mode == WriteMode::Partial;
    tracing::info!(
        entity = R::NAME,
        id,
        user_id = ?requester.user_id(),
        partial,
        "Entity updated"
    );
    Ok(Json(entity))
}

async fn find<R: Resource>(repo: &dyn Repository<R>, id: DbId) -> AppResult<R> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| not_found::<R>(id))
}

fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: R::NAME,
        id,
    })
}
