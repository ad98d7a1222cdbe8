use crate::{
    ResourceContext,
    error::ApiError,
    id::RecordId,
    schema::{validate_create, validate_update},
    store::Record,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;

// The five controller operations, generic over the resource's declared field
// schema. Both collections (/users and /products) bind these same handlers
// with a different `ResourceContext`; the documented paths below show the
// /users instance and /products mirrors them exactly.
//
// Ordering discipline shared by every operation: the identifier codec runs
// before any store call that takes an id, and payload validation runs before
// any store mutation. "Malformed id", "bad payload", "id not found" and
// "store failure" thereby stay distinct, independently testable outcomes.

/// create_record
///
/// Validates the payload against the declared schema (fail-fast, in declared
/// field order) and persists a new record. The store assigns the identifier.
#[utoipa::path(
    post,
    path = "/users",
    tag = "records",
    responses(
        (status = 201, description = "Created record, fields flattened next to its id"),
        (status = 400, description = "Missing or malformed required field"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_record(
    State(ctx): State<ResourceContext>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let fields = validate_create(ctx.schema, &payload)?;
    let record = ctx.store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// list_records
///
/// Enumerates the whole collection. An empty collection is a 200 with an
/// empty array, never an error.
#[utoipa::path(
    get,
    path = "/users",
    tag = "records",
    responses(
        (status = 200, description = "All records, possibly empty"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_records(
    State(ctx): State<ResourceContext>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = ctx.store.find_all().await?;
    Ok(Json(records))
}

/// get_record
///
/// Retrieves a single record by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "records",
    params(("id" = String, Path, description = "24-character hex record id")),
    responses(
        (status = 200, description = "Found"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No record under this id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_record(
    State(ctx): State<ResourceContext>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = RecordId::parse(&id)?;
    match ctx.store.find_by_id(&id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(ctx.schema.resource)),
    }
}

/// update_record
///
/// Merges the supplied fields over the existing record. All fields are
/// optional but any present one must be well-shaped; an empty payload is a
/// valid no-op returning the record unchanged. Bound to both PATCH and PUT.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "records",
    params(("id" = String, Path, description = "24-character hex record id")),
    responses(
        (status = 200, description = "Updated record"),
        (status = 400, description = "Malformed id or malformed field"),
        (status = 404, description = "No record under this id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_record(
    State(ctx): State<ResourceContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Record>, ApiError> {
    let id = RecordId::parse(&id)?;
    let fields = validate_update(ctx.schema, &payload)?;
    match ctx.store.update(&id, fields).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(ctx.schema.resource)),
    }
}

/// delete_record
///
/// Removes a record and returns its last state, so callers can confirm what
/// was removed. Deletion is terminal: a second delete on the same id is a 404.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "records",
    params(("id" = String, Path, description = "24-character hex record id")),
    responses(
        (status = 200, description = "Deleted record's last state"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No record under this id"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_record(
    State(ctx): State<ResourceContext>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = RecordId::parse(&id)?;
    match ctx.store.delete_by_id(&id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(ctx.schema.resource)),
    }
}
