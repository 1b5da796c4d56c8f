use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    Json,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Filter, Resource};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::Record;

fn not_found<R: Resource>(id: impl ToString) -> ApiError {
    ApiError::NotFound {
        resource: R::PATH,
        id: id.to_string(),
    }
}

/// An id that is not a UUID cannot name any record.
fn parse_id<R: Resource>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| not_found::<R>(raw))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn list<R: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<R>>> {
    let rows = R::store(&state).fetch_all().await?;
    debug!(count = rows.len(), "listed");
    Ok(Json(rows))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<R>)> {
    let Json(draft) = body.inspect_err(|e| warn!(error = %e, "unreadable body"))?;
    R::validate(&draft).inspect_err(|e| warn!(error = %e, "rejected"))?;
    let record = R::store(&state).insert(draft).await?;
    info!(id = %record.id(), record = %record, "created");
    let location = format!("/api/{}/{}/", R::PATH, record.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

#[instrument(skip(state), fields(resource = R::PATH))]
pub async fn retrieve<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<R>> {
    let id = parse_id::<R>(&id)?;
    let record = R::store(&state)
        .get(id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    Ok(Json(record))
}

#[instrument(skip(state, body), fields(resource = R::PATH))]
pub async fn replace<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> ApiResult<Json<R>> {
    let id = parse_id::<R>(&id)?;
    let Json(draft) = body.inspect_err(|e| warn!(error = %e, "unreadable body"))?;
    R::validate(&draft).inspect_err(|e| warn!(error = %e, "rejected"))?;
    let record = R::store(&state)
        .update(id, draft)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    info!(record = %record, "replaced");
    Ok(Json(record))
}

#[instrument(skip(state, body), fields(resource = R::PATH))]
pub async fn patch<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<R>> {
    let id = parse_id::<R>(&id)?;
    let Json(changes) = body?;
    let store = R::store(&state);
    let current = store.get(id).await?.ok_or_else(|| not_found::<R>(id))?;
    let draft = merge_changes(&current, changes)?;
    R::validate(&draft).inspect_err(|e| warn!(error = %e, "rejected"))?;
    let record = store
        .update(id, draft)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    info!(record = %record, "patched");
    Ok(Json(record))
}

#[instrument(skip(state), fields(resource = R::PATH))]
pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id::<R>(&id)?;
    if !R::store(&state).delete(id).await? {
        return Err(not_found::<R>(id));
    }
    info!(%id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Exact-match filter. An absent or empty parameter is a client error, never a full listing.
#[instrument(skip_all, fields(resource = R::PATH, action = filter.action))]
pub async fn filter<R: Resource>(
    state: AppState,
    params: HashMap<String, String>,
    filter: &'static Filter,
) -> ApiResult<Json<Vec<R>>> {
    let value = params
        .get(filter.param)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(filter.param))?;
    let rows = R::store(&state)
        .fetch_where(filter.column, value, filter.order.or(R::DEFAULT_ORDER))
        .await?;
    debug!(%value, count = rows.len(), "filtered");
    Ok(Json(rows))
}

/// Overlays the supplied fields on the stored record and reads the result back as a draft.
fn merge_changes<R: Record>(current: &R, changes: Value) -> ApiResult<R::Draft> {
    let Value::Object(changes) = changes else {
        return Err(ApiError::InvalidBody("expected a JSON object".into()));
    };
    let mut merged = serde_json::to_value(current)
        .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in changes {
            if key != "id" {
                fields.insert(key, value);
            }
        }
    }
    serde_json::from_value(merged).map_err(|e| ApiError::InvalidBody(e.to_string()))
}
