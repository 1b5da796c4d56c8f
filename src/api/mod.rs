use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};

use crate::error::ApiResult;
use crate::models::{Activity, LeaderboardEntry, Team, User, Workout};
use crate::state::AppState;
use crate::store::{OrderBy, Record, RecordStore};

mod handlers;
mod resources;
mod validate;

/// A named exact-match query exposed as `GET /api/<resource>/<action>/?<param>=...`.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub action: &'static str,
    pub param: &'static str,
    pub column: &'static str,
    pub order: Option<OrderBy>,
}

/// Binds a record type to its URL segment, store handle and filter table.
pub trait Resource: Record {
    const PATH: &'static str;
    const FILTERS: &'static [Filter] = &[];

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>>;

    fn validate(_draft: &Self::Draft) -> ApiResult<()> {
        Ok(())
    }
}

pub const RESOURCE_PATHS: [&str; 5] = [
    User::PATH,
    Team::PATH,
    Activity::PATH,
    LeaderboardEntry::PATH,
    Workout::PATH,
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(redirect_to_api_root))
        .route("/api", get(api_root))
        .route("/api/", get(api_root))
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Team>())
        .merge(resource_routes::<Activity>())
        .merge(resource_routes::<LeaderboardEntry>())
        .merge(resource_routes::<Workout>())
}

/// Every route is registered with and without a trailing slash.
fn both(path: String) -> [String; 2] {
    let slashed = format!("{path}/");
    [path, slashed]
}

fn resource_routes<R: Resource>() -> Router<AppState> {
    let base = format!("/api/{}", R::PATH);
    let mut router = Router::new();

    for path in both(base.clone()) {
        router = router.route(&path, get(handlers::list::<R>).post(handlers::create::<R>));
    }

    for filter in R::FILTERS {
        let handler = move |State(state): State<AppState>,
                            Query(params): Query<HashMap<String, String>>| {
            handlers::filter::<R>(state, params, filter)
        };
        for path in both(format!("{base}/{}", filter.action)) {
            router = router.route(&path, get(handler));
        }
    }

    for path in both(format!("{base}/:id")) {
        router = router.route(
            &path,
            get(handlers::retrieve::<R>)
                .put(handlers::replace::<R>)
                .patch(handlers::patch::<R>)
                .delete(handlers::destroy::<R>),
        );
    }

    router
}

async fn redirect_to_api_root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/api/")])
}

async fn api_root(State(state): State<AppState>) -> Json<Value> {
    let base = state.config.public_base_url.as_str();
    let links: Map<String, Value> = RESOURCE_PATHS
        .iter()
        .map(|path| (path.to_string(), Value::String(format!("{base}/api/{path}/"))))
        .collect();
    Json(Value::Object(links))
}
