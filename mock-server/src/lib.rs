use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Redirect,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Object {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct CreateObject {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct UpdateObject {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiHttpError {
    pub message: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub name_prefix: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct GetQuery {
    pub effective: Option<bool>,
}

pub type Db = Arc<RwLock<Vec<Object>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiHttpError>)>;

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiHttpError>) {
    (
        status,
        Json(ApiHttpError {
            message: message.into(),
        }),
    )
}

fn not_found(id: &str) -> (StatusCode, Json<ApiHttpError>) {
    api_error(StatusCode::NOT_FOUND, format!("object {id} not found"))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/v4/objects", get(list_objects).post(create_object))
        .route(
            "/api/v4/objects/{object_id}",
            get(get_object).patch(update_object).delete(delete_object),
        )
        .route("/api/v4/status/{code}", get(fixed_status))
        .route("/api/v4/slow/{millis}", get(slow))
        .route("/api/v4/large/{bytes}", get(large))
        .route("/api/v4/redirect", get(redirect))
        .route("/api/v4/echo", any(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn list_objects(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Vec<Object>> {
    let objects = db.read().await;
    let matching = objects
        .iter()
        .filter(|o| {
            query
                .name_prefix
                .as_deref()
                .map_or(true, |prefix| o.name.starts_with(prefix))
        })
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(matching)
}

async fn create_object(
    State(db): State<Db>,
    Json(input): Json<CreateObject>,
) -> ApiResult<(StatusCode, Json<Object>)> {
    if input.name.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "name must not be empty"));
    }
    let object = Object {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        tags: input.tags,
        extra: input.extra,
    };
    tracing::debug!(id = %object.id, "created object");
    db.write().await.push(object.clone());
    Ok((StatusCode::CREATED, Json(object)))
}

async fn get_object(
    State(db): State<Db>,
    Path(object_id): Path<String>,
    Query(query): Query<GetQuery>,
) -> ApiResult<Json<Object>> {
    let objects = db.read().await;
    let mut object = objects
        .iter()
        .find(|o| o.id == object_id)
        .cloned()
        .ok_or_else(|| not_found(&object_id))?;
    if query.effective == Some(true) {
        object.extra.insert("effective".to_string(), Value::Bool(true));
    }
    Ok(Json(object))
}

async fn update_object(
    State(db): State<Db>,
    Path(object_id): Path<String>,
    Json(input): Json<UpdateObject>,
) -> ApiResult<Json<Object>> {
    let mut objects = db.write().await;
    let object = objects
        .iter_mut()
        .find(|o| o.id == object_id)
        .ok_or_else(|| not_found(&object_id))?;
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "name must not be empty"));
        }
        object.name = name;
    }
    if let Some(tags) = input.tags {
        object.tags = tags;
    }
    object.extra.extend(input.extra);
    Ok(Json(object.clone()))
}

async fn delete_object(State(db): State<Db>, Path(object_id): Path<String>) -> ApiResult<StatusCode> {
    let mut objects = db.write().await;
    let index = objects
        .iter()
        .position(|o| o.id == object_id)
        .ok_or_else(|| not_found(&object_id))?;
    objects.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

/// Answers with whatever status the path names.
async fn fixed_status(Path(code): Path<u16>) -> ApiResult<(StatusCode, String)> {
    let status = StatusCode::from_u16(code)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("invalid status {code}")))?;
    Ok((status, format!("status {code}")))
}

async fn slow(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({ "id": "slow" }))
}

/// An object whose id is `bytes` characters long.
async fn large(Path(bytes): Path<usize>) -> Json<Value> {
    Json(json!({ "id": "a".repeat(bytes) }))
}

async fn redirect() -> Redirect {
    Redirect::temporary("/api/v4/slow/0")
}

/// Reflects the parts of a request the client controls. Transport-specific
/// headers (user-agent, accept, content-length) are left out.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
    let reflected: BTreeMap<String, String> = headers
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            name == "authorization" || name == "cookie" || name == "content-type" || name.starts_with("x-")
        })
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": reflected,
        "body": body,
    }))
}
