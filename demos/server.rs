//! Demo server: an in-memory `BlogPost` store exposed through generated routes.
//!
//! Run: `cargo run --example server`
//! `PORT` picks the port (default 3000). `API_SETTINGS` may hold JSON library settings,
//! e.g. `{"host":"http://localhost:3000","contexts":{"private":"/admin"}}`.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use datastore_api::{
    Ancestors, ApiBuilder, ApiSettings, DataAccess, DataAccessError, DeleteResult, Entity,
    ListCriteria, ListResult, Middleware, Operation, OperationSettings, PlainOptions,
    QueryDefaults, Settings, UpdateOptions,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;

const PAGE_SIZE: usize = 10;

#[derive(Clone)]
struct Record {
    ancestors: Option<Ancestors>,
    data: Map<String, Value>,
}

type Records = Arc<RwLock<BTreeMap<String, Record>>>;

struct Post {
    id: String,
    record: Record,
    records: Records,
}

#[async_trait]
impl Entity for Post {
    fn id(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn plain(&self, options: PlainOptions) -> Value {
        let mut data = self.record.data.clone();
        if !options.read_all {
            data.remove("draftNotes");
        }
        if options.show_key {
            data.insert("id".into(), Value::String(self.id.clone()));
        }
        Value::Object(data)
    }

    async fn save(self) -> Result<Self, DataAccessError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        records.insert(self.id.clone(), self.record.clone());
        drop(records);
        Ok(self)
    }
}

#[derive(Default)]
struct PostStore {
    records: Records,
}

impl PostStore {
    fn post(&self, id: &str, record: Record) -> Post {
        Post {
            id: id.to_string(),
            record,
            records: self.records.clone(),
        }
    }

    fn in_scope(record: &Record, ancestors: Option<&Ancestors>) -> bool {
        ancestors.map_or(true, |a| record.ancestors.as_ref() == Some(a))
    }
}

fn object(data: Value) -> Result<Map<String, Value>, DataAccessError> {
    match data {
        Value::Object(map) => Ok(map),
        _ => Err(DataAccessError::with_code("ERR_VALIDATION", "body must be a JSON object")),
    }
}

#[async_trait]
impl DataAccess for PostStore {
    type Entity = Post;

    fn entity_kind(&self) -> &str {
        "BlogPost"
    }

    fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            show_key: Some(true),
            read_all: None,
        }
    }

    fn sanitize(&self, mut data: Value) -> Value {
        if let Some(map) = data.as_object_mut() {
            map.remove("id");
        }
        data
    }

    fn build(&self, data: Value, ancestors: Option<Ancestors>) -> Post {
        let record = Record {
            ancestors,
            data: data.as_object().cloned().unwrap_or_default(),
        };
        self.post(&uuid::Uuid::new_v4().to_string(), record)
    }

    async fn list(&self, criteria: ListCriteria) -> Result<ListResult, DataAccessError> {
        let limit = criteria
            .query
            .get("limit")
            .and_then(Value::as_u64)
            .map_or(PAGE_SIZE, |l| l as usize);
        let offset = match criteria.start.as_deref() {
            Some(s) => s
                .parse::<usize>()
                .map_err(|_| DataAccessError::with_code("ERR_PAGE_CURSOR", "invalid page cursor"))?,
            None => 0,
        };
        let records = self
            .records
            .read()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        let matching: Vec<_> = records
            .iter()
            .filter(|(_, r)| Self::in_scope(r, criteria.ancestors.as_ref()))
            .collect();
        let options = PlainOptions {
            show_key: criteria.show_key,
            read_all: criteria.read_all,
        };
        let entities = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, r)| self.post(id, (*r).clone()).plain(options))
            .collect();
        let next_page_cursor = (offset + limit < matching.len()).then(|| (offset + limit).to_string());
        Ok(ListResult {
            entities,
            next_page_cursor,
        })
    }

    async fn get(&self, id: &str, ancestors: Option<&Ancestors>) -> Result<Post, DataAccessError> {
        let records = self
            .records
            .read()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        match records.get(id) {
            Some(r) if Self::in_scope(r, ancestors) => Ok(self.post(id, r.clone())),
            _ => Err(DataAccessError::not_found()),
        }
    }

    async fn update(
        &self,
        id: &str,
        data: Value,
        ancestors: Option<&Ancestors>,
        options: UpdateOptions,
    ) -> Result<Post, DataAccessError> {
        let data = object(data)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        let record = records
            .get_mut(id)
            .filter(|r| Self::in_scope(r, ancestors))
            .ok_or_else(DataAccessError::not_found)?;
        if options.replace {
            record.data = data;
        } else {
            record.data.extend(data);
        }
        Ok(self.post(id, record.clone()))
    }

    async fn delete(&self, id: &str, ancestors: Option<&Ancestors>) -> Result<DeleteResult, DataAccessError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        let found = records.get(id).map_or(false, |r| Self::in_scope(r, ancestors));
        let success = found && records.remove(id).is_some();
        Ok(DeleteResult { success })
    }

    async fn delete_all(&self, ancestors: Option<&Ancestors>) -> Result<Value, DataAccessError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DataAccessError::new("store lock poisoned"))?;
        let before = records.len();
        records.retain(|_, r| !Self::in_scope(r, ancestors));
        Ok(serde_json::json!({ "success": true, "deleted": before - records.len() }))
    }
}

fn api_settings() -> Result<ApiSettings, Box<dyn std::error::Error>> {
    match std::env::var("API_SETTINGS") {
        Ok(raw) => Ok(ApiSettings::from_value(serde_json::from_str(&raw)?)?),
        Err(_) => Ok(ApiSettings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("datastore_api=debug,info")),
        )
        .init();

    api_settings()?.install()?;

    let require_admin = Middleware::from_fn(|req, next: axum::middleware::Next| async move {
        let allowed = req
            .headers()
            .get("x-admin")
            .map_or(false, |v| v.as_bytes() == b"1");
        if allowed {
            next.run(req).await
        } else {
            (StatusCode::FORBIDDEN, "x-admin header required").into_response()
        }
    });

    let store = Arc::new(PostStore::default());
    let mut api = ApiBuilder::from_global();
    api.create(store.clone(), Settings::new())?;
    api.create(
        store,
        Settings::new().ancestors("Author").operation(
            Operation::DeleteAll,
            OperationSettings::new().enabled(true).middleware(require_admin),
        ),
    )?;
    for entry in api.routes() {
        tracing::info!(method = %entry.method, path = %entry.path, "route");
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, api.into_router()).await?;
    Ok(())
}
