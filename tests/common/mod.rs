//! Recording fake data layer shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use datastore_api::{
    Ancestors, DataAccess, DataAccessError, DeleteResult, Entity, ListCriteria, ListResult,
    PlainOptions, QueryDefaults, UpdateOptions,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List(ListCriteria),
    Get(String, Option<Ancestors>),
    Build(Value, Option<Ancestors>),
    Save,
    Update(String, Value, Option<Ancestors>, bool),
    Delete(String, Option<Ancestors>),
    DeleteAll(Option<Ancestors>),
    Plain(PlainOptions),
}

pub type Calls = Arc<Mutex<Vec<Call>>>;

pub struct FakeEntity {
    id: String,
    data: Value,
    calls: Calls,
    failure: Option<DataAccessError>,
}

#[async_trait]
impl Entity for FakeEntity {
    fn id(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn plain(&self, options: PlainOptions) -> Value {
        self.calls.lock().unwrap().push(Call::Plain(options));
        let mut out = self.data.clone();
        if let Some(obj) = out.as_object_mut() {
            if options.show_key {
                obj.insert("id".into(), json!(self.id));
            }
            if !options.read_all {
                obj.remove("secret");
            }
        }
        out
    }

    async fn save(self) -> Result<Self, DataAccessError> {
        self.calls.lock().unwrap().push(Call::Save);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self),
        }
    }
}

pub struct FakeModel {
    pub kind: String,
    pub defaults: QueryDefaults,
    pub calls: Calls,
    /// Returned by every data-access call when set.
    pub failure: Mutex<Option<DataAccessError>>,
    pub next_page_cursor: Mutex<Option<String>>,
    pub delete_success: Mutex<bool>,
}

impl FakeModel {
    pub fn new(kind: &str) -> Self {
        FakeModel {
            kind: kind.to_string(),
            defaults: QueryDefaults::default(),
            calls: Arc::new(Mutex::new(Vec::new())),
            failure: Mutex::new(None),
            next_page_cursor: Mutex::new(None),
            delete_success: Mutex::new(true),
        }
    }

    pub fn with_defaults(mut self, defaults: QueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn fail_with(&self, error: DataAccessError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), DataAccessError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn entity(&self, id: &str, data: Value) -> FakeEntity {
        FakeEntity {
            id: id.to_string(),
            data,
            calls: self.calls.clone(),
            failure: self.failure.lock().unwrap().clone(),
        }
    }
}

#[async_trait]
impl DataAccess for FakeModel {
    type Entity = FakeEntity;

    fn entity_kind(&self) -> &str {
        &self.kind
    }

    fn query_defaults(&self) -> QueryDefaults {
        self.defaults
    }

    fn sanitize(&self, mut data: Value) -> Value {
        if let Some(obj) = data.as_object_mut() {
            obj.remove("unknown");
        }
        data
    }

    fn build(&self, data: Value, ancestors: Option<Ancestors>) -> FakeEntity {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Build(data.clone(), ancestors));
        self.entity("new-1", data)
    }

    async fn list(&self, criteria: ListCriteria) -> Result<ListResult, DataAccessError> {
        self.record(Call::List(criteria))?;
        Ok(ListResult {
            entities: vec![json!({ "title": "first" }), json!({ "title": "second" })],
            next_page_cursor: self.next_page_cursor.lock().unwrap().clone(),
        })
    }

    async fn get(&self, id: &str, ancestors: Option<&Ancestors>) -> Result<FakeEntity, DataAccessError> {
        self.record(Call::Get(id.to_string(), ancestors.cloned()))?;
        Ok(self.entity(id, json!({ "title": "Blog Title", "secret": "s3cr3t" })))
    }

    async fn update(
        &self,
        id: &str,
        data: Value,
        ancestors: Option<&Ancestors>,
        options: UpdateOptions,
    ) -> Result<FakeEntity, DataAccessError> {
        self.record(Call::Update(id.to_string(), data.clone(), ancestors.cloned(), options.replace))?;
        Ok(self.entity(id, data))
    }

    async fn delete(&self, id: &str, ancestors: Option<&Ancestors>) -> Result<DeleteResult, DataAccessError> {
        self.record(Call::Delete(id.to_string(), ancestors.cloned()))?;
        Ok(DeleteResult {
            success: *self.delete_success.lock().unwrap(),
        })
    }

    async fn delete_all(&self, ancestors: Option<&Ancestors>) -> Result<Value, DataAccessError> {
        self.record(Call::DeleteAll(ancestors.cloned()))?;
        Ok(json!({ "deleted": 3 }))
    }
}

pub fn ancestors(items: &[&str]) -> Ancestors {
    items.iter().copied().collect()
}

pub async fn send(router: axum::Router, request: Request<Body>) -> (Response<()>, Value) {
    let response = router.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (Response::from_parts(parts, ()), value)
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
