//! Data-access contract the generated routes call into.

use crate::error::DataAccessError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat interleaved ancestor path: `[kind0, id0, kind1, id1, ...]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ancestors(Vec<String>);

impl Ancestors {
    pub fn new(items: Vec<String>) -> Self {
        Ancestors(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// (kind, id) pairs. A trailing unpaired element is ignored.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Ancestors given verbatim as a JSON array of strings (operation options).
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;
        if items.is_empty() {
            None
        } else {
            Some(Ancestors(items))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Ancestors {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Ancestors(iter.into_iter().map(Into::into).collect())
    }
}

/// Visibility flags for projecting an entity to a response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainOptions {
    /// Include fields normally hidden from output.
    pub read_all: bool,
    /// Include the storage identifier.
    pub show_key: bool,
}

/// Model-declared query defaults; second layer of the settings merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefaults {
    pub show_key: Option<bool>,
    pub read_all: Option<bool>,
}

/// Criteria for `list`: resolved visibility flags, pass-through query options
/// (`limit`, `order`, `select`, `filters`, ...), ancestors and page cursor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListCriteria {
    pub show_key: bool,
    pub read_all: bool,
    pub query: Map<String, Value>,
    pub ancestors: Option<Ancestors>,
    pub start: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_cursor: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Replace the stored entity instead of merging into it.
    pub replace: bool,
}

/// A single entity handed out by the data layer.
#[async_trait]
pub trait Entity: Sized + Send + Sync + 'static {
    /// Storage identifier, used for the `Location` header after create.
    fn id(&self) -> Option<String>;

    fn plain(&self, options: PlainOptions) -> Value;

    async fn save(self) -> Result<Self, DataAccessError>;
}

/// Resource descriptor and data-access contract. One attempt per call, no retry.
#[async_trait]
pub trait DataAccess: Send + Sync + 'static {
    type Entity: Entity;

    /// Entity kind, e.g. "BlogPost". Default paths derive from it.
    fn entity_kind(&self) -> &str;

    fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults::default()
    }

    /// Strip unknown or protected fields from an inbound body.
    fn sanitize(&self, data: Value) -> Value {
        data
    }

    /// Construct a new, unsaved entity.
    fn build(&self, data: Value, ancestors: Option<Ancestors>) -> Self::Entity;

    async fn list(&self, criteria: ListCriteria) -> Result<ListResult, DataAccessError>;

    async fn get(
        &self,
        id: &str,
        ancestors: Option<&Ancestors>,
    ) -> Result<Self::Entity, DataAccessError>;

    async fn update(
        &self,
        id: &str,
        data: Value,
        ancestors: Option<&Ancestors>,
        options: UpdateOptions,
    ) -> Result<Self::Entity, DataAccessError>;

    async fn delete(
        &self,
        id: &str,
        ancestors: Option<&Ancestors>,
    ) -> Result<DeleteResult, DataAccessError>;

    /// Result is passed through to the client verbatim.
    async fn delete_all(&self, ancestors: Option<&Ancestors>) -> Result<Value, DataAccessError>;
}
