//! Raw settings types: library-wide overrides, per-resource settings, per-operation settings.
//! JSON shapes use camelCase keys; middleware and handlers are code-only.

use crate::config::validate_settings_value;
use crate::error::ConfigError;
use crate::middleware::{Handler, Middleware};
use crate::operation::Operation;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Default body size accepted by the body-decoding step.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// One literal segment or an ordered list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segments {
    One(String),
    Many(Vec<String>),
}

impl Segments {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Segments::One(s) => vec![s.clone()],
            Segments::Many(v) => v.clone(),
        }
    }

    /// Segments concatenated in order.
    pub fn joined(&self) -> String {
        match self {
            Segments::One(s) => s.clone(),
            Segments::Many(v) => v.concat(),
        }
    }
}

impl From<&str> for Segments {
    fn from(s: &str) -> Self {
        Segments::One(s.to_string())
    }
}

impl From<String> for Segments {
    fn from(s: String) -> Self {
        Segments::One(s)
    }
}

impl From<Vec<String>> for Segments {
    fn from(v: Vec<String>) -> Self {
        Segments::Many(v)
    }
}

impl<const N: usize> From<[&str; N]> for Segments {
    fn from(v: [&str; N]) -> Self {
        Segments::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Path prefixes for the public (list, get) and private (mutating) operations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    pub public: Option<Segments>,
    pub private: Option<Segments>,
}

/// Library-wide override settings, set once before any resource is registered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Prepended to the URL in `Link` headers, e.g. "https://api.example.com".
    pub host: Option<String>,
    pub contexts: ContextSettings,
    pub show_key: Option<bool>,
    pub read_all: Option<bool>,
    pub body_limit: Option<usize>,
}

static GLOBAL_SETTINGS: OnceLock<ApiSettings> = OnceLock::new();

impl ApiSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn contexts(mut self, public: impl Into<Segments>, private: impl Into<Segments>) -> Self {
        self.contexts = ContextSettings {
            public: Some(public.into()),
            private: Some(private.into()),
        };
        self
    }

    pub fn show_key(mut self, show_key: bool) -> Self {
        self.show_key = Some(show_key);
        self
    }

    pub fn read_all(mut self, read_all: bool) -> Self {
        self.read_all = Some(read_all);
        self
    }

    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Install as the process-wide default. Succeeds once; later calls fail.
    pub fn install(self) -> Result<(), ConfigError> {
        GLOBAL_SETTINGS
            .set(self)
            .map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// Installed process-wide settings, if any.
    pub fn global() -> Option<&'static ApiSettings> {
        GLOBAL_SETTINGS.get()
    }
}

/// Enablement flag. Only JSON booleans count; any other value reads as unset.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub prefix: Option<Segments>,
    pub suffix: Option<Segments>,
}

/// Shaping overrides for one operation. Keys other than `showKey` / `readAll`
/// (e.g. `limit`, `order`, `select`, `filters`, `ancestors`) are forwarded to `list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationOptions {
    pub show_key: Option<bool>,
    pub read_all: Option<bool>,
    #[serde(flatten)]
    pub query: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationSettings {
    #[serde(alias = "exec", deserialize_with = "lenient_flag")]
    pub enabled: Option<bool>,
    pub path: PathSettings,
    pub options: OperationOptions,
    #[serde(skip)]
    pub middleware: Vec<Middleware>,
    #[serde(skip)]
    pub handler: Option<Handler>,
}

impl OperationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<Segments>) -> Self {
        self.path.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<Segments>) -> Self {
        self.path.suffix = Some(suffix.into());
        self
    }

    pub fn show_key(mut self, show_key: bool) -> Self {
        self.options.show_key = Some(show_key);
        self
    }

    pub fn read_all(mut self, read_all: bool) -> Self {
        self.options.read_all = Some(read_all);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.query.insert(key.into(), value);
        self
    }
}

/// Settings passed when registering one resource.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub path: Option<String>,
    pub ancestors: Option<Segments>,
    pub host: Option<String>,
    pub contexts: ContextSettings,
    pub show_key: Option<bool>,
    pub read_all: Option<bool>,
    #[serde(alias = "op")]
    pub operations: BTreeMap<Operation, OperationSettings>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON. A `path` that is not a string is rejected first.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        validate_settings_value(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn ancestors(mut self, ancestors: impl Into<Segments>) -> Self {
        self.ancestors = Some(ancestors.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn contexts(mut self, public: impl Into<Segments>, private: impl Into<Segments>) -> Self {
        self.contexts = ContextSettings {
            public: Some(public.into()),
            private: Some(private.into()),
        };
        self
    }

    pub fn show_key(mut self, show_key: bool) -> Self {
        self.show_key = Some(show_key);
        self
    }

    pub fn read_all(mut self, read_all: bool) -> Self {
        self.read_all = Some(read_all);
        self
    }

    /// Replace the settings of one operation.
    pub fn operation(mut self, operation: Operation, settings: OperationSettings) -> Self {
        self.operations.insert(operation, settings);
        self
    }

    /// Attach a middleware to an operation, keeping its other settings.
    pub fn middleware(mut self, operation: Operation, middleware: Middleware) -> Self {
        self.operations
            .entry(operation)
            .or_default()
            .middleware
            .push(middleware);
        self
    }

    /// Attach a custom handler to an operation, keeping its other settings.
    pub fn handler(mut self, operation: Operation, handler: Handler) -> Self {
        self.operations.entry(operation).or_default().handler = Some(handler);
        self
    }
}
