//! Resolved configuration: settings merged and flattened for route building and request time.

use crate::middleware::{Handler, Middleware};
use crate::model::PlainOptions;
use crate::operation::{Context, Operation};
use serde_json::{Map, Value};

/// How an operation's route is answered. Chosen once at registration.
#[derive(Clone, Debug)]
pub enum OperationBinding {
    /// The built-in request adapter for the operation.
    Builtin,
    /// Caller-supplied handler; the adapter is never invoked.
    Custom(Handler),
}

impl OperationBinding {
    pub fn is_builtin(&self) -> bool {
        matches!(self, OperationBinding::Builtin)
    }
}

/// Context prefixes, each with at least one entry (an empty string for none).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contexts {
    pub public: Vec<String>,
    pub private: Vec<String>,
}

impl Contexts {
    pub fn for_context(&self, context: Context) -> &[String] {
        match context {
            Context::Public => &self.public,
            Context::Private => &self.private,
        }
    }
}

/// Shaping options after merging operation options over resource defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedOptions {
    pub show_key: bool,
    pub read_all: bool,
    /// Remaining option keys, forwarded to `list`.
    pub query: Map<String, Value>,
}

impl ResolvedOptions {
    pub fn plain(&self) -> PlainOptions {
        PlainOptions {
            read_all: self.read_all,
            show_key: self.show_key,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedOperation {
    pub operation: Operation,
    pub enabled: bool,
    pub middleware: Vec<Middleware>,
    pub binding: OperationBinding,
    /// Replaces the context prefix when set.
    pub prefix: Option<Vec<String>>,
    pub suffix: String,
    pub options: ResolvedOptions,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub entity_kind: String,
    pub host: String,
    pub path: String,
    pub contexts: Contexts,
    pub ancestors: Vec<String>,
    pub show_key: bool,
    pub read_all: bool,
    pub body_limit: usize,
    /// One entry per operation, in [`Operation::ALL`] order.
    pub operations: Vec<ResolvedOperation>,
}

impl ResolvedConfig {
    pub fn operation(&self, operation: Operation) -> &ResolvedOperation {
        &self.operations[operation.index()]
    }

    /// Prefixes used to mount an operation: its own override, else its context's.
    pub fn prefixes(&self, operation: Operation) -> &[String] {
        match &self.operation(operation).prefix {
            Some(prefix) => prefix,
            None => self.contexts.for_context(operation.context()),
        }
    }
}
