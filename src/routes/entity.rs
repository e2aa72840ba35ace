//! Route registrar: one route entry per enabled operation and path, bound to the
//! built-in adapter or to the operation's custom handler.

use crate::config::{resolve, ApiSettings, OperationBinding, ResolvedConfig, Settings};
use crate::error::ConfigError;
use crate::extractors::AdapterInput;
use crate::middleware::{decode_body_layer, Middleware};
use crate::model::DataAccess;
use crate::operation::Operation;
use crate::paths::build_paths;
use crate::routes::table::RouteTable;
use crate::state::ResourceState;
use axum::{
    http::Method,
    routing::{on, MethodRouter},
    Router,
};
use std::sync::Arc;

/// One step of a route's middleware chain, in execution order.
#[derive(Clone, Debug)]
pub enum Step {
    /// Size limit and body decoding. First on create, updatePatch and updateReplace.
    DecodeBody,
    Custom(Middleware),
}

impl Step {
    fn apply(&self, endpoint: MethodRouter, body_limit: usize) -> MethodRouter {
        match self {
            Step::DecodeBody => decode_body_layer(endpoint, body_limit),
            Step::Custom(middleware) => middleware.apply(endpoint),
        }
    }
}

/// A registered (path, verb, middleware chain, handler) tuple.
#[derive(Clone, Debug)]
pub struct RouteEntry {
    pub path: String,
    pub method: Method,
    pub operation: Operation,
    pub middleware: Vec<Step>,
    pub binding: OperationBinding,
}

/// Route entries for a resolved resource, in canonical operation order then prefix order.
pub fn plan_routes(config: &ResolvedConfig) -> Vec<RouteEntry> {
    let mut entries = Vec::new();
    for operation in Operation::ALL {
        let resolved = config.operation(operation);
        if !resolved.enabled {
            continue;
        }
        let mut middleware = Vec::with_capacity(resolved.middleware.len() + 1);
        if operation.consumes_body() {
            middleware.push(Step::DecodeBody);
        }
        middleware.extend(resolved.middleware.iter().cloned().map(Step::Custom));

        for path in build_paths(config, operation) {
            entries.push(RouteEntry {
                path,
                method: operation.method(),
                operation,
                middleware: middleware.clone(),
                binding: resolved.binding.clone(),
            });
        }
    }
    entries
}

/// Routes generated for one model.
pub struct ResourceApi<M: DataAccess> {
    state: ResourceState<M>,
    routes: Vec<RouteEntry>,
}

impl<M: DataAccess> ResourceApi<M> {
    pub fn new(model: Arc<M>, overrides: &ApiSettings, settings: Settings) -> Result<Self, ConfigError> {
        let config = resolve(model.entity_kind(), &model.query_defaults(), overrides, settings)?;
        let routes = plan_routes(&config);
        for entry in &routes {
            tracing::debug!(
                entity_kind = %config.entity_kind,
                method = %entry.method,
                path = %entry.path,
                operation = %entry.operation,
                custom = !entry.binding.is_builtin(),
                "route registered"
            );
        }
        Ok(ResourceApi {
            state: ResourceState::new(model, config),
            routes,
        })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.state.config
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn state(&self) -> &ResourceState<M> {
        &self.state
    }

    /// Endpoint for one entry: handler wrapped by its middleware chain.
    pub fn endpoint(&self, entry: &RouteEntry) -> MethodRouter {
        let mut endpoint = match &entry.binding {
            OperationBinding::Builtin => builtin_endpoint(self.state.clone(), entry.operation),
            OperationBinding::Custom(handler) => handler.endpoint(entry.operation.method_filter()),
        };
        // Last step innermost, so the chain runs in declaration order.
        for step in entry.middleware.iter().rev() {
            endpoint = step.apply(endpoint, self.state.config.body_limit);
        }
        endpoint
    }

    pub(crate) fn mount(&self, table: &mut RouteTable) {
        for entry in &self.routes {
            table.insert(&entry.path, entry.method.clone(), self.endpoint(entry));
        }
    }

    /// Router serving this resource only.
    pub fn router(&self) -> Router {
        let mut table = RouteTable::default();
        self.mount(&mut table);
        table.into_router()
    }
}

fn builtin_endpoint<M: DataAccess>(state: ResourceState<M>, operation: Operation) -> MethodRouter {
    on(operation.method_filter(), move |input: AdapterInput| {
        let state = state.clone();
        async move { state.dispatch(operation, input).await }
    })
}
