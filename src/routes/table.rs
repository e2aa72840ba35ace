//! Groups endpoints by path so each path is handed to the router once.

use axum::{http::Method, routing::MethodRouter, Router};

#[derive(Default)]
pub(crate) struct RouteTable {
    groups: Vec<RouteGroup>,
}

struct RouteGroup {
    path: String,
    methods: Vec<Method>,
    router: MethodRouter,
}

impl RouteTable {
    /// Add an endpoint. A method already bound on the same path keeps its first endpoint.
    pub(crate) fn insert(&mut self, path: &str, method: Method, endpoint: MethodRouter) {
        match self.groups.iter_mut().find(|g| g.path == path) {
            Some(group) if group.methods.contains(&method) => {
                tracing::warn!(%method, path, "route already registered; keeping the first");
            }
            Some(group) => {
                let router = std::mem::replace(&mut group.router, MethodRouter::new());
                group.router = router.merge(endpoint);
                group.methods.push(method);
            }
            None => self.groups.push(RouteGroup {
                path: path.to_string(),
                methods: vec![method],
                router: endpoint,
            }),
        }
    }

    pub(crate) fn into_router(self) -> Router {
        self.groups
            .into_iter()
            .fold(Router::new(), |router, group| router.route(&group.path, group.router))
    }
}
