//! `ApiBuilder`: library overrides fixed at construction, resources registered one by one,
//! one `axum::Router` at the end.

use crate::config::{ApiSettings, Settings};
use crate::error::ConfigError;
use crate::model::DataAccess;
use crate::routes::entity::{ResourceApi, RouteEntry};
use crate::routes::table::RouteTable;
use axum::Router;
use std::sync::Arc;

pub struct ApiBuilder {
    settings: Arc<ApiSettings>,
    table: RouteTable,
    routes: Vec<RouteEntry>,
}

impl ApiBuilder {
    pub fn new(settings: ApiSettings) -> Self {
        ApiBuilder {
            settings: Arc::new(settings),
            table: RouteTable::default(),
            routes: Vec::new(),
        }
    }

    /// Builder over the process-wide settings (see [`ApiSettings::install`]), or defaults.
    pub fn from_global() -> Self {
        Self::new(ApiSettings::global().cloned().unwrap_or_default())
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Register routes for `model`. Returns the entries added by this call.
    /// Registering the same model twice adds a second, independent set.
    pub fn create<M: DataAccess>(
        &mut self,
        model: Arc<M>,
        settings: Settings,
    ) -> Result<&[RouteEntry], ConfigError> {
        let api = ResourceApi::new(model, &self.settings, settings)?;
        api.mount(&mut self.table);
        let start = self.routes.len();
        self.routes.extend_from_slice(api.routes());
        Ok(&self.routes[start..])
    }

    /// Every entry registered so far, in registration order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn into_router(self) -> Router {
        self.table.into_router()
    }
}
