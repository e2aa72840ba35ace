//! Per-resource state shared by all routes of one registered resource.

use crate::config::ResolvedConfig;
use crate::model::{Ancestors, DataAccess};
use crate::paths::ancestors_from_params;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ResourceState<M> {
    pub model: Arc<M>,
    /// Immutable after registration.
    pub config: Arc<ResolvedConfig>,
}

impl<M> Clone for ResourceState<M> {
    fn clone(&self) -> Self {
        ResourceState {
            model: self.model.clone(),
            config: self.config.clone(),
        }
    }
}

impl<M: DataAccess> ResourceState<M> {
    pub fn new(model: Arc<M>, config: ResolvedConfig) -> Self {
        ResourceState {
            model,
            config: Arc::new(config),
        }
    }

    pub fn ancestors(&self, params: &HashMap<String, String>) -> Option<Ancestors> {
        ancestors_from_params(params, &self.config.ancestors)
    }
}
