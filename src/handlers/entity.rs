//! Built-in request adapters: one data-access call per request, shaped response or mapped error.

use crate::error::AppError;
use crate::extractors::AdapterInput;
use crate::model::{Ancestors, DataAccess, Entity, ListCriteria, UpdateOptions};
use crate::operation::Operation;
use crate::response::{created, list_page};
use crate::state::ResourceState;
use axum::{response::IntoResponse, response::Response, Json};
use serde_json::{json, Map, Value};

impl<M: DataAccess> ResourceState<M> {
    /// Run the built-in adapter for `operation`.
    pub async fn dispatch(
        &self,
        operation: Operation,
        input: AdapterInput,
    ) -> Result<Response, AppError> {
        tracing::debug!(
            entity_kind = %self.config.entity_kind,
            operation = %operation,
            uri = %input.uri,
            "adapter"
        );
        match operation {
            Operation::List => self.list(input).await,
            Operation::Get => self.get(input).await,
            Operation::Create => self.create(input).await,
            Operation::UpdatePatch => self.update(input, operation, false).await,
            Operation::UpdateReplace => self.update(input, operation, true).await,
            Operation::Delete => self.delete(input).await,
            Operation::DeleteAll => self.delete_all(input).await,
        }
    }

    pub async fn list(&self, input: AdapterInput) -> Result<Response, AppError> {
        let options = &self.config.operation(Operation::List).options;
        let mut query = options.query.clone();
        let option_ancestors = query
            .remove("ancestors")
            .and_then(|v| Ancestors::from_value(&v));
        let criteria = ListCriteria {
            show_key: options.show_key,
            read_all: options.read_all,
            query,
            ancestors: self.ancestors(&input.params).or(option_ancestors),
            start: input.page_cursor(),
        };
        let result = self.model.list(criteria).await?;
        Ok(list_page(
            result.entities,
            &self.config.host,
            &input.uri,
            result.next_page_cursor.as_deref(),
        ))
    }

    pub async fn get(&self, input: AdapterInput) -> Result<Response, AppError> {
        let options = &self.config.operation(Operation::Get).options;
        let id = input.id()?;
        let ancestors = self.ancestors(&input.params);
        let entity = self.model.get(id, ancestors.as_ref()).await?;
        Ok(Json(entity.plain(options.plain())).into_response())
    }

    /// Uploads need a custom handler; refused before the data layer is touched.
    pub async fn create(&self, input: AdapterInput) -> Result<Response, AppError> {
        if input.upload {
            return Err(AppError::UploadWithoutHandler);
        }
        let options = &self.config.operation(Operation::Create).options;
        let data = self.model.sanitize(body_or_empty(input.body.clone()));
        let ancestors = self.ancestors(&input.params);
        let entity = self.model.build(data, ancestors).save().await?;
        let id = entity.id();
        Ok(created(
            entity.plain(options.plain()),
            &input.uri,
            id.as_deref(),
        ))
    }

    /// Shared by updatePatch (`replace = false`) and updateReplace (`replace = true`).
    pub async fn update(
        &self,
        input: AdapterInput,
        operation: Operation,
        replace: bool,
    ) -> Result<Response, AppError> {
        let options = &self.config.operation(operation).options;
        let id = input.id()?;
        let data = self.model.sanitize(body_or_empty(input.body.clone()));
        let ancestors = self.ancestors(&input.params);
        let entity = self
            .model
            .update(id, data, ancestors.as_ref(), UpdateOptions { replace })
            .await?;
        Ok(Json(entity.plain(options.plain())).into_response())
    }

    pub async fn delete(&self, input: AdapterInput) -> Result<Response, AppError> {
        let id = input.id()?;
        let ancestors = self.ancestors(&input.params);
        let result = self.model.delete(id, ancestors.as_ref()).await?;
        let kind = &self.config.entity_kind;
        let message = if result.success {
            format!("{} \"{}\" deleted successfully.", kind, id)
        } else {
            format!("Could not delete entity. {} \"{}\" not found", kind, id)
        };
        Ok(Json(json!({ "success": result.success, "message": message })).into_response())
    }

    pub async fn delete_all(&self, input: AdapterInput) -> Result<Response, AppError> {
        let ancestors = self.ancestors(&input.params);
        let result = self.model.delete_all(ancestors.as_ref()).await?;
        Ok(Json(result).into_response())
    }
}

fn body_or_empty(body: Option<Value>) -> Value {
    body.unwrap_or_else(|| Value::Object(Map::new()))
}
