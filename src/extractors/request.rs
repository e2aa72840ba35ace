//! Extract everything an adapter reads from the request: path params, query pairs,
//! original URI, decoded body, upload marker.

use crate::error::AppError;
use crate::middleware::{DecodedBody, FileUpload};
use crate::paths::ID_PARAM;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OriginalUri, Path},
    http::{request::Parts, Uri},
};
use serde_json::Value;
use std::collections::HashMap;

/// Query parameter carrying the page cursor on `list`.
pub const PAGE_CURSOR: &str = "pageCursor";

#[derive(Clone, Debug, Default)]
pub struct AdapterInput {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// URI as received, before any nesting stripped a prefix.
    pub uri: Uri,
    pub body: Option<Value>,
    pub upload: bool,
}

impl AdapterInput {
    pub fn id(&self) -> Result<&str, AppError> {
        self.params
            .get(ID_PARAM)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest("missing id".into()))
    }

    pub fn page_cursor(&self) -> Option<String> {
        self.query.get(PAGE_CURSOR).filter(|c| !c.is_empty()).cloned()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdapterInput
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();
        let query = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(u)| u.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let body = parts
            .extensions
            .get::<DecodedBody>()
            .map(|DecodedBody(v)| v.clone());
        let upload = parts.extensions.get::<FileUpload>().is_some();
        Ok(AdapterInput {
            params,
            query,
            uri,
            body,
            upload,
        })
    }
}
