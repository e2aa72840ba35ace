//! Request-processing steps and custom handlers attached to generated routes.

use crate::error::AppError;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
};
use futures::future::BoxFuture;
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

type MiddlewareFn = dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync;
type HandlerFn = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// An operation-specific middleware step, run after body decoding and before the handler.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Middleware(Arc::new(move |req: Request, next: Next| -> BoxFuture<'static, Response> {
            Box::pin(f(req, next))
        }))
    }

    /// Same underlying function (clones share it).
    pub fn ptr_eq(&self, other: &Middleware) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn apply(&self, endpoint: MethodRouter) -> MethodRouter {
        let f = self.0.clone();
        endpoint.layer(from_fn(move |req: Request, next: Next| {
            let f = f.clone();
            async move { f(req, next).await }
        }))
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware(..)")
    }
}

/// Custom operation handler. Replaces the built-in adapter entirely, error handling included.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Handler(Arc::new(move |req: Request| -> BoxFuture<'static, Response> {
            Box::pin(f(req))
        }))
    }

    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn endpoint(&self, filter: MethodFilter) -> MethodRouter {
        let f = self.0.clone();
        on(filter, move |req: Request| {
            let f = f.clone();
            async move { f(req).await }
        })
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Request body decoded by the body-decoding step. Object for form and empty bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedBody(pub Value);

/// Marker set by the body-decoding step on multipart requests. The body is left unread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileUpload;

/// Body-decoding step: size limit, then decode into a [`DecodedBody`] extension.
pub(crate) fn decode_body_layer(endpoint: MethodRouter, limit: usize) -> MethodRouter {
    let endpoint: MethodRouter =
        endpoint.layer(from_fn(move |req: Request, next: Next| decode_body(req, next, limit)));
    endpoint.layer(RequestBodyLimitLayer::new(limit))
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Whether a body read failed because the size limit was hit while streaming.
fn exceeds_limit(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

async fn decode_body(request: Request, next: Next, limit: usize) -> Response {
    let (mut parts, body) = request.into_parts();
    let content_type = content_type(&parts.headers).to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        parts.extensions.insert(FileUpload);
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) if exceeds_limit(&e) => return AppError::PayloadTooLarge(limit).into_response(),
        Err(e) => {
            return AppError::BadRequest(format!("failed to read request body: {}", e))
                .into_response()
        }
    };
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Value::Object(
            url::form_urlencoded::parse(&bytes)
                .into_owned()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                return AppError::BadRequest(format!("invalid JSON body: {}", e)).into_response()
            }
        }
    };
    parts.extensions.insert(DecodedBody(value));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
