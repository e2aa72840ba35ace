//! Response helpers: JSON bodies with `Link` and `Location` headers.

use crate::extractors::PAGE_CURSOR;
use axum::{
    http::{
        header::{LINK, LOCATION},
        HeaderValue, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use url::form_urlencoded;

/// Request URL with `pageCursor` replaced by `cursor`, prefixed by `host`.
pub fn next_page_url(host: &str, uri: &Uri, cursor: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(q) = uri.query() {
        for (k, v) in form_urlencoded::parse(q.as_bytes()) {
            if k != PAGE_CURSOR {
                query.append_pair(&k, &v);
            }
        }
    }
    query.append_pair(PAGE_CURSOR, cursor);
    format!(
        "{}{}?{}",
        host.trim_end_matches('/'),
        uri.path(),
        query.finish()
    )
}

/// `200 OK` JSON list; `Link: <next>; rel="next"` when a cursor is given.
pub fn list_page<T: Serialize>(
    entities: T,
    host: &str,
    uri: &Uri,
    next_cursor: Option<&str>,
) -> Response {
    let mut response = Json(entities).into_response();
    if let Some(cursor) = next_cursor {
        let link = format!("<{}>; rel=\"next\"", next_page_url(host, uri, cursor));
        match HeaderValue::from_str(&link) {
            Ok(value) => {
                response.headers_mut().insert(LINK, value);
            }
            Err(e) => tracing::warn!(error = %e, "next page link is not a valid header value"),
        }
    }
    response
}

/// `201 Created` JSON body with `Location: <path>/<id>` when the id is known.
pub fn created<T: Serialize>(body: T, uri: &Uri, id: Option<&str>) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Some(id) = id {
        let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);
        if let Ok(value) = HeaderValue::from_str(&location) {
            response.headers_mut().insert(LOCATION, value);
        }
    }
    response
}
