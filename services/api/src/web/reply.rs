//! services/api/src/web/reply.rs
//!
//! Turns a serializable body into a JSON response carrying caching headers,
//! answering conditional requests with `304 Not Modified` where allowed.

use crate::cache::{apply_cache_headers, is_not_modified, not_modified_response, CacheOptions};
use crate::error::RouteError;
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub fn cached_json<T: Serialize>(
    request: &HeaderMap,
    status: StatusCode,
    body: &T,
    options: CacheOptions,
) -> Result<Response, RouteError> {
    let bytes = serde_json::to_vec(body)?;
    let etag = options.etag_for(&bytes);

    // Uncacheable responses are always sent in full.
    if options.policy.is_cacheable() && is_not_modified(request, &etag, options.last_modified) {
        return Ok(not_modified_response(&etag, &options));
    }

    let options = CacheOptions {
        etag: Some(etag),
        ..options
    };
    let mut response = (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response();
    apply_cache_headers(response.headers_mut(), &options, &[]);
    Ok(response)
}
