//! services/api/src/cache.rs
//!
//! HTTP caching headers for API responses.
//!
//! A response is classified as public, private or uncacheable, and stamped with
//! `Cache-Control`, an `ETag` and a `Last-Modified` date. ETags default to a hash
//! of the response body, so unchanged content keeps its tag between requests and
//! conditional requests can be answered with `304 Not Modified`.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sha2::{Digest, Sha256};

/// IMF-fixdate, the preferred HTTP date format.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    Public,
    Private,
    None,
}

impl CacheType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Public => "public",
            CacheType::Private => "private",
            CacheType::None => "none",
        }
    }
}

/// A cache classification and its freshness lifetime in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub cache_type: CacheType,
    pub max_age: u64,
}

impl CachePolicy {
    /// Static content that rarely changes.
    pub const STATIC: Self = Self::new(CacheType::Public, 31_536_000);
    /// Public data that changes occasionally.
    pub const PUBLIC: Self = Self::new(CacheType::Public, 300);
    /// Private user data.
    pub const PRIVATE: Self = Self::new(CacheType::Private, 60);
    /// Dashboard data that updates frequently.
    pub const DASHBOARD: Self = Self::new(CacheType::Private, 30);
    pub const QUESTIONS: Self = Self::new(CacheType::Public, 300);
    pub const INTERVIEWS: Self = Self::new(CacheType::Private, 120);
    pub const FEEDBACK: Self = Self::new(CacheType::Private, 60);
    /// Cross-collection summary counts.
    pub const SUMMARY: Self = Self::new(CacheType::Public, 180);
    /// Dynamic content, mutations and errors.
    pub const NONE: Self = Self::new(CacheType::None, 0);

    pub const fn new(cache_type: CacheType, max_age: u64) -> Self {
        Self {
            cache_type,
            max_age,
        }
    }

    pub fn is_cacheable(&self) -> bool {
        self.cache_type != CacheType::None
    }

    /// The `Cache-Control` value. Uncacheable policies ignore `max_age`.
    pub fn cache_control(&self) -> String {
        match self.cache_type {
            CacheType::None => "no-cache, no-store, must-revalidate".to_string(),
            other => format!(
                "{}, max-age={}, s-maxage={}",
                other.as_str(),
                self.max_age,
                self.max_age.saturating_mul(2)
            ),
        }
    }
}

/// Everything needed to stamp caching headers on one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    pub policy: CachePolicy,
    /// Explicit entity tag; when absent one is derived from the body.
    pub etag: Option<String>,
    /// When absent, the response is stamped as modified now.
    pub last_modified: Option<DateTime<Utc>>,
}

impl CacheOptions {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            etag: None,
            last_modified: None,
        }
    }

    pub fn none() -> Self {
        Self::new(CachePolicy::NONE)
    }

    pub fn with_last_modified(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_modified = at;
        self
    }

    /// The entity tag for `body` under these options.
    pub fn etag_for(&self, body: &[u8]) -> String {
        self.etag.clone().unwrap_or_else(|| generate_etag(body))
    }
}

impl From<CachePolicy> for CacheOptions {
    fn from(policy: CachePolicy) -> Self {
        Self::new(policy)
    }
}

/// A strong entity tag derived from the content: equal bytes, equal tag.
pub fn generate_etag(content: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(content));
    format!("\"{}\"", &digest[..32])
}

pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn set(headers: &mut HeaderMap, name: header::HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

/// Stamps the caching headers described by `options` onto `headers`.
pub fn apply_cache_headers(headers: &mut HeaderMap, options: &CacheOptions, body: &[u8]) {
    set(headers, header::CACHE_CONTROL, &options.policy.cache_control());
    if !options.policy.is_cacheable() {
        set(headers, header::PRAGMA, "no-cache");
        set(headers, header::EXPIRES, "0");
    }
    set(headers, header::ETAG, &options.etag_for(body));
    let now = Utc::now();
    let last_modified = options
        .last_modified
        .map_or(now, |changed| advertised_last_modified(changed, now));
    set(headers, header::LAST_MODIFIED, &format_http_date(last_modified));
}

/// The `Last-Modified` date to send for a resource that last changed at
/// `changed`. HTTP dates have whole-second precision, so a change inside the
/// current second is advertised one second early: another change in that same
/// second would otherwise be hidden behind an identical date.
pub fn advertised_last_modified(changed: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let changed = truncate_to_second(changed);
    let current = truncate_to_second(now);
    if changed >= current {
        current - Duration::seconds(1)
    } else {
        changed
    }
}

fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let opaque = |tag: &str| tag.trim().trim_start_matches("W/").to_string();
    let current = opaque(etag);
    if_none_match
        .split(',')
        .any(|candidate| candidate.trim() == "*" || opaque(candidate) == current)
}

/// Whether a conditional request can be answered with `304 Not Modified`.
///
/// `If-None-Match` takes precedence: when present, only an ETag match counts.
/// Otherwise `If-Modified-Since` must be no earlier than the resource's own
/// `last_modified`, compared at whole-second precision.
pub fn is_not_modified(
    request: &HeaderMap,
    etag: &str,
    last_modified: Option<DateTime<Utc>>,
) -> bool {
    if let Some(if_none_match) = request.get(header::IF_NONE_MATCH) {
        return if_none_match
            .to_str()
            .map(|value| etag_matches(value, etag))
            .unwrap_or(false);
    }

    let Some(last_modified) = last_modified else {
        return false;
    };
    request
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_http_date)
        .map(|since| since >= truncate_to_second(last_modified))
        .unwrap_or(false)
}

fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

/// An empty `304` carrying the entity tag and caching headers.
pub fn not_modified_response(etag: &str, options: &CacheOptions) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let options = CacheOptions {
        etag: Some(etag.to_string()),
        ..options.clone()
    };
    apply_cache_headers(response.headers_mut(), &options, &[]);
    response
}
