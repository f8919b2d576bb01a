//! services/api/src/web/upload.rs
//!
//! Multipart file uploads. Each named uploader accepts a fixed set of content
//! types, each with its own size limit, and exactly one file per request.
//! Accepted files are written to the upload directory and served back under
//! `/uploads/files/`.

use crate::cache::CacheOptions;
use crate::error::RouteError;
use crate::web::reply::cached_json;
use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

const MB: usize = 1024 * 1024;

/// Public path prefix of stored files.
pub const FILES_PATH: &str = "/uploads/files";

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

//=========================================================================================
// Uploader Table
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// Any subtype of a top-level type, e.g. `image/*`.
    Family(&'static str),
    Exact(&'static str),
}

impl Accept {
    fn matches(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match self {
            Accept::Family(family) => essence
                .split_once('/')
                .is_some_and(|(top, sub)| top == *family && !sub.is_empty()),
            Accept::Exact(exact) => essence == *exact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub accept: Accept,
    pub max_bytes: usize,
}

#[derive(Debug)]
pub struct Uploader {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl Uploader {
    /// The size limit for `content_type`, or `None` when it is not accepted.
    pub fn limit_for(&self, content_type: &str) -> Option<usize> {
        self.rules
            .iter()
            .find(|rule| rule.accept.matches(content_type))
            .map(|rule| rule.max_bytes)
    }
}

pub const UPLOADERS: &[Uploader] = &[
    Uploader {
        name: "imageUploader",
        rules: &[Rule {
            accept: Accept::Family("image"),
            max_bytes: 4 * MB,
        }],
    },
    Uploader {
        name: "pdfUploader",
        rules: &[Rule {
            accept: Accept::Exact(PDF),
            max_bytes: 8 * MB,
        }],
    },
    Uploader {
        name: "documentUploader",
        rules: &[
            Rule {
                accept: Accept::Exact(PDF),
                max_bytes: 8 * MB,
            },
            Rule {
                accept: Accept::Family("text"),
                max_bytes: 4 * MB,
            },
            Rule {
                accept: Accept::Exact(DOCX),
                max_bytes: 8 * MB,
            },
        ],
    },
    Uploader {
        name: "resumeUploader",
        rules: &[
            Rule {
                accept: Accept::Exact(PDF),
                max_bytes: 4 * MB,
            },
            Rule {
                accept: Accept::Exact(DOCX),
                max_bytes: 4 * MB,
            },
        ],
    },
];

pub fn uploader(name: &str) -> Option<&'static Uploader> {
    UPLOADERS.iter().find(|u| u.name == name)
}

/// Reduces a client-supplied file name to a safe single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

//=========================================================================================
// Handler
//=========================================================================================

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
    pub size: usize,
    pub content_type: String,
    pub uploaded_by: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct UploadResponse {
    pub success: bool,
    pub data: UploadedFile,
}

struct Received {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> RouteError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RouteError::PayloadTooLarge(e.body_text())
    } else {
        RouteError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// Reads one file part, enforcing the uploader's rules as the bytes arrive.
async fn receive(uploader: &Uploader, mut field: Field<'_>) -> Result<Received, RouteError> {
    let name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let limit = uploader.limit_for(&content_type).ok_or_else(|| {
        RouteError::Validation(format!(
            "{} does not accept files of type {}",
            uploader.name, content_type
        ))
    })?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(RouteError::PayloadTooLarge(format!(
                "{} files are limited to {} MB",
                content_type,
                limit / MB
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Received {
        name,
        content_type,
        bytes,
    })
}

/// Upload a single file through one of the named uploaders.
#[utoipa::path(
    post,
    path = "/uploads/{endpoint}",
    request_body(content_type = "multipart/form-data", description = "Exactly one file part."),
    params(
        ("endpoint" = String, Path, description = "imageUploader, pdfUploader, documentUploader or resumeUploader"),
        ("x-user-id" = Option<String>, Header, description = "Recorded as the uploader; defaults to anonymous.")
    ),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file, more than one file, or an unaccepted type"),
        (status = 404, description = "Unknown uploader"),
        (status = 413, description = "The file exceeds the limit for its type"),
        (status = 500, description = "The file could not be stored")
    ),
    tag = "Uploads"
)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, RouteError> {
    let uploader = uploader(&endpoint)
        .ok_or_else(|| RouteError::NotFound(format!("Unknown upload endpoint: {endpoint}")))?;
    let mut multipart = multipart
        .map_err(|e| RouteError::Validation(format!("Expected a multipart body: {}", e.body_text())))?;

    let mut received: Option<Received> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() {
            continue;
        }
        if received.is_some() {
            return Err(RouteError::Validation(
                "Only one file may be uploaded per request".to_string(),
            ));
        }
        received = Some(receive(uploader, field).await?);
    }
    let file = received.ok_or_else(|| {
        RouteError::Validation("Multipart form must include a file".to_string())
    })?;

    let uploaded_by = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string();

    let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&file.name));
    let dir = &app_state.config.upload_dir;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&stored_name), &file.bytes).await?;
    info!(
        "Upload complete via {} for {}: {} ({} bytes)",
        uploader.name,
        uploaded_by,
        stored_name,
        file.bytes.len()
    );

    let body = UploadResponse {
        success: true,
        data: UploadedFile {
            url: format!("{FILES_PATH}/{stored_name}"),
            name: file.name,
            size: file.bytes.len(),
            content_type: file.content_type,
            uploaded_by,
        },
    };
    cached_json(&headers, StatusCode::CREATED, &body, CacheOptions::none())
}
