//! Request logging middleware

use super::super::state::ServerState;
use crate::server::metrics::{normalize_path, record_http_request};
use axum::extract::State;
use axum::{
    body::Body,
    http::{header::CONTENT_LENGTH, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Bodies at least this large are summarized instead of printed.
const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

fn content_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get(CONTENT_LENGTH)
        .ok_or("content-length not set")?
        .to_str()
        .map_err(|_| "content-length is not a string")?
        .parse()
        .map_err(|_| "content-length is not a number")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} headers:", label);
    for (name, value) in headers {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Log `body` if it is small enough and hand back an equivalent one.
///
/// Small bodies are buffered in full to be printed, so the returned body is
/// rebuilt from those bytes. Anything else passes through untouched.
async fn log_body(label: &str, headers: &HeaderMap, body: Body) -> Result<Body, axum::Error> {
    let size = match content_length(headers) {
        Ok(size) => size,
        Err(reason) => {
            info!("  {} body: {}", label, reason);
            return Ok(body);
        }
    };

    if size >= MAX_LOGGABLE_BODY_LENGTH {
        info!(
            "  {} body: too big to log ({:#})",
            label,
            byte_unit::Byte::from(size)
        );
        return Ok(body);
    }

    let bytes = axum::body::to_bytes(body, size).await?;
    info!("  {} body:\n{}", label, String::from_utf8_lossy(&bytes));
    Ok(Body::from(bytes))
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level.clone();
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, request.uri());
    }
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }

    let request = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        match log_body("Req", &parts.headers, body).await {
            Ok(body) => Request::from_parts(parts, body),
            Err(err) => {
                error!("Failed to read request body: {:?}", err);
                return (StatusCode::BAD_REQUEST, "Unreadable request body").into_response();
            }
        }
    } else {
        request
    };

    let response = next.run(request).await;
    let status = response.status().as_u16();

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }

    let response = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        match log_body("Resp", &parts.headers, body).await {
            Ok(body) => Response::from_parts(parts, body),
            Err(err) => {
                error!("Failed to read response body: {:?}", err);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        response
    };

    let duration = start.elapsed();
    if level > RequestsLoggingLevel::None {
        info!("<<< {} ({}ms)", status, duration.as_millis());
    }
    record_http_request(&method, &normalize_path(&path), status, duration);

    response
}
