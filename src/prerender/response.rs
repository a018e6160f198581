//! Buffered render service response.
//!
//! # Design Decisions
//! - Fully buffered so hooks can inspect, replace or store it
//! - Hop-by-hop headers and Content-Length dropped when converting
//!   back into a client response (body may have been decoded or replaced)

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHENTICATE,
];

/// A pre-rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RenderedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// A 200 response with an HTML content type.
    pub fn html(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        Self::new(StatusCode::OK, headers, body)
    }
}

impl IntoResponse for RenderedResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        for name in HOP_BY_HOP.iter() {
            headers.remove(name);
        }
        headers.remove("keep-alive");
        headers.remove(header::CONTENT_LENGTH);

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}
