//! Read-only view of an inbound request.

use axum::http::{request::Parts, HeaderMap, Method, Request, Uri};

/// Query key some crawlers send to ask for an indexable snapshot.
pub const ESCAPED_FRAGMENT: &str = "_escaped_fragment_";

/// What the matchers need to see of an inbound request.
///
/// Implemented for [`Request`] and for request [`Parts`], so a host can
/// classify before or after splitting off the body.
pub trait IncomingRequest {
    fn method(&self) -> &Method;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// True if the query string carries `key`, whatever its value.
    fn has_query_param(&self, key: &str) -> bool {
        self.uri()
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).any(|(k, _)| k == key))
            .unwrap_or(false)
    }

    /// The URI exactly as received (path and query, or absolute form).
    fn uri_string(&self) -> String {
        self.uri().to_string()
    }
}

impl<B> IncomingRequest for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }

    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }
}

impl IncomingRequest for Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
