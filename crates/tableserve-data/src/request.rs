//! HTTP request builder.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::FetchError;

/// Everything outside the RFC 3986 unreserved set is percent-encoded.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A fully built GET request, ready for a [`Transport`](crate::Transport).
///
/// The menu source is read-only, so there is no method or body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers to the request.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Append a query parameter; the value is percent-encoded on build.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Finish the request.
    pub fn build(self) -> Result<Request, FetchError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(self.url));
        }

        let mut url = self.url;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let separator = if i == 0 && !url.contains('?') { '?' } else { '&' };
            url.push(separator);
            url.push_str(&encode_component(key));
            url.push('=');
            url.push_str(&encode_component(value));
        }

        Ok(Request {
            url,
            headers: self.headers,
        })
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE_SET).to_string()
}
