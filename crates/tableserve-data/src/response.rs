//! Raw responses from the menu source.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::FetchError;

const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Status, headers and body as returned by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8.
    pub fn text(&self) -> Result<String, FetchError> {
        std::str::from_utf8(&self.body)
            .map(str::to_owned)
            .map_err(|e| FetchError::ParseError(format!("body is not UTF-8: {e}")))
    }

    /// Decode the body; a malformed payload is a [`FetchError::ParseError`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Turn a non-2xx status into [`FetchError::HttpError`].
    ///
    /// The message is a short prefix of the body, or the status when the
    /// body is empty.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = match self.text() {
            Ok(text) if !text.trim().is_empty() => {
                text.trim().chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
            }
            _ => format!("status {}", self.status),
        };
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}
