//! Pluggable request transport.

use std::rc::Rc;

use crate::{FetchError, Request, Response};

/// Sends a built request and returns the raw response.
///
/// Non-2xx statuses are returned as responses, not errors; the client
/// decides what to retry.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response, FetchError>;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).send(request)
    }
}

/// Outbound HTTP through the Spin host.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for SpinTransport {
    fn send(&self, request: &Request) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method, Request as SpinRequest, Response as SpinResponse};

        let mut builder = SpinRequest::builder();
        builder.method(Method::Get);
        builder.uri(&request.url);
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }

        let response: SpinResponse = spin_sdk::http::run(spin_sdk::http::send(builder.build()))
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();
        Ok(Response::new(status, headers, response.into_body()))
    }
}
