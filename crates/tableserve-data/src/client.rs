//! Fetch client with base URL, default headers and retries.

use std::collections::HashMap;
use std::time::Duration;

use crate::{FetchError, RequestBuilder, Response, RetryPolicy, Transport};

/// HTTP client for the menu source.
///
/// Requests go through the injected [`Transport`]. Failed attempts are
/// retried per the client's [`RetryPolicy`], sleeping through the
/// injected sleep function between attempts.
pub struct FetchClient {
    transport: Box<dyn Transport>,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    retry: RetryPolicy,
    sleep: Box<dyn Fn(Duration)>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for FetchClient {
    fn default() -> Self {
        Self::new(crate::SpinTransport)
    }
}

/// Blocks the calling thread. WASI hosts such as Spin back this with
/// `poll_oneoff`, so it holds the component instance for the delay.
#[cfg(any(not(target_arch = "wasm32"), target_os = "wasi"))]
fn default_sleep(delay: Duration) {
    std::thread::sleep(delay);
}

/// Bare wasm32 has nothing to wait on; retries go out immediately unless the
/// host injects a sleep with [`FetchClient::with_sleep`].
#[cfg(all(target_arch = "wasm32", not(target_os = "wasi")))]
fn default_sleep(delay: Duration) {
    tracing::debug!(
        delay_ms = delay.as_millis() as u64,
        "no sleep on this target; retrying without back-off"
    );
}

impl FetchClient {
    /// Create a client over `transport` with the default retry policy.
    ///
    /// Back-off waits block the thread (see [`FetchClient::with_sleep`] to
    /// change that). On wasm32 without WASI the default does not wait.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            base_url: None,
            default_headers: HashMap::new(),
            retry: RetryPolicy::default(),
            sleep: Box::new(default_sleep),
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace how the client waits between attempts.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Create a GET request; relative URLs are joined onto the base URL.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let builder = RequestBuilder::new(full_url).headers(
            self.default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder<'_> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request, retrying transient failures.
    ///
    /// Non-2xx responses become [`FetchError::HttpError`].
    pub fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        let client = self.client;
        tracing::debug!(url = %request.url, "sending request");

        client.retry.run(&request.url, client.sleep.as_ref(), || {
            client.transport.send(&request)?.error_for_status()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackoffStrategy, Request};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<Response, FetchError>>>,
        seen: RefCell<Vec<Request>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(Response::new(
                status,
                HashMap::new(),
                body.as_bytes().to_vec(),
            )));
            self
        }

        fn fail(self, error: FetchError) -> Self {
            self.replies.borrow_mut().push_back(Err(error));
            self
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &Request) -> Result<Response, FetchError> {
            self.seen.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(FetchError::RequestError("script exhausted".into())))
        }
    }

    fn client(transport: Rc<Scripted>) -> FetchClient {
        FetchClient::new(transport)
            .with_base_url("https://api.test/v1/")
            .with_default_header("User-Agent", "tableserve")
            .with_sleep(|_| {})
    }

    #[test]
    fn test_base_url_and_default_headers() {
        let transport = Rc::new(Scripted::default().reply(200, "{}"));
        client(transport.clone())
            .get("/filter.php")
            .query("c", "Beef")
            .send()
            .unwrap();

        let seen = transport.seen.borrow();
        assert_eq!(seen[0].url, "https://api.test/v1/filter.php?c=Beef");
        assert_eq!(
            seen[0].headers.get("User-Agent").map(String::as_str),
            Some("tableserve")
        );
    }

    #[test]
    fn test_absolute_url_bypasses_base() {
        let transport = Rc::new(Scripted::default().reply(200, ""));
        client(transport.clone())
            .get("https://other.test/x")
            .send()
            .unwrap();
        assert_eq!(transport.seen.borrow()[0].url, "https://other.test/x");
    }

    #[test]
    fn test_server_errors_are_retried() {
        let transport = Rc::new(
            Scripted::default()
                .reply(500, "oops")
                .fail(FetchError::Timeout)
                .reply(200, "ok"),
        );
        let response = client(transport.clone()).get("a").send().unwrap();
        assert_eq!(response.text().unwrap(), "ok");
        assert_eq!(transport.seen.borrow().len(), 3);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let transport = Rc::new(Scripted::default().reply(404, "missing").reply(200, "ok"));
        let err = client(transport.clone()).get("a").send().unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 404,
                message: "missing".into()
            }
        );
        assert_eq!(transport.seen.borrow().len(), 1);
    }

    #[test]
    fn test_sleep_receives_backoff_delays() {
        let transport = Rc::new(
            Scripted::default()
                .reply(503, "busy")
                .reply(502, "busy")
                .reply(200, "ok"),
        );
        let waits = Rc::new(RefCell::new(Vec::new()));
        let recorded = waits.clone();
        let retry = RetryPolicy {
            max_retries: 3,
            backoff: BackoffStrategy::Exponential {
                base: Duration::from_millis(100),
                max: Duration::from_millis(150),
            },
        };
        client(transport)
            .with_retry(retry)
            .with_sleep(move |delay| recorded.borrow_mut().push(delay))
            .get("a")
            .send()
            .unwrap();
        assert_eq!(
            *waits.borrow(),
            vec![Duration::from_millis(100), Duration::from_millis(150)]
        );
    }

    #[test]
    fn test_default_sleep_blocks() {
        let started = std::time::Instant::now();
        default_sleep(Duration::from_millis(5));
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_retries_stop_at_policy_limit() {
        let transport = Rc::new(
            Scripted::default()
                .fail(FetchError::Timeout)
                .fail(FetchError::Timeout)
                .reply(200, "late"),
        );
        let err = client(transport.clone())
            .with_retry(RetryPolicy::new(1))
            .get("a")
            .send()
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout);
        assert_eq!(transport.seen.borrow().len(), 2);
    }
}
