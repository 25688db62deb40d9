//! Network request interception.
//!
//! Interceptors pair a URL pattern with an action: block the request,
//! answer it with a mock response, redirect it, or hand it to a rewriter
//! callback. The registry is insertion-ordered and the most recently
//! registered matching interceptor wins. Registrations do not survive a
//! browser close.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use serde_json::Value;
use sightline_cdp::CdpClient;
use sightline_cdp::protocol::fetch::{
    ContinueRequestParams, ErrorReason, FailRequestParams, FulfillRequestParams, HeaderEntry,
    RequestPausedEvent,
};
use tracing::{debug, warn};

use crate::error::CoreError;

/// A rewriter callback receiving the paused request.
pub type RewriteHandler = Arc<
    dyn Fn(InterceptedRequest) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send>>
        + Send
        + Sync,
>;

/// What to do with requests matching a pattern.
#[derive(Clone)]
pub enum InterceptAction {
    /// Fail the request as blocked.
    Block,
    /// Answer with a canned response.
    Mock(MockResponse),
    /// Continue the request against a different URL.
    Redirect(String),
    /// Run a callback that resolves the request itself.
    Rewrite(RewriteHandler),
}

impl std::fmt::Debug for InterceptAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "Block"),
            Self::Mock(mock) => f.debug_tuple("Mock").field(mock).finish(),
            Self::Redirect(url) => f.debug_tuple("Redirect").field(url).finish(),
            Self::Rewrite(_) => write!(f, "Rewrite(..)"),
        }
    }
}

/// A canned response for mocked requests.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: i64,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl MockResponse {
    /// A 200 response with a JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    /// Override the status code.
    #[must_use]
    pub fn status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    /// Add a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn body_text(&self) -> Option<String> {
        self.body.as_ref().map(|body| match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    fn into_params(self, request_id: String) -> FulfillRequestParams {
        let body = self.body_text().map(|text| BASE64.encode(text));
        FulfillRequestParams {
            request_id,
            response_code: self.status,
            response_headers: if self.headers.is_empty() {
                None
            } else {
                Some(
                    self.headers
                        .iter()
                        .map(|(name, value)| HeaderEntry {
                            name: name.clone(),
                            value: value.clone(),
                        })
                        .collect(),
                )
            },
            body,
        }
    }
}

/// One registered interceptor.
#[derive(Debug, Clone)]
pub(crate) struct Interceptor {
    pattern: String,
    action: InterceptAction,
}

/// Insertion-ordered interceptor registry, shared with the event pump.
#[derive(Debug, Clone, Default)]
pub(crate) struct InterceptorRegistry {
    entries: Arc<Mutex<Vec<Interceptor>>>,
}

impl InterceptorRegistry {
    /// Add an interceptor; returns whether it is the first one.
    pub(crate) fn add(&self, pattern: impl Into<String>, action: InterceptAction) -> bool {
        let mut entries = self.entries.lock();
        let was_empty = entries.is_empty();
        entries.push(Interceptor {
            pattern: pattern.into(),
            action,
        });
        was_empty
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Action for a URL; the last matching registration wins.
    pub(crate) fn find(&self, url: &str) -> Option<InterceptAction> {
        self.entries
            .lock()
            .iter()
            .rev()
            .find(|entry| pattern_matches(&entry.pattern, url))
            .map(|entry| entry.action.clone())
    }

    /// Resolve one paused request. Spawned per request by the event pump so
    /// a slow rewriter cannot stall event delivery.
    pub(crate) fn handle_paused(&self, client: Arc<CdpClient>, event: RequestPausedEvent) {
        let action = self.find(&event.request.url);
        tokio::spawn(async move {
            let request_id = event.request_id.clone();
            let outcome = match action {
                None => {
                    InterceptedRequest::new(client, event)
                        .continue_request()
                        .await
                }
                Some(InterceptAction::Block) => {
                    debug!(url = %event.request.url, "blocking intercepted request");
                    client
                        .send_command::<_, Value>(
                            "Fetch.failRequest",
                            Some(FailRequestParams {
                                request_id,
                                error_reason: ErrorReason::BlockedByClient,
                            }),
                        )
                        .await
                        .map(|_| ())
                        .map_err(CoreError::from)
                }
                Some(InterceptAction::Mock(mock)) => {
                    debug!(url = %event.request.url, "answering intercepted request with mock");
                    client
                        .send_command::<_, Value>(
                            "Fetch.fulfillRequest",
                            Some(mock.into_params(request_id)),
                        )
                        .await
                        .map(|_| ())
                        .map_err(CoreError::from)
                }
                Some(InterceptAction::Redirect(url)) => {
                    debug!(from = %event.request.url, to = %url, "redirecting intercepted request");
                    client
                        .send_command::<_, Value>(
                            "Fetch.continueRequest",
                            Some(ContinueRequestParams {
                                request_id,
                                url: Some(url),
                                ..ContinueRequestParams::default()
                            }),
                        )
                        .await
                        .map(|_| ())
                        .map_err(CoreError::from)
                }
                Some(InterceptAction::Rewrite(handler)) => {
                    handler(InterceptedRequest::new(client, event)).await
                }
            };
            if let Err(error) = outcome {
                warn!(%error, "failed to resolve intercepted request");
            }
        });
    }
}

/// Overrides for continuing a rewritten request.
#[derive(Debug, Clone, Default)]
pub struct ContinueOverrides {
    /// Replacement URL.
    pub url: Option<String>,
    /// Replacement HTTP method.
    pub method: Option<String>,
    /// Replacement headers.
    pub headers: Vec<(String, String)>,
    /// Replacement post body.
    pub post_data: Option<String>,
}

/// A paused request handed to a rewriter callback.
#[derive(Debug)]
pub struct InterceptedRequest {
    client: Arc<CdpClient>,
    request_id: String,
    url: String,
    method: String,
}

impl InterceptedRequest {
    fn new(client: Arc<CdpClient>, event: RequestPausedEvent) -> Self {
        Self {
            client,
            request_id: event.request_id,
            url: event.request.url,
            method: event.request.method,
        }
    }

    /// The request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Let the request through unchanged.
    pub async fn continue_request(self) -> Result<(), CoreError> {
        self.continue_with(ContinueOverrides::default()).await
    }

    /// Let the request through with overrides applied.
    pub async fn continue_with(self, overrides: ContinueOverrides) -> Result<(), CoreError> {
        let headers = if overrides.headers.is_empty() {
            None
        } else {
            Some(
                overrides
                    .headers
                    .into_iter()
                    .map(|(name, value)| HeaderEntry { name, value })
                    .collect(),
            )
        };
        self.client
            .send_command::<_, Value>(
                "Fetch.continueRequest",
                Some(ContinueRequestParams {
                    request_id: self.request_id,
                    url: overrides.url,
                    method: overrides.method,
                    post_data: overrides.post_data.map(|data| BASE64.encode(data)),
                    headers,
                }),
            )
            .await?;
        Ok(())
    }

    /// Answer the request with a canned response.
    pub async fn respond(self, mock: MockResponse) -> Result<(), CoreError> {
        self.client
            .send_command::<_, Value>(
                "Fetch.fulfillRequest",
                Some(mock.into_params(self.request_id)),
            )
            .await?;
        Ok(())
    }
}

/// Match a URL against a registration pattern.
///
/// Patterns with `*` are wildcard-matched against the whole URL; patterns
/// without are substring matches, so `"/api/users"` intercepts every request
/// whose URL contains that path.
pub(crate) fn pattern_matches(pattern: &str, url: &str) -> bool {
    if pattern.contains('*') {
        wildcard_matches(pattern, url)
    } else {
        url.contains(pattern)
    }
}

fn wildcard_matches(pattern: &str, input: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let input: Vec<char> = input.chars().collect();

    // Iterative wildcard match with backtracking over the last `*`.
    let (mut p, mut i) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while i < input.len() {
        if p < pattern.len() && (pattern[p] == input[i]) {
            p += 1;
            i += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, i));
            p += 1;
        } else if let Some((star_p, star_i)) = star {
            p = star_p + 1;
            i = star_i + 1;
            star = Some((star_p, star_i + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// Build a [`InterceptAction::Rewrite`] from an async closure.
pub fn rewrite<F, Fut>(handler: F) -> InterceptAction
where
    F: Fn(InterceptedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
{
    InterceptAction::Rewrite(Arc::new(move |request| Box::pin(handler(request))))
}

impl crate::browser::Browser {
    /// Intercept requests whose URL matches the pattern.
    ///
    /// The first registration enables Fetch-domain interception; it stays
    /// enabled across target switches until [`Self::clear_intercepts`] or a
    /// browser close.
    pub async fn intercept(
        &self,
        pattern: impl Into<String>,
        action: InterceptAction,
    ) -> Result<(), CoreError> {
        self.ensure_open()?;
        let first = self.interceptors().add(pattern, action);
        if first {
            let client = self.client().await?;
            client
                .send_command::<_, Value>(
                    "Fetch.enable",
                    Some(sightline_cdp::protocol::fetch::EnableParams {
                        patterns: vec![sightline_cdp::protocol::fetch::RequestPattern {
                            url_pattern: Some("*".to_string()),
                        }],
                    }),
                )
                .await?;
        }
        Ok(())
    }

    /// Drop all interceptors and stop pausing requests.
    pub async fn clear_intercepts(&self) -> Result<(), CoreError> {
        self.interceptors().clear();
        if let Ok(client) = self.client().await {
            let _ = client
                .send_command::<_, Value>("Fetch.disable", None::<Value>)
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
