//! Authenticated request pipeline for the payments backend.
//!
//! Every outbound request goes through the same two stages: the outbound
//! stage reads the current token from the `SessionStore` and attaches it
//! as a bearer credential, and the inbound stage inspects the response
//! status, clearing the session and broadcasting an invalidation signal
//! when the server rejects the credential. Centralizing both stages here
//! guarantees every call site behaves identically.

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::store::{OfflineQueue, SessionStore};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 15s accommodates slow mobile networks while still failing fast enough
/// that a dead connection is detected and the payment can be queued.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Backend path for payment submission and replay.
const PAYMENTS_PATH: &str = "payments";

/// Capacity of the invalidation broadcast channel. Invalidations are rare
/// one-shot events; a small buffer only matters to slow subscribers.
const INVALIDATION_CHANNEL_CAPACITY: usize = 16;

/// Event broadcast when the backend rejects the session credential and
/// the local session has been cleared. Subscribers typically redirect
/// the user to a login screen.
#[derive(Debug, Clone)]
pub struct SessionInvalidated;

/// Outcome of a payment submission attempt.
#[derive(Debug)]
pub enum PaymentSubmission {
    /// The backend accepted the payment; its response body is included.
    Sent(serde_json::Value),
    /// No connectivity; the payment was queued locally under this id.
    Queued(i64),
}

/// API client for the payments backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the store facades share their backing store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
    queue: OfflineQueue,
    invalidated: broadcast::Sender<SessionInvalidated>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        queue: OfflineQueue,
    ) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        let (invalidated, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            queue,
            invalidated,
        })
    }

    /// Subscribe to session-invalidation events. Each 401 response fires
    /// exactly one event; delivery to lagging subscribers is best-effort.
    pub fn subscribe_invalidations(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.invalidated.subscribe()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Outbound stage: attach the current bearer token, if any.
    ///
    /// Requests go out unauthenticated when no token is stored (public
    /// endpoints exist). A store read failure aborts the request before
    /// it is sent.
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        let token = self
            .session
            .token()
            .map_err(|e| ApiError::CredentialLookup(e.to_string()))?;
        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::CredentialLookup("stored token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Inbound stage: pass successes through, map failures to the error
    /// taxonomy, and react to credential rejection.
    ///
    /// A 401 clears the session and broadcasts `SessionInvalidated` as a
    /// side effect; the error is still returned so the call site can
    /// abort its own work. Network-level failures never reach this stage
    /// and never invalidate the session.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    fn invalidate_session(&self) {
        warn!("server rejected credentials, clearing session");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "failed to clear session after credential rejection");
        }
        // No subscribers is fine
        let _ = self.invalidated.send(SessionInvalidated);
    }

    /// Send an authenticated GET and deserialize the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let headers = self.auth_headers()?;

        debug!(url = %url, "GET");
        let response = self.client.get(&url).headers(headers).send().await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Send an authenticated POST with a JSON body and deserialize the
    /// JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let headers = self.auth_headers()?;

        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    // ===== Payment submission and replay =====

    /// Submit a payment, falling back to the offline queue when the
    /// device has no connectivity.
    ///
    /// Only connectivity-class failures (timeout, connection refused)
    /// queue the payment; a server verdict, including 401, propagates
    /// without queueing.
    pub async fn submit_payment(
        &self,
        payload: serde_json::Value,
    ) -> Result<PaymentSubmission, ApiError> {
        match self.post::<serde_json::Value, _>(PAYMENTS_PATH, &payload).await {
            Ok(response) => Ok(PaymentSubmission::Sent(response)),
            Err(e) if e.is_connectivity() => {
                warn!(error = %e, "no connectivity, queueing payment for replay");
                let id = self.queue.enqueue(payload)?;
                Ok(PaymentSubmission::Queued(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Replay queued payments oldest-first, clearing the queue only after
    /// every entry has been accepted.
    ///
    /// All-or-nothing: the first failure stops the replay and leaves the
    /// whole queue intact, so entries sent before the failure will be
    /// resent on the next replay. The payments endpoint must tolerate
    /// resubmission. Returns the number of entries replayed.
    pub async fn replay_pending(&self) -> Result<usize, ApiError> {
        let pending = self.queue.list()?;
        if pending.is_empty() {
            return Ok(0);
        }

        debug!(count = pending.len(), "replaying queued payments");
        for entry in &pending {
            self.post::<serde_json::Value, _>(PAYMENTS_PATH, &entry.payload)
                .await?;
        }

        self.queue.clear_all()?;
        Ok(pending.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
