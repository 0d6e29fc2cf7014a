//! Request state controller.
//!
//! `QueryController` drives one logical request per activation through
//! the loading/success/error lifecycle and guarantees that a request
//! superseded by a newer activation (or torn down with its consumer)
//! never touches the exposed state, no matter when it settles.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::services::types::ServiceError;
use crate::error::ApiError;

/// Fallback when a failure carries no message of its own.
pub const GENERIC_FAILURE_DETAIL: &str = "Request failed";

/// The uniform error surface views render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            detail: if detail.is_empty() {
                GENERIC_FAILURE_DETAIL.to_string()
            } else {
                detail
            },
        }
    }
}

/// State triple exposed to the consumer of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    /// Latest settled payload. Preserved across reloads and failures.
    pub data: Option<T>,
    /// Latest failure detail. Cleared on activation.
    pub error: Option<ErrorDetail>,
    pub is_loading: bool,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// Classification seam between producer failures and request state:
/// cancellations settle silently, everything else becomes an
/// [`ErrorDetail`].
pub trait FetchFailure: std::fmt::Display {
    fn is_cancelled(&self) -> bool;

    fn detail(&self) -> String {
        self.to_string()
    }
}

impl FetchFailure for ApiError {
    fn is_cancelled(&self) -> bool {
        ApiError::is_cancelled(self)
    }
}

impl FetchFailure for ServiceError {
    fn is_cancelled(&self) -> bool {
        matches!(self, ServiceError::Api(ApiError::Cancelled))
    }
}

/// Create a linked cancellation source/token pair.
pub fn cancel_pair() -> (CancelSource, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelSource { tx }, CancelToken { rx: Some(rx) })
}

/// Owning side of a cancellation signal. Dropping the source counts as
/// cancelling: a superseded or torn-down request loses its source and
/// its token fires.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: Some(self.tx.subscribe()),
        }
    }
}

/// Cloneable cancellation signal handed to async producers. Long-running
/// operations race their work against [`CancelToken::cancelled`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    /// A token that can never fire, for one-shot callers that own no
    /// controller.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.rx {
            None => false,
            Some(rx) => *rx.borrow() || rx.has_changed().is_err(),
        }
    }

    /// Resolve once cancellation is signalled (or the source is gone).
    /// Pends forever on a [`CancelToken::never`] token.
    pub async fn cancelled(&self) {
        let mut rx = match &self.rx {
            None => return std::future::pending().await,
            Some(rx) => rx.clone(),
        };
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // Channel closed: the source was dropped, which is a cancel.
    }
}

struct ControllerShared<T> {
    state: Mutex<RequestState<T>>,
    activation: AtomicU64,
}

impl<T> ControllerShared<T> {
    fn lock_state(&self) -> MutexGuard<'_, RequestState<T>> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn settle_success(&self, id: u64, data: T) {
        let mut state = self.lock_state();
        if self.activation.load(Ordering::SeqCst) != id {
            return;
        }
        state.data = Some(data);
        state.error = None;
        state.is_loading = false;
    }

    fn settle_failure(&self, id: u64, error: ErrorDetail) {
        let mut state = self.lock_state();
        if self.activation.load(Ordering::SeqCst) != id {
            return;
        }
        state.error = Some(error);
        state.is_loading = false;
    }

    /// Cancellation is invisible: data and error keep their values, only
    /// the loading flag is reset (and only if this request is still the
    /// current one).
    fn settle_cancelled(&self, id: u64) {
        let mut state = self.lock_state();
        if self.activation.load(Ordering::SeqCst) != id {
            return;
        }
        state.is_loading = false;
    }
}

/// Drives a single asynchronous request at a time.
///
/// Each call to [`activate`](Self::activate) starts one logical request:
/// the previous in-flight request (if any) is cancelled, the state moves
/// to loading with the previous data retained, and the producer runs on
/// its own task. At settle time the result is applied only if no newer
/// activation has happened since, which is what makes "last activation
/// wins" hold under arbitrary completion reordering.
pub struct QueryController<T> {
    shared: Arc<ControllerShared<T>>,
    in_flight: Mutex<Option<CancelSource>>,
    enabled: AtomicBool,
}

impl<T> QueryController<T> {
    fn lock_in_flight(&self) -> MutexGuard<'_, Option<CancelSource>> {
        self.in_flight.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// While disabled, `activate` is a no-op and the state stays at its
    /// last settled value. Disabling cancels any in-flight request.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.teardown();
        }
    }

    /// Signal cancellation to the in-flight producer, if any.
    pub fn teardown(&self) {
        if let Some(source) = self.lock_in_flight().take() {
            source.cancel();
        }
    }
}

impl<T> Drop for QueryController<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T> Default for QueryController<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryController<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    pub fn disabled() -> Self {
        Self::with_enabled(false)
    }

    fn with_enabled(enabled: bool) -> Self {
        Self {
            shared: Arc::new(ControllerShared {
                state: Mutex::new(RequestState::default()),
                activation: AtomicU64::new(0),
            }),
            in_flight: Mutex::new(None),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Snapshot of the current state triple.
    pub fn state(&self) -> RequestState<T> {
        self.shared.lock_state().clone()
    }

    /// Start one logical request. Returns the settle task, or `None`
    /// when the controller is disabled.
    ///
    /// The producer gets a [`CancelToken`] it may pass down to the
    /// service layer; the controller additionally races the producer
    /// against the token, so even a producer that ignores it is
    /// abandoned promptly once cancelled.
    pub fn activate<F, Fut, E>(&self, producer: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: FetchFailure + Send + 'static,
    {
        if !self.is_enabled() {
            return None;
        }

        let id = self.shared.activation.fetch_add(1, Ordering::SeqCst) + 1;
        let (source, token) = cancel_pair();
        // Replacing the source drops the previous one, cancelling any
        // superseded request.
        *self.lock_in_flight() = Some(source);

        {
            let mut state = self.shared.lock_state();
            state.error = None;
            state.is_loading = true;
        }

        let shared = Arc::clone(&self.shared);
        let fut = producer(token.clone());
        Some(tokio::spawn(async move {
            let outcome = tokio::select! {
                result = fut => result,
                _ = token.cancelled() => {
                    shared.settle_cancelled(id);
                    return;
                }
            };
            match outcome {
                Ok(data) => shared.settle_success(id, data),
                Err(err) if err.is_cancelled() => shared.settle_cancelled(id),
                Err(err) => shared.settle_failure(id, ErrorDetail::new(err.detail())),
            }
        }))
    }

    /// Activate and wait for the request to settle, returning the final
    /// state. The one-shot path used by CLI handlers.
    pub async fn run<F, Fut, E>(&self, producer: F) -> RequestState<T>
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: FetchFailure + Send + 'static,
    {
        if let Some(handle) = self.activate(producer) {
            let _ = handle.await;
        }
        self.state()
    }
}
