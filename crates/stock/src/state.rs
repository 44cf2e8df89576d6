//! Observable request state.
//!
//! A watched request publishes a [`FetchState`] through a
//! [`tokio::sync::watch`] channel: `idle` or `loading` first, then exactly
//! one of `success` or `failure`.

use std::future::Future;

use stock_core::{FetchError, Result};
use tokio::sync::watch;
use tracing::debug;

/// The three fields a caller observes for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Result data, once available.
    pub data: Option<T>,
    /// The error the request ended in, if any.
    pub error: Option<FetchError>,
    /// True while the request is pending.
    pub is_loading: bool,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> FetchState<T> {
    /// Nothing requested.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }

    /// Request pending; no partial data is exposed.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }

    /// Request completed with data.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_loading: false,
        }
    }

    /// Request ended in an error.
    #[must_use]
    pub const fn failure(error: FetchError) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_loading: false,
        }
    }

    /// Terminal state for a request outcome.
    #[must_use]
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }

    /// Returns true once the request has settled either way.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_loading && (self.data.is_some() || self.error.is_some())
    }
}

/// Receiving side of a watched request.
///
/// Dropping every handle (and every receiver from [`subscribe`](Self::subscribe))
/// stops the background task, including any pending retry delay.
#[derive(Debug)]
pub struct QueryHandle<T> {
    rx: watch::Receiver<FetchState<T>>,
}

impl<T> QueryHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A handle already in its final state, with no task behind it.
    #[must_use]
    pub fn ready(state: FetchState<T>) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self { rx }
    }

    /// Runs `request` on the runtime, publishing `loading` then its outcome.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<Fut>(label: String, request: Fut) -> Self
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(FetchState::loading());

        tokio::spawn(async move {
            tokio::select! {
                result = request => {
                    tx.send_replace(FetchState::from_result(result));
                }
                () = tx.closed() => {
                    debug!(request = %label, "Watched request dropped before completion");
                }
            }
        });

        Self { rx }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the next state change.
    ///
    /// Returns `None` once no further change can happen.
    pub async fn changed(&mut self) -> Option<FetchState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until the request is no longer loading and returns that state.
    pub async fn wait(&mut self) -> FetchState<T> {
        if let Ok(state) = self.rx.wait_for(|state| !state.is_loading).await {
            return state.clone();
        }
        self.rx.borrow().clone()
    }

    /// Another receiver of the same request.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.rx.clone()
    }
}
