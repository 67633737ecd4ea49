use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::task::{AbortHandle, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Requête annulée")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Other(err.to_string())
    }
}

/// Owns at most one in-flight request.
///
/// Starting a new one aborts the previous; dropping the fetcher aborts the
/// current one.
#[derive(Debug, Default)]
pub struct Fetcher {
    current: Option<AbortHandle>,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `request`, aborting whatever this fetcher was running.
    pub fn run<F, T>(&mut self, request: F) -> Pending<T>
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
        T: Send + 'static,
    {
        self.abort();
        let handle = tokio::spawn(request);
        self.current = Some(handle.abort_handle());
        Pending { handle }
    }

    pub fn abort(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Result of one `Fetcher::run`; resolves to `Aborted` if superseded.
pub struct Pending<T> {
    handle: JoinHandle<Result<T, FetchError>>,
}

impl<T> Future for Pending<T> {
    type Output = Result<T, FetchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(FetchError::Aborted),
            Err(e) => Err(FetchError::Other(e.to_string())),
        })
    }
}
