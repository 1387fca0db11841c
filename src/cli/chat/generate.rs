use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::history::HistoryEntry;
use super::session::Session;
use crate::backend_client::{Backend, BackendError, GenerateRequest, GenerateResponse};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Please enter a query")]
    Validation,

    #[error("Please log in first")]
    NotAuthenticated,

    #[error("A request is already in flight")]
    Busy,

    #[error("Request cancelled")]
    Cancelled,

    #[error("API Error: {0}")]
    Backend(#[from] BackendError),
}

/// A successful call: both variants and how long the backend took.
#[derive(Debug, Clone)]
pub struct Generation {
    pub casual: String,
    pub formal: String,
    pub elapsed: Duration,
}

/// Sends requests to the backend, one at a time.
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    slot: Semaphore,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            slot: Semaphore::new(1),
        }
    }

    /// Runs one request unless another is pending. Resolving `cancel` first
    /// drops the request.
    pub async fn dispatch<C>(
        &self,
        request: GenerateRequest,
        cancel: C,
    ) -> Result<GenerateResponse, GenerateError>
    where
        C: Future<Output = ()>,
    {
        let _permit = self.slot.try_acquire().map_err(|_| GenerateError::Busy)?;

        tokio::select! {
            result = self.backend.generate(&request) => Ok(result?),
            _ = cancel => {
                warn!("Request for {:?} cancelled", request.query);
                Err(GenerateError::Cancelled)
            }
        }
    }
}

/// Validates `query`, asks the backend and records the answer in `session`.
/// History is only touched on success.
pub async fn generate_response<C>(
    session: &mut Session,
    dispatcher: &Dispatcher,
    query: &str,
    cancel: C,
) -> Result<Generation, GenerateError>
where
    C: Future<Output = ()>,
{
    if query.trim().is_empty() {
        return Err(GenerateError::Validation);
    }
    if !session.is_authenticated() {
        return Err(GenerateError::NotAuthenticated);
    }

    let request = GenerateRequest {
        user_id: session.user_id().to_string(),
        query: query.to_string(),
    };

    let start = Instant::now();
    let response = dispatcher.dispatch(request, cancel).await?;
    let elapsed = start.elapsed();
    info!("Generated responses in {:.2}s", elapsed.as_secs_f64());

    session.record(HistoryEntry::new(
        query,
        &response.casual_response,
        &response.formal_response,
    ));

    Ok(Generation {
        casual: response.casual_response,
        formal: response.formal_response,
        elapsed,
    })
}
