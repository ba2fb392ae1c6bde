// libs/doctor-cell/src/services/fetch.rs
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::{DoctorError, DoctorRecord};
use crate::services::source::DoctorSource;

/// How a fetch task ended.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { generation: u64, records: Vec<DoctorRecord> },
    Failed { generation: u64, error: DoctorError },
    Cancelled { generation: u64 },
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            FetchOutcome::Loaded { generation, .. }
            | FetchOutcome::Failed { generation, .. }
            | FetchOutcome::Cancelled { generation } => *generation,
        }
    }
}

/// A doctor-list fetch running on the runtime, cancellable through its token.
pub struct FetchTask {
    generation: u64,
    token: CancellationToken,
    handle: JoinHandle<Result<Vec<DoctorRecord>, DoctorError>>,
}

impl FetchTask {
    /// Spawn a fetch that stops as soon as `token` is cancelled.
    pub fn spawn(source: Arc<dyn DoctorSource>, token: CancellationToken, generation: u64) -> Self {
        debug!("Starting doctor fetch #{}", generation);

        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => Err(DoctorError::Cancelled),
                result = source.fetch_doctors() => result,
            }
        });

        Self {
            generation,
            token,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn join(self) -> FetchOutcome {
        let generation = self.generation;

        match self.handle.await {
            Ok(Ok(records)) => FetchOutcome::Loaded { generation, records },
            Ok(Err(DoctorError::Cancelled)) => FetchOutcome::Cancelled { generation },
            Ok(Err(error)) => FetchOutcome::Failed { generation, error },
            Err(join_error) => {
                warn!("Doctor fetch #{} did not complete: {}", generation, join_error);
                FetchOutcome::Failed {
                    generation,
                    error: DoctorError::Fetch(join_error.to_string()),
                }
            }
        }
    }
}
