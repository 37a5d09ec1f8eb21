use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Runs independent units of work with at most `width` in flight.
///
/// Every unit carries a key that comes back with its result, panics included.
pub struct WorkerPool<K, T> {
    permits: Arc<Semaphore>,
    tasks: JoinSet<(K, Result<T, JoinError>)>,
}

impl<K, T> WorkerPool<K, T>
where
    K: Send + 'static,
    T: Send + 'static,
{
    pub fn new(width: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(width.max(1))),
            tasks: JoinSet::new(),
        }
    }

    pub fn submit<F>(&mut self, key: K, work: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permits = self.permits.clone();
        self.tasks.spawn(async move {
            // The semaphore is never closed; acquire failures are not expected.
            let _permit = permits
                .acquire_owned()
                .await
                .unwrap_or_else(|_| unreachable!("worker pool semaphore closed"));
            // A panic in `work` surfaces as the inner JoinError, keeping `key`.
            let outcome = tokio::spawn(work).await;
            (key, outcome)
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every submitted unit, in completion order.
    pub async fn wait_all(mut self) -> Vec<(K, Result<T, JoinError>)> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => log::error!("Worker pool task failed: {err}"),
            }
        }
        results
    }
}
