//! Service trait definitions for dependency injection
//!
//! Storage is abstracted behind one repository trait per record type so the
//! handlers never see SQL, and tests can swap in mocks.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::WebServerResult;

/// Append-only store for one kind of result record
#[mockall::automock]
#[async_trait]
pub trait Repository<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    /// Insert one record and return its row id
    async fn save(&self, record: R) -> WebServerResult<i64>;

    /// Count all stored records
    async fn count(&self) -> WebServerResult<u64>;

    /// Count records created within the last `window`
    async fn count_since(&self, window: Duration) -> WebServerResult<u64>;

    /// Average score of records created within the last `window`.
    ///
    /// Returns 0 for an empty window or for record types without a score.
    async fn average_score_since(&self, window: Duration) -> WebServerResult<f64>;
}

#[async_trait]
impl<R, T> Repository<R> for Arc<T>
where
    R: Send + Sync + 'static,
    T: Repository<R> + ?Sized,
{
    async fn save(&self, record: R) -> WebServerResult<i64> {
        (**self).save(record).await
    }

    async fn count(&self) -> WebServerResult<u64> {
        (**self).count().await
    }

    async fn count_since(&self, window: Duration) -> WebServerResult<u64> {
        (**self).count_since(window).await
    }

    async fn average_score_since(&self, window: Duration) -> WebServerResult<f64> {
        (**self).average_score_since(window).await
    }
}
