//! Record source trait for loading sales data

use crate::error::Result;
use crate::types::record::RecordSet;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies the sales and line-item record sets
///
/// Implementations decide how the records are fetched (SQL join, file, API).
/// Callers only rely on the field contracts of [`RecordSet`]; a source that
/// cannot meet them fails with [`crate::Error::MissingField`].
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Load every sale and line item
    async fn load(&self) -> Result<Arc<RecordSet>>;
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn load(&self) -> Result<Arc<RecordSet>> {
        (**self).load().await
    }
}
