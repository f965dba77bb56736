//! In-memory record source

use async_trait::async_trait;
use salescope_core::{LineItem, RecordSet, RecordSource, Result, Sale};
use std::sync::Arc;
use tracing::trace;

/// Serves a fixed record set
///
/// Useful for tests, demos and data that was loaded some other way.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    records: Arc<RecordSet>,
}

impl MemorySource {
    /// Create a source serving `records`
    pub fn new(records: RecordSet) -> Self {
        Self {
            name: "memory".to_string(),
            records: Arc::new(records),
        }
    }

    /// Create a source from the two record lists
    pub fn from_records(sales: Vec<Sale>, line_items: Vec<LineItem>) -> Self {
        Self::new(RecordSet::new(sales, line_items))
    }

    /// Set the name used in logs and cache keys
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The served records
    pub fn records(&self) -> &RecordSet {
        &self.records
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(RecordSet::default())
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Arc<RecordSet>> {
        trace!(source = %self.name, "Serving records from memory");
        Ok(Arc::clone(&self.records))
    }
}
