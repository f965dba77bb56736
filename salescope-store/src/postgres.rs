//! PostgreSQL record source

use crate::config::DatabaseConfig;
use crate::error::{LoadError, LoadResult};
use crate::queries::{LINE_ITEMS_QUERY, SALES_QUERY};
use crate::rows::{LineItemRow, SaleRow};
use async_trait::async_trait;
use chrono_tz::Tz;
use salescope_core::{LineItem, RecordSet, RecordSource, Result, Sale};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Loads sales and line items with two joined queries
///
/// Each load runs both queries concurrently on the pool and converts every
/// timestamp to the configured timezone.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
    timezone: Tz,
    name: String,
}

impl PostgresSource {
    /// Open a pool and check that the database is reachable
    pub async fn connect(config: &DatabaseConfig) -> LoadResult<Self> {
        debug!(url = %config.display_url(), "Connecting to sales database");
        let pool = Self::pool_options(config)
            .connect_with(config.connect_options())
            .await?;
        Ok(Self::from_pool(pool, config.timezone).with_name(config.database.clone()))
    }

    /// Build a pool that connects on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = Self::pool_options(config).connect_lazy_with(config.connect_options());
        Self::from_pool(pool, config.timezone).with_name(config.database.clone())
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool, timezone: Tz) -> Self {
        Self {
            pool,
            timezone,
            name: "postgres".to_string(),
        }
    }

    /// Set the name used in logs and cache keys
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The reporting timezone
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(0)
            .max_connections(config.max_connections())
            .acquire_timeout(config.acquire_timeout)
    }

    async fn load_sales(&self) -> LoadResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(SALES_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::from_query("sale", e))?;
        Ok(rows.into_iter().map(|row| row.into_sale(self.timezone)).collect())
    }

    async fn load_line_items(&self) -> LoadResult<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, LineItemRow>(LINE_ITEMS_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::from_query("line item", e))?;
        rows.into_iter()
            .map(|row| row.into_line_item(self.timezone))
            .collect()
    }

    /// Run both queries
    pub async fn fetch(&self) -> LoadResult<RecordSet> {
        let start = Instant::now();
        let (sales, line_items) = tokio::try_join!(self.load_sales(), self.load_line_items())?;
        info!(
            source = %self.name,
            sales = sales.len(),
            line_items = line_items.len(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched records from PostgreSQL"
        );
        Ok(RecordSet::new(sales, line_items))
    }
}

#[async_trait]
impl RecordSource for PostgresSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Arc<RecordSet>> {
        Ok(Arc::new(self.fetch().await?))
    }
}
