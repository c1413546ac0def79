//! Publishes connection pool gauges.

use async_trait::async_trait;
use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Records `database_connections_*` gauges every few seconds.
pub struct PoolMetricsJob {
    pool: PgPool,
    every_secs: u64,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            every_secs: 10,
        }
    }
}

#[async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.every_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_pool_metrics_job_runs_against_lazy_pool() {
        // connect_lazy never touches the network, so the gauges read an empty pool
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let job = PoolMetricsJob::new(pool);

        assert_eq!(job.name(), "pool_metrics");
        assert!(matches!(job.frequency(), JobFrequency::Seconds(10)));
        assert!(job.execute().await.is_ok());
    }
}
