//! Query timing and connection pool gauges.
//!
//! Every repository call is wrapped in a [`QueryTimer`]; the recorded
//! histogram carries the query name and whether it succeeded, so failed
//! renewal fan-outs or signups show up next to their latency.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// How a timed query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Ok,
    Error,
}

impl QueryOutcome {
    pub fn of<T>(result: &Result<T, sqlx::Error>) -> Self {
        match result {
            Ok(_) => QueryOutcome::Ok,
            Err(_) => QueryOutcome::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOutcome::Ok => "ok",
            QueryOutcome::Error => "error",
        }
    }
}

/// Publishes pool size and idle connections. Called by the pool metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one repository operation.
///
/// ```ignore
/// let timer = QueryTimer::new("find_invitation_by_token");
/// let result = sqlx::query_as::<_, InvitationEntity>(...).fetch_optional(&pool).await;
/// timer.record(&result);
/// result
/// ```
#[derive(Debug)]
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time labelled with the outcome of `result`.
    pub fn record<T>(self, result: &Result<T, sqlx::Error>) {
        self.finish(QueryOutcome::of(result));
    }

    fn finish(self, outcome: QueryOutcome) {
        let elapsed = self.start.elapsed().as_secs_f64();

        histogram!(
            "database_query_duration_seconds",
            "query" => self.query_name,
            "outcome" => outcome.as_str()
        )
        .record(elapsed);

        if outcome == QueryOutcome::Error {
            counter!("database_query_errors_total", "query" => self.query_name).increment(1);
        }
    }
}
