//! The execution seam.
//!
//! sqlforge never talks to a database. An [`Executor`] receives the compiled
//! SQL and its ordered parameters, binds them to the `?` placeholders and runs
//! the statement.

use crate::error::BuildResult;
use crate::value::PreparedValue;

/// Runs compiled statements against a database.
///
/// Implemented for any `Fn(&str, &[PreparedValue]) -> BuildResult<u64>`.
pub trait Executor: Send + Sync {
    /// Execute `sql` with `params` bound in order and return the affected row count.
    ///
    /// [`PreparedValue::Null`] binds as SQL `NULL`. Driver failures should be
    /// reported as [`BuildError::Execution`](crate::BuildError::Execution).
    fn execute(&self, sql: &str, params: &[PreparedValue]) -> BuildResult<u64>;
}

impl<F> Executor for F
where
    F: Fn(&str, &[PreparedValue]) -> BuildResult<u64> + Send + Sync,
{
    fn execute(&self, sql: &str, params: &[PreparedValue]) -> BuildResult<u64> {
        self(sql, params)
    }
}
