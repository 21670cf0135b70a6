//! Compiled statements.

use crate::error::BuildResult;
use crate::inline::{Inliner, count_placeholders};
use crate::value::PreparedValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The shape of SQL a builder compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Select,
    Create,
    Update,
    Insert,
    Delete,
    /// Compiles as INSERT when no filter is present, otherwise as UPDATE.
    Upsert,
}

impl OperationKind {
    /// Whether compiling requires a filter predicate.
    pub fn requires_filter(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "SELECT",
            Self::Create => "CREATE TABLE",
            Self::Update => "UPDATE",
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        })
    }
}

/// SQL text with `?` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledStatement {
    sql: String,
    params: Vec<PreparedValue>,
    operation: OperationKind,
}

impl CompiledStatement {
    pub(crate) fn new(sql: String, params: Vec<PreparedValue>, operation: OperationKind) -> Self {
        Self {
            sql,
            params,
            operation,
        }
    }

    /// SQL text with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[PreparedValue] {
        &self.params
    }

    /// The operation this statement was compiled from.
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Render standalone SQL with every placeholder replaced by a literal.
    pub fn inline(&self) -> BuildResult<String> {
        self.inline_with(&Inliner::new())
    }

    pub fn inline_with(&self, inliner: &Inliner) -> BuildResult<String> {
        inliner.inline(&self.sql, &self.params)
    }

    pub fn into_parts(self) -> (String, Vec<PreparedValue>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
