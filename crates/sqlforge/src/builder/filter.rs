//! WHERE clause accumulation shared by SELECT, UPDATE, DELETE and UPSERT.

use crate::error::{BuildError, BuildResult};
use crate::value::PreparedValue;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a filter predicate.
///
/// Parses from the textual operators `=`, `!=`, `>`, `>=`, `<=`, `<`,
/// `isnull`, `isntnull` and `like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lte,
    Lt,
    IsNull,
    IsNotNull,
    Like,
}

impl Op {
    /// SQL rendering of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Lt => "<",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
            Op::Like => "LIKE",
        }
    }

    /// Whether the operator compares against a bound value.
    pub fn takes_value(self) -> bool {
        !matches!(self, Op::IsNull | Op::IsNotNull)
    }
}

impl FromStr for Op {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "=" => Op::Eq,
            "!=" => Op::Ne,
            ">" => Op::Gt,
            ">=" => Op::Gte,
            "<=" => Op::Lte,
            "<" => Op::Lt,
            "isnull" => Op::IsNull,
            "isntnull" => Op::IsNotNull,
            "like" => Op::Like,
            other => {
                return Err(BuildError::format(format!("Unknown operator '{other}'")));
            }
        })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Convert an input into an [`Op`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoOp {
    fn into_op(self) -> BuildResult<Op>;
}

impl IntoOp for Op {
    fn into_op(self) -> BuildResult<Op> {
        Ok(self)
    }
}

impl IntoOp for &str {
    fn into_op(self) -> BuildResult<Op> {
        self.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Conjunction {
    #[default]
    And,
    Or,
}

/// Accumulated predicate text and the values its placeholders consume.
#[derive(Debug, Clone, Default)]
pub(crate) struct Filter {
    /// Rendered clause, including the leading ` WHERE `.
    clause: String,
    params: Vec<PreparedValue>,
    predicates: usize,
    conjunction: Conjunction,
    pending_open: usize,
}

impl Filter {
    /// True until the first predicate is added. Brackets alone do not count.
    pub(crate) fn is_empty(&self) -> bool {
        self.predicates == 0
    }

    pub(crate) fn clause(&self) -> &str {
        &self.clause
    }

    pub(crate) fn params(&self) -> &[PreparedValue] {
        &self.params
    }

    pub(crate) fn set_conjunction(&mut self, conjunction: Conjunction) {
        self.conjunction = conjunction;
    }

    pub(crate) fn open_bracket(&mut self) {
        self.pending_open += 1;
    }

    pub(crate) fn close_bracket(&mut self) {
        self.clause.push(')');
    }

    /// Append `column op [?]`, prefixed by `WHERE` or the pending conjunction.
    ///
    /// `column` is an already rendered column reference. The conjunction
    /// resets to AND afterwards.
    pub(crate) fn push_predicate(&mut self, column: &str, op: Op, value: Option<PreparedValue>) {
        if self.is_empty() {
            self.clause.push_str(" WHERE ");
        } else {
            self.clause.push_str(match self.conjunction {
                Conjunction::And => " AND ",
                Conjunction::Or => " OR ",
            });
        }
        self.conjunction = Conjunction::And;

        for _ in 0..self.pending_open {
            self.clause.push('(');
        }
        self.pending_open = 0;

        self.clause.push_str(column);
        self.clause.push(' ');
        self.clause.push_str(op.as_sql());
        if let Some(value) = value {
            self.clause.push_str(" ?");
            self.params.push(value);
        }
        self.predicates += 1;
    }
}
