//! Placeholder inlining for contexts that need standalone SQL text.
//!
//! The parameterized form (`?` placeholders + ordered [`PreparedValue`]s) is
//! always preferred. Inlining exists for logging, fixtures and drivers
//! without prepared statements.
//!
//! String literals are escaped MySQL-style: every backslash is doubled, then
//! every single quote becomes `\'`. Unescaping the literal yields the original
//! string back.

use crate::error::{BuildError, BuildResult};
use crate::value::PreparedValue;

/// Escape `input` for embedding inside a single-quoted SQL literal.
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    write_escaped(&mut out, input);
    out
}

fn write_escaped(out: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
}

/// Byte offsets of the `?` placeholders in compiled SQL.
///
/// A `?` inside a backtick-quoted identifier is part of the name. Doubled
/// backticks toggle twice, so escaped backticks keep the quoting state.
fn placeholder_offsets(sql: &str) -> impl Iterator<Item = usize> + '_ {
    let mut quoted = false;
    sql.bytes().enumerate().filter_map(move |(i, b)| match b {
        b'`' => {
            quoted = !quoted;
            None
        }
        b'?' if !quoted => Some(i),
        _ => None,
    })
}

/// Count `?` placeholders in compiled SQL.
pub fn count_placeholders(sql: &str) -> usize {
    placeholder_offsets(sql).count()
}

/// Substitutes placeholders with escaped literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inliner {
    legacy_bool_literals: bool,
}

impl Inliner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render booleans as `1'` / `0'` (stray trailing quote) like legacy output.
    pub fn legacy_bool_literals(mut self, enabled: bool) -> Self {
        self.legacy_bool_literals = enabled;
        self
    }

    /// Render a single value as a SQL literal.
    pub fn literal(&self, value: &PreparedValue) -> String {
        let mut out = String::new();
        self.write_literal(&mut out, value);
        out
    }

    fn write_literal(&self, out: &mut String, value: &PreparedValue) {
        match value {
            PreparedValue::Null(_) => out.push_str("NULL"),
            PreparedValue::Integer(n) | PreparedValue::Date(n) => out.push_str(&n.to_string()),
            PreparedValue::Boolean(b) => {
                out.push(if *b { '1' } else { '0' });
                if self.legacy_bool_literals {
                    out.push('\'');
                }
            }
            PreparedValue::Float(n) => out.push_str(&n.to_string()),
            PreparedValue::FilteredString(s)
            | PreparedValue::RawString(s)
            | PreparedValue::Text(s) => {
                out.push('\'');
                write_escaped(out, s);
                out.push('\'');
            }
        }
    }

    /// Replace each `?` in `sql`, left to right, with the matching value.
    ///
    /// The template is scanned once, so a `?` inside a substituted literal is
    /// never consumed as a placeholder. Neither is a `?` inside a quoted
    /// identifier.
    pub fn inline(&self, sql: &str, params: &[PreparedValue]) -> BuildResult<String> {
        let placeholders = count_placeholders(sql);
        if placeholders != params.len() {
            return Err(BuildError::PlaceholderMismatch {
                placeholders,
                params: params.len(),
            });
        }

        let mut out = String::with_capacity(sql.len() + params.len() * 8);
        let mut start = 0;
        for (pos, value) in placeholder_offsets(sql).zip(params) {
            out.push_str(&sql[start..pos]);
            self.write_literal(&mut out, value);
            start = pos + 1;
        }
        out.push_str(&sql[start..]);
        Ok(out)
    }
}
