//! Per-builder configuration.
//!
//! Sanitization hooks and the date pattern live here instead of in
//! process-wide state, so every [`StatementBuilder`](crate::StatementBuilder)
//! carries its own copy and tests can vary them per case.

use std::fmt;
use std::sync::Arc;

/// Default chrono pattern used to parse textual dates (`dd.MM.yyyy`).
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Default charset of the `CREATE TABLE ... DEFAULT CHARSET=` clause.
pub const DEFAULT_CHARSET: &str = "utf8";

/// A sanitization hook applied to string values before they are bound.
///
/// Implemented for any `Fn(&str) -> String + Send + Sync`.
///
/// # Example
/// ```ignore
/// let config = BuilderConfig::new().string_filter(|s: &str| s.trim().to_string());
/// ```
pub trait StringFilter: Send + Sync {
    fn filter(&self, input: &str) -> String;
}

impl<F> StringFilter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn filter(&self, input: &str) -> String {
        self(input)
    }
}

/// The identity filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl StringFilter for Identity {
    fn filter(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Configuration for [`StatementBuilder`](crate::StatementBuilder).
#[derive(Clone)]
pub struct BuilderConfig {
    /// Filter for `%s` values.
    pub string_filter: Arc<dyn StringFilter>,
    /// Filter for `%t` values.
    pub text_filter: Arc<dyn StringFilter>,
    /// chrono pattern used to parse textual `%d` values.
    pub date_format: String,
    /// Charset used by `CREATE TABLE`.
    pub charset: String,
    /// Inline booleans as `1'`/`0'` for byte-compatibility with legacy output.
    pub legacy_bool_literals: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            string_filter: Arc::new(Identity),
            text_filter: Arc::new(Identity),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            legacy_bool_literals: false,
        }
    }
}

impl fmt::Debug for BuilderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderConfig")
            .field("string_filter", &"<dyn StringFilter>")
            .field("text_filter", &"<dyn StringFilter>")
            .field("date_format", &self.date_format)
            .field("charset", &self.charset)
            .field("legacy_bool_literals", &self.legacy_bool_literals)
            .finish()
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter applied to `%s` values.
    pub fn string_filter(mut self, filter: impl StringFilter + 'static) -> Self {
        self.string_filter = Arc::new(filter);
        self
    }

    /// Set the filter applied to `%t` values.
    pub fn text_filter(mut self, filter: impl StringFilter + 'static) -> Self {
        self.text_filter = Arc::new(filter);
        self
    }

    /// Set the chrono pattern used to parse textual dates.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the `CREATE TABLE` charset.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Inline booleans with the legacy trailing quote (`1'` / `0'`).
    pub fn legacy_bool_literals(mut self, enabled: bool) -> Self {
        self.legacy_bool_literals = enabled;
        self
    }
}
