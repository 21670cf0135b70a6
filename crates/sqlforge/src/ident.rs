//! Backtick-quoted SQL identifiers.
//!
//! Table names, field names and aliases are always emitted inside backticks.
//! An embedded backtick is doubled, so a name can never close its own quote.
//!
//! Quoting reduces identifier injection risk but does not validate names:
//! identifiers are trusted caller input, never user data.
//!
//! # Example
//! ```ignore
//! use sqlforge::ident::Ident;
//!
//! assert_eq!(Ident::new("users").to_sql(), "`users`");
//! assert_eq!(Ident::column("users", "name"), "`users`.`name`");
//! ```

/// A single backtick-quoted SQL identifier (table, field or alias).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// Wrap a raw name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The unquoted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        write_quoted(out, &self.name);
    }

    /// Render a `table`.`field` reference.
    pub fn column(table: &str, field: &str) -> String {
        let mut out = String::with_capacity(table.len() + field.len() + 5);
        write_column(&mut out, table, field);
        out
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

pub(crate) fn write_quoted(out: &mut String, name: &str) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

pub(crate) fn write_column(out: &mut String, table: &str, field: &str) {
    write_quoted(out, table);
    out.push('.');
    write_quoted(out, field);
}
