//! Typed field declarations.
//!
//! Fields are declared with a signature string `"<name> %<code>"`:
//!
//! | code | type                               | column type    |
//! |------|------------------------------------|----------------|
//! | `s`  | [`SemanticType::FilteredString`]   | `VARCHAR(255)` |
//! | `v`  | [`SemanticType::RawString`]        | `VARCHAR(255)` |
//! | `t`  | [`SemanticType::Text`]             | `TEXT`         |
//! | `i`  | [`SemanticType::Integer`]          | `INTEGER`      |
//! | `b`  | [`SemanticType::Boolean`]          | `BOOL`         |
//! | `d`  | [`SemanticType::Date`]             | `INTEGER`      |
//! | `f`  | [`SemanticType::Float`]            | `FLOAT`        |

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The semantic type of a field. Governs coercion, escaping and column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    /// String passed through the configured string filter (`%s`).
    FilteredString,
    /// String used as-is (`%v`).
    RawString,
    /// Long text passed through the configured text filter (`%t`).
    Text,
    /// Integer (`%i`).
    Integer,
    /// Boolean (`%b`).
    Boolean,
    /// Unix timestamp in seconds (`%d`).
    Date,
    /// Floating point (`%f`).
    Float,
}

impl SemanticType {
    /// Map a signature code to its type.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            's' => Some(Self::FilteredString),
            'v' => Some(Self::RawString),
            't' => Some(Self::Text),
            'i' => Some(Self::Integer),
            'b' => Some(Self::Boolean),
            'd' => Some(Self::Date),
            'f' => Some(Self::Float),
            _ => None,
        }
    }

    /// The signature code of this type.
    pub fn code(self) -> char {
        match self {
            Self::FilteredString => 's',
            Self::RawString => 'v',
            Self::Text => 't',
            Self::Integer => 'i',
            Self::Boolean => 'b',
            Self::Date => 'd',
            Self::Float => 'f',
        }
    }

    /// Column type used by `CREATE TABLE`.
    pub fn column_type(self) -> &'static str {
        match self {
            Self::Boolean => "BOOL",
            Self::Date | Self::Integer => "INTEGER",
            Self::RawString | Self::FilteredString => "VARCHAR(255)",
            Self::Text => "TEXT",
            Self::Float => "FLOAT",
        }
    }

    /// Whether values of this type are bound and inlined as strings.
    pub fn is_string(self) -> bool {
        matches!(self, Self::FilteredString | Self::RawString | Self::Text)
    }
}

/// A named, typed field parsed from a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    name: String,
    ty: SemanticType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Parse a `"<name> %<code>"` signature.
    pub fn parse(signature: &str) -> BuildResult<Self> {
        let Some(body) = signature.strip_suffix(|c: char| c.is_ascii_alphabetic()) else {
            return Err(missing_suffix(signature));
        };
        let Some(body) = body.strip_suffix('%') else {
            return Err(missing_suffix(signature));
        };
        // The suffix is ASCII, so the code is the final byte.
        let code = char::from(signature.as_bytes()[signature.len() - 1]);
        let ty = SemanticType::from_code(code).ok_or_else(|| {
            BuildError::format(format!(
                "Unknown type code '%{code}' in field signature '{signature}'"
            ))
        })?;

        let name = match body.strip_suffix(' ') {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(BuildError::format(format!(
                    "Field signature '{signature}' must be '<name> %<code>'"
                )));
            }
        };

        Ok(Self::new(name, ty))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.ty
    }

    /// Render the `CREATE TABLE` column definition.
    pub(crate) fn column_definition(&self) -> String {
        let mut out = String::new();
        crate::ident::write_quoted(&mut out, &self.name);
        out.push(' ');
        out.push_str(self.ty.column_type());
        out
    }
}

fn missing_suffix(signature: &str) -> BuildError {
    BuildError::format(format!(
        "Field signature '{signature}' has no '%<code>' type suffix"
    ))
}

impl FromStr for Field {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} %{}", self.name, self.ty.code())
    }
}

/// Parse a list of signatures, stopping at the first malformed one.
pub(crate) fn parse_fields<S: AsRef<str>>(signatures: &[S]) -> BuildResult<Vec<Field>> {
    signatures.iter().map(|s| Field::parse(s.as_ref())).collect()
}
