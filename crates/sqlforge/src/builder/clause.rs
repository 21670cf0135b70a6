//! Descriptors for selected columns, joins, ordering, grouping and limits.

use crate::ident::{write_column, write_quoted};

/// A selected column with its alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectedField {
    pub table: String,
    pub field: String,
    pub alias: String,
}

impl SelectedField {
    /// Parse `"field"` (alias `<table>_<field>`) or `"field alias"`.
    pub(crate) fn parse(table: &str, spec: &str) -> Self {
        let mut parts = spec.split(' ');
        let field = parts.next().unwrap_or_default();
        let alias = match parts.next() {
            Some(alias) => alias.to_string(),
            None => format!("{table}_{field}"),
        };
        Self {
            table: table.to_string(),
            field: field.to_string(),
            alias,
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        write_column(out, &self.table, &self.field);
        out.push_str(" AS ");
        write_quoted(out, &self.alias);
    }
}

/// Side of an outer join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinSide {
    Left,
    Right,
    Full,
}

impl JoinSide {
    /// Parse `left`, `right` or `full`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Left => " LEFT",
            Self::Right => " RIGHT",
            Self::Full => " FULL",
        }
    }
}

/// Join kind keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Outer,
}

impl JoinKind {
    /// Parse `inner` or `outer`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "inner" => Some(Self::Inner),
            "outer" => Some(Self::Outer),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => " INNER",
            Self::Outer => " OUTER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Join {
    pub left_table: String,
    pub left_field: String,
    pub right_table: String,
    pub right_field: String,
    pub side: Option<JoinSide>,
    pub kind: Option<JoinKind>,
}

impl Join {
    /// Renders `[ SIDE][ KIND] JOIN right ON left.f = right.f` with a leading space.
    pub(crate) fn write_sql(&self, out: &mut String) {
        if let Some(side) = self.side {
            out.push_str(side.as_sql());
        }
        if let Some(kind) = self.kind {
            out.push_str(kind.as_sql());
        }
        out.push_str(" JOIN ");
        write_quoted(out, &self.right_table);
        out.push_str(" ON ");
        write_column(out, &self.left_table, &self.left_field);
        out.push_str(" = ");
        write_column(out, &self.right_table, &self.right_field);
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `"desc"` sorts descending; any other word sorts ascending.
impl From<&str> for Direction {
    fn from(word: &str) -> Self {
        if word == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Order {
    pub table: String,
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub(crate) fn write_sql(&self, out: &mut String) {
        write_column(out, &self.table, &self.field);
        out.push(' ');
        out.push_str(self.direction.as_sql());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Group {
    pub table: String,
    pub field: String,
}

impl Group {
    pub(crate) fn write_sql(&self, out: &mut String) {
        write_column(out, &self.table, &self.field);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limit {
    pub offset: u64,
    pub count: u64,
}

impl Limit {
    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&format!(" LIMIT {}, {}", self.offset, self.count));
    }
}

/// Write `items` separated by `, `.
pub(crate) fn write_list<T>(out: &mut String, items: &[T], write: impl Fn(&T, &mut String)) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write(item, out);
    }
}
