//! Fluent statement builder.
//!
//! One [`StatementBuilder`] accumulates tables, fields, filters, joins,
//! ordering, grouping and limits across calls, then compiles into a single
//! SELECT, INSERT, UPDATE, DELETE, CREATE TABLE or upsert statement.
//!
//! ## Design
//!
//! - Fields are declared with typed signatures (`"age %i"`), so every value is
//!   coerced and bound with a known type.
//! - Values are always emitted as `?` placeholders; the parameter list follows
//!   placeholder order (statement values first, filter values last).
//! - Safe defaults: UPDATE and DELETE refuse to compile without a filter.
//! - A successful compile resets the builder for the next statement. A failed
//!   compile leaves the state untouched.
//!
//! # Example
//! ```ignore
//! use sqlforge::{StatementBuilder, values};
//!
//! let mut b = StatementBuilder::new();
//! b.add_table(["users"]).set_insert_fields(["name %s", "age %i"])?;
//! b.insert(values!["Alice", 30])?;
//! let stmt = b.build()?;
//! assert_eq!(stmt.sql(), "INSERT INTO `users`(`name`, `age`) VALUES (?, ?)");
//! ```

pub mod clause;
mod compile;
pub mod filter;

pub use clause::{Direction, JoinKind, JoinSide};
pub use filter::{IntoOp, Op};

use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};
use crate::executor::Executor;
use crate::field::{Field, parse_fields};
use crate::ident::Ident;
use crate::inline::Inliner;
use crate::statement::{CompiledStatement, OperationKind};
use crate::value::{Coercer, PreparedValue, Value};
use clause::{Group, Join, Limit, Order, SelectedField};
use filter::{Conjunction, Filter};
use std::fmt;
use std::sync::Arc;

/// Accumulates statement state through fluent calls and compiles it.
#[must_use]
#[derive(Clone)]
pub struct StatementBuilder {
    config: BuilderConfig,
    executor: Option<Arc<dyn Executor>>,
    operation: Option<OperationKind>,
    tables: Vec<String>,
    /// 1-based index into `tables`.
    active_table: usize,
    modifying_fields: Vec<Field>,
    insert_rows: Vec<Vec<PreparedValue>>,
    update_row: Option<Vec<PreparedValue>>,
    create_fields: Vec<Field>,
    selected: Vec<SelectedField>,
    select_raw: Option<String>,
    excluded_tables: Vec<String>,
    joins: Vec<Join>,
    orders: Vec<Order>,
    groups: Vec<Group>,
    limit: Option<Limit>,
    filter: Filter,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::with_config(BuilderConfig::default())
    }
}

impl fmt::Debug for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("config", &self.config)
            .field("has_executor", &self.executor.is_some())
            .field("operation", &self.operation)
            .field("tables", &self.tables)
            .field("active_table", &self.active_table)
            .field("filter", &self.filter.clause())
            .finish_non_exhaustive()
    }
}

impl StatementBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an explicit configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            executor: None,
            operation: None,
            tables: Vec::new(),
            active_table: 1,
            modifying_fields: Vec::new(),
            insert_rows: Vec::new(),
            update_row: None,
            create_fields: Vec::new(),
            selected: Vec::new(),
            select_raw: None,
            excluded_tables: Vec::new(),
            joins: Vec::new(),
            orders: Vec::new(),
            groups: Vec::new(),
            limit: None,
            filter: Filter::default(),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The configured operation, if any.
    pub fn operation(&self) -> Option<OperationKind> {
        self.operation
    }

    /// Clear all statement state. Configuration and executor are kept.
    pub fn reset(&mut self) -> &mut Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "sqlforge.sql", "builder reset");
        let config = self.config.clone();
        let executor = self.executor.take();
        *self = Self::with_config(config);
        self.executor = executor;
        self
    }

    /// Set the charset used by `CREATE TABLE`.
    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.config.charset = charset.into();
        self
    }

    /// Set the executor used by [`execute`](Self::execute).
    pub fn set_executor(&mut self, executor: impl Executor + 'static) -> &mut Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    // ==================== Tables ====================

    /// Append tables. A single table becomes the active table.
    pub fn add_table<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.tables.len();
        self.tables.extend(names.into_iter().map(Into::into));
        if self.tables.len() - before == 1 {
            self.active_table = self.tables.len();
        }
        self
    }

    /// Set the active table by 1-based index.
    ///
    /// The index is checked when a call resolves the active table.
    pub fn set_table(&mut self, index: usize) -> &mut Self {
        self.active_table = index;
        self
    }

    fn table(&self, index: usize) -> BuildResult<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.tables.get(i))
            .map(String::as_str)
            .ok_or(BuildError::UnknownTable {
                index,
                len: self.tables.len(),
            })
    }

    fn active(&self) -> BuildResult<&str> {
        self.table(self.active_table)
    }

    // ==================== Insert / update ====================

    fn set_modifying_fields<I, S>(
        &mut self,
        operation: OperationKind,
        signatures: I,
    ) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signatures: Vec<S> = signatures.into_iter().collect();
        self.modifying_fields = parse_fields(&signatures)?;
        self.operation = Some(operation);
        Ok(self)
    }

    /// Declare the fields of an INSERT.
    pub fn set_insert_fields<I, S>(&mut self, signatures: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_modifying_fields(OperationKind::Insert, signatures)
    }

    /// Declare the fields of an UPDATE.
    pub fn set_update_fields<I, S>(&mut self, signatures: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_modifying_fields(OperationKind::Update, signatures)
    }

    /// Declare the fields of an upsert.
    pub fn set_upsert_fields<I, S>(&mut self, signatures: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_modifying_fields(OperationKind::Upsert, signatures)
    }

    fn prepare_row<I, V>(&self, values: I) -> BuildResult<Vec<PreparedValue>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != self.modifying_fields.len() {
            return Err(BuildError::FieldCountMismatch {
                expected: self.modifying_fields.len(),
                actual: values.len(),
            });
        }
        let coercer = Coercer::new(&self.config);
        self.modifying_fields
            .iter()
            .zip(values)
            .map(|(field, value)| coercer.coerce(field.semantic_type(), value))
            .collect()
    }

    /// Append a row to the insert batch.
    pub fn insert<I, V>(&mut self, values: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = self.prepare_row(values)?;
        self.insert_rows.push(row);
        Ok(self)
    }

    /// Replace the pending update row.
    pub fn update<I, V>(&mut self, values: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = self.prepare_row(values)?;
        self.update_row = Some(row);
        Ok(self)
    }

    /// Stage `values` both as an insert row and as the update row.
    ///
    /// Whether the statement becomes an INSERT or an UPDATE depends only on
    /// whether a filter is present at compile time. It is not an atomic
    /// insert-or-update.
    pub fn upsert<I, V>(&mut self, values: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = self.prepare_row(values)?;
        self.insert_rows.push(row.clone());
        self.update_row = Some(row);
        Ok(self)
    }

    // ==================== Delete / create ====================

    /// Start a DELETE.
    pub fn delete(&mut self) -> &mut Self {
        self.operation = Some(OperationKind::Delete);
        self
    }

    /// Start a DELETE of the row whose `id` equals `id`.
    pub fn delete_id(&mut self, id: impl Into<Value>) -> BuildResult<&mut Self> {
        self.filter_id(id)?;
        Ok(self.delete())
    }

    /// Start a `CREATE TABLE` with an implicit auto-increment `id` column.
    pub fn create_table(&mut self, name: impl Into<String>) -> &mut Self {
        self.operation = Some(OperationKind::Create);
        self.add_table([name.into()])
    }

    /// Start a `CREATE TABLE` with the given fields.
    pub fn create_table_with<I, S>(
        &mut self,
        name: impl Into<String>,
        signatures: I,
    ) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signatures: Vec<S> = signatures.into_iter().collect();
        let fields = parse_fields(&signatures)?;
        self.create_table(name);
        self.create_fields.extend(fields);
        Ok(self)
    }

    /// Add a column to the table being created.
    pub fn add_field(&mut self, signature: &str) -> BuildResult<&mut Self> {
        self.create_fields.push(Field::parse(signature)?);
        Ok(self)
    }

    /// Add several columns to the table being created.
    pub fn add_fields<I, S>(&mut self, signatures: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signatures: Vec<S> = signatures.into_iter().collect();
        self.create_fields.extend(parse_fields(&signatures)?);
        Ok(self)
    }

    // ==================== Select ====================

    /// Select columns of the active table.
    ///
    /// Each spec is `"field"` (aliased `<table>_<field>`) or `"field alias"`.
    pub fn select<I, S>(&mut self, specs: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select_in(self.active_table, specs)
    }

    /// Select columns of the table at 1-based `table`.
    pub fn select_in<I, S>(&mut self, table: usize, specs: I) -> BuildResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = self.table(table)?.to_string();
        self.selected.extend(
            specs
                .into_iter()
                .map(|spec| SelectedField::parse(&table, spec.as_ref())),
        );
        self.operation = Some(OperationKind::Select);
        Ok(self)
    }

    /// Use a raw select expression (e.g. `COUNT(*)`).
    ///
    /// Ignored when columns were selected with [`select`](Self::select).
    pub fn select_raw(&mut self, expr: impl Into<String>) -> &mut Self {
        self.select_raw = Some(expr.into());
        self.operation = Some(OperationKind::Select);
        self
    }

    // ==================== Filters ====================

    /// Add a predicate on the active table.
    ///
    /// `field` is a signature (`"age %i"`) whose type drives coercion of
    /// `value`. `isnull` / `isntnull` ignore `value` and bind nothing.
    pub fn filter(
        &mut self,
        field: &str,
        op: impl IntoOp,
        value: impl Into<Value>,
    ) -> BuildResult<&mut Self> {
        let op = op.into_op()?;
        let field = Field::parse(field)?;
        let value = if op.takes_value() {
            Some(Coercer::new(&self.config).coerce(field.semantic_type(), value.into())?)
        } else {
            None
        };
        let column = Ident::column(self.active()?, field.name());
        self.filter.push_predicate(&column, op, value);
        Ok(self)
    }

    /// Add a value-less predicate (`isnull` / `isntnull`).
    pub fn filter_unary(&mut self, field: &str, op: impl IntoOp) -> BuildResult<&mut Self> {
        self.filter(field, op, Value::Null)
    }

    /// Shorthand for `filter("id %i", Op::Eq, id)`.
    pub fn filter_id(&mut self, id: impl Into<Value>) -> BuildResult<&mut Self> {
        self.filter("id %i", Op::Eq, id)
    }

    /// Join the next predicate with OR.
    pub fn or(&mut self) -> &mut Self {
        self.filter.set_conjunction(Conjunction::Or);
        self
    }

    /// Join the next predicate with AND (the default).
    pub fn and(&mut self) -> &mut Self {
        self.filter.set_conjunction(Conjunction::And);
        self
    }

    /// Open a parenthesis before the next predicate.
    pub fn open_bracket(&mut self) -> &mut Self {
        self.filter.open_bracket();
        self
    }

    /// Close a parenthesis at the current position. Balance is not checked.
    pub fn close_bracket(&mut self) -> &mut Self {
        self.filter.close_bracket();
        self
    }

    // ==================== Group / order / limit ====================

    /// Group by a field of the active table.
    pub fn group_by(&mut self, field: &str) -> BuildResult<&mut Self> {
        self.group_by_in(self.active_table, field)
    }

    /// Group by a field of the table at 1-based `table`.
    pub fn group_by_in(&mut self, table: usize, field: &str) -> BuildResult<&mut Self> {
        let table = self.table(table)?.to_string();
        self.groups.push(Group {
            table,
            field: field.to_string(),
        });
        Ok(self)
    }

    /// Order by a field of the active table.
    pub fn order_by(
        &mut self,
        field: &str,
        direction: impl Into<Direction>,
    ) -> BuildResult<&mut Self> {
        self.order_by_in(self.active_table, field, direction)
    }

    /// Order by a field of the table at 1-based `table`.
    pub fn order_by_in(
        &mut self,
        table: usize,
        field: &str,
        direction: impl Into<Direction>,
    ) -> BuildResult<&mut Self> {
        let table = self.table(table)?.to_string();
        self.orders.push(Order {
            table,
            field: field.to_string(),
            direction: direction.into(),
        });
        Ok(self)
    }

    /// Limit to the first `count` rows.
    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.limit_range(0, count)
    }

    /// Skip `offset` rows and return at most `count`. The last call wins.
    pub fn limit_range(&mut self, offset: u64, count: u64) -> &mut Self {
        self.limit = Some(Limit { offset, count });
        self
    }

    // ==================== Joins ====================

    /// Join table `right` on `left.left_field = right.right_field`.
    ///
    /// The joined table is dropped from the comma-separated FROM list.
    pub fn join(
        &mut self,
        left: usize,
        left_field: &str,
        right: usize,
        right_field: &str,
    ) -> BuildResult<&mut Self> {
        self.join_with(left, left_field, right, right_field, None, None)
    }

    /// Join with an explicit side and kind.
    pub fn join_with(
        &mut self,
        left: usize,
        left_field: &str,
        right: usize,
        right_field: &str,
        side: Option<JoinSide>,
        kind: Option<JoinKind>,
    ) -> BuildResult<&mut Self> {
        let left_table = self.table(left)?.to_string();
        let right_table = self.table(right)?.to_string();
        self.excluded_tables.push(right_table.clone());
        self.joins.push(Join {
            left_table,
            left_field: left_field.to_string(),
            right_table,
            right_field: right_field.to_string(),
            side,
            kind,
        });
        Ok(self)
    }

    /// Join with a single modifier word.
    ///
    /// `inner` / `outer` set the kind, `left` / `right` / `full` the side.
    /// Other words add no modifier.
    pub fn join_by(
        &mut self,
        left: usize,
        left_field: &str,
        right: usize,
        right_field: &str,
        side_or_kind: &str,
    ) -> BuildResult<&mut Self> {
        match JoinKind::from_word(side_or_kind) {
            Some(kind) => self.join_with(left, left_field, right, right_field, None, Some(kind)),
            None => self.join_with(
                left,
                left_field,
                right,
                right_field,
                JoinSide::from_word(side_or_kind),
                None,
            ),
        }
    }

    // ==================== Terminal calls ====================

    /// Compile the statement and reset the builder.
    ///
    /// On error the builder is left unchanged.
    pub fn build(&mut self) -> BuildResult<CompiledStatement> {
        let statement = self.compile()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlforge.sql",
            operation = %statement.operation(),
            param_count = statement.params().len(),
            sql = %statement.sql(),
            "compiled statement"
        );
        self.reset();
        Ok(statement)
    }

    /// Compile, inline every value and reset the builder.
    pub fn to_sql(&mut self) -> BuildResult<String> {
        let inliner = Inliner::new().legacy_bool_literals(self.config.legacy_bool_literals);
        let statement = self.compile()?;
        let sql = statement.inline_with(&inliner)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlforge.sql",
            operation = %statement.operation(),
            sql = %sql,
            "inlined statement"
        );
        self.reset();
        Ok(sql)
    }

    /// Compile and run the statement through the configured executor.
    pub fn execute(&mut self) -> BuildResult<u64> {
        let executor = self.executor.clone().ok_or(BuildError::ConnectionNotSet)?;
        let statement = self.build()?;
        executor.execute(statement.sql(), statement.params())
    }
}

#[cfg(test)]
mod tests;
