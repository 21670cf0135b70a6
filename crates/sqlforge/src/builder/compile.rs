//! Per-operation SQL rendering.
//!
//! INSERT, UPDATE, DELETE and CREATE TABLE address the first declared table.
//! Every operation except CREATE TABLE ends with the shared epilogue:
//! `WHERE`, `GROUP BY`, `ORDER BY`, `LIMIT`.

use super::StatementBuilder;
use super::clause::write_list;
use crate::error::{BuildError, BuildResult};
use crate::ident::write_quoted;
use crate::statement::{CompiledStatement, OperationKind};
use crate::value::PreparedValue;

impl StatementBuilder {
    /// Compile the accumulated state without consuming or resetting it.
    pub fn compile(&self) -> BuildResult<CompiledStatement> {
        let operation = self.operation.ok_or(BuildError::OperationNotSet)?;
        let mut sql = String::with_capacity(128);
        let mut params = Vec::new();

        if operation.requires_filter() && self.filter.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sqlforge.sql",
                operation = %operation,
                "refusing to compile statement without a filter"
            );
            return Err(BuildError::UnsafeOperation(operation));
        }

        match operation {
            OperationKind::Select => self.compile_select(&mut sql)?,
            OperationKind::Insert => self.compile_insert(&mut sql, &mut params, operation)?,
            OperationKind::Update => self.compile_update(&mut sql, &mut params, operation)?,
            OperationKind::Upsert if self.filter.is_empty() => {
                self.compile_insert(&mut sql, &mut params, operation)?;
            }
            OperationKind::Upsert => self.compile_update(&mut sql, &mut params, operation)?,
            OperationKind::Delete => self.compile_delete(&mut sql)?,
            OperationKind::Create => {
                self.compile_create(&mut sql)?;
                return Ok(CompiledStatement::new(sql, params, operation));
            }
        }

        sql.push_str(self.filter.clause());

        if !self.groups.is_empty() {
            sql.push_str(" GROUP BY ");
            write_list(&mut sql, &self.groups, |g, out| g.write_sql(out));
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            write_list(&mut sql, &self.orders, |o, out| o.write_sql(out));
        }
        if let Some(limit) = &self.limit {
            limit.write_sql(&mut sql);
        }

        params.extend_from_slice(self.filter.params());
        Ok(CompiledStatement::new(sql, params, operation))
    }

    fn target_table(&self) -> BuildResult<&str> {
        self.table(1)
    }

    fn compile_select(&self, sql: &mut String) -> BuildResult<()> {
        if self.tables.is_empty() {
            return Err(BuildError::UnknownTable { index: 1, len: 0 });
        }

        sql.push_str("SELECT ");
        if !self.selected.is_empty() {
            write_list(sql, &self.selected, |f, out| f.write_sql(out));
        } else if let Some(raw) = &self.select_raw {
            sql.push_str(raw);
        } else {
            sql.push('*');
        }

        sql.push_str(" FROM ");
        let from: Vec<&String> = self
            .tables
            .iter()
            .filter(|t| !self.excluded_tables.contains(t))
            .collect();
        write_list(sql, &from, |t, out| write_quoted(out, t));

        for join in &self.joins {
            join.write_sql(sql);
        }
        Ok(())
    }

    fn compile_insert(
        &self,
        sql: &mut String,
        params: &mut Vec<PreparedValue>,
        operation: OperationKind,
    ) -> BuildResult<()> {
        let table = self.target_table()?;
        if self.modifying_fields.is_empty() || self.insert_rows.is_empty() {
            return Err(BuildError::MissingValues(operation));
        }

        sql.push_str("INSERT INTO ");
        write_quoted(sql, table);
        sql.push('(');
        write_list(sql, &self.modifying_fields, |f, out| write_quoted(out, f.name()));
        sql.push_str(") VALUES ");

        for (i, row) in self.insert_rows.iter().enumerate() {
            if row.len() != self.modifying_fields.len() {
                return Err(BuildError::FieldCountMismatch {
                    expected: self.modifying_fields.len(),
                    actual: row.len(),
                });
            }
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            write_list(sql, row, |_, out| out.push('?'));
            sql.push(')');
            params.extend_from_slice(row);
        }
        Ok(())
    }

    fn compile_update(
        &self,
        sql: &mut String,
        params: &mut Vec<PreparedValue>,
        operation: OperationKind,
    ) -> BuildResult<()> {
        let table = self.target_table()?;
        let row = match &self.update_row {
            Some(row) if !row.is_empty() => row,
            _ => return Err(BuildError::MissingValues(operation)),
        };
        if row.len() != self.modifying_fields.len() {
            return Err(BuildError::FieldCountMismatch {
                expected: self.modifying_fields.len(),
                actual: row.len(),
            });
        }

        sql.push_str("UPDATE ");
        write_quoted(sql, table);
        sql.push_str(" SET ");
        write_list(sql, &self.modifying_fields, |f, out| {
            write_quoted(out, f.name());
            out.push_str(" = ?");
        });
        params.extend_from_slice(row);
        Ok(())
    }

    fn compile_delete(&self, sql: &mut String) -> BuildResult<()> {
        let table = self.target_table()?;
        sql.push_str("DELETE FROM ");
        write_quoted(sql, table);
        Ok(())
    }

    fn compile_create(&self, sql: &mut String) -> BuildResult<()> {
        let table = self.target_table()?;
        sql.push_str("CREATE TABLE IF NOT EXISTS ");
        write_quoted(sql, table);
        sql.push_str("(`id` INTEGER PRIMARY KEY AUTO_INCREMENT");
        for field in &self.create_fields {
            sql.push_str(", ");
            sql.push_str(&field.column_definition());
        }
        sql.push_str(") DEFAULT CHARSET=");
        sql.push_str(&self.config.charset);
        Ok(())
    }
}
