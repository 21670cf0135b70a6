//! # sqlforge
//!
//! A fluent SQL statement builder with typed field signatures.
//!
//! ## Features
//!
//! - **Typed fields**: fields are declared as `"name %x"` signatures; values are
//!   coerced to the declared type before binding
//! - **Parameterized output**: `?` placeholders plus an ordered parameter list
//! - **Inlined output**: standalone SQL with escaped literals when needed
//! - **Safe defaults**: UPDATE and DELETE require a filter
//! - **Per-builder configuration**: string/text sanitization hooks, date pattern, charset
//!
//! ```ignore
//! use sqlforge::{StatementBuilder, values};
//!
//! let mut b = StatementBuilder::new();
//! b.add_table(["users"])
//!     .select(["name", "email mail"])?
//!     .filter("age %i", ">=", 18)?
//!     .or()
//!     .filter("role %s", "=", "admin")?
//!     .order_by("name", "asc")?
//!     .limit(10);
//!
//! let stmt = b.build()?;
//! // SELECT `users`.`name` AS `users_name`, `users`.`email` AS `mail` FROM `users`
//! //   WHERE `users`.`age` >= ? OR `users`.`role` = ? ORDER BY `users`.`name` ASC LIMIT 0, 10
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod field;
pub mod ident;
pub mod inline;
pub mod statement;
pub mod value;

pub use builder::{Direction, IntoOp, JoinKind, JoinSide, Op, StatementBuilder};
pub use config::{BuilderConfig, StringFilter};
pub use error::{BuildError, BuildResult};
pub use executor::Executor;
pub use field::{Field, SemanticType};
pub use ident::Ident;
pub use inline::{Inliner, escape_string};
pub use statement::{CompiledStatement, OperationKind};
pub use value::{Coercer, PreparedValue, Value};
