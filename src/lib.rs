//! An immutable, dialect-agnostic sql statement builder.
//!
//! A [`Dataset`] collects clauses through copy-on-write mutators and renders
//! them with an [`Adapter`], one method per clause fragment and expression
//! variant. Runtime values become literals through a single encoder, and
//! maps or [`Record`] types decompose into the columns of INSERT and UPDATE.
//!
//! ```
//! use datasql::{col, from, Dialect};
//!
//! let ds = from("users")
//!     .where_([col("age").gte(18), col("deleted_at").is_null()])
//!     .order(col("name").asc())
//!     .limit(10);
//!
//! assert_eq!(
//!     "SELECT * FROM \"users\" WHERE \"age\" >= 18 AND \"deleted_at\" IS NULL ORDER BY \"name\" ASC LIMIT 10",
//!     ds.sql().unwrap()
//! );
//! assert_eq!(
//!     "DELETE FROM `users` WHERE `id` = 1",
//!     from("users")
//!         .with_adapter(Dialect::MySql.adapter())
//!         .where_(col("id").eq(1))
//!         .delete_sql()
//!         .unwrap()
//! );
//! ```

extern crate self as datasql;

mod adapter;
mod clauses;
mod col;
mod column_map;
mod database;
mod dataset;
mod dialect;
mod encode;
mod error;
mod expr;
mod ident;
mod insert;
mod join;
mod raw;
mod row;
mod statement;
mod value;
mod writer;

pub use adapter::Adapter;
pub use clauses::{Clauses, Limit};
pub use col::{ColumnList, IntoColumns};
pub use column_map::{ColumnData, ColumnMap, ColumnMapRegistry};
pub use database::{Database, FromValue, ResultRow};
pub use dataset::Dataset;
pub use dialect::{Dialect, DialectAdapter, DialectOptions};
pub use error::{Error, Result};
pub use expr::{
    AliasedExpr, BooleanExpr, BooleanOperator, CastExpr, CompoundExpr, CompoundType, Conjunction,
    Expression, ExpressionList, IntoExpression, IntoExpressions, IntoOrdered, IntoOrderedList,
    NullsPosition, OrderedExpr, SortDirection, SqlFunctionExpr, UpdateExpr, and, avg, coalesce,
    count, distinct, first, func, last, max, min, or, sum,
};
pub use ident::IdentifierExpr;
pub use join::{JoinClause, JoinCondition, JoinType, on, using};
pub use raw::LiteralExpr;
pub use row::{FieldMeta, IntoRow, Record, Row, RowKind};
pub use statement::TruncateOptions;
pub use value::{IntoValue, SqlValuer, Value, ValuerError};
pub use writer::SqlWriter;

/// `#[derive(Record)]`, see [`Record`].
pub use datasql_derive::Record;

/// A column or table identifier; dots separate qualifiers.
pub fn col(name: &str) -> IdentifierExpr {
    IdentifierExpr::parse(name)
}

/// Alias of [`col`] that reads better for sources.
pub fn table(name: &str) -> IdentifierExpr {
    IdentifierExpr::parse(name)
}

/// A verbatim sql fragment.
pub fn lit(sql: &str) -> LiteralExpr {
    LiteralExpr::new(sql)
}

/// The bare `*` literal.
pub fn star() -> LiteralExpr {
    LiteralExpr::new_static("*")
}

/// `SELECT * FROM sources` rendered with the default dialect.
pub fn from<S: IntoColumns>(sources: S) -> Dataset {
    Dataset::default().from(sources)
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{DialectAdapter, IntoExpression, Result, SqlWriter};

    pub(crate) fn try_render<E: IntoExpression>(expression: E) -> Result<String> {
        let adapter = DialectAdapter::default();
        let mut buf = String::new();
        let mut writer = SqlWriter::new(&mut buf, &adapter);
        writer.expression(&expression.into_expression())?;
        Ok(buf)
    }

    pub(crate) fn render<E: IntoExpression>(expression: E) -> String {
        try_render(expression).unwrap()
    }
}
