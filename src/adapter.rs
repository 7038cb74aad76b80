use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    clauses::Limit,
    col::ColumnList,
    dataset::Dataset,
    error::{Error, Result},
    expr::{
        AliasedExpr, BooleanExpr, CastExpr, CompoundExpr, ExpressionList, OrderedExpr,
        SqlFunctionExpr, UpdateExpr,
    },
    ident::IdentifierExpr,
    join::JoinClause,
    raw::LiteralExpr,
    statement::TruncateOptions,
    value::Value,
    writer::SqlWriter,
};

/// Dialect specific renderer for every statement fragment.
///
/// Statement assembly calls the clause methods in a fixed order and stops at
/// the first error. Nested values go back through [`SqlWriter::literal`] and
/// nested expressions through [`SqlWriter::expression`], which route to the
/// literal and expression methods below.
///
/// Expression methods default to [`Error::UnsupportedExpression`] so a
/// dialect that leaves one out fails loudly instead of emitting nothing.
pub trait Adapter: fmt::Debug + Send + Sync {
    // clause fragments

    /// `SELECT cols`, or `SELECT *` when no columns are given.
    fn select_sql(&self, w: &mut SqlWriter<'_>, columns: Option<&ColumnList>) -> Result<()>;
    fn select_distinct_sql(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()>;
    fn from_sql(&self, w: &mut SqlWriter<'_>, from: Option<&ColumnList>) -> Result<()>;
    fn join_sql(&self, w: &mut SqlWriter<'_>, joins: &[JoinClause]) -> Result<()>;
    fn where_sql(&self, w: &mut SqlWriter<'_>, where_: Option<&ExpressionList>) -> Result<()>;
    fn group_by_sql(&self, w: &mut SqlWriter<'_>, group_by: Option<&ColumnList>) -> Result<()>;
    fn having_sql(&self, w: &mut SqlWriter<'_>, having: Option<&ExpressionList>) -> Result<()>;
    fn order_sql(&self, w: &mut SqlWriter<'_>, order: Option<&[OrderedExpr]>) -> Result<()>;
    fn limit_sql(&self, w: &mut SqlWriter<'_>, limit: Option<Limit>) -> Result<()>;
    fn offset_sql(&self, w: &mut SqlWriter<'_>, offset: u64) -> Result<()>;
    fn returning_sql(&self, w: &mut SqlWriter<'_>, returning: Option<&ColumnList>) -> Result<()>;
    fn compounds_sql(&self, w: &mut SqlWriter<'_>, compounds: &[CompoundExpr]) -> Result<()>;
    fn insert_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()>;
    fn insert_columns_sql(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()>;
    fn insert_values_sql(&self, w: &mut SqlWriter<'_>, rows: &[Vec<Value>]) -> Result<()>;
    fn default_values_sql(&self, w: &mut SqlWriter<'_>) -> Result<()>;
    fn update_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()>;
    fn update_expressions_sql(&self, w: &mut SqlWriter<'_>, updates: &[UpdateExpr]) -> Result<()>;
    fn delete_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()>;
    fn truncate_sql(
        &self,
        w: &mut SqlWriter<'_>,
        from: &ColumnList,
        options: &TruncateOptions,
    ) -> Result<()>;
    /// The target table list of INSERT, UPDATE and TRUNCATE.
    fn sources_sql(&self, w: &mut SqlWriter<'_>, from: &ColumnList) -> Result<()>;

    // literals

    fn literal_nil(&self, w: &mut SqlWriter<'_>) -> Result<()>;
    fn literal_string(&self, w: &mut SqlWriter<'_>, value: &str) -> Result<()>;
    fn literal_int(&self, w: &mut SqlWriter<'_>, value: i64) -> Result<()>;
    fn literal_float(&self, w: &mut SqlWriter<'_>, value: f64) -> Result<()>;
    fn literal_bool(&self, w: &mut SqlWriter<'_>, value: bool) -> Result<()>;
    fn literal_time(&self, w: &mut SqlWriter<'_>, value: &DateTime<Utc>) -> Result<()>;
    fn slice_value_sql(&self, w: &mut SqlWriter<'_>, values: &[Value]) -> Result<()>;

    // expressions

    fn quote_identifier(&self, _w: &mut SqlWriter<'_>, _ident: &IdentifierExpr) -> Result<()> {
        Err(Error::unsupported_expression("identifier"))
    }

    fn aliased_expression_sql(&self, _w: &mut SqlWriter<'_>, _aliased: &AliasedExpr) -> Result<()> {
        Err(Error::unsupported_expression("aliased"))
    }

    fn boolean_expression_sql(&self, _w: &mut SqlWriter<'_>, _boolean: &BooleanExpr) -> Result<()> {
        Err(Error::unsupported_expression("boolean"))
    }

    fn ordered_expression_sql(&self, _w: &mut SqlWriter<'_>, _ordered: &OrderedExpr) -> Result<()> {
        Err(Error::unsupported_expression("ordered"))
    }

    fn update_expression_sql(&self, _w: &mut SqlWriter<'_>, _update: &UpdateExpr) -> Result<()> {
        Err(Error::unsupported_expression("update"))
    }

    fn sql_function_expression_sql(
        &self,
        _w: &mut SqlWriter<'_>,
        _function: &SqlFunctionExpr,
    ) -> Result<()> {
        Err(Error::unsupported_expression("function"))
    }

    fn cast_expression_sql(&self, _w: &mut SqlWriter<'_>, _cast: &CastExpr) -> Result<()> {
        Err(Error::unsupported_expression("cast"))
    }

    fn compound_expression_sql(
        &self,
        _w: &mut SqlWriter<'_>,
        _compound: &CompoundExpr,
    ) -> Result<()> {
        Err(Error::unsupported_expression("compound"))
    }

    fn column_list_sql(&self, _w: &mut SqlWriter<'_>, _columns: &ColumnList) -> Result<()> {
        Err(Error::unsupported_expression("column list"))
    }

    fn expression_list_sql(&self, _w: &mut SqlWriter<'_>, _list: &ExpressionList) -> Result<()> {
        Err(Error::unsupported_expression("expression list"))
    }

    fn literal_expression_sql(&self, _w: &mut SqlWriter<'_>, _literal: &LiteralExpr) -> Result<()> {
        Err(Error::unsupported_expression("literal"))
    }

    fn sub_select_sql(&self, _w: &mut SqlWriter<'_>, _dataset: &Dataset) -> Result<()> {
        Err(Error::unsupported_expression("dataset"))
    }
}
