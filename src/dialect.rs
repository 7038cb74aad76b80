use chrono::{DateTime, Utc};

use crate::{
    adapter::Adapter,
    clauses::Limit,
    col::ColumnList,
    dataset::Dataset,
    error::{Error, Result},
    expr::{
        AliasedExpr, BooleanExpr, BooleanOperator, CastExpr, CompoundExpr, CompoundType,
        Conjunction, ExpressionList, NullsPosition, OrderedExpr, SortDirection, SqlFunctionExpr,
        UpdateExpr,
    },
    ident::IdentifierExpr,
    join::{JoinClause, JoinCondition},
    raw::LiteralExpr,
    statement::TruncateOptions,
    value::Value,
    writer::SqlWriter,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// ANSI flavoured output, double quoted identifiers.
    #[default]
    Default,
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn options(self) -> DialectOptions {
        let base = DialectOptions::default();
        match self {
            Dialect::Default => base,
            Dialect::Postgres => base,
            Dialect::MySql => base
                .quote('`')
                .like("LIKE BINARY", "NOT LIKE BINARY")
                .ilike("LIKE", "NOT LIKE")
                .escape_backslash(true)
                .time_format("%Y-%m-%d %H:%M:%S%.f")
                .supports_returning(false)
                .default_values(" VALUES ()"),
            Dialect::Sqlite => base
                .booleans("1", "0")
                .like("GLOB", "NOT GLOB")
                .ilike("LIKE", "NOT LIKE")
                .time_format("%Y-%m-%d %H:%M:%S%.f")
                .supports_truncate(false),
        }
    }

    pub fn adapter(self) -> DialectAdapter {
        DialectAdapter::new(self)
    }
}

/// Knobs a [`DialectAdapter`] renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectOptions {
    pub quote: char,
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    pub null_literal: &'static str,
    pub like: &'static str,
    pub not_like: &'static str,
    pub ilike: &'static str,
    pub not_ilike: &'static str,
    pub escape_backslash: bool,
    /// `chrono` format string for time literals, rendered in UTC.
    pub time_format: &'static str,
    pub supports_returning: bool,
    pub supports_truncate: bool,
    pub default_values: &'static str,
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self {
            quote: '"',
            true_literal: "TRUE",
            false_literal: "FALSE",
            null_literal: "NULL",
            like: "LIKE",
            not_like: "NOT LIKE",
            ilike: "ILIKE",
            not_ilike: "NOT ILIKE",
            escape_backslash: false,
            time_format: "%Y-%m-%dT%H:%M:%S%.fZ",
            supports_returning: true,
            supports_truncate: true,
            default_values: " DEFAULT VALUES",
        }
    }
}

impl DialectOptions {
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn booleans(mut self, true_literal: &'static str, false_literal: &'static str) -> Self {
        self.true_literal = true_literal;
        self.false_literal = false_literal;
        self
    }

    pub fn like(mut self, like: &'static str, not_like: &'static str) -> Self {
        self.like = like;
        self.not_like = not_like;
        self
    }

    pub fn ilike(mut self, ilike: &'static str, not_ilike: &'static str) -> Self {
        self.ilike = ilike;
        self.not_ilike = not_ilike;
        self
    }

    pub fn escape_backslash(mut self, escape: bool) -> Self {
        self.escape_backslash = escape;
        self
    }

    pub fn time_format(mut self, format: &'static str) -> Self {
        self.time_format = format;
        self
    }

    pub fn supports_returning(mut self, supported: bool) -> Self {
        self.supports_returning = supported;
        self
    }

    pub fn supports_truncate(mut self, supported: bool) -> Self {
        self.supports_truncate = supported;
        self
    }

    pub fn default_values(mut self, fragment: &'static str) -> Self {
        self.default_values = fragment;
        self
    }

    fn operator(&self, operator: BooleanOperator) -> &'static str {
        match operator {
            BooleanOperator::Eq => "=",
            BooleanOperator::NotEq => "!=",
            BooleanOperator::Is => "IS",
            BooleanOperator::IsNot => "IS NOT",
            BooleanOperator::Gt => ">",
            BooleanOperator::Gte => ">=",
            BooleanOperator::Lt => "<",
            BooleanOperator::Lte => "<=",
            BooleanOperator::In => "IN",
            BooleanOperator::NotIn => "NOT IN",
            BooleanOperator::Like => self.like,
            BooleanOperator::NotLike => self.not_like,
            BooleanOperator::ILike => self.ilike,
            BooleanOperator::NotILike => self.not_ilike,
        }
    }
}

/// [`Adapter`] driven by a [`DialectOptions`] table.
#[derive(Debug, Clone, Default)]
pub struct DialectAdapter {
    dialect: Dialect,
    options: DialectOptions,
}

impl DialectAdapter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            options: dialect.options(),
        }
    }

    pub fn with_options(dialect: Dialect, options: DialectOptions) -> Self {
        Self { dialect, options }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn options(&self) -> &DialectOptions {
        &self.options
    }

    fn columns(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()> {
        w.write_separated(columns.columns(), ", ", |w, column| w.expression(column))
    }

    /// Expressions joined by their conjunction, without surrounding parentheses.
    fn conditions(&self, w: &mut SqlWriter<'_>, list: &ExpressionList) -> Result<()> {
        let sep = match list.conjunction() {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        };
        w.write_separated(list.expressions(), sep, |w, expr| w.expression(expr))
    }

    fn clause_columns(
        &self,
        w: &mut SqlWriter<'_>,
        keyword: &str,
        columns: Option<&ColumnList>,
    ) -> Result<()> {
        match columns {
            Some(columns) if !columns.is_empty() => {
                w.write_str(keyword)?;
                self.columns(w, columns)
            }
            _ => Ok(()),
        }
    }

    fn clause_conditions(
        &self,
        w: &mut SqlWriter<'_>,
        keyword: &str,
        list: Option<&ExpressionList>,
    ) -> Result<()> {
        match list {
            Some(list) if !list.is_empty() => {
                w.write_str(keyword)?;
                self.conditions(w, list)
            }
            _ => Ok(()),
        }
    }
}

impl Adapter for DialectAdapter {
    fn select_sql(&self, w: &mut SqlWriter<'_>, columns: Option<&ColumnList>) -> Result<()> {
        w.write_str("SELECT ")?;
        match columns {
            Some(columns) if !columns.is_empty() => self.columns(w, columns),
            _ => w.write_char('*'),
        }
    }

    fn select_distinct_sql(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()> {
        w.write_str("SELECT DISTINCT ")?;
        self.columns(w, columns)
    }

    fn from_sql(&self, w: &mut SqlWriter<'_>, from: Option<&ColumnList>) -> Result<()> {
        self.clause_columns(w, " FROM ", from)
    }

    fn join_sql(&self, w: &mut SqlWriter<'_>, joins: &[JoinClause]) -> Result<()> {
        for join in joins {
            w.write_char(' ')?;
            w.write_str(join.join_type().keyword())?;
            w.write_char(' ')?;
            w.expression(join.table())?;
            if !join.is_conditioned() {
                continue;
            }
            match join.condition() {
                Some(JoinCondition::On(list)) => {
                    w.write_str(" ON (")?;
                    self.conditions(w, list)?;
                    w.write_char(')')?;
                }
                Some(JoinCondition::Using(columns)) => {
                    w.write_str(" USING (")?;
                    self.columns(w, columns)?;
                    w.write_char(')')?;
                }
                None => {
                    return Err(Error::adapter(format!(
                        "join condition required for conditioned join {}",
                        join.join_type().keyword()
                    )));
                }
            }
        }
        Ok(())
    }

    fn where_sql(&self, w: &mut SqlWriter<'_>, where_: Option<&ExpressionList>) -> Result<()> {
        self.clause_conditions(w, " WHERE ", where_)
    }

    fn group_by_sql(&self, w: &mut SqlWriter<'_>, group_by: Option<&ColumnList>) -> Result<()> {
        self.clause_columns(w, " GROUP BY ", group_by)
    }

    fn having_sql(&self, w: &mut SqlWriter<'_>, having: Option<&ExpressionList>) -> Result<()> {
        self.clause_conditions(w, " HAVING ", having)
    }

    fn order_sql(&self, w: &mut SqlWriter<'_>, order: Option<&[OrderedExpr]>) -> Result<()> {
        match order {
            Some(order) if !order.is_empty() => {
                w.write_str(" ORDER BY ")?;
                w.write_separated(order, ", ", |w, ordered| self.ordered_expression_sql(w, ordered))
            }
            _ => Ok(()),
        }
    }

    fn limit_sql(&self, w: &mut SqlWriter<'_>, limit: Option<Limit>) -> Result<()> {
        match limit {
            Some(Limit::Count(count)) => {
                w.write_str(" LIMIT ")?;
                w.literal(&Value::U64(count))
            }
            Some(Limit::All) => w.write_str(" LIMIT ALL"),
            None => Ok(()),
        }
    }

    fn offset_sql(&self, w: &mut SqlWriter<'_>, offset: u64) -> Result<()> {
        if offset == 0 {
            return Ok(());
        }
        w.write_str(" OFFSET ")?;
        w.literal(&Value::U64(offset))
    }

    fn returning_sql(&self, w: &mut SqlWriter<'_>, returning: Option<&ColumnList>) -> Result<()> {
        match returning {
            Some(columns) if !columns.is_empty() => {
                if !self.options.supports_returning {
                    return Err(Error::adapter(format!(
                        "{:?} adapter does not support RETURNING clause",
                        self.dialect
                    )));
                }
                w.write_str(" RETURNING ")?;
                self.columns(w, columns)
            }
            _ => Ok(()),
        }
    }

    fn compounds_sql(&self, w: &mut SqlWriter<'_>, compounds: &[CompoundExpr]) -> Result<()> {
        for compound in compounds {
            self.compound_expression_sql(w, compound)?;
        }
        Ok(())
    }

    fn insert_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        w.write_str("INSERT INTO")
    }

    fn insert_columns_sql(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()> {
        w.write_str(" (")?;
        self.columns(w, columns)?;
        w.write_char(')')
    }

    fn insert_values_sql(&self, w: &mut SqlWriter<'_>, rows: &[Vec<Value>]) -> Result<()> {
        w.write_str(" VALUES ")?;
        w.write_separated(rows, ", ", |w, row| self.slice_value_sql(w, row))
    }

    fn default_values_sql(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        w.write_str(self.options.default_values)
    }

    fn update_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        w.write_str("UPDATE")
    }

    fn update_expressions_sql(&self, w: &mut SqlWriter<'_>, updates: &[UpdateExpr]) -> Result<()> {
        if updates.is_empty() {
            return Err(Error::adapter("no update values provided"));
        }
        w.write_str(" SET ")?;
        w.write_separated(updates, ", ", |w, update| self.update_expression_sql(w, update))
    }

    fn delete_begin_sql(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        w.write_str("DELETE")
    }

    fn truncate_sql(
        &self,
        w: &mut SqlWriter<'_>,
        from: &ColumnList,
        options: &TruncateOptions,
    ) -> Result<()> {
        if !self.options.supports_truncate {
            return Err(Error::adapter(format!(
                "{:?} adapter does not support TRUNCATE",
                self.dialect
            )));
        }
        w.write_str("TRUNCATE")?;
        self.sources_sql(w, from)?;
        if let Some(identity) = options.identity.as_deref().filter(|s| !s.is_empty()) {
            w.write_char(' ')?;
            w.write_str(&identity.to_uppercase())?;
            w.write_str(" IDENTITY")?;
        }
        if options.cascade {
            w.write_str(" CASCADE")?;
        } else if options.restrict {
            w.write_str(" RESTRICT")?;
        }
        Ok(())
    }

    fn sources_sql(&self, w: &mut SqlWriter<'_>, from: &ColumnList) -> Result<()> {
        w.write_char(' ')?;
        self.columns(w, from)
    }

    fn literal_nil(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        w.write_str(self.options.null_literal)
    }

    fn literal_string(&self, w: &mut SqlWriter<'_>, value: &str) -> Result<()> {
        w.write_char('\'')?;
        for char in value.chars() {
            match char {
                '\'' => w.write_str("''")?,
                '\\' if self.options.escape_backslash => w.write_str("\\\\")?,
                _ => w.write_char(char)?,
            }
        }
        w.write_char('\'')
    }

    fn literal_int(&self, w: &mut SqlWriter<'_>, value: i64) -> Result<()> {
        w.write_str(&value.to_string())
    }

    fn literal_float(&self, w: &mut SqlWriter<'_>, value: f64) -> Result<()> {
        w.write_str(&value.to_string())
    }

    fn literal_bool(&self, w: &mut SqlWriter<'_>, value: bool) -> Result<()> {
        if value {
            w.write_str(self.options.true_literal)
        } else {
            w.write_str(self.options.false_literal)
        }
    }

    fn literal_time(&self, w: &mut SqlWriter<'_>, value: &DateTime<Utc>) -> Result<()> {
        let formatted = value.format(self.options.time_format).to_string();
        self.literal_string(w, &formatted)
    }

    fn slice_value_sql(&self, w: &mut SqlWriter<'_>, values: &[Value]) -> Result<()> {
        w.write_char('(')?;
        w.write_separated(values, ", ", |w, value| w.literal(value))?;
        w.write_char(')')
    }

    fn quote_identifier(&self, w: &mut SqlWriter<'_>, ident: &IdentifierExpr) -> Result<()> {
        let quote = self.options.quote;
        w.write_separated(ident.parts(), ".", |w, part| w.write_quoted(part, quote))
    }

    fn aliased_expression_sql(&self, w: &mut SqlWriter<'_>, aliased: &AliasedExpr) -> Result<()> {
        w.expression(aliased.expr())?;
        w.write_str(" AS ")?;
        self.quote_identifier(w, aliased.alias())
    }

    fn boolean_expression_sql(&self, w: &mut SqlWriter<'_>, boolean: &BooleanExpr) -> Result<()> {
        let operator = boolean.operator().normalize(boolean.rhs());
        w.expression(boolean.lhs())?;
        w.write_char(' ')?;
        w.write_str(self.options.operator(operator))?;
        w.write_char(' ')?;
        w.literal(boolean.rhs())
    }

    fn ordered_expression_sql(&self, w: &mut SqlWriter<'_>, ordered: &OrderedExpr) -> Result<()> {
        w.expression(ordered.expr())?;
        match ordered.direction() {
            SortDirection::Asc => w.write_str(" ASC")?,
            SortDirection::Desc => w.write_str(" DESC")?,
        }
        match ordered.nulls() {
            NullsPosition::Unspecified => Ok(()),
            NullsPosition::First => w.write_str(" NULLS FIRST"),
            NullsPosition::Last => w.write_str(" NULLS LAST"),
        }
    }

    fn update_expression_sql(&self, w: &mut SqlWriter<'_>, update: &UpdateExpr) -> Result<()> {
        self.quote_identifier(w, update.column())?;
        w.write_str(" = ")?;
        w.literal(update.value())
    }

    fn sql_function_expression_sql(
        &self,
        w: &mut SqlWriter<'_>,
        function: &SqlFunctionExpr,
    ) -> Result<()> {
        w.write_str(function.name())?;
        w.write_char('(')?;
        w.write_separated(function.args(), ", ", |w, arg| w.literal(arg))?;
        w.write_char(')')
    }

    fn cast_expression_sql(&self, w: &mut SqlWriter<'_>, cast: &CastExpr) -> Result<()> {
        w.write_str("CAST(")?;
        w.expression(cast.expr())?;
        w.write_str(" AS ")?;
        self.literal_expression_sql(w, cast.ty())?;
        w.write_char(')')
    }

    fn compound_expression_sql(
        &self,
        w: &mut SqlWriter<'_>,
        compound: &CompoundExpr,
    ) -> Result<()> {
        let keyword = match compound.ty() {
            CompoundType::Union => " UNION (",
            CompoundType::UnionAll => " UNION ALL (",
            CompoundType::Intersect => " INTERSECT (",
            CompoundType::IntersectAll => " INTERSECT ALL (",
        };
        w.write_str(keyword)?;
        compound.rhs().write_select(w)?;
        w.write_char(')')
    }

    fn column_list_sql(&self, w: &mut SqlWriter<'_>, columns: &ColumnList) -> Result<()> {
        self.columns(w, columns)
    }

    fn expression_list_sql(&self, w: &mut SqlWriter<'_>, list: &ExpressionList) -> Result<()> {
        match list.expressions() {
            [] => Ok(()),
            [single] => w.expression(single),
            _ => {
                w.write_char('(')?;
                self.conditions(w, list)?;
                w.write_char(')')
            }
        }
    }

    fn literal_expression_sql(&self, w: &mut SqlWriter<'_>, literal: &LiteralExpr) -> Result<()> {
        literal.write_to(w)
    }

    fn sub_select_sql(&self, w: &mut SqlWriter<'_>, dataset: &Dataset) -> Result<()> {
        w.write_char('(')?;
        dataset.write_select(w)?;
        w.write_char(')')?;
        if let Some(alias) = dataset.alias_ident() {
            w.write_str(" AS ")?;
            self.quote_identifier(w, alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::{Dataset, TruncateOptions, col, from, lit};

    use super::*;

    fn on(dialect: Dialect, ds: Dataset) -> Result<String> {
        ds.with_adapter(dialect.adapter()).sql()
    }

    #[test]
    fn test_quote_per_dialect() {
        let ds = from("users").select(["id", "name"]);
        assert_eq!(
            "SELECT \"id\", \"name\" FROM \"users\"",
            on(Dialect::Postgres, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT `id`, `name` FROM `users`",
            on(Dialect::MySql, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT \"id\", \"name\" FROM \"users\"",
            on(Dialect::Sqlite, ds).unwrap()
        );
    }

    #[test]
    fn test_like_per_dialect() {
        let ds = from("users").where_([col("name").like("a%"), col("nick").ilike("b%")]);
        assert_eq!(
            "SELECT * FROM \"users\" WHERE \"name\" LIKE 'a%' AND \"nick\" ILIKE 'b%'",
            on(Dialect::Postgres, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT * FROM `users` WHERE `name` LIKE BINARY 'a%' AND `nick` LIKE 'b%'",
            on(Dialect::MySql, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT * FROM \"users\" WHERE \"name\" GLOB 'a%' AND \"nick\" LIKE 'b%'",
            on(Dialect::Sqlite, ds).unwrap()
        );
    }

    #[test]
    fn test_literals_per_dialect() {
        let ds = from("t").where_([col("a").eq(true), col("b").eq("c:\\dir")]);
        assert_eq!(
            "SELECT * FROM \"t\" WHERE \"a\" IS TRUE AND \"b\" = 'c:\\dir'",
            on(Dialect::Default, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT * FROM `t` WHERE `a` IS TRUE AND `b` = 'c:\\\\dir'",
            on(Dialect::MySql, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT * FROM \"t\" WHERE \"a\" IS 1 AND \"b\" = 'c:\\dir'",
            on(Dialect::Sqlite, ds).unwrap()
        );
    }

    #[test]
    fn test_time_per_dialect() {
        let time = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let ds = from("t").where_(col("at").gt(time));
        assert_eq!(
            "SELECT * FROM \"t\" WHERE \"at\" > '2024-05-06T07:08:09Z'",
            on(Dialect::Postgres, ds.clone()).unwrap()
        );
        assert_eq!(
            "SELECT * FROM `t` WHERE `at` > '2024-05-06 07:08:09'",
            on(Dialect::MySql, ds).unwrap()
        );
    }

    #[test]
    fn test_returning_unsupported_on_mysql() {
        let ds = from("users").returning("id");
        let err = ds.with_adapter(Dialect::MySql.adapter()).delete_sql().unwrap_err();
        assert!(matches!(err, Error::Adapter(_)));
        assert_eq!(
            "DELETE FROM \"users\" RETURNING \"id\"",
            ds.with_adapter(Dialect::Postgres.adapter()).delete_sql().unwrap()
        );
    }

    #[test]
    fn test_truncate() {
        let ds = from("users");
        assert_eq!("TRUNCATE \"users\"", ds.truncate_sql().unwrap());
        let options = TruncateOptions {
            cascade: true,
            identity: Some("restart".into()),
            ..Default::default()
        };
        assert_eq!(
            "TRUNCATE \"users\" RESTART IDENTITY CASCADE",
            ds.truncate_with_opts_sql(&options).unwrap()
        );
        let options = TruncateOptions {
            restrict: true,
            ..Default::default()
        };
        assert_eq!(
            "TRUNCATE \"users\", \"roles\" RESTRICT",
            from(["users", "roles"]).truncate_with_opts_sql(&options).unwrap()
        );
        let err = ds.with_adapter(Dialect::Sqlite.adapter()).truncate_sql().unwrap_err();
        assert!(matches!(err, Error::Adapter(_)));
    }

    #[test]
    fn test_default_values() {
        let ds = from("items");
        assert_eq!(
            "INSERT INTO \"items\" DEFAULT VALUES",
            ds.insert_sql(Vec::<crate::Row>::new()).unwrap()
        );
        assert_eq!(
            "INSERT INTO `items` VALUES ()",
            ds.with_adapter(Dialect::MySql.adapter())
                .insert_sql(Vec::<crate::Row>::new())
                .unwrap()
        );
    }

    #[test]
    fn test_custom_options() {
        let options = DialectOptions::default().booleans("'t'", "'f'");
        let adapter = DialectAdapter::with_options(Dialect::Default, options);
        let sql = from("t")
            .with_adapter(adapter)
            .where_(lit("x").eq(false))
            .sql()
            .unwrap();
        assert_eq!("SELECT * FROM \"t\" WHERE x IS 'f'", sql);
    }
}
