use std::sync::Arc;

use smol_str::format_smolstr;

use crate::{
    adapter::Adapter,
    clauses::{Clauses, Limit},
    col::{ColumnList, IntoColumns},
    column_map::ColumnMapRegistry,
    database::Database,
    dialect::DialectAdapter,
    error::Result,
    expr::{
        CompoundExpr, CompoundType, Expression, IntoExpression, IntoExpressions, IntoOrderedList,
        and,
    },
    ident::IdentifierExpr,
    join::{JoinClause, JoinCondition, JoinType},
    row::Record,
    star,
    value::IntoValue,
    writer::SqlWriter,
};

/// An immutable, in-progress sql statement.
///
/// Every mutator returns a new dataset and leaves the receiver untouched:
///
/// ```
/// use datasql::{col, from};
///
/// let users = from("users");
/// let adults = users.where_(col("age").gt(18)).select(["id", "name"]);
///
/// assert_eq!("SELECT * FROM \"users\"", users.sql().unwrap());
/// assert_eq!(
///     "SELECT \"id\", \"name\" FROM \"users\" WHERE \"age\" > 18",
///     adults.sql().unwrap()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    pub(crate) adapter: Arc<dyn Adapter>,
    pub(crate) clauses: Arc<Clauses>,
    pub(crate) database: Option<Arc<dyn Database>>,
    pub(crate) registry: Arc<ColumnMapRegistry>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(DialectAdapter::default())
    }
}

impl Dataset {
    /// A `SELECT *` dataset without sources rendered by `adapter`.
    pub fn new<A: Adapter + 'static>(adapter: A) -> Self {
        Self {
            adapter: Arc::new(adapter),
            clauses: Arc::new(Clauses::select_all()),
            database: None,
            registry: Arc::new(ColumnMapRegistry::new()),
        }
    }

    /// A dataset bound to `database`, rendered with the adapter it reports.
    pub fn for_database(database: Arc<dyn Database>) -> Self {
        Self {
            adapter: database.query_adapter(),
            clauses: Arc::new(Clauses::select_all()),
            database: Some(database),
            registry: Arc::new(ColumnMapRegistry::new()),
        }
    }

    /// Selects from the table of record type `R`.
    pub fn table_as<R: Record>() -> Self {
        Self::default().from(R::TABLE)
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    pub fn database(&self) -> Option<&Arc<dyn Database>> {
        self.database.as_ref()
    }

    pub fn registry(&self) -> &Arc<ColumnMapRegistry> {
        &self.registry
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn alias_ident(&self) -> Option<&IdentifierExpr> {
        self.clauses.alias.as_ref()
    }

    pub fn with_adapter<A: Adapter + 'static>(&self, adapter: A) -> Self {
        let mut ret = self.clone();
        ret.adapter = Arc::new(adapter);
        ret
    }

    pub fn with_database(&self, database: Arc<dyn Database>) -> Self {
        let mut ret = self.clone();
        ret.database = Some(database);
        ret
    }

    pub fn with_registry(&self, registry: Arc<ColumnMapRegistry>) -> Self {
        let mut ret = self.clone();
        ret.registry = registry;
        ret
    }

    /// Renders `value` as a literal of this dataset's dialect.
    pub fn literal<V: IntoValue>(&self, value: V) -> Result<String> {
        let mut buf = String::new();
        let mut w = SqlWriter::new(&mut buf, self.adapter.as_ref());
        w.literal(&value.into_value())?;
        Ok(buf)
    }

    fn map_clauses<F>(&self, f: F) -> Self
    where
        F: FnOnce(&mut Clauses),
    {
        let mut ret = self.clone();
        f(Arc::make_mut(&mut ret.clauses));
        ret
    }

    // sources

    pub fn alias(&self, alias: &str) -> Self {
        self.map_clauses(|c| c.alias = Some(IdentifierExpr::from_parts([alias])))
    }

    /// Replaces the sources. Datasets without an alias are named `t1`, `t2`, ...
    pub fn from<S: IntoColumns>(&self, sources: S) -> Self {
        let mut unaliased = 0;
        let sources: ColumnList = sources
            .into_columns()
            .columns
            .into_iter()
            .map(|source| match source {
                Expression::Dataset(dataset) if dataset.clauses.alias.is_none() => {
                    unaliased += 1;
                    dataset.alias(&format_smolstr!("t{unaliased}")).into_expression()
                }
                other => other,
            })
            .collect();
        self.map_clauses(|c| c.from = Some(Arc::new(sources)))
    }

    /// Wraps this dataset as the only source of a fresh `SELECT *`.
    pub fn from_self(&self) -> Self {
        let builder = Self {
            adapter: self.adapter.clone(),
            clauses: Arc::new(Clauses::select_all()),
            database: self.database.clone(),
            registry: self.registry.clone(),
        };
        builder.from(self.clone())
    }

    // projection

    pub fn select<C: IntoColumns>(&self, columns: C) -> Self {
        let columns = columns.into_columns();
        self.map_clauses(|c| {
            c.select_distinct = None;
            c.select = Some(Arc::new(columns));
        })
    }

    pub fn select_distinct<C: IntoColumns>(&self, columns: C) -> Self {
        let columns = columns.into_columns();
        self.map_clauses(|c| {
            c.select = None;
            c.select_distinct = Some(Arc::new(columns));
        })
    }

    /// Adds columns to whichever projection is active.
    pub fn select_append<C: IntoColumns>(&self, columns: C) -> Self {
        let columns = columns.into_columns().columns;
        self.map_clauses(|c| {
            let target = if c.select_distinct.is_some() {
                &mut c.select_distinct
            } else {
                &mut c.select
            };
            Arc::make_mut(target.get_or_insert_default()).columns.extend(columns);
        })
    }

    pub fn clear_select(&self) -> Self {
        self.map_clauses(|c| {
            c.select = Some(Arc::new(ColumnList::new(vec![star().into()])));
            c.select_distinct = None;
        })
    }

    // filters

    /// Ands `expressions` into WHERE. No expressions returns the receiver as is.
    pub fn where_<E: IntoExpressions>(&self, expressions: E) -> Self {
        let expressions = expressions.into_expressions();
        if expressions.is_empty() {
            return self.clone();
        }
        self.map_clauses(|c| {
            let list = c.where_.get_or_insert_with(|| Arc::new(and(())));
            Arc::make_mut(list).expressions.extend(expressions);
        })
    }

    pub fn clear_where(&self) -> Self {
        self.map_clauses(|c| c.where_ = None)
    }

    pub fn group_by<C: IntoColumns>(&self, columns: C) -> Self {
        let columns = columns.into_columns();
        self.map_clauses(|c| c.group_by = Some(Arc::new(columns)))
    }

    /// Ands `expressions` into HAVING. No expressions returns the receiver as is.
    pub fn having<E: IntoExpressions>(&self, expressions: E) -> Self {
        let expressions = expressions.into_expressions();
        if expressions.is_empty() {
            return self.clone();
        }
        self.map_clauses(|c| {
            let list = c.having.get_or_insert_with(|| Arc::new(and(())));
            Arc::make_mut(list).expressions.extend(expressions);
        })
    }

    // ordering and paging

    pub fn order<O: IntoOrderedList>(&self, order: O) -> Self {
        let order = order.into_ordered_list();
        self.map_clauses(|c| {
            c.order = if order.is_empty() {
                None
            } else {
                Some(Arc::new(order))
            };
        })
    }

    /// Appends to an existing order, or sets it when there is none.
    pub fn order_append<O: IntoOrderedList>(&self, order: O) -> Self {
        let order = order.into_ordered_list();
        if order.is_empty() {
            return self.clone();
        }
        self.map_clauses(|c| {
            let existing = c.order.get_or_insert_default();
            Arc::make_mut(existing).extend(order);
        })
    }

    pub fn clear_order(&self) -> Self {
        self.map_clauses(|c| c.order = None)
    }

    /// Sets the limit; `0` clears it.
    pub fn limit(&self, limit: u64) -> Self {
        self.map_clauses(|c| c.limit = (limit > 0).then_some(Limit::Count(limit)))
    }

    pub fn limit_all(&self) -> Self {
        self.map_clauses(|c| c.limit = Some(Limit::All))
    }

    pub fn clear_limit(&self) -> Self {
        self.limit(0)
    }

    pub fn offset(&self, offset: u64) -> Self {
        self.map_clauses(|c| c.offset = offset)
    }

    pub fn clear_offset(&self) -> Self {
        self.offset(0)
    }

    pub fn returning<C: IntoColumns>(&self, columns: C) -> Self {
        let columns = columns.into_columns();
        self.map_clauses(|c| c.returning = Some(Arc::new(columns)))
    }

    // joins

    pub fn join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.inner_join(table, condition)
    }

    pub fn inner_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::Inner, table, Some(condition))
    }

    pub fn full_outer_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::FullOuter, table, Some(condition))
    }

    pub fn right_outer_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::RightOuter, table, Some(condition))
    }

    pub fn left_outer_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::LeftOuter, table, Some(condition))
    }

    pub fn full_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::Full, table, Some(condition))
    }

    pub fn right_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::Right, table, Some(condition))
    }

    pub fn left_join<T: IntoExpression>(&self, table: T, condition: JoinCondition) -> Self {
        self.join_table(JoinType::Left, table, Some(condition))
    }

    pub fn natural_join<T: IntoExpression>(&self, table: T) -> Self {
        self.join_table(JoinType::Natural, table, None)
    }

    pub fn natural_left_join<T: IntoExpression>(&self, table: T) -> Self {
        self.join_table(JoinType::NaturalLeft, table, None)
    }

    pub fn natural_right_join<T: IntoExpression>(&self, table: T) -> Self {
        self.join_table(JoinType::NaturalRight, table, None)
    }

    pub fn natural_full_join<T: IntoExpression>(&self, table: T) -> Self {
        self.join_table(JoinType::NaturalFull, table, None)
    }

    pub fn cross_join<T: IntoExpression>(&self, table: T) -> Self {
        self.join_table(JoinType::Cross, table, None)
    }

    /// Appends a join; whether it takes a condition follows from `join_type`.
    pub fn join_table<T: IntoExpression>(
        &self,
        join_type: JoinType,
        table: T,
        condition: Option<JoinCondition>,
    ) -> Self {
        let join = JoinClause::new(join_type, table.into_expression(), condition);
        self.map_clauses(|c| Arc::make_mut(&mut c.joins).push(join))
    }

    // compounds

    pub fn union(&self, other: Dataset) -> Self {
        self.compound(CompoundType::Union, other)
    }

    pub fn union_all(&self, other: Dataset) -> Self {
        self.compound(CompoundType::UnionAll, other)
    }

    pub fn intersect(&self, other: Dataset) -> Self {
        self.compound(CompoundType::Intersect, other)
    }

    pub fn intersect_all(&self, other: Dataset) -> Self {
        self.compound(CompoundType::IntersectAll, other)
    }

    fn compound(&self, ty: CompoundType, other: Dataset) -> Self {
        let compound = CompoundExpr::new(ty, other.compound_from_self());
        self.compound_from_self()
            .map_clauses(|c| Arc::make_mut(&mut c.compounds).push(compound))
    }

    /// Wraps the dataset in a subquery when it has an order or a limit, which
    /// most dialects reject on a set operation member.
    pub fn compound_from_self(&self) -> Self {
        if self.clauses.order.is_some() || self.clauses.limit.is_some() {
            self.from_self()
        } else {
            self.clone()
        }
    }
}
