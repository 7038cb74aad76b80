use std::sync::Arc;

use crate::{
    col::ColumnList,
    expr::{CompoundExpr, ExpressionList, OrderedExpr},
    ident::IdentifierExpr,
    join::JoinClause,
    star,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Always greater than zero; a zero limit is stored as no limit.
    Count(u64),
    /// The dialect `ALL` literal.
    All,
}

/// The clause set of a [`Dataset`](crate::Dataset).
///
/// Every list sits behind an `Arc` so deriving a dataset only copies the
/// pointers; a mutator replaces or `make_mut`s the one field it touches.
#[derive(Debug, Clone, Default)]
pub struct Clauses {
    pub(crate) select: Option<Arc<ColumnList>>,
    pub(crate) select_distinct: Option<Arc<ColumnList>>,
    pub(crate) from: Option<Arc<ColumnList>>,
    pub(crate) joins: Arc<Vec<JoinClause>>,
    pub(crate) where_: Option<Arc<ExpressionList>>,
    pub(crate) alias: Option<IdentifierExpr>,
    pub(crate) group_by: Option<Arc<ColumnList>>,
    pub(crate) having: Option<Arc<ExpressionList>>,
    pub(crate) order: Option<Arc<Vec<OrderedExpr>>>,
    pub(crate) limit: Option<Limit>,
    pub(crate) offset: u64,
    pub(crate) returning: Option<Arc<ColumnList>>,
    pub(crate) compounds: Arc<Vec<CompoundExpr>>,
}

impl Clauses {
    /// `SELECT *` with nothing else set.
    pub(crate) fn select_all() -> Self {
        Self {
            select: Some(Arc::new(ColumnList::new(vec![star().into()]))),
            ..Default::default()
        }
    }

    pub fn select(&self) -> Option<&ColumnList> {
        self.select.as_deref()
    }

    pub fn select_distinct(&self) -> Option<&ColumnList> {
        self.select_distinct.as_deref()
    }

    pub fn from(&self) -> Option<&ColumnList> {
        self.from.as_deref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn where_(&self) -> Option<&ExpressionList> {
        self.where_.as_deref()
    }

    pub fn alias(&self) -> Option<&IdentifierExpr> {
        self.alias.as_ref()
    }

    pub fn group_by(&self) -> Option<&ColumnList> {
        self.group_by.as_deref()
    }

    pub fn having(&self) -> Option<&ExpressionList> {
        self.having.as_deref()
    }

    pub fn order(&self) -> Option<&[OrderedExpr]> {
        self.order.as_deref().map(Vec::as_slice)
    }

    pub fn limit(&self) -> Option<Limit> {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn returning(&self) -> Option<&ColumnList> {
        self.returning.as_deref()
    }

    pub fn compounds(&self) -> &[CompoundExpr] {
        &self.compounds
    }
}
