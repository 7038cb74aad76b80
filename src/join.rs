use crate::{
    col::{ColumnList, IntoColumns},
    expr::{Expression, ExpressionList, IntoExpressions, and},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    FullOuter,
    RightOuter,
    LeftOuter,
    Full,
    Right,
    Left,
    Natural,
    NaturalLeft,
    NaturalRight,
    NaturalFull,
    Cross,
}

impl JoinType {
    /// Whether the join takes an `ON`/`USING` condition. Natural and cross
    /// joins never do.
    pub fn is_conditioned(self) -> bool {
        matches!(
            self,
            JoinType::Inner
                | JoinType::FullOuter
                | JoinType::RightOuter
                | JoinType::LeftOuter
                | JoinType::Full
                | JoinType::Right
                | JoinType::Left
        )
    }

    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Natural => "NATURAL JOIN",
            JoinType::NaturalLeft => "NATURAL LEFT JOIN",
            JoinType::NaturalRight => "NATURAL RIGHT JOIN",
            JoinType::NaturalFull => "NATURAL FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// `ON (...)` or `USING (...)`; using takes columns only, no subqueries.
#[derive(Debug, Clone)]
pub enum JoinCondition {
    On(ExpressionList),
    Using(ColumnList),
}

/// `ON a AND b AND ...`
pub fn on<E: IntoExpressions>(conditions: E) -> JoinCondition {
    JoinCondition::On(and(conditions))
}

/// `USING (a, b, ...)`
pub fn using<C: IntoColumns>(columns: C) -> JoinCondition {
    JoinCondition::Using(columns.into_columns())
}

#[derive(Debug, Clone)]
pub struct JoinClause {
    pub(crate) join_type: JoinType,
    pub(crate) is_conditioned: bool,
    pub(crate) table: Expression,
    pub(crate) condition: Option<JoinCondition>,
}

impl JoinClause {
    pub(crate) fn new(
        join_type: JoinType,
        table: Expression,
        condition: Option<JoinCondition>,
    ) -> Self {
        Self {
            join_type,
            is_conditioned: join_type.is_conditioned(),
            table,
            condition,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn is_conditioned(&self) -> bool {
        self.is_conditioned
    }

    pub fn table(&self) -> &Expression {
        &self.table
    }

    pub fn condition(&self) -> Option<&JoinCondition> {
        self.condition.as_ref()
    }
}
