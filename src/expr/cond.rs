use crate::expr::{Expression, IntoExpressions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

/// Expressions joined by a single conjunction.
///
/// WHERE and HAVING are always an `And` list; `or(...)` nests an `Or` list inside.
#[derive(Debug, Clone)]
pub struct ExpressionList {
    pub(crate) conjunction: Conjunction,
    pub(crate) expressions: Vec<Expression>,
}

impl ExpressionList {
    pub fn new(conjunction: Conjunction, expressions: Vec<Expression>) -> Self {
        Self {
            conjunction,
            expressions,
        }
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn push(&mut self, expression: Expression) {
        self.expressions.push(expression);
    }

    /// Returns a new list with `expressions` added under the same conjunction.
    pub fn append<E: IntoExpressions>(&self, expressions: E) -> Self {
        let mut ret = self.clone();
        ret.expressions.extend(expressions.into_expressions());
        ret
    }
}

/// `a AND b AND ...`
pub fn and<E: IntoExpressions>(expressions: E) -> ExpressionList {
    ExpressionList::new(Conjunction::And, expressions.into_expressions())
}

/// `a OR b OR ...`
pub fn or<E: IntoExpressions>(expressions: E) -> ExpressionList {
    ExpressionList::new(Conjunction::Or, expressions.into_expressions())
}
