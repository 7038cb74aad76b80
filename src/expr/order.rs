use crate::expr::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NullsPosition {
    #[default]
    Unspecified,
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct OrderedExpr {
    pub(crate) expr: Box<Expression>,
    pub(crate) direction: SortDirection,
    pub(crate) nulls: NullsPosition,
}

impl OrderedExpr {
    pub fn new(expr: Expression, direction: SortDirection) -> Self {
        Self {
            expr: Box::new(expr),
            direction,
            nulls: NullsPosition::Unspecified,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullsPosition::First;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullsPosition::Last;
        self
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn nulls(&self) -> NullsPosition {
        self.nulls
    }
}

/// Anything that can be given to `order`: an ordered expression, or a column
/// which then sorts ascending.
pub trait IntoOrdered {
    fn into_ordered(self) -> OrderedExpr;
}

impl IntoOrdered for OrderedExpr {
    fn into_ordered(self) -> OrderedExpr {
        self
    }
}

impl IntoOrdered for &str {
    fn into_ordered(self) -> OrderedExpr {
        crate::ident::parse_reference(self).asc()
    }
}

impl IntoOrdered for crate::ident::IdentifierExpr {
    fn into_ordered(self) -> OrderedExpr {
        Expression::Identifier(self).asc()
    }
}

/// Zero or more orderings.
pub trait IntoOrderedList {
    fn into_ordered_list(self) -> Vec<OrderedExpr>;
}

impl IntoOrderedList for () {
    fn into_ordered_list(self) -> Vec<OrderedExpr> {
        Vec::new()
    }
}

impl<T> IntoOrderedList for T
where
    T: IntoOrdered,
{
    fn into_ordered_list(self) -> Vec<OrderedExpr> {
        vec![self.into_ordered()]
    }
}

impl<T, const N: usize> IntoOrderedList for [T; N]
where
    T: IntoOrdered,
{
    fn into_ordered_list(self) -> Vec<OrderedExpr> {
        self.into_iter().map(IntoOrdered::into_ordered).collect()
    }
}

impl<T> IntoOrderedList for Vec<T>
where
    T: IntoOrdered,
{
    fn into_ordered_list(self) -> Vec<OrderedExpr> {
        self.into_iter().map(IntoOrdered::into_ordered).collect()
    }
}
