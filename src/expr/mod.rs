use smol_str::SmolStr;

use crate::{
    col::ColumnList,
    dataset::Dataset,
    ident::{IdentifierExpr, parse_reference},
    raw::LiteralExpr,
    value::{IntoValue, Value},
};

pub mod alias;
pub mod binary;
pub mod cast;
pub mod compound;
pub mod cond;
pub mod fncall;
pub mod order;
pub mod update;

pub use alias::AliasedExpr;
pub use binary::{BooleanExpr, BooleanOperator};
pub use cast::CastExpr;
pub use compound::{CompoundExpr, CompoundType};
pub use cond::{Conjunction, ExpressionList, and, or};
pub use fncall::{SqlFunctionExpr, avg, coalesce, count, distinct, first, func, last, max, min, sum};
pub use order::{IntoOrdered, IntoOrderedList, NullsPosition, OrderedExpr, SortDirection};
pub use update::UpdateExpr;

/// Every node a statement can be built from.
///
/// The set is closed: rendering matches on it exhaustively and hands each
/// variant to its own [`Adapter`](crate::Adapter) method. `Clone` yields an
/// independent copy.
#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(IdentifierExpr),
    Literal(LiteralExpr),
    Boolean(BooleanExpr),
    Ordered(OrderedExpr),
    Aliased(AliasedExpr),
    Cast(CastExpr),
    Function(SqlFunctionExpr),
    ColumnList(ColumnList),
    ExpressionList(ExpressionList),
    Update(UpdateExpr),
    Compound(CompoundExpr),
    Dataset(Box<Dataset>),
}

impl Expression {
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "identifier",
            Expression::Literal(_) => "literal",
            Expression::Boolean(_) => "boolean",
            Expression::Ordered(_) => "ordered",
            Expression::Aliased(_) => "aliased",
            Expression::Cast(_) => "cast",
            Expression::Function(_) => "function",
            Expression::ColumnList(_) => "column list",
            Expression::ExpressionList(_) => "expression list",
            Expression::Update(_) => "update",
            Expression::Compound(_) => "compound",
            Expression::Dataset(_) => "dataset",
        }
    }

    /// Ordered ascending, used when a bare column is given to `order`.
    pub fn asc(self) -> OrderedExpr {
        OrderedExpr::new(self, SortDirection::Asc)
    }

    pub fn desc(self) -> OrderedExpr {
        OrderedExpr::new(self, SortDirection::Desc)
    }
}

pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for &str {
    #[inline]
    fn into_expression(self) -> Expression {
        parse_reference(self)
    }
}

impl IntoExpression for &String {
    #[inline]
    fn into_expression(self) -> Expression {
        parse_reference(self)
    }
}

impl IntoExpression for String {
    #[inline]
    fn into_expression(self) -> Expression {
        parse_reference(&self)
    }
}

impl IntoExpression for SmolStr {
    #[inline]
    fn into_expression(self) -> Expression {
        parse_reference(&self)
    }
}

impl IntoExpression for Dataset {
    fn into_expression(self) -> Expression {
        Expression::Dataset(Box::new(self))
    }
}

impl IntoValue for Dataset {
    fn into_value(self) -> Value {
        Value::Expression(Box::new(Expression::Dataset(Box::new(self))))
    }
}

impl IntoValue for Expression {
    fn into_value(self) -> Value {
        Value::Expression(Box::new(self))
    }
}

macro_rules! expression_variant {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::$variant(value)
                }
            }

            impl IntoExpression for $ty {
                #[inline]
                fn into_expression(self) -> Expression {
                    Expression::$variant(self)
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Expression(Box::new(Expression::$variant(self)))
                }
            }
        )+
    };
}

expression_variant!(
    IdentifierExpr => Identifier,
    LiteralExpr => Literal,
    BooleanExpr => Boolean,
    OrderedExpr => Ordered,
    AliasedExpr => Aliased,
    CastExpr => Cast,
    SqlFunctionExpr => Function,
    ExpressionList => ExpressionList,
    UpdateExpr => Update,
    CompoundExpr => Compound,
);

/// Zero or more expressions, as taken by `where_` and `having`.
pub trait IntoExpressions {
    fn into_expressions(self) -> Vec<Expression>;
}

impl IntoExpressions for () {
    fn into_expressions(self) -> Vec<Expression> {
        Vec::new()
    }
}

impl<T> IntoExpressions for T
where
    T: IntoExpression,
{
    fn into_expressions(self) -> Vec<Expression> {
        vec![self.into_expression()]
    }
}

impl<T> IntoExpressions for Vec<T>
where
    T: IntoExpression,
{
    fn into_expressions(self) -> Vec<Expression> {
        self.into_iter().map(IntoExpression::into_expression).collect()
    }
}

impl<T, const N: usize> IntoExpressions for [T; N]
where
    T: IntoExpression,
{
    fn into_expressions(self) -> Vec<Expression> {
        self.into_iter().map(IntoExpression::into_expression).collect()
    }
}
