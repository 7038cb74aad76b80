use crate::{
    expr::Expression,
    value::{IntoValue, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    Eq,
    NotEq,
    Is,
    IsNot,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl BooleanOperator {
    /// `=`/`!=` turn into `IS`/`IS NOT` when compared against null or a boolean.
    pub fn normalize(self, rhs: &Value) -> Self {
        match (self, rhs) {
            (BooleanOperator::Eq, Value::Null | Value::Bool(_)) => BooleanOperator::Is,
            (BooleanOperator::NotEq, Value::Null | Value::Bool(_)) => BooleanOperator::IsNot,
            (op, _) => op,
        }
    }
}

/// A boolean test `lhs OP rhs`, the building block of WHERE, HAVING and ON.
#[derive(Debug, Clone)]
pub struct BooleanExpr {
    pub(crate) operator: BooleanOperator,
    pub(crate) lhs: Box<Expression>,
    pub(crate) rhs: Value,
}

impl BooleanExpr {
    pub fn new(operator: BooleanOperator, lhs: Expression, rhs: Value) -> Self {
        Self {
            operator,
            lhs: Box::new(lhs),
            rhs,
        }
    }

    pub fn operator(&self) -> BooleanOperator {
        self.operator
    }

    pub fn lhs(&self) -> &Expression {
        &self.lhs
    }

    pub fn rhs(&self) -> &Value {
        &self.rhs
    }
}

/// Comparison, ordering and aliasing helpers shared by value-like expressions.
macro_rules! comparison_methods {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                fn boolean<V: IntoValue>(&self, operator: BooleanOperator, value: V) -> BooleanExpr {
                    BooleanExpr::new(operator, self.clone().into(), value.into_value())
                }

                pub fn eq<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Eq, value)
                }

                pub fn neq<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::NotEq, value)
                }

                pub fn gt<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Gt, value)
                }

                pub fn gte<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Gte, value)
                }

                pub fn lt<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Lt, value)
                }

                pub fn lte<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Lte, value)
                }

                pub fn in_<V: IntoValue>(&self, values: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::In, values)
                }

                pub fn not_in<V: IntoValue>(&self, values: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::NotIn, values)
                }

                pub fn like<V: IntoValue>(&self, pattern: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Like, pattern)
                }

                pub fn not_like<V: IntoValue>(&self, pattern: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::NotLike, pattern)
                }

                pub fn ilike<V: IntoValue>(&self, pattern: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::ILike, pattern)
                }

                pub fn not_ilike<V: IntoValue>(&self, pattern: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::NotILike, pattern)
                }

                pub fn is<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::Is, value)
                }

                pub fn is_not<V: IntoValue>(&self, value: V) -> BooleanExpr {
                    self.boolean(BooleanOperator::IsNot, value)
                }

                pub fn is_null(&self) -> BooleanExpr {
                    self.boolean(BooleanOperator::Is, Value::Null)
                }

                pub fn is_not_null(&self) -> BooleanExpr {
                    self.boolean(BooleanOperator::IsNot, Value::Null)
                }

                pub fn is_true(&self) -> BooleanExpr {
                    self.boolean(BooleanOperator::Is, true)
                }

                pub fn is_false(&self) -> BooleanExpr {
                    self.boolean(BooleanOperator::Is, false)
                }

                pub fn asc(&self) -> crate::expr::OrderedExpr {
                    crate::expr::OrderedExpr::new(self.clone().into(), crate::expr::SortDirection::Asc)
                }

                pub fn desc(&self) -> crate::expr::OrderedExpr {
                    crate::expr::OrderedExpr::new(self.clone().into(), crate::expr::SortDirection::Desc)
                }

                pub fn as_(&self, alias: &str) -> crate::expr::AliasedExpr {
                    crate::expr::AliasedExpr::new(
                        self.clone().into(),
                        crate::ident::IdentifierExpr::from_parts([alias]),
                    )
                }

                pub fn cast(&self, ty: &str) -> crate::expr::CastExpr {
                    crate::expr::CastExpr::new(self.clone().into(), ty)
                }
            }
        )+
    };
}

comparison_methods!(
    crate::ident::IdentifierExpr,
    crate::raw::LiteralExpr,
    crate::expr::SqlFunctionExpr,
    crate::expr::CastExpr,
);

#[cfg(test)]
mod tests {
    use crate::{col, lit, tests::render};

    use super::*;

    #[test]
    fn test_comparisons() {
        assert_eq!("\"age\" > 18", render(col("age").gt(18)));
        assert_eq!("\"age\" >= 18", render(col("age").gte(18)));
        assert_eq!("\"age\" < 18", render(col("age").lt(18)));
        assert_eq!("\"age\" <= 18", render(col("age").lte(18)));
        assert_eq!("\"name\" = 'bob'", render(col("name").eq("bob")));
        assert_eq!("\"name\" != 'bob'", render(col("name").neq("bob")));
    }

    #[test]
    fn test_eq_null_and_bool_become_is() {
        assert_eq!("\"a\" IS NULL", render(col("a").eq(None::<i32>)));
        assert_eq!("\"a\" IS NOT NULL", render(col("a").neq(Value::Null)));
        assert_eq!("\"a\" IS TRUE", render(col("a").eq(true)));
        assert_eq!("\"a\" IS NOT FALSE", render(col("a").neq(false)));
        assert_eq!("\"a\" IS NULL", render(col("a").is_null()));
        assert_eq!("\"a\" IS NOT NULL", render(col("a").is_not_null()));
        assert_eq!("\"a\" IS TRUE", render(col("a").is_true()));
    }

    #[test]
    fn test_in_lists() {
        assert_eq!("\"id\" IN (1, 2, 3)", render(col("id").in_([1, 2, 3])));
        assert_eq!("\"id\" NOT IN ('a', 'b')", render(col("id").not_in(vec!["a", "b"])));
    }

    #[test]
    fn test_like() {
        assert_eq!("\"name\" LIKE 'a%'", render(col("name").like("a%")));
        assert_eq!("\"name\" NOT LIKE 'a%'", render(col("name").not_like("a%")));
        assert_eq!("\"name\" ILIKE 'a%'", render(col("name").ilike("a%")));
        assert_eq!("\"name\" NOT ILIKE 'a%'", render(col("name").not_ilike("a%")));
    }

    #[test]
    fn test_column_against_column() {
        assert_eq!(
            "\"orders\".\"user_id\" = \"users\".\"id\"",
            render(col("orders.user_id").eq(col("users.id")))
        );
    }

    #[test]
    fn test_literal_lhs() {
        assert_eq!("1 = 1", render(lit("1").eq(1)));
    }
}
