use smol_str::SmolStr;

use crate::{
    expr::IntoExpression,
    value::{IntoValue, Value},
};

/// `name(arg, ...)`; arguments go through the literal encoder.
#[derive(Debug, Clone)]
pub struct SqlFunctionExpr {
    pub(crate) name: SmolStr,
    pub(crate) args: Vec<Value>,
}

impl SqlFunctionExpr {
    pub fn new<N, I, V>(name: N, args: I) -> Self
    where
        N: Into<SmolStr>,
        I: IntoIterator<Item = V>,
        V: IntoValue,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(IntoValue::into_value).collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

pub fn func<N, I, V>(name: N, args: I) -> SqlFunctionExpr
where
    N: Into<SmolStr>,
    I: IntoIterator<Item = V>,
    V: IntoValue,
{
    SqlFunctionExpr::new(name, args)
}

fn aggregate<C: IntoExpression>(name: &'static str, column: C) -> SqlFunctionExpr {
    SqlFunctionExpr {
        name: SmolStr::new_static(name),
        args: vec![Value::Expression(Box::new(column.into_expression()))],
    }
}

pub fn count<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("COUNT", column)
}

pub fn max<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("MAX", column)
}

pub fn min<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("MIN", column)
}

pub fn sum<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("SUM", column)
}

pub fn avg<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("AVG", column)
}

pub fn first<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("FIRST", column)
}

pub fn last<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("LAST", column)
}

pub fn distinct<C: IntoExpression>(column: C) -> SqlFunctionExpr {
    aggregate("DISTINCT", column)
}

pub fn coalesce<I, V>(values: I) -> SqlFunctionExpr
where
    I: IntoIterator<Item = V>,
    V: IntoValue,
{
    SqlFunctionExpr::new(SmolStr::new_static("COALESCE"), values)
}

#[cfg(test)]
mod tests {
    use crate::{col, star, tests::render};

    use super::*;

    #[test]
    fn test_format_aggregates() {
        assert_eq!("COUNT(*)", render(count(star())));
        assert_eq!("MAX(\"age\")", render(max("age")));
        assert_eq!("SUM(\"o\".\"total\")", render(sum(col("o.total"))));
        assert_eq!("AVG(\"a\") AS \"avg_a\"", render(avg("a").as_("avg_a")));
    }

    #[test]
    fn test_format_function_with_literal_args() {
        assert_eq!(
            "COALESCE(\"nick\", 'anonymous')",
            render(coalesce([col("nick").into_value(), "anonymous".into_value()]))
        );
        assert_eq!("COALESCE(NULL, 1)", render(coalesce([Value::Null, Value::I32(1)])));
        assert_eq!("lower('ABC')", render(func("lower", ["ABC"])));
        assert_eq!("now()", render(func("now", Vec::<Value>::new())));
    }

    #[test]
    fn test_function_comparisons() {
        assert_eq!("COUNT(*) > 5", render(count(star()).gt(5)));
    }
}
