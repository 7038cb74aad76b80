use crate::{expr::Expression, raw::LiteralExpr};

/// `CAST(expr AS type)`
#[derive(Debug, Clone)]
pub struct CastExpr {
    pub(crate) expr: Box<Expression>,
    pub(crate) ty: LiteralExpr,
}

impl CastExpr {
    pub fn new(expr: Expression, ty: &str) -> Self {
        Self {
            expr: Box::new(expr),
            ty: LiteralExpr::new(ty),
        }
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    pub fn ty(&self) -> &LiteralExpr {
        &self.ty
    }
}

#[cfg(test)]
mod tests {
    use crate::{col, tests::render};

    #[test]
    fn test_format_cast() {
        assert_eq!("CAST(\"price\" AS NUMERIC)", render(col("price").cast("NUMERIC")));
        assert_eq!(
            "CAST(\"price\" AS TEXT) = '1'",
            render(col("price").cast("TEXT").eq("1"))
        );
    }
}
