use crate::{expr::Expression, ident::IdentifierExpr};

/// `expr AS alias`
#[derive(Debug, Clone)]
pub struct AliasedExpr {
    pub(crate) expr: Box<Expression>,
    pub(crate) alias: IdentifierExpr,
}

impl AliasedExpr {
    pub fn new(expr: Expression, alias: IdentifierExpr) -> Self {
        Self {
            expr: Box::new(expr),
            alias,
        }
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    pub fn alias(&self) -> &IdentifierExpr {
        &self.alias
    }
}
