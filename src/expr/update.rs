use crate::{ident::IdentifierExpr, value::Value};

/// `column = value` inside `UPDATE ... SET`.
#[derive(Debug, Clone)]
pub struct UpdateExpr {
    pub(crate) column: IdentifierExpr,
    pub(crate) value: Value,
}

impl UpdateExpr {
    pub fn new(column: IdentifierExpr, value: Value) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &IdentifierExpr {
        &self.column
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}
