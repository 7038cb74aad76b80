use crate::{
    error::{Error, Result},
    expr::Expression,
    value::Value,
    writer::SqlWriter,
};

impl SqlWriter<'_> {
    /// Renders `value` as a literal of the writer's dialect.
    ///
    /// This is the only place a runtime value turns into sql text. It recurses
    /// into list elements, converted valuers and embedded expressions.
    pub fn literal(&mut self, value: &Value) -> Result<()> {
        let adapter = self.adapter;
        match value {
            Value::Valuer(valuer) => {
                let converted = valuer
                    .sql_value()
                    .map_err(|err| Error::encoding(err.to_string()))?;
                self.literal(&converted)
            }
            Value::Null => adapter.literal_nil(self),
            Value::Bytes(bytes) => adapter.literal_string(self, &String::from_utf8_lossy(bytes)),
            Value::List(values) => match byte_string(values) {
                Some(bytes) => adapter.literal_string(self, &String::from_utf8_lossy(&bytes)),
                None => adapter.slice_value_sql(self, values),
            },
            Value::Time(time) => adapter.literal_time(self, time),
            Value::Expression(expr) => self.expression(expr),
            Value::Record(name) => {
                Err(Error::encoding(format!("unable to encode value of type {name}")))
            }
            Value::I8(v) => adapter.literal_int(self, i64::from(*v)),
            Value::I16(v) => adapter.literal_int(self, i64::from(*v)),
            Value::I32(v) => adapter.literal_int(self, i64::from(*v)),
            Value::I64(v) => adapter.literal_int(self, *v),
            Value::U8(v) => adapter.literal_int(self, i64::from(*v)),
            Value::U16(v) => adapter.literal_int(self, i64::from(*v)),
            Value::U32(v) => adapter.literal_int(self, i64::from(*v)),
            Value::U64(v) => match i64::try_from(*v) {
                Ok(v) => adapter.literal_int(self, v),
                Err(_) => Err(Error::encoding(
                    "uint64 values with high bit set are not supported",
                )),
            },
            // go through the shortest decimal form so 0.1f32 stays 0.1
            Value::F32(v) => {
                let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(*v));
                self.float(widened)
            }
            Value::F64(v) => self.float(*v),
            Value::String(s) => adapter.literal_string(self, s),
            Value::Bool(b) => adapter.literal_bool(self, *b),
        }
    }

    fn float(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::encoding(format!("unable to encode non finite float {value}")));
        }
        let adapter = self.adapter;
        adapter.literal_float(self, value)
    }

    /// Hands `expr` to the adapter method for its variant.
    pub fn expression(&mut self, expr: &Expression) -> Result<()> {
        let adapter = self.adapter;
        match expr {
            Expression::Identifier(ident) => adapter.quote_identifier(self, ident),
            Expression::Literal(literal) => adapter.literal_expression_sql(self, literal),
            Expression::Boolean(boolean) => adapter.boolean_expression_sql(self, boolean),
            Expression::Ordered(ordered) => adapter.ordered_expression_sql(self, ordered),
            Expression::Aliased(aliased) => adapter.aliased_expression_sql(self, aliased),
            Expression::Cast(cast) => adapter.cast_expression_sql(self, cast),
            Expression::Function(function) => adapter.sql_function_expression_sql(self, function),
            Expression::ColumnList(columns) => adapter.column_list_sql(self, columns),
            Expression::ExpressionList(list) => adapter.expression_list_sql(self, list),
            Expression::Update(update) => adapter.update_expression_sql(self, update),
            Expression::Compound(compound) => adapter.compound_expression_sql(self, compound),
            Expression::Dataset(dataset) => adapter.sub_select_sql(self, dataset),
        }
    }
}

/// A non empty list made only of `u8` values is a byte string.
fn byte_string(values: &[Value]) -> Option<Vec<u8>> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .map(|value| match value {
            Value::U8(b) => Some(*b),
            _ => None,
        })
        .collect()
}
