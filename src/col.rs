use crate::{
    expr::{Expression, IntoExpression},
    value::{IntoValue, Value},
};

/// Comma separated expressions, as used by SELECT, FROM, GROUP BY and RETURNING.
#[derive(Debug, Clone, Default)]
pub struct ColumnList {
    pub(crate) columns: Vec<Expression>,
}

impl ColumnList {
    pub fn new(columns: Vec<Expression>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Expression] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn push(&mut self, column: Expression) {
        self.columns.push(column);
    }

    /// Returns a new list with `other` appended after the existing columns.
    pub fn append<C: IntoColumns>(&self, other: C) -> Self {
        let mut ret = self.clone();
        ret.columns.extend(other.into_columns().columns);
        ret
    }
}

impl From<ColumnList> for Expression {
    fn from(value: ColumnList) -> Self {
        Expression::ColumnList(value)
    }
}

impl IntoValue for ColumnList {
    fn into_value(self) -> Value {
        Value::Expression(Box::new(Expression::ColumnList(self)))
    }
}

impl FromIterator<Expression> for ColumnList {
    fn from_iter<I: IntoIterator<Item = Expression>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

pub trait IntoColumns {
    fn into_columns(self) -> ColumnList;
}

impl IntoColumns for ColumnList {
    fn into_columns(self) -> ColumnList {
        self
    }
}

impl IntoColumns for () {
    fn into_columns(self) -> ColumnList {
        ColumnList::default()
    }
}

impl<T> IntoColumns for T
where
    T: IntoExpression,
{
    fn into_columns(self) -> ColumnList {
        ColumnList::new(vec![self.into_expression()])
    }
}

impl<T, const N: usize> IntoColumns for [T; N]
where
    T: IntoExpression,
{
    fn into_columns(self) -> ColumnList {
        self.into_iter().map(IntoExpression::into_expression).collect()
    }
}

impl<T> IntoColumns for Vec<T>
where
    T: IntoExpression,
{
    fn into_columns(self) -> ColumnList {
        self.into_iter().map(IntoExpression::into_expression).collect()
    }
}

/// Builds a [`ColumnList`] from expressions of different types.
///
/// ```
/// use datasql::{cols, count, star};
///
/// let list = cols!["id", count(star()).as_("total")];
/// assert_eq!(2, list.len());
/// ```
#[macro_export]
macro_rules! cols {
    () => {
        $crate::ColumnList::default()
    };
    ( $($col:expr),+ $(,)? ) => {
        $crate::ColumnList::new(vec![$( $crate::IntoExpression::into_expression($col) ),+])
    };
}
