use std::{
    any::type_name,
    collections::{BTreeMap, HashMap},
    fmt::{self, Display},
};

use indexmap::IndexMap;

use crate::{
    col::ColumnList,
    dataset::Dataset,
    error::{Error, Result},
    expr::{Expression, UpdateExpr},
    ident::IdentifierExpr,
    value::{IntoValue, Value},
};

/// Column metadata of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub field: &'static str,
    /// Empty or `-` keeps the field out of every statement.
    pub column: &'static str,
    pub type_name: &'static str,
    pub skip_insert: bool,
    pub skip_update: bool,
}

impl FieldMeta {
    pub const fn new(field: &'static str, column: &'static str, type_name: &'static str) -> Self {
        Self {
            field,
            column,
            type_name,
            skip_insert: false,
            skip_update: false,
        }
    }

    pub const fn skip_insert(mut self) -> Self {
        self.skip_insert = true;
        self
    }

    pub const fn skip_update(mut self) -> Self {
        self.skip_update = true;
        self
    }

    pub fn is_mapped(&self) -> bool {
        !self.column.is_empty() && self.column != "-"
    }

    pub fn can_insert(&self) -> bool {
        self.is_mapped() && !self.skip_insert
    }

    pub fn can_update(&self) -> bool {
        self.is_mapped() && !self.skip_update
    }
}

/// A struct mapped onto a table, usually through `#[derive(Record)]`.
///
/// `values` yields one value per entry of `FIELDS`, in the same order.
pub trait Record {
    const TABLE: &'static str;
    const FIELDS: &'static [FieldMeta];

    fn values(&self) -> Vec<Value>;
}

#[derive(Debug, Clone)]
pub enum RowKind {
    /// Entries sorted by the text of their key.
    Map(Vec<(String, Value)>),
    Record {
        fields: &'static [FieldMeta],
        values: Vec<Value>,
    },
    /// The rows of an insert-from-select.
    Select(Box<Dataset>),
    /// Anything else; rejected by the statements.
    Scalar(Value),
}

/// A type-erased row handed to INSERT and UPDATE.
#[derive(Debug, Clone)]
pub struct Row {
    type_name: &'static str,
    kind: RowKind,
}

impl Row {
    pub fn new(type_name: &'static str, kind: RowKind) -> Self {
        Self { type_name, kind }
    }

    /// A keyed row; keys are ordered by their text.
    pub fn map<I, K, V>(type_name: &'static str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: IntoValue,
    {
        let mut entries = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.into_value()))
            .collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self::new(type_name, RowKind::Map(entries))
    }

    pub fn record<R: Record>(record: &R) -> Self {
        Self::new(
            type_name::<R>(),
            RowKind::Record {
                fields: R::FIELDS,
                values: record.values(),
            },
        )
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> &RowKind {
        &self.kind
    }
}

pub trait IntoRow {
    fn into_row(self) -> Row;
}

impl IntoRow for Row {
    fn into_row(self) -> Row {
        self
    }
}

impl<K, V, S> IntoRow for HashMap<K, V, S>
where
    K: Display,
    V: IntoValue,
{
    fn into_row(self) -> Row {
        Row::map(type_name::<Self>(), self)
    }
}

impl<K, V> IntoRow for BTreeMap<K, V>
where
    K: Display,
    V: IntoValue,
{
    fn into_row(self) -> Row {
        Row::map(type_name::<Self>(), self)
    }
}

impl<K, V, S> IntoRow for IndexMap<K, V, S>
where
    K: Display,
    V: IntoValue,
{
    fn into_row(self) -> Row {
        Row::map(type_name::<Self>(), self)
    }
}

impl<R: Record> IntoRow for &R {
    fn into_row(self) -> Row {
        Row::record(self)
    }
}

impl IntoRow for Dataset {
    fn into_row(self) -> Row {
        Row::new(type_name::<Dataset>(), RowKind::Select(Box::new(self)))
    }
}

impl IntoRow for Value {
    fn into_row(self) -> Row {
        Row::new(self.kind(), RowKind::Scalar(self))
    }
}

/// `["a","b"]`, the form used in key mismatch errors.
struct KeyList<'a>(&'a [&'a str]);

impl Display for KeyList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, key) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key:?}")?;
        }
        f.write_str("]")
    }
}

fn map_keys(entries: &[(String, Value)]) -> Vec<&str> {
    entries.iter().map(|(key, _)| key.as_str()).collect()
}

fn column(name: &str) -> Expression {
    IdentifierExpr::from_parts([name]).into()
}

/// Splits insert rows into one column list and a value tuple per row.
///
/// The first row fixes the type and the column set; every later row must
/// match both.
pub(crate) fn decompose_insert(rows: Vec<Row>) -> Result<(ColumnList, Vec<Vec<Value>>)> {
    let Some(first) = rows.first() else {
        return Ok((ColumnList::default(), Vec::new()));
    };
    let expected_type = first.type_name;

    let columns: ColumnList = match &first.kind {
        RowKind::Map(entries) => map_keys(entries).into_iter().map(column).collect(),
        RowKind::Record { fields, .. } => fields
            .iter()
            .filter(|meta| meta.can_insert())
            .map(|meta| column(meta.column))
            .collect(),
        RowKind::Select(_) | RowKind::Scalar(_) => {
            return Err(Error::shape(format!(
                "unsupported insert must be map or record type {expected_type}"
            )));
        }
    };

    let canonical: Vec<String> = match &first.kind {
        RowKind::Map(entries) => entries.iter().map(|(key, _)| key.clone()).collect(),
        _ => Vec::new(),
    };
    let mut values: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.type_name != expected_type {
            return Err(Error::shape(format!(
                "rows must be all the same type expected {expected_type} got {}",
                row.type_name
            )));
        }
        match row.kind {
            RowKind::Map(entries) => {
                let keys = map_keys(&entries);
                if !canonical.iter().map(String::as_str).eq(keys.iter().copied()) {
                    let expected = canonical.iter().map(String::as_str).collect::<Vec<_>>();
                    return Err(Error::shape(format!(
                        "rows with different keys expected {} got {}",
                        KeyList(&expected),
                        KeyList(&keys)
                    )));
                }
                values.push(entries.into_iter().map(|(_, value)| value).collect());
            }
            RowKind::Record { fields, values: row_values } => {
                check_record_len(row.type_name, fields, &row_values)?;
                values.push(
                    fields
                        .iter()
                        .zip(row_values)
                        .filter(|(meta, _)| meta.can_insert())
                        .map(|(_, value)| value)
                        .collect(),
                );
            }
            RowKind::Select(_) | RowKind::Scalar(_) => {
                return Err(Error::shape(format!(
                    "unsupported insert must be map or record type {}",
                    row.type_name
                )));
            }
        }
    }

    Ok((columns, values))
}

fn check_record_len(type_name: &str, fields: &[FieldMeta], values: &[Value]) -> Result<()> {
    if fields.len() != values.len() {
        return Err(Error::shape(format!(
            "record {type_name} has {} fields but {} values",
            fields.len(),
            values.len()
        )));
    }
    Ok(())
}

/// `column = value` pairs of an update row, in column order.
pub(crate) fn decompose_update(row: Row) -> Result<Vec<UpdateExpr>> {
    match row.kind {
        RowKind::Map(entries) => Ok(entries
            .into_iter()
            .map(|(key, value)| UpdateExpr::new(IdentifierExpr::from_parts([key.as_str()]), value))
            .collect()),
        RowKind::Record { fields, values } => {
            check_record_len(row.type_name, fields, &values)?;
            Ok(fields
                .iter()
                .zip(values)
                .filter(|(meta, _)| meta.can_update())
                .map(|(meta, value)| {
                    UpdateExpr::new(IdentifierExpr::from_parts([meta.column]), value)
                })
                .collect())
        }
        RowKind::Select(_) | RowKind::Scalar(_) => Err(Error::shape(format!(
            "unsupported update interface type {}",
            row.type_name
        ))),
    }
}
