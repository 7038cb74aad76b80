use std::{any::type_name, fmt, sync::Arc};

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::{
    adapter::Adapter,
    column_map::ColumnMap,
    dataset::Dataset,
    error::{Error, Result},
    expr::{IntoExpression, count},
    row::{IntoRow, Record},
    star,
    value::Value,
};

/// One materialized result row, keyed by column name.
pub type ResultRow = IndexMap<SmolStr, Value>;

/// The connection the terminal operations of a [`Dataset`] run against.
///
/// Implementations execute the generated sql as is; every statement has
/// already been rendered by [`Database::query_adapter`].
pub trait Database: fmt::Debug + Send + Sync {
    /// Runs a select and appends the rows shaped by `column_map` to `rows`.
    /// Returns whether any row was found.
    fn select(&self, column_map: &ColumnMap, sql: &str, rows: &mut Vec<ResultRow>) -> Result<bool>;

    fn select_into_map(&self, column_map: &ColumnMap, sql: &str) -> Result<Vec<ResultRow>>;

    /// Returns the number of affected rows.
    fn update(&self, sql: &str) -> Result<u64>;

    /// Returns the number of affected rows.
    fn delete(&self, sql: &str) -> Result<u64>;

    fn query_adapter(&self) -> Arc<dyn Adapter>;
}

/// Conversion out of a result value, used by `pluck` and `count`.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value) -> Error {
    Error::query(format!("cannot convert {} into {}", value.kind(), type_name::<T>()))
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch::<i64>(&value))
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mismatch::<i32>(&value))
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::U64(v) => Ok(v),
            ref other => other
                .as_i64()
                .and_then(|v| u64::try_from(v).ok())
                .ok_or_else(|| mismatch::<u64>(other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(v.into()),
            ref other => other
                .as_i64()
                .map(|v| v as f64)
                .ok_or_else(|| mismatch::<f64>(other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            ref other => match other.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(mismatch::<bool>(other)),
            },
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v).map_err(|err| Error::query(err.to_string())),
            ref other => Err(mismatch::<String>(other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl Dataset {
    fn require_database(&self) -> Result<&Arc<dyn Database>> {
        self.database
            .as_ref()
            .ok_or_else(|| Error::configuration("no database configured for dataset"))
    }

    /// Renders with `f`, reporting generation failures as query errors.
    fn query_sql<F>(&self, f: F) -> Result<String>
    where
        F: FnOnce(&Self) -> Result<String>,
    {
        f(self).map_err(|err| Error::query(err.to_string()))
    }

    fn run_select(&self, column_map: &ColumnMap, sql: &str) -> Result<Vec<ResultRow>> {
        let database = self.require_database()?;
        debug!(sql = %sql, "running select");
        let mut rows = Vec::new();
        database
            .select(column_map, sql, &mut rows)
            .inspect_err(|err| debug!(sql = %sql, error = %err, "select failed"))?;
        Ok(rows)
    }

    /// Runs the select and returns its rows shaped by the columns of `R`.
    pub fn query<R: Record + 'static>(&self) -> Result<Vec<ResultRow>> {
        self.require_database()?;
        let sql = self.query_sql(Dataset::sql)?;
        let column_map = self.registry.column_map::<R>();
        self.run_select(&column_map, &sql)
    }

    /// Like [`Dataset::query`] with a limit of one.
    pub fn query_one<R: Record + 'static>(&self) -> Result<Option<ResultRow>> {
        self.require_database()?;
        let sql = self.query_sql(|ds| ds.limit(1).sql())?;
        let column_map = self.registry.column_map::<R>();
        Ok(self.run_select(&column_map, &sql)?.into_iter().next())
    }

    /// `SELECT COUNT(*) AS "count"` over the dataset.
    pub fn count(&self) -> Result<i64> {
        self.require_database()?;
        let sql = self.query_sql(|ds| ds.select(count(star()).as_("count")).limit(1).sql())?;
        let column_map = ColumnMap::single("count", "i64");
        let rows = self.run_select(&column_map, &sql)?;
        match rows.into_iter().next().and_then(|mut row| row.swap_remove("count")) {
            Some(value) => i64::from_value(value),
            None => Ok(0),
        }
    }

    /// Values of a single column, one per result row.
    pub fn pluck<T: FromValue>(&self, column: &str) -> Result<Vec<T>> {
        let database = self.require_database()?;
        let sql = self.select(column.into_expression()).sql()?;
        let column_map = ColumnMap::single(column, type_name::<T>());
        debug!(sql = %sql, column, "running pluck");
        let rows = database
            .select_into_map(&column_map, &sql)
            .inspect_err(|err| debug!(sql = %sql, error = %err, "pluck failed"))?;
        rows.into_iter()
            .map(|mut row| T::from_value(row.swap_remove(column).unwrap_or(Value::Null)))
            .collect()
    }

    /// Runs `UPDATE` with the columns of `row`.
    pub fn update<R: IntoRow>(&self, row: R) -> Result<u64> {
        let database = self.require_database()?;
        let sql = self.update_sql(row)?;
        debug!(sql = %sql, "running update");
        database
            .update(&sql)
            .inspect_err(|err| debug!(sql = %sql, error = %err, "update failed"))
    }

    pub fn delete(&self) -> Result<u64> {
        let database = self.require_database()?;
        let sql = self.delete_sql()?;
        debug!(sql = %sql, "running delete");
        database
            .delete(&sql)
            .inspect_err(|err| debug!(sql = %sql, error = %err, "delete failed"))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use crate::{Dialect, FieldMeta, IntoValue, col, from};

    use super::*;

    #[derive(Debug, Default)]
    struct FakeDatabase {
        statements: Mutex<Vec<String>>,
        rows: Vec<ResultRow>,
        fail: Option<Error>,
        dialect: Dialect,
    }

    impl FakeDatabase {
        fn with_rows(rows: Vec<ResultRow>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                ..Default::default()
            })
        }

        fn record(&self, sql: &str) -> Result<()> {
            self.statements.lock().unwrap().push(sql.to_string());
            match &self.fail {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    impl Database for FakeDatabase {
        fn select(
            &self,
            column_map: &ColumnMap,
            sql: &str,
            rows: &mut Vec<ResultRow>,
        ) -> Result<bool> {
            self.record(sql)?;
            for row in &self.rows {
                rows.push(
                    row.iter()
                        .filter(|(key, _)| column_map.contains(key))
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect(),
                );
            }
            Ok(!self.rows.is_empty())
        }

        fn select_into_map(&self, column_map: &ColumnMap, sql: &str) -> Result<Vec<ResultRow>> {
            let mut rows = Vec::new();
            self.select(column_map, sql, &mut rows)?;
            Ok(rows)
        }

        fn update(&self, sql: &str) -> Result<u64> {
            self.record(sql)?;
            Ok(3)
        }

        fn delete(&self, sql: &str) -> Result<u64> {
            self.record(sql)?;
            Ok(2)
        }

        fn query_adapter(&self) -> Arc<dyn Adapter> {
            Arc::new(self.dialect.adapter())
        }
    }

    struct User;

    impl Record for User {
        const TABLE: &'static str = "users";
        const FIELDS: &'static [FieldMeta] = &[
            FieldMeta::new("id", "id", "i64"),
            FieldMeta::new("name", "name", "String"),
        ];

        fn values(&self) -> Vec<Value> {
            Vec::new()
        }
    }

    fn result_row<const N: usize>(entries: [(&str, Value); N]) -> ResultRow {
        entries
            .into_iter()
            .map(|(key, value)| (SmolStr::new(key), value))
            .collect()
    }

    #[test]
    fn test_query_without_database() {
        let err = from("users").query::<User>().unwrap_err();
        assert!(err.is_configuration());
        assert!(from("users").delete().unwrap_err().is_configuration());
        assert!(from("users").count().unwrap_err().is_configuration());
    }

    #[test]
    fn test_query_shapes_rows() {
        let db = FakeDatabase::with_rows(vec![result_row([
            ("id", 1.into_value()),
            ("name", "ann".into_value()),
            ("extra", true.into_value()),
        ])]);
        let ds = Dataset::for_database(db.clone()).from(User::TABLE);
        let rows = ds.where_(col("id").eq(1)).query::<User>().unwrap();
        assert_eq!(1, rows.len());
        assert_eq!(vec!["id", "name"], rows[0].keys().map(SmolStr::as_str).collect::<Vec<_>>());
        assert_eq!(
            vec!["SELECT * FROM \"users\" WHERE \"id\" = 1".to_string()],
            db.statements()
        );
    }

    #[test]
    fn test_query_one_limits() {
        let db = FakeDatabase::with_rows(Vec::new());
        let row = Dataset::for_database(db.clone())
            .from("users")
            .query_one::<User>()
            .unwrap();
        assert!(row.is_none());
        assert_eq!(vec!["SELECT * FROM \"users\" LIMIT 1".to_string()], db.statements());
    }

    #[test]
    fn test_count() {
        let db = FakeDatabase::with_rows(vec![result_row([("count", 42i64.into_value())])]);
        let count = Dataset::for_database(db.clone()).from("users").count().unwrap();
        assert_eq!(42, count);
        assert_eq!(
            vec!["SELECT COUNT(*) AS \"count\" FROM \"users\" LIMIT 1".to_string()],
            db.statements()
        );
    }

    #[test]
    fn test_pluck() {
        let db = FakeDatabase::with_rows(vec![
            result_row([("name", "ann".into_value())]),
            result_row([("name", Value::Null)]),
        ]);
        let names = Dataset::for_database(db.clone())
            .from("users")
            .pluck::<Option<String>>("name")
            .unwrap();
        assert_eq!(vec![Some("ann".to_string()), None], names);
        assert_eq!(vec!["SELECT \"name\" FROM \"users\"".to_string()], db.statements());

        let err = Dataset::for_database(db).from("users").pluck::<i64>("name").unwrap_err();
        assert_eq!(Error::Query("cannot convert string into i64".into()), err);
    }

    #[test]
    fn test_update_and_delete() {
        let db = FakeDatabase::with_rows(Vec::new());
        let ds = Dataset::for_database(db.clone()).from("users").where_(col("id").eq(7));
        assert_eq!(3, ds.update(HashMap::from([("name", "bob")])).unwrap());
        assert_eq!(2, ds.delete().unwrap());
        assert_eq!(
            vec![
                "UPDATE \"users\" SET \"name\" = 'bob' WHERE \"id\" = 7".to_string(),
                "DELETE FROM \"users\" WHERE \"id\" = 7".to_string(),
            ],
            db.statements()
        );
    }

    #[test]
    fn test_select_generation_failure_is_query_error() {
        let db = FakeDatabase::with_rows(Vec::new());
        let ds = Dataset::for_database(db.clone())
            .from("users")
            .where_(col("id").eq(u64::MAX));
        let expected = Error::Query(
            "encoding error: uint64 values with high bit set are not supported".into(),
        );
        assert_eq!(expected, ds.query::<User>().unwrap_err());
        assert_eq!(expected, ds.query_one::<User>().unwrap_err());
        assert_eq!(expected, ds.count().unwrap_err());
        assert!(db.statements().is_empty());
    }

    #[test]
    fn test_write_generation_failure_passes_through() {
        let db = FakeDatabase::with_rows(Vec::new());
        let ds = Dataset::for_database(db.clone());
        assert_eq!(
            Error::Configuration("no source found when generating delete sql".into()),
            ds.delete().unwrap_err()
        );
        assert!(ds.update(HashMap::from([("name", "bob")])).unwrap_err().is_configuration());
        let err = ds
            .from("users")
            .where_(col("id").eq(u64::MAX))
            .pluck::<String>("name")
            .unwrap_err();
        assert!(err.is_encoding());
        assert!(db.statements().is_empty());
    }

    #[test]
    fn test_database_error_passes_through() {
        let db = Arc::new(FakeDatabase {
            fail: Some(Error::query("connection reset")),
            ..Default::default()
        });
        let err = Dataset::for_database(db).from("users").delete().unwrap_err();
        assert_eq!(Error::Query("connection reset".into()), err);
    }

    #[test]
    fn test_database_adapter_is_used() {
        let db = Arc::new(FakeDatabase {
            dialect: Dialect::MySql,
            ..Default::default()
        });
        let ds = Dataset::for_database(db.clone()).from("users");
        ds.delete().unwrap();
        assert_eq!(vec!["DELETE FROM `users`".to_string()], db.statements());
    }
}
