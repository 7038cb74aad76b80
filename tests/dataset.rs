use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    thread,
};

use datasql::{
    Adapter, ColumnMap, Database, Dataset, Dialect, DialectAdapter, DialectOptions, Error,
    ResultRow, TruncateOptions, Value, col, cols, count, from, lit, on, or, star, using,
};

#[test]
fn select_round_trip() {
    let ds = from("orders as o")
        .select(cols!["o.id", col("o.total").as_("amount"), count(star()).as_("n")])
        .inner_join("customers as c", on(col("c.id").eq(col("o.customer_id"))))
        .where_([col("o.total").gt(100), col("c.country").in_(["NL", "BE"])])
        .group_by(["o.id", "o.total"])
        .having(count(star()).gte(2))
        .order([col("n").desc(), col("o.id").asc()])
        .limit(20)
        .offset(40);
    assert_eq!(
        concat!(
            "SELECT \"o\".\"id\", \"o\".\"total\" AS \"amount\", COUNT(*) AS \"n\" ",
            "FROM \"orders\" AS \"o\" ",
            "INNER JOIN \"customers\" AS \"c\" ON (\"c\".\"id\" = \"o\".\"customer_id\") ",
            "WHERE \"o\".\"total\" > 100 AND \"c\".\"country\" IN ('NL', 'BE') ",
            "GROUP BY \"o\".\"id\", \"o\".\"total\" ",
            "HAVING COUNT(*) >= 2 ",
            "ORDER BY \"n\" DESC, \"o\".\"id\" ASC ",
            "LIMIT 20 OFFSET 40"
        ),
        ds.sql().unwrap()
    );
}

#[test]
fn mutators_never_touch_the_receiver() {
    let base = from("users").where_(col("active").is_true());
    let before = base.sql().unwrap();
    let _ = base
        .select(["id"])
        .where_(col("age").gt(1))
        .order("id")
        .limit(3)
        .left_join("roles", using("role_id"));
    assert_eq!(before, base.sql().unwrap());
}

#[test]
fn datasets_are_shared_across_threads() {
    let base = from("events").where_(col("kind").eq("click"));
    let rendered = thread::scope(|scope| {
        (0..4)
            .map(|n| {
                let base = &base;
                scope.spawn(move || base.limit(n + 1).sql().unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(
        "SELECT * FROM \"events\" WHERE \"kind\" = 'click' LIMIT 3",
        rendered[2]
    );
    assert_eq!("SELECT * FROM \"events\" WHERE \"kind\" = 'click'", base.sql().unwrap());
}

#[test]
fn compounds_and_sub_selects() {
    let recent = from("posts").where_(col("created_at").gt(lit("NOW() - INTERVAL '1 day'")));
    let pinned = from("posts").where_(col("pinned").is_true()).order("id").limit(5);
    let ds = recent.union_all(pinned);
    assert_eq!(
        concat!(
            "SELECT * FROM \"posts\" WHERE \"created_at\" > NOW() - INTERVAL '1 day' ",
            "UNION ALL (SELECT * FROM (SELECT * FROM \"posts\" WHERE \"pinned\" IS TRUE ORDER BY \"id\" ASC LIMIT 5) AS \"t1\")"
        ),
        ds.sql().unwrap()
    );

    let authors = from("users").select("id").where_(col("banned").is_false());
    let ds = from("posts").where_(or([col("author_id").in_(authors), col("author_id").is_null()]));
    assert_eq!(
        "SELECT * FROM \"posts\" WHERE (\"author_id\" IN (SELECT \"id\" FROM \"users\" WHERE \"banned\" IS FALSE) OR \"author_id\" IS NULL)",
        ds.sql().unwrap()
    );
}

#[test]
fn dialect_presets() {
    let ds = from("users").where_([col("name").eq("it's"), col("ok").eq(true)]);
    assert_eq!(
        "SELECT * FROM \"users\" WHERE \"name\" = 'it''s' AND \"ok\" IS TRUE",
        ds.with_adapter(Dialect::Postgres.adapter()).sql().unwrap()
    );
    assert_eq!(
        "SELECT * FROM `users` WHERE `name` = 'it''s' AND `ok` IS TRUE",
        ds.with_adapter(Dialect::MySql.adapter()).sql().unwrap()
    );
    assert_eq!(
        "SELECT * FROM \"users\" WHERE \"name\" = 'it''s' AND \"ok\" IS 1",
        ds.with_adapter(Dialect::Sqlite.adapter()).sql().unwrap()
    );
}

#[test]
fn custom_dialect_options() {
    let options = DialectOptions::default().booleans("yes", "no").supports_returning(false);
    let adapter = DialectAdapter::with_options(Dialect::Default, options);
    let ds = from("flags").with_adapter(adapter).returning("id");
    assert_eq!("no", ds.literal(false).unwrap());
    assert!(matches!(ds.delete_sql(), Err(Error::Adapter(_))));
}

#[test]
fn truncate_options() {
    let options = TruncateOptions {
        cascade: true,
        identity: Some("restart".into()),
        ..Default::default()
    };
    assert_eq!(
        "TRUNCATE \"a\", \"b\" RESTART IDENTITY CASCADE",
        from(["a", "b"]).truncate_with_opts_sql(&options).unwrap()
    );
    assert!(
        from("a")
            .with_adapter(Dialect::Sqlite.adapter())
            .truncate_sql()
            .is_err()
    );
}

#[test]
fn map_rows_sort_their_keys() {
    let rows = [BTreeMap::from([("name", Value::String("x".into())), ("age", Value::I32(2))])];
    let sql = from("people").insert_sql(rows).unwrap();
    assert_eq!("INSERT INTO \"people\" (\"age\", \"name\") VALUES (2, 'x')", sql);
}

#[derive(Debug, Default)]
struct Recorder {
    statements: Mutex<Vec<String>>,
}

impl Database for Recorder {
    fn select(&self, _: &ColumnMap, sql: &str, rows: &mut Vec<ResultRow>) -> datasql::Result<bool> {
        self.statements.lock().unwrap().push(sql.to_string());
        rows.push(ResultRow::from([("count".into(), Value::I64(9))]));
        Ok(true)
    }

    fn select_into_map(&self, _: &ColumnMap, sql: &str) -> datasql::Result<Vec<ResultRow>> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(Vec::new())
    }

    fn update(&self, sql: &str) -> datasql::Result<u64> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(1)
    }

    fn delete(&self, sql: &str) -> datasql::Result<u64> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(1)
    }

    fn query_adapter(&self) -> Arc<dyn Adapter> {
        Arc::new(Dialect::Postgres.adapter())
    }
}

#[test]
fn terminal_operations_use_the_database() {
    let db = Arc::new(Recorder::default());
    let ds = Dataset::for_database(db.clone()).from("users");
    assert_eq!(9, ds.count().unwrap());
    assert!(ds.pluck::<String>("name").unwrap().is_empty());
    assert_eq!(1, ds.where_(col("id").eq(1)).delete().unwrap());
    assert_eq!(
        vec![
            "SELECT COUNT(*) AS \"count\" FROM \"users\" LIMIT 1".to_string(),
            "SELECT \"name\" FROM \"users\"".to_string(),
            "DELETE FROM \"users\" WHERE \"id\" = 1".to_string(),
        ],
        *db.statements.lock().unwrap()
    );
}
