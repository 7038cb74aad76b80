use crate::{
    dataset::Dataset,
    error::Result,
    row::{IntoRow, RowKind, decompose_insert},
};

impl Dataset {
    /// `INSERT` of one or more rows into the dataset's source.
    ///
    /// Rows are maps or records of one type. A single [`Dataset`] row inserts
    /// the result of that select instead, and no rows at all insert the
    /// dialect's default values.
    pub fn insert_sql<I, R>(&self, rows: I) -> Result<String>
    where
        I: IntoIterator<Item = R>,
        R: IntoRow,
    {
        let from = self.sources("insert")?;
        let rows = rows.into_iter().map(IntoRow::into_row).collect::<Vec<_>>();

        if let [row] = rows.as_slice() {
            if let RowKind::Select(select) = row.kind() {
                return self.render("insert", |w| {
                    let adapter = w.adapter();
                    adapter.insert_begin_sql(w)?;
                    adapter.sources_sql(w, from)?;
                    w.write_char(' ')?;
                    select.write_select(w)?;
                    adapter.returning_sql(w, self.clauses.returning())
                });
            }
        }

        let (columns, values) = decompose_insert(rows)?;
        self.render("insert", |w| {
            let adapter = w.adapter();
            adapter.insert_begin_sql(w)?;
            adapter.sources_sql(w, from)?;
            if columns.is_empty() {
                adapter.default_values_sql(w)?;
            } else {
                adapter.insert_columns_sql(w, &columns)?;
                adapter.insert_values_sql(w, &values)?;
            }
            adapter.returning_sql(w, self.clauses.returning())
        })
    }
}
