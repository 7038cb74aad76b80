use tracing::trace;

use crate::{
    col::ColumnList,
    dataset::Dataset,
    error::{Error, Result},
    row::{IntoRow, decompose_update},
    writer::SqlWriter,
};

/// Options of a `TRUNCATE` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruncateOptions {
    pub cascade: bool,
    pub restrict: bool,
    /// `restart` or `continue`, rendered as `RESTART IDENTITY`.
    pub identity: Option<String>,
}

impl Dataset {
    /// Renders the fragments written by `f` with this dataset's adapter.
    pub(crate) fn render<F>(&self, statement: &'static str, f: F) -> Result<String>
    where
        F: FnOnce(&mut SqlWriter<'_>) -> Result<()>,
    {
        let mut buf = String::with_capacity(64);
        let mut w = SqlWriter::new(&mut buf, self.adapter.as_ref());
        f(&mut w)?;
        trace!(statement, sql = %buf, "generated sql");
        Ok(buf)
    }

    /// The configured sources, required by every statement except SELECT.
    pub(crate) fn sources(&self, statement: &str) -> Result<&ColumnList> {
        match self.clauses.from() {
            Some(from) if !from.is_empty() => Ok(from),
            _ => Err(Error::configuration(format!(
                "no source found when generating {statement} sql"
            ))),
        }
    }

    /// `SELECT` built from the clause set.
    pub fn sql(&self) -> Result<String> {
        self.render("select", |w| self.write_select(w))
    }

    /// Writes the select statement through the writer's adapter, which is how
    /// sub-selects and compound members follow the enclosing dialect.
    pub fn write_select(&self, w: &mut SqlWriter<'_>) -> Result<()> {
        let adapter = w.adapter();
        let c = &*self.clauses;
        match c.select_distinct() {
            Some(distinct) => adapter.select_distinct_sql(w, distinct)?,
            None => adapter.select_sql(w, c.select())?,
        }
        adapter.from_sql(w, c.from())?;
        adapter.join_sql(w, c.joins())?;
        adapter.where_sql(w, c.where_())?;
        adapter.group_by_sql(w, c.group_by())?;
        adapter.having_sql(w, c.having())?;
        adapter.compounds_sql(w, c.compounds())?;
        adapter.order_sql(w, c.order())?;
        adapter.limit_sql(w, c.limit())?;
        adapter.offset_sql(w, c.offset())
    }

    /// `UPDATE` setting the columns of `row`, a map or a record.
    pub fn update_sql<R: IntoRow>(&self, row: R) -> Result<String> {
        let from = self.sources("update")?;
        let updates = decompose_update(row.into_row())?;
        self.render("update", |w| {
            let adapter = w.adapter();
            let c = &*self.clauses;
            adapter.update_begin_sql(w)?;
            adapter.sources_sql(w, from)?;
            adapter.update_expressions_sql(w, &updates)?;
            adapter.where_sql(w, c.where_())?;
            adapter.returning_sql(w, c.returning())
        })
    }

    pub fn delete_sql(&self) -> Result<String> {
        self.sources("delete")?;
        self.render("delete", |w| {
            let adapter = w.adapter();
            let c = &*self.clauses;
            adapter.delete_begin_sql(w)?;
            adapter.from_sql(w, c.from())?;
            adapter.where_sql(w, c.where_())?;
            adapter.returning_sql(w, c.returning())
        })
    }

    pub fn truncate_sql(&self) -> Result<String> {
        self.truncate_with_opts_sql(&TruncateOptions::default())
    }

    pub fn truncate_with_opts_sql(&self, options: &TruncateOptions) -> Result<String> {
        let from = self.sources("truncate")?;
        self.render("truncate", |w| {
            let adapter = w.adapter();
            adapter.truncate_sql(w, from, options)
        })
    }
}
