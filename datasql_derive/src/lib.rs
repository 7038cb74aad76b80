use proc_macro::TokenStream;

mod record;

/// Implements `datasql::Record` for a struct with named fields.
///
/// Container attribute `#[db(table = "...")]` names the table. Field
/// attributes: `#[db(column = "...")]` renames the column (`"-"` drops the
/// field), `#[db(skip)]` drops it, `#[db(skip_insert)]` and
/// `#[db(skip_update)]` keep it out of one statement kind only.
#[proc_macro_derive(Record, attributes(db))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    record::record_derive_impl(input)
}
