use darling::{FromDeriveInput, FromField, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(db), supports(struct_named))]
struct RecordInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), RecordField>,
    /// Defaults to the snake_case struct name.
    #[darling(default)]
    table: Option<String>,
}

#[derive(Debug, FromField)]
#[darling(attributes(db))]
struct RecordField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    column: Option<String>,
    #[darling(default)]
    skip: bool,
    #[darling(default)]
    skip_insert: bool,
    #[darling(default)]
    skip_update: bool,
}

impl RecordField {
    fn is_mapped(&self) -> bool {
        !self.skip && self.column.as_deref() != Some("-") && self.column.as_deref() != Some("")
    }
}

pub fn record_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let record = match RecordInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let name = &record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();
    let type_name = name.to_string();
    let table = record
        .table
        .clone()
        .unwrap_or_else(|| type_name.to_snake_case());

    let Some(fields) = record.data.as_ref().take_struct() else {
        return syn::Error::new_spanned(
            name,
            "Record can only be derived for structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let mapped = fields
        .iter()
        .filter(|field| field.is_mapped())
        .filter_map(|field| field.ident.as_ref().map(|ident| (ident, *field)))
        .collect::<Vec<_>>();

    let metas = mapped.iter().map(|(ident, field)| {
        let field_name = ident.to_string();
        let column = field.column.clone().unwrap_or_else(|| field_name.clone());
        let field_type = field.ty.to_token_stream().to_string().replace(' ', "");
        let mut meta = quote! {
            ::datasql::FieldMeta::new(#field_name, #column, #field_type)
        };
        if field.skip_insert {
            meta = quote! { #meta.skip_insert() };
        }
        if field.skip_update {
            meta = quote! { #meta.skip_update() };
        }
        meta
    });

    let values = mapped.iter().map(|(ident, _)| {
        quote! {
            ::datasql::IntoValue::into_value(::core::clone::Clone::clone(&self.#ident))
        }
    });

    quote! {
        impl #impl_generics ::datasql::Record for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const FIELDS: &'static [::datasql::FieldMeta] = &[#(#metas),*];

            fn values(&self) -> ::std::vec::Vec<::datasql::Value> {
                ::std::vec![#(#values),*]
            }
        }

        impl #impl_generics ::datasql::IntoValue for #name #ty_generics #where_clause {
            fn into_value(self) -> ::datasql::Value {
                ::datasql::Value::Record(#type_name)
            }
        }

        impl #impl_generics ::datasql::IntoRow for #name #ty_generics #where_clause {
            fn into_row(self) -> ::datasql::Row {
                ::datasql::Row::record(&self)
            }
        }
    }
    .into()
}
