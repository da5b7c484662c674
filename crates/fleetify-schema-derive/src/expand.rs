use fleetify_schema::attributes::{ColumnAttr, ModelAttr};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields};

pub(crate) fn model(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            ident,
            "Model can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "Model can only be derived for structs with named fields",
        ));
    };

    let table = ModelAttr::from_attrs(&input.attrs)?
        .table
        .unwrap_or_else(|| ident.to_string().to_snake_case());
    if !fleetify_schema::is_valid_identifier(&table) {
        return Err(Error::new_spanned(
            ident,
            format!("table name '{table}' is not a valid SQL identifier"),
        ));
    }

    let mut inserts = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let Some(column) = ColumnAttr::from_attrs(&field.attrs)? else {
            continue;
        };
        if !column.is_persisted() {
            continue;
        }
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let name = column.name;
        inserts.push(quote! {
            row.insert(
                #name,
                ::fleetify_schema::ToSeedValue::to_seed_value(&self.#field_ident),
            );
        });
    }

    Ok(quote! {
        impl #impl_generics ::fleetify_schema::Model for #ident #ty_generics #where_clause {
            const TABLE: &'static str = #table;

            fn to_row(&self) -> ::fleetify_schema::SeedRow {
                let mut row = ::fleetify_schema::SeedRow::new();
                #(#inserts)*
                row
            }
        }
    })
}
