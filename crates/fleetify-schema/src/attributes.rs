//! Parsing of the `#[model(...)]` and `#[column(...)]` annotations.
//!
//! Both descriptor extraction and the `Model` derive read the same
//! annotations, so the grammar lives here once:
//!
//! ```text
//! #[model(table = "purchasings")]
//! #[column("grand_total", not_null)]
//! #[column("email", not_null, unique)]
//! ```
//!
//! The first argument of `#[column]` is the column name. `notnull` is
//! accepted as an alias for `not_null`.

use syn::parse::{Parse, ParseStream};

mod kw {
    syn::custom_keyword!(not_null);
    syn::custom_keyword!(notnull);
    syn::custom_keyword!(unique);
    syn::custom_keyword!(table);
}

/// Parsed `#[column(...)]` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttr {
    /// Column name; empty names mark the field as not persisted.
    pub name: String,
    /// `NOT NULL` marker.
    pub not_null: bool,
    /// `UNIQUE` marker.
    pub unique: bool,
}

impl ColumnAttr {
    /// Finds and parses the `#[column]` annotation among `attrs`.
    ///
    /// Returns `Ok(None)` when the field carries no annotation.
    ///
    /// # Errors
    ///
    /// Returns the `syn` error for a malformed or duplicated annotation.
    pub fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Option<Self>> {
        let mut found: Option<Self> = None;
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("column")) {
            if found.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[column] attribute"));
            }
            found = Some(attr.parse_args()?);
        }
        Ok(found)
    }

    /// Returns `true` when the annotation names a real column.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl Parse for ColumnAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: syn::LitStr = input.parse()?;
        let mut result = Self {
            name: name.value().trim().to_owned(),
            not_null: false,
            unique: false,
        };

        while !input.is_empty() {
            let _comma: syn::Token![,] = input.parse()?;
            if input.is_empty() {
                break;
            }
            let lookahead = input.lookahead1();
            if lookahead.peek(kw::not_null) {
                let _kw: kw::not_null = input.parse()?;
                result.not_null = true;
            } else if lookahead.peek(kw::notnull) {
                let _kw: kw::notnull = input.parse()?;
                result.not_null = true;
            } else if lookahead.peek(kw::unique) {
                let _kw: kw::unique = input.parse()?;
                result.unique = true;
            } else {
                return Err(lookahead.error());
            }
        }

        Ok(result)
    }
}

/// Parsed `#[model(...)]` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAttr {
    /// Explicit table name, when given.
    pub table: Option<String>,
}

impl ModelAttr {
    /// Finds and parses the `#[model]` annotation among `attrs`.
    ///
    /// # Errors
    ///
    /// Returns the `syn` error for a malformed annotation.
    pub fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("model")) {
            let parsed: Self = attr.parse_args()?;
            if parsed.table.is_some() {
                result.table = parsed.table;
            }
        }
        Ok(result)
    }
}

impl Parse for ModelAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let _kw: kw::table = input.parse()?;
        let _eq: syn::Token![=] = input.parse()?;
        let table: syn::LitStr = input.parse()?;
        if !input.is_empty() {
            let _comma: syn::Token![,] = input.parse()?;
        }
        Ok(Self {
            table: Some(table.value()),
        })
    }
}

/// Returns `true` when `attrs` contain a `#[derive(...)]` listing `Model`.
///
/// Both `Model` and a path ending in `Model` (for example
/// `fleetify_schema_derive::Model`) are recognised.
#[must_use]
pub fn derives_model(attrs: &[syn::Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .any(|attr| {
            let mut found = false;
            let parsed = attr.parse_nested_meta(|meta| {
                if meta
                    .path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == "Model")
                {
                    found = true;
                }
                Ok(())
            });
            parsed.is_ok() && found
        })
}
