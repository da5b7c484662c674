//! Column descriptor extraction from model source.
//!
//! A model file is parsed with `syn` and the struct deriving `Model` is
//! walked field by field. Each field carrying a `#[column("name", ...)]`
//! annotation becomes a [`ColumnDescriptor`], except the primary identifier
//! (`<table>_id`) and the audit timestamps, which generated DDL always emits
//! itself.

use crate::attributes::{ColumnAttr, ModelAttr, derives_model};
use crate::error::SchemaError;
use crate::sql_type::SqlType;

/// Column recording when a row was created.
pub const CREATED_TIMESTAMP_COLUMN: &str = "created_timestamp";

/// Column recording when a row was last updated.
pub const UPDATED_TIMESTAMP_COLUMN: &str = "updated_timestamp";

/// Both audit timestamp columns, in DDL order.
pub const AUDIT_COLUMNS: [&str; 2] = [CREATED_TIMESTAMP_COLUMN, UPDATED_TIMESTAMP_COLUMN];

/// Returns the primary identifier column for `table` (`<table>_id`).
///
/// # Examples
///
/// ```
/// use fleetify_schema::id_column_for;
///
/// assert_eq!(id_column_for("Items"), "items_id");
/// ```
#[must_use]
pub fn id_column_for(table: &str) -> String {
    format!("{}_id", table.to_lowercase())
}

/// One column derived from a model field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    sql_type: SqlType,
    not_null: bool,
    unique: bool,
}

impl ColumnDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: String, sql_type: SqlType, not_null: bool, unique: bool) -> Self {
        Self {
            name,
            sql_type,
            not_null,
            unique,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Whether the column carries `NOT NULL`.
    #[must_use]
    pub const fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// Whether the column carries `UNIQUE`.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Renders `name TYPE[ NOT NULL][ UNIQUE]`.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut definition = format!("{} {}", self.name, self.sql_type);
        if self.not_null {
            definition.push_str(" NOT NULL");
        }
        if self.unique {
            definition.push_str(" UNIQUE");
        }
        definition
    }
}

/// Ordered column list for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    struct_name: String,
    table: String,
    columns: Vec<ColumnDescriptor>,
}

impl ModelDescriptor {
    /// Name of the Rust struct the columns came from.
    #[must_use]
    pub fn struct_name(&self) -> &str {
        &self.struct_name
    }

    /// Table the descriptor was extracted for.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Developer-authored columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns `true` when the model declares no extra columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Extracts the column descriptors for `table` from model source text.
///
/// The struct chosen is the one deriving `Model` whose `#[model(table)]`
/// matches `table`; when no struct names a table explicitly, the first
/// struct deriving `Model` is used.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] when the source is not valid Rust,
/// [`SchemaError::ModelNotFound`] when no suitable struct exists, and
/// [`SchemaError::InvalidAnnotation`] for malformed annotations. Nothing is
/// returned on failure.
pub fn extract_descriptor(source: &str, table: &str) -> Result<ModelDescriptor, SchemaError> {
    let file = syn::parse_file(source).map_err(|err| SchemaError::parse(err.to_string()))?;
    let table = table.to_lowercase();

    let item = select_model_struct(&file, &table)?.ok_or_else(|| SchemaError::ModelNotFound {
        table: table.clone(),
    })?;

    let syn::Fields::Named(fields) = &item.fields else {
        return Err(SchemaError::InvalidAnnotation {
            field: item.ident.to_string(),
            message: "models must use named fields".to_owned(),
        });
    };

    let id_column = id_column_for(&table);
    let mut columns = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let field_name = field
            .ident
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        let attr = ColumnAttr::from_attrs(&field.attrs).map_err(|err| {
            SchemaError::InvalidAnnotation {
                field: field_name.clone(),
                message: err.to_string(),
            }
        })?;
        let Some(attr) = attr.filter(ColumnAttr::is_persisted) else {
            continue;
        };
        if attr.name == id_column || AUDIT_COLUMNS.contains(&attr.name.as_str()) {
            continue;
        }
        columns.push(ColumnDescriptor::new(
            attr.name,
            SqlType::from_type(&field.ty),
            attr.not_null,
            attr.unique,
        ));
    }

    Ok(ModelDescriptor {
        struct_name: item.ident.to_string(),
        table,
        columns,
    })
}

fn select_model_struct<'a>(
    file: &'a syn::File,
    table: &str,
) -> Result<Option<&'a syn::ItemStruct>, SchemaError> {
    let mut fallback = None;
    for item in &file.items {
        let syn::Item::Struct(item) = item else {
            continue;
        };
        if !derives_model(&item.attrs) {
            continue;
        }
        let model = ModelAttr::from_attrs(&item.attrs).map_err(|err| {
            SchemaError::InvalidAnnotation {
                field: item.ident.to_string(),
                message: err.to_string(),
            }
        })?;
        match model.table {
            Some(name) if name.eq_ignore_ascii_case(table) => return Ok(Some(item)),
            Some(_) => {}
            None => {
                if fallback.is_none() {
                    fallback = Some(item);
                }
            }
        }
    }
    Ok(fallback)
}
