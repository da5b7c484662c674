//! Seed values, rows and the `Model` trait.
//!
//! A seed record is flattened into a [`SeedRow`]: an insertion-ordered map
//! from column name to [`SeedValue`]. Only fields annotated with
//! `#[column]` appear in the row, in declaration order.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::descriptor::id_column_for;

/// A single column value in a seed row.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedValue {
    /// SQL `NULL`; treated as missing by the seeder.
    Null,
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Numeric value.
    Numeric(f64),
    /// Boolean value.
    Bool(bool),
    /// Timestamp value.
    Timestamp(DateTime<Utc>),
    /// JSON document.
    Json(serde_json::Value),
    /// UUID value.
    Uuid(Uuid),
}

impl SeedValue {
    /// Returns `true` for `Null` and empty text.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleetify_schema::SeedValue;
    ///
    /// assert!(SeedValue::Null.is_missing());
    /// assert!(SeedValue::Text(String::new()).is_missing());
    /// assert!(!SeedValue::Integer(0).is_missing());
    /// ```
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Column name to value mapping for one seed record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedRow {
    values: IndexMap<String, SeedValue>,
}

impl SeedRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, keeping its original position when it already exists.
    pub fn insert(&mut self, column: impl Into<String>, value: SeedValue) {
        self.values.insert(column.into(), value);
    }

    /// Builder-style [`SeedRow::insert`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl ToSeedValue) -> Self {
        self.insert(column, value.to_seed_value());
        self
    }

    /// Returns the value stored for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SeedValue> {
        self.values.get(column)
    }

    /// Returns a mutable reference to the value stored for `column`.
    pub fn get_mut(&mut self, column: &str) -> Option<&mut SeedValue> {
        self.values.get_mut(column)
    }

    /// Returns `true` when `column` is absent, `Null` or empty text.
    #[must_use]
    pub fn is_missing(&self, column: &str) -> bool {
        self.values.get(column).is_none_or(SeedValue::is_missing)
    }

    /// Iterates over columns and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeedValue)> {
        self.values
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Iterates mutably over columns and values in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SeedValue)> {
        self.values
            .iter_mut()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Conversion of a field value into a [`SeedValue`].
pub trait ToSeedValue {
    /// Converts the value.
    fn to_seed_value(&self) -> SeedValue;
}

impl<T: ToSeedValue + ?Sized> ToSeedValue for &T {
    fn to_seed_value(&self) -> SeedValue {
        (**self).to_seed_value()
    }
}

impl<T: ToSeedValue> ToSeedValue for Option<T> {
    fn to_seed_value(&self) -> SeedValue {
        self.as_ref().map_or(SeedValue::Null, ToSeedValue::to_seed_value)
    }
}

impl ToSeedValue for SeedValue {
    fn to_seed_value(&self) -> SeedValue {
        self.clone()
    }
}

impl ToSeedValue for str {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Text(self.to_owned())
    }
}

impl ToSeedValue for String {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Text(self.clone())
    }
}

macro_rules! integer_seed_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSeedValue for $ty {
                fn to_seed_value(&self) -> SeedValue {
                    SeedValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_seed_value!(i8, i16, i32, i64, u8, u16, u32);

/// Wide integers that only sometimes fit in `i64`. Values out of range are
/// carried as their decimal text and rejected by the database on insert.
macro_rules! wide_integer_seed_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSeedValue for $ty {
                fn to_seed_value(&self) -> SeedValue {
                    i64::try_from(*self)
                        .map_or_else(|_| SeedValue::Text(self.to_string()), SeedValue::Integer)
                }
            }
        )*
    };
}

wide_integer_seed_value!(i128, isize, u64, u128, usize);

impl ToSeedValue for f32 {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Numeric(f64::from(*self))
    }
}

impl ToSeedValue for f64 {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Numeric(*self)
    }
}

impl ToSeedValue for bool {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Bool(*self)
    }
}

impl ToSeedValue for DateTime<Utc> {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Timestamp(*self)
    }
}

impl ToSeedValue for NaiveDateTime {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Timestamp(self.and_utc())
    }
}

impl ToSeedValue for Uuid {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Uuid(*self)
    }
}

impl ToSeedValue for serde_json::Value {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Json(self.clone())
    }
}

impl ToSeedValue for serde_json::Map<String, serde_json::Value> {
    fn to_seed_value(&self) -> SeedValue {
        SeedValue::Json(serde_json::Value::Object(self.clone()))
    }
}

impl<S> ToSeedValue for HashMap<String, serde_json::Value, S> {
    fn to_seed_value(&self) -> SeedValue {
        let object = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        SeedValue::Json(serde_json::Value::Object(object))
    }
}

impl<S> ToSeedValue for IndexMap<String, serde_json::Value, S> {
    fn to_seed_value(&self) -> SeedValue {
        let object = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        SeedValue::Json(serde_json::Value::Object(object))
    }
}

impl ToSeedValue for BTreeMap<String, serde_json::Value> {
    fn to_seed_value(&self) -> SeedValue {
        let object = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        SeedValue::Json(serde_json::Value::Object(object))
    }
}

/// A persisted model that can be flattened into a seed row.
///
/// Implemented by `#[derive(Model)]` from `fleetify-schema-derive`.
pub trait Model {
    /// Table the model is stored in.
    const TABLE: &'static str;

    /// Primary identifier column (`<table>_id`).
    #[must_use]
    fn id_column() -> String {
        id_column_for(Self::TABLE)
    }

    /// Flattens the record into a row of its annotated columns.
    fn to_row(&self) -> SeedRow;
}
