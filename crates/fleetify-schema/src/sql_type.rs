//! Mapping from declared Rust field types to PostgreSQL column types.

use std::fmt;

/// PostgreSQL column type derived from a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `TEXT`; also the fallback for unrecognised types.
    Text,
    /// `INTEGER` for every signed and unsigned integer width.
    Integer,
    /// `NUMERIC(p, s)` for floating-point and decimal fields.
    Numeric {
        /// Total digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// `BOOLEAN`.
    Boolean,
    /// `TIMESTAMPTZ`.
    Timestamp,
    /// `JSONB` for maps and JSON values.
    Json,
    /// `UUID`.
    Uuid,
}

impl SqlType {
    /// Numeric type used for floating-point fields.
    pub const MONEY: Self = Self::Numeric {
        precision: 10,
        scale: 2,
    };

    /// Maps a field type to its column type.
    ///
    /// `Option<T>` and references map like `T`; anything unrecognised maps
    /// to [`SqlType::Text`].
    #[must_use]
    pub fn from_type(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Reference(reference) => Self::from_type(&reference.elem),
            syn::Type::Paren(paren) => Self::from_type(&paren.elem),
            syn::Type::Group(group) => Self::from_type(&group.elem),
            syn::Type::Path(path) => path
                .path
                .segments
                .last()
                .map_or(Self::Text, Self::from_segment),
            _ => Self::Text,
        }
    }

    fn from_segment(segment: &syn::PathSegment) -> Self {
        let ident = segment.ident.to_string();
        if ident == "Option" {
            return option_inner(segment).map_or(Self::Text, Self::from_type);
        }
        Self::from_type_name(&ident)
    }

    /// Maps the final path segment of a type name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize" => Self::Integer,
            "f32" | "f64" => Self::MONEY,
            "bool" => Self::Boolean,
            "DateTime" | "NaiveDateTime" => Self::Timestamp,
            "HashMap" | "BTreeMap" | "IndexMap" | "Map" | "Value" => Self::Json,
            "Uuid" => Self::Uuid,
            _ => Self::Text,
        }
    }
}

fn option_inner(segment: &syn::PathSegment) -> Option<&syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("TEXT"),
            Self::Integer => f.write_str("INTEGER"),
            Self::Numeric { precision, scale } => write!(f, "NUMERIC({precision}, {scale})"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Timestamp => f.write_str("TIMESTAMPTZ"),
            Self::Json => f.write_str("JSONB"),
            Self::Uuid => f.write_str("UUID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(ty: &str) -> syn::Type {
        syn::parse_str(ty).unwrap_or_else(|err| panic!("type '{ty}' should parse: {err}"))
    }

    #[rstest]
    #[case("String", "TEXT")]
    #[case("&'static str", "TEXT")]
    #[case("i32", "INTEGER")]
    #[case("u64", "INTEGER")]
    #[case("f64", "NUMERIC(10, 2)")]
    #[case("f32", "NUMERIC(10, 2)")]
    #[case("bool", "BOOLEAN")]
    #[case("chrono::DateTime<chrono::Utc>", "TIMESTAMPTZ")]
    #[case("NaiveDateTime", "TIMESTAMPTZ")]
    #[case("std::collections::HashMap<String, serde_json::Value>", "JSONB")]
    #[case("serde_json::Value", "JSONB")]
    #[case("uuid::Uuid", "UUID")]
    #[case("Option<f64>", "NUMERIC(10, 2)")]
    #[case("Option<Uuid>", "UUID")]
    #[case("Vec<String>", "TEXT")]
    #[case("(i32, i32)", "TEXT")]
    fn maps_declared_types(#[case] ty: &str, #[case] expected: &str) {
        assert_eq!(SqlType::from_type(&parse(ty)).to_string(), expected);
    }
}
