use std::fmt::{Display, Formatter};

use serde::Serialize;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
/// The type of the values a column produces.
pub enum ColumnType {
    String,
    Int,
    Blob,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Blob => write!(f, "blob"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
/// A single cell produced by extracting a column from a row.
pub enum Value {
    String(String),
    Int(i64),
    Blob(Vec<u8>),
}

impl Value {
    /// The neutral value of the given column type.
    ///
    /// Columns produce this rather than an error when the underlying
    /// field is logically absent.
    pub fn neutral(kind: ColumnType) -> Self {
        match kind {
            ColumnType::String => Value::String(String::new()),
            ColumnType::Int => Value::Int(0),
            ColumnType::Blob => Value::Blob(Vec::new()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{v}"),
            Value::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

/// A Rust type that a lambda column can extract.
pub trait ColumnValue: Sized {
    /// The column type values of this type are reported as.
    const KIND: ColumnType;

    /// Converts the extracted value into a [Value].
    fn into_value(self) -> Value;
}

impl ColumnValue for String {
    const KIND: ColumnType = ColumnType::String;

    #[inline]
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl ColumnValue for i64 {
    const KIND: ColumnType = ColumnType::Int;

    #[inline]
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl ColumnValue for Vec<u8> {
    const KIND: ColumnType = ColumnType::Blob;

    #[inline]
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}
