//! Error taxonomy for the library side of the crate.
//!
//! The CLI wraps these in `anyhow`; library callers match on them.
use crate::ir::TypeSet;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Variable(#[from] VariableError),
}

/// A raw value could not be converted to any type of its field's set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot coerce {raw:?} for field `{field}` to any of {types}")]
pub struct CoercionError {
    pub field: String,
    pub raw: String,
    pub types: TypeSet,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("record type `{0}` is not registered")]
    UnknownRecord(String),
    #[error("record type `{0}` declares no field list")]
    MissingFields(String),
    #[error("record type `{record}` declares field `{field}` more than once")]
    DuplicateField { record: String, field: String },
    #[error("record `{record}` has no field `{field}`")]
    MissingField { record: String, field: String },
    #[error("field `{field}` of record `{record}` holds {found}, expected {expected}")]
    FieldType {
        record: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Failure while decoding a schema or descriptor document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("no game variable named `{0}`")]
    Unknown(String),
    #[error("game variable `{name}` holds non-numeric value {value:?}")]
    NotNumeric { name: String, value: String },
}
