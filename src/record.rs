//! Record types: statically declared schemas, a registration table, and the
//! records built from coerced parameters.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coerce::coerce;
use crate::error::{Error, SchemaError, ShapeError};
use crate::ir::{type_set_of, DeclaredType, FieldDecl, ParamType, Ty};
use crate::value::{RawParam, Value};

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
}

/// Declared shape of a record type, built once and reused for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<RecordField>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<DeclaredType>) -> Self {
        self.fields.push(RecordField { name: name.into(), ty: ty.into() });
        self
    }

    pub fn optional(self, name: impl Into<String>, ty: Ty) -> Self {
        self.field(name, DeclaredType::optional(ty))
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn fields(&self) -> &[RecordField] { &self.fields }

    /// Positional descriptors, each declared type unwrapped into a type set.
    pub fn descriptors(&self) -> Vec<FieldDecl> {
        self.fields
            .iter()
            .map(|f| FieldDecl::new(f.name.clone(), ParamType::Set(type_set_of(&f.ty))))
            .collect()
    }

    /// Field names must be unique, one record slot per declared field.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ShapeError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Coerce `params` and build a record in declared field order.
    pub fn coerce(&self, params: &[RawParam]) -> Result<Record, Error> {
        self.validate()?;
        let values = coerce(params, &self.descriptors())?;
        let fields = self.fields.iter().map(|f| f.name.clone()).zip(values).collect();
        Ok(Record { name: self.name.clone(), fields })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Registration table of record schemas, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    records: IndexMap<String, RecordSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self { Self::default() }

    /// Register `schema`, replacing any schema of the same name.
    pub fn register(&mut self, schema: RecordSchema) -> &mut Self {
        let name = schema.name.clone();
        if self.records.insert(name.clone(), schema).is_some() {
            tracing::debug!(record = %name, "record schema replaced");
        } else {
            tracing::debug!(record = %name, "record schema registered");
        }
        self
    }

    pub fn get(&self, name: &str) -> Result<&RecordSchema, ShapeError> {
        self.records.get(name).ok_or_else(|| ShapeError::UnknownRecord(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool { self.records.contains_key(name) }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &RecordSchema> { self.records.values() }

    /// Coerce `params` into a record of the registered type `name`.
    pub fn coerce(&self, name: &str, params: &[RawParam]) -> Result<Record, Error> {
        coerce_to_record(params, self.get(name)?)
    }

    /// Register every record of a JSON schema document:
    /// `{ "teleport": [{"name": "map", "type": "str"}, ...], ... }`.
    ///
    /// All or nothing: on error the registry is left untouched.
    pub fn load_json(&mut self, src: &str) -> Result<usize, SchemaError> {
        let doc: IndexMap<String, serde_json::Value> = crate::path_de::from_str_with_path(src)?;
        let mut decoded = Vec::with_capacity(doc.len());
        for (name, entry) in doc {
            if !entry.is_array() {
                return Err(ShapeError::MissingFields(name).into());
            }
            let fields: Vec<RecordField> = crate::path_de::from_value_with_path(entry)
                .map_err(|err| match err {
                    SchemaError::Decode { path, message } => SchemaError::Decode {
                        path: format!("{name}{}", path_suffix(&path)),
                        message,
                    },
                    other => other,
                })?;
            let schema = RecordSchema { name, fields };
            schema.validate()?;
            decoded.push(schema);
        }
        let count = decoded.len();
        for schema in decoded {
            self.register(schema);
        }
        Ok(count)
    }

    /// Parse a schema document into a fresh registry.
    pub fn from_json(src: &str) -> Result<Self, SchemaError> {
        let mut out = Self::new();
        out.load_json(src)?;
        Ok(out)
    }
}

fn path_suffix(path: &str) -> String {
    if path == "." || path.is_empty() { String::new() } else if path.starts_with('[') { path.to_string() } else { format!(".{path}") }
}

/// Coerce `params` against `schema`'s declared fields and build the record.
pub fn coerce_to_record(params: &[RawParam], schema: &RecordSchema) -> Result<Record, Error> {
    schema.coerce(params)
}

// ————————————————————————————————————————————————————————————————————————————
// RECORD
// ————————————————————————————————————————————————————————————————————————————

/// Coerced parameters of one call, fields in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub fields: IndexMap<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> { self.fields.get(field) }
    pub fn values(&self) -> impl Iterator<Item = &Value> { self.fields.values() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn into_values(self) -> Vec<Value> { self.fields.into_values().collect() }

    /// Move a field out and convert it.
    pub fn take<T: FromValue>(&mut self, field: &str) -> Result<T, ShapeError> {
        let value = self.fields.shift_remove(field).ok_or_else(|| ShapeError::MissingField {
            record: self.name.clone(),
            field: field.to_string(),
        })?;
        let found = value.kind();
        T::from_value(value).ok_or_else(|| ShapeError::FieldType {
            record: self.name.clone(),
            field: field.to_string(),
            expected: T::EXPECTED,
            found,
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPED EXTRACTION
// ————————————————————————————————————————————————————————————————————————————

pub trait FromValue: Sized {
    const EXPECTED: &'static str;
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";
    fn from_value(value: Value) -> Option<Self> { Some(value) }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";
    fn from_value(value: Value) -> Option<Self> { value.as_i64() }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";
    fn from_value(value: Value) -> Option<Self> { value.as_f64() }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";
    fn from_value(value: Value) -> Option<Self> { value.as_bool() }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";
    fn from_value(value: Value) -> Option<Self> {
        match value { Value::Str(s) => Some(s), _ => None }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// A typed parameter struct with a static schema.
///
/// ```
/// use tilekit::{ParamRecord, RawParam, Record, RecordSchema, ShapeError, Ty};
///
/// struct Wait { seconds: f64 }
///
/// impl ParamRecord for Wait {
///     fn schema() -> RecordSchema {
///         RecordSchema::new("wait").field("seconds", Ty::Float)
///     }
///     fn from_record(mut record: Record) -> Result<Self, ShapeError> {
///         Ok(Wait { seconds: record.take("seconds")? })
///     }
/// }
///
/// let wait: Wait = tilekit::coerce_into(&[RawParam::text("1.5")]).unwrap();
/// assert_eq!(wait.seconds, 1.5);
/// ```
pub trait ParamRecord: Sized {
    fn schema() -> RecordSchema;
    fn from_record(record: Record) -> Result<Self, ShapeError>;
}

/// Coerce `params` straight into a typed record.
pub fn coerce_into<T: ParamRecord>(params: &[RawParam]) -> Result<T, Error> {
    let record = coerce_to_record(params, &T::schema())?;
    Ok(T::from_record(record)?)
}
