//! Positional coercion of raw script parameters.
//!
//! Descriptors are the primary axis: parameter `i` is governed by
//! descriptor `i`, surplus parameters are ignored and missing ones are null.
//! Within a type set the first type that parses wins, so declaration order
//! decides ambiguous inputs (`{float, str}` turns `"5"` into `5.0`,
//! `{str, float}` keeps `"5"`).
//!
//! A batch is atomic: the first failing field aborts it and nothing partial
//! is returned.
pub mod num;
pub mod text;

use crate::error::CoercionError;
use crate::ir::{FieldDecl, ParamType, Ty, TypeSet};
use crate::value::{RawParam, Value};

pub use num::{parse_float, parse_int};
pub use text::parse_bool;

/// Coerce `params` against `descriptors`, one output value per descriptor.
pub fn coerce(params: &[RawParam], descriptors: &[FieldDecl]) -> Result<Vec<Value>, CoercionError> {
    let missing = RawParam::null();
    let result = descriptors
        .iter()
        .enumerate()
        .map(|(i, decl)| coerce_field(decl, params.get(i).unwrap_or(&missing)))
        .collect::<Result<Vec<_>, _>>();

    if let Err(error) = &result {
        tracing::error!(
            expected = %render_descriptors(descriptors),
            got = %render_params(params),
            %error,
            "invalid parameters passed"
        );
    }
    result
}

/// Coerce a single raw value against one descriptor.
pub fn coerce_field(decl: &FieldDecl, raw: &RawParam) -> Result<Value, CoercionError> {
    match &decl.ty {
        ParamType::Set(set) => coerce_set(&decl.name, set, raw),
        ParamType::Bare(ty) => coerce_bare(&decl.name, *ty, raw),
    }
}

fn coerce_set(field: &str, set: &TypeSet, raw: &RawParam) -> Result<Value, CoercionError> {
    // null marker or absent value short-circuits before any parse attempt
    if set.has_null() {
        return Ok(Value::Null);
    }
    let Some(s) = raw.as_str() else {
        return Ok(Value::Null);
    };
    if set.is_empty() {
        return Ok(Value::Null);
    }
    set.iter()
        .find_map(|ty| construct(ty, s))
        .ok_or_else(|| CoercionError {
            field: field.to_string(),
            raw: s.to_string(),
            types: set.clone(),
        })
}

fn coerce_bare(field: &str, ty: Ty, raw: &RawParam) -> Result<Value, CoercionError> {
    match raw.as_str() {
        None | Some("") => Ok(Value::Null),
        Some(s) => construct(ty, s).ok_or_else(|| CoercionError {
            field: field.to_string(),
            raw: s.to_string(),
            types: TypeSet::single(ty),
        }),
    }
}

/// Build `ty` from a raw string; `None` when the string does not parse.
pub fn construct(ty: Ty, s: &str) -> Option<Value> {
    match ty {
        Ty::Null => Some(Value::Null),
        Ty::Str => Some(Value::Str(s.to_string())),
        Ty::Int => parse_int(s).map(Value::Int),
        Ty::Float => parse_float(s).map(Value::float),
        Ty::Bool => parse_bool(s).map(Value::Bool),
    }
}

fn render_descriptors(descriptors: &[FieldDecl]) -> String {
    let parts = descriptors.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("[{}]", parts.join(", "))
}

fn render_params(params: &[RawParam]) -> String {
    let parts = params.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("[{}]", parts.join(", "))
}
