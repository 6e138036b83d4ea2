//! `tilekit`: typed parameters for scripted map actions.
//!
//! Map events hand their actions raw string parameters (`teleport
//! town.tmx,5,7`). This crate coerces them into typed values against a
//! declared schema:
//!
//! - [`coerce`] pairs raw parameters with positional descriptors
//! - [`RecordSchema`] / [`SchemaRegistry`] declare record types once and
//!   build [`Record`]s from a call's parameters
//! - [`ParamRecord`] lifts a record into a typed struct
//! - [`number_or_variable`] resolves numeric arguments against game variables
//!
//! The `tilekit` binary is a thin debugging CLI over the same API.

pub mod cli;
pub mod coerce;
pub mod error;
pub mod ir;
#[cfg(test)]
mod log_capture;
pub mod path_de;
pub mod record;
pub mod value;
pub mod variables;

pub use coerce::{coerce, coerce_field};
pub use error::{CoercionError, Error, Result, SchemaError, ShapeError, VariableError};
pub use ir::{type_set_of, DeclaredType, FieldDecl, ParamType, Ty, TypeSet};
pub use record::{coerce_into, coerce_to_record, FromValue, ParamRecord, Record, RecordSchema, SchemaRegistry};
pub use value::{RawParam, Value};
pub use variables::{number_or_variable, GameVariables};
