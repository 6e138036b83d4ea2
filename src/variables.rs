//! Game variables as seen by map scripts, and numeric lookups against them.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::VariableError;

/// Player-scoped script variables. Values stay strings until read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVariables(IndexMap<String, String>);

impl GameVariables {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GameVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Resolve `value` as a literal number or as the name of a numeric variable.
///
/// Only plain digit strings count as literals; anything else (including
/// `-1` or `2.5`) is looked up by name.
pub fn number_or_variable(variables: &GameVariables, value: &str) -> Result<f64, VariableError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<f64>() {
            return Ok(n);
        }
    }
    let result = match variables.get(value) {
        None => Err(VariableError::Unknown(value.to_string())),
        Some(stored) => stored.trim().parse::<f64>().map_err(|_| VariableError::NotNumeric {
            name: value.to_string(),
            value: stored.to_string(),
        }),
    };
    if let Err(error) = &result {
        tracing::error!(%error, "invalid number or game variable {value}");
    }
    result
}
