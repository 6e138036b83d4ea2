// Declared parameter types. No raw values here.
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Primitive type tag a raw parameter can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ty {
    #[serde(alias = "integer")]
    Int,
    Float,
    #[serde(alias = "string")]
    Str,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "none")]
    Null,                    // the null marker
}

impl Ty {
    pub fn name(self) -> &'static str {
        match self {
            Ty::Int => "int",
            Ty::Float => "float",
            Ty::Str => "str",
            Ty::Bool => "bool",
            Ty::Null => "null",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type name `{0}` (expected int, float, str, bool or null)")]
pub struct UnknownTy(pub String);

impl FromStr for Ty {
    type Err = UnknownTy;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Ty::Int),
            "float" => Ok(Ty::Float),
            "str" | "string" => Ok(Ty::Str),
            "bool" | "boolean" => Ok(Ty::Bool),
            "null" | "none" => Ok(Ty::Null),
            _ => Err(UnknownTy(s.to_string())),
        }
    }
}

/// Ordered set of accepted types. Order decides which coercion wins, so
/// members are neither sorted nor deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSet(pub Vec<Ty>);

impl TypeSet {
    pub fn new(tys: impl IntoIterator<Item = Ty>) -> Self {
        Self(tys.into_iter().collect())
    }
    pub fn single(ty: Ty) -> Self { Self(vec![ty]) }
    pub fn has_null(&self) -> bool { self.0.contains(&Ty::Null) }
    pub fn iter(&self) -> impl Iterator<Item = Ty> + '_ { self.0.iter().copied() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{ty}")?;
        }
        f.write_str("}")
    }
}

/// Type slot of a descriptor: normally a set, occasionally one bare type.
///
/// A bare type treats `""` like a missing value; a set does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamType {
    Set(TypeSet),
    Bare(Ty),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Set(set) => write!(f, "{set}"),
            ParamType::Bare(ty) => write!(f, "{ty}"),
        }
    }
}

impl From<TypeSet> for ParamType {
    fn from(set: TypeSet) -> Self { ParamType::Set(set) }
}

impl From<Ty> for ParamType {
    fn from(ty: Ty) -> Self { ParamType::Bare(ty) }
}

/// One positional parameter descriptor: accepted type(s) plus a name used
/// only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<ParamType>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Declared type of a record field, as written in a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredType {
    Union(Vec<Ty>),
    Single(Ty),
}

impl DeclaredType {
    /// `T | null`.
    pub fn optional(ty: Ty) -> Self {
        DeclaredType::Union(vec![ty, Ty::Null])
    }
}

impl From<Ty> for DeclaredType {
    fn from(ty: Ty) -> Self { DeclaredType::Single(ty) }
}

/// Unwrap a union/optional declaration into its member types; anything else
/// becomes a singleton set.
pub fn type_set_of(declared: &DeclaredType) -> TypeSet {
    match declared {
        DeclaredType::Union(members) => TypeSet(members.clone()),
        DeclaredType::Single(ty) => TypeSet::single(*ty),
    }
}

/// Parse the inline `int|str` notation used on the command line.
///
/// A single name is a bare type; `|`-joined names, or a name wrapped in
/// parentheses, form a set.
pub fn parse_param_type(src: &str) -> Result<ParamType, UnknownTy> {
    let src = src.trim();
    let (body, forced_set) = match src.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (src, false),
    };
    if !forced_set && !body.contains('|') {
        return body.parse().map(ParamType::Bare);
    }
    let tys = body
        .split('|')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Ty>, _>>()?;
    Ok(ParamType::Set(TypeSet(tys)))
}
