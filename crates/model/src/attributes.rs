//! Typed attribute model.
//!
//! An [`Attribute`] is a wire type tag plus the string form of its value. An
//! [`Attributes`] set maps unique names to attributes; writes replace the
//! whole value under a name (last write wins).
//!
//! Native values enter the model through [`IntoAttribute`], which infers the
//! wire type tag:
//!
//! | Native type | Tag |
//! |-------------|-----|
//! | `&str`, `String` | `"string"` |
//! | any integer width | `"int"` |
//! | `f32` | `"float"` |
//! | `f64` | `"int"` (see [`AttributeValue::Float64`]) |
//! | [`Attribute`] | passed through verbatim |
//!
//! Anything else is rejected with [`AttributeError::UnsupportedType`].
//!
//! ## Decode tolerance
//!
//! [`Attributes::get_int`] and [`Attributes::get_float`] report presence
//! independently of parse success: a present value that does not parse comes
//! back as `Some(0)` / `Some(0.0)`. Callers that must tell the two apart use
//! [`Attributes::parse_int`] and [`Attributes::parse_float`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::AttributeError;

/// Wire type tag for string values.
pub const STRING_TYPE: &str = "string";
/// Wire type tag for integer values (and, for compatibility, 64-bit floats).
pub const INT_TYPE: &str = "int";
/// Wire type tag for 32-bit float values.
pub const FLOAT_TYPE: &str = "float";

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// A single typed value: a wire type tag and the value's string encoding.
///
/// The tag is free-form. The model produces `"string"`, `"int"` and `"float"`
/// itself; callers may construct attributes with any custom tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    type_tag: String,
    value: String,
}

impl Attribute {
    /// Creates an attribute with an explicit type tag.
    pub fn new(type_tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }

    /// Returns the wire type tag.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Returns the string-encoded value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.type_tag, self.value)
    }
}

// ---------------------------------------------------------------------------
// Native value dispatch
// ---------------------------------------------------------------------------

/// The closed set of native values the model knows how to tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Tagged `"string"`.
    Text(String),
    /// Tagged `"int"`.
    Int(i64),
    /// Tagged `"float"`.
    ///
    /// Non-finite values are written `inf`, `-inf` and `NaN`. Peers that
    /// format them as `+Inf` / `-Inf` are still read back correctly, since
    /// float parsing ignores case and accepts a leading sign.
    Float32(f32),
    /// Tagged `"int"`, not `"float"`.
    ///
    /// This looks like a defect in the format this client interoperates
    /// with, but peers already depend on it, so the tag is kept. The value
    /// itself is still the decimal float text, so [`Attributes::get_int`]
    /// yields `Some(0)` for any non-integral value.
    Float64(f64),
    /// An already-typed attribute, stored verbatim.
    Typed(Attribute),
}

/// Conversion of a native value into a tagged [`Attribute`].
///
/// This is the call boundary of [`Attributes::add`]. Types with no wire
/// representation implement it by returning
/// [`AttributeError::UnsupportedType`].
pub trait IntoAttribute {
    /// Converts `self`, inferring the wire type tag.
    fn into_attribute(self) -> Result<Attribute, AttributeError>;
}

impl IntoAttribute for AttributeValue {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        Ok(match self {
            AttributeValue::Text(s) => Attribute::new(STRING_TYPE, s),
            AttributeValue::Int(i) => Attribute::new(INT_TYPE, i.to_string()),
            // `Display` for floats is the shortest decimal that parses back
            // to the same value, with no exponent and no fixed width.
            AttributeValue::Float32(f) => Attribute::new(FLOAT_TYPE, f.to_string()),
            AttributeValue::Float64(f) => Attribute::new(INT_TYPE, f.to_string()),
            AttributeValue::Typed(a) => a,
        })
    }
}

impl IntoAttribute for Attribute {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        AttributeValue::Typed(self).into_attribute()
    }
}

impl IntoAttribute for &str {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        AttributeValue::Text(self.to_string()).into_attribute()
    }
}

impl IntoAttribute for String {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        AttributeValue::Text(self).into_attribute()
    }
}

impl IntoAttribute for f32 {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        AttributeValue::Float32(self).into_attribute()
    }
}

impl IntoAttribute for f64 {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        AttributeValue::Float64(self).into_attribute()
    }
}

// Every integer width encodes as its decimal text under the "int" tag.
macro_rules! int_attribute {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoAttribute for $ty {
                fn into_attribute(self) -> Result<Attribute, AttributeError> {
                    Ok(Attribute::new(INT_TYPE, self.to_string()))
                }
            }
        )*
    };
}

int_attribute!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl IntoAttribute for bool {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        Err(AttributeError::UnsupportedType { type_name: "bool" })
    }
}

impl IntoAttribute for char {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        Err(AttributeError::UnsupportedType { type_name: "char" })
    }
}

/// Dynamic dispatch over JSON values: strings and numbers are accepted,
/// everything else is rejected.
///
/// Integral numbers map to `"int"`; non-integral numbers are 64-bit floats
/// and therefore also map to `"int"` (see [`AttributeValue::Float64`]).
impl IntoAttribute for serde_json::Value {
    fn into_attribute(self) -> Result<Attribute, AttributeError> {
        use serde_json::Value;

        match self {
            Value::String(s) => s.into_attribute(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttributeValue::Int(i).into_attribute()
                } else if let Some(u) = n.as_u64() {
                    u.into_attribute()
                } else {
                    n.as_f64()
                        .ok_or(AttributeError::UnsupportedType { type_name: "number" })?
                        .into_attribute()
                }
            }
            Value::Bool(_) => Err(AttributeError::UnsupportedType { type_name: "bool" }),
            Value::Null => Err(AttributeError::UnsupportedType { type_name: "null" }),
            Value::Array(_) => Err(AttributeError::UnsupportedType { type_name: "array" }),
            Value::Object(_) => Err(AttributeError::UnsupportedType { type_name: "object" }),
        }
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A set of uniquely named attributes.
///
/// Iteration is ordered by name, so encoding the same set twice produces the
/// same attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, Attribute>,
}

impl Attributes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous attribute.
    ///
    /// Returns [`AttributeError::UnsupportedType`] without touching the set
    /// if `value` has no wire representation.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: impl IntoAttribute,
    ) -> Result<(), AttributeError> {
        let attribute = value.into_attribute()?;
        self.insert(name, attribute);
        Ok(())
    }

    /// Stores an already-typed attribute, replacing any previous one.
    ///
    /// Returns the replaced attribute, if any.
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) -> Option<Attribute> {
        self.values.insert(name.into(), attribute)
    }

    /// Removes and returns the attribute stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.values.remove(name)
    }

    /// Returns the raw attribute stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.values.get(name)
    }

    /// Returns the stored string encoding, whatever the type tag.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name).map(Attribute::value)
    }

    /// Returns the value parsed as `i64`.
    ///
    /// `Some(0)` is returned for a present value that does not parse.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)
            .map(|a| a.value().parse::<i64>().unwrap_or_default())
    }

    /// Returns the value parsed as `f64`.
    ///
    /// `Some(0.0)` is returned for a present value that does not parse.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)
            .map(|a| a.value().parse::<f64>().unwrap_or_default())
    }

    /// Strict variant of [`Self::get_int`].
    ///
    /// Returns `Ok(None)` when absent and [`AttributeError::Malformed`] when
    /// present but unparsable.
    pub fn parse_int(&self, name: &str) -> Result<Option<i64>, AttributeError> {
        self.parse_with(name, |v| v.parse::<i64>().ok())
    }

    /// Strict variant of [`Self::get_float`].
    pub fn parse_float(&self, name: &str) -> Result<Option<f64>, AttributeError> {
        self.parse_with(name, |v| v.parse::<f64>().ok())
    }

    fn parse_with<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, AttributeError> {
        let Some(attribute) = self.get(name) else {
            return Ok(None);
        };
        parse(attribute.value())
            .map(Some)
            .ok_or_else(|| AttributeError::Malformed {
                name: name.to_string(),
                type_tag: attribute.type_tag().to_string(),
                value: attribute.value().to_string(),
            })
    }

    /// Returns `true` if an attribute is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of attributes in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the set holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(name, attribute)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Attribute)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Attribute)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Attribute);
    type IntoIter = std::collections::btree_map::IntoIter<String, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
