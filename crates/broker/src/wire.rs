//! JSON envelope shapes exchanged with the broker.
//!
//! These types exist only to match the broker's wire format. They are decoded
//! into [`model`] types straight away and never leave this crate.
//!
//! Two wire quirks are preserved here: `isPattern` is a string-typed boolean
//! (`"true"` / `"false"`) and the status `code` is a string-typed integer.
//! Missing fields decode to their empty or zero defaults.

use model::{Attribute, Attributes};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::errors::{BrokerError, BrokerResult, TransportError, STATUS_OK};

/// Decodes a response body into envelope `R`.
///
/// A body that is not JSON, or ends mid-document, is a
/// [`TransportError::Body`]. JSON of the wrong shape is
/// [`BrokerError::Decode`].
pub(crate) fn decode<R: DeserializeOwned>(octets: &[u8]) -> BrokerResult<R> {
    serde_json::from_slice(octets).map_err(|error| match error.classify() {
        Category::Data => BrokerError::Decode(error),
        Category::Syntax | Category::Eof | Category::Io => TransportError::Body(error).into(),
    })
}

// ---------------------------------------------------------------------------
// Attribute list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WireAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: String,
}

/// `{"attributes":[{"name":..,"type":..,"value":..}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WireAttributes {
    pub attributes: Vec<WireAttribute>,
}

impl From<&Attributes> for WireAttributes {
    fn from(attributes: &Attributes) -> Self {
        Self {
            attributes: attributes
                .iter()
                .map(|(name, attr)| WireAttribute {
                    name: name.to_string(),
                    type_tag: attr.type_tag().to_string(),
                    value: attr.value().to_string(),
                })
                .collect(),
        }
    }
}

impl WireAttributes {
    /// Rebuilds the attribute set, keeping wire type tags verbatim.
    pub fn into_attributes(self) -> Attributes {
        self.attributes
            .into_iter()
            .map(|a| (a.name, Attribute::new(a.type_tag, a.value)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Identifier and status
// ---------------------------------------------------------------------------

/// `{"id":..,"isPattern":"true"|"false","type":..}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct WireId {
    pub id: String,
    #[serde(rename = "isPattern", deserialize_with = "string_bool")]
    pub is_pattern: bool,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// `{"code":"200","reasonPhrase":"OK"}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct WireStatus {
    #[serde(deserialize_with = "string_code")]
    pub code: u32,
    #[serde(rename = "reasonPhrase")]
    pub reason_phrase: String,
}

impl WireStatus {
    pub fn is_ok(&self) -> bool {
        self.code == STATUS_OK
    }

    /// Maps a non-200 status to [`BrokerError::OperationFailed`].
    pub fn check(self) -> BrokerResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(BrokerError::OperationFailed {
                code: self.code,
                message: self.reason_phrase,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// One element of a create/update response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AlteredContextElement {
    #[serde(flatten)]
    pub attributes: WireAttributes,
    #[serde(rename = "statusCode")]
    pub status: WireStatus,
}

/// Create/update response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AlteredContextResponse {
    #[serde(rename = "contextResponses")]
    pub elements: Vec<AlteredContextElement>,
    #[serde(flatten)]
    pub id: WireId,
}

impl AlteredContextResponse {
    /// Returns the status of the first element, which carries the outcome.
    pub fn into_first_status(self) -> BrokerResult<WireStatus> {
        self.elements
            .into_iter()
            .next()
            .map(|element| element.status)
            .ok_or_else(|| BrokerError::UnexpectedResult("empty contextResponses".to_string()))
    }
}

/// Attribute list plus identifier, as carried by read and listing responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct ContextElement {
    #[serde(flatten)]
    pub attributes: WireAttributes,
    #[serde(flatten)]
    pub id: WireId,
}

/// Single-entity read response; also one element of a listing response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct QueryContextElement {
    #[serde(rename = "contextElement")]
    pub element: ContextElement,
    #[serde(rename = "statusCode")]
    pub status: WireStatus,
}

/// Listing response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct QueryContextResponse {
    #[serde(rename = "contextResponses")]
    pub elements: Vec<QueryContextElement>,
}

// ---------------------------------------------------------------------------
// Quirk decoders
// ---------------------------------------------------------------------------

fn string_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(r#"the string "true" or "false""#)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<bool, E> {
            match v {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_str(Visitor)
}

// Canonically a string; bare numbers are accepted as well.
fn string_code<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a status code as a decimal string")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u32, E> {
            v.parse()
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v)
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v)
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
        }
    }

    deserializer.deserialize_any(Visitor)
}
