//! Identifier family: the instrument PID, party identifiers and related
//! identifiers
//!
//! Each identifier pairs a value with a type token. Values are validated
//! before types, and both are re-validated on every write.

use crate::error::{PidInstError, Result};
use crate::fields;
use crate::text::{BoundedText, NonEmptyText};
use crate::value::{
    log_rejection, optional_text, reject_leftover, take_field, Entity, FieldMap, FieldValue, Record,
};
use crate::vocab::{vocabularies, VocabularyKind};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;

const VALUE: &str = "value";
const TYPE: &str = "type";
const RELATION_TYPE: &str = "relation_type";
const NAME: &str = "name";

fn vocabulary_token(kind: VocabularyKind, field: &str, token: impl Into<String>) -> Result<String> {
    let token = token.into();
    vocabularies().check(kind, field, &token)?;
    Ok(token)
}

/// Serialized shape shared by the value/type identifiers.
#[derive(Deserialize)]
#[serde(deny_unknown_fields, expecting = "an identifier object with value and type")]
struct RawIdentifier {
    #[serde(default)]
    value: serde_json::Value,
    #[serde(rename = "type", default)]
    identifier_type: serde_json::Value,
}

impl RawIdentifier {
    fn into_fields(self) -> FieldMap {
        fields! { VALUE => self.value, TYPE => self.identifier_type }
    }
}

/// Persistent identifier of the instrument itself (e.g. a DOI or Handle).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    value: BoundedText,
    #[serde(rename = "type")]
    identifier_type: String,
}

impl Identifier {
    const VALUE_LABEL: &'static str = "Identifier value";
    const TYPE_LABEL: &'static str = "Identifier type";

    /// Create an instrument PID, validating every attribute
    pub fn new(value: impl Into<String>, identifier_type: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: BoundedText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type)?,
        })
    }

    /// The instrument PID value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The identifier type token
    pub fn identifier_type(&self) -> &str {
        &self.identifier_type
    }

    /// Validate and replace the value
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = BoundedText::parse(Self::VALUE_LABEL, value)?;
        Ok(())
    }

    /// Validate and replace the identifier type token
    pub fn set_identifier_type(&mut self, identifier_type: impl Into<String>) -> Result<()> {
        self.identifier_type = Self::check_type(identifier_type)?;
        Ok(())
    }

    fn check_type(identifier_type: impl Into<String>) -> Result<String> {
        vocabulary_token(
            VocabularyKind::InstrumentIdentifierType,
            Self::TYPE_LABEL,
            identifier_type,
        )
    }
}

impl Record for Identifier {
    const ENTITY: &'static str = "Identifier";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let value = take_field(&mut fields, VALUE).into_text(Self::VALUE_LABEL)?;
        let value = BoundedText::parse(Self::VALUE_LABEL, value)?;
        let identifier_type = take_field(&mut fields, TYPE).into_text(Self::TYPE_LABEL)?;
        let identifier_type = Self::check_type(identifier_type)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(Self {
            value,
            identifier_type,
        })
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            VALUE => Ok(self.value().into()),
            TYPE => Ok(self.identifier_type().into()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            VALUE => value
                .into_text(Self::VALUE_LABEL)
                .and_then(|v| self.set_value(v)),
            TYPE => value
                .into_text(Self::TYPE_LABEL)
                .and_then(|v| self.set_identifier_type(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::Identifier(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::Identifier(identifier) => Ok(identifier),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawIdentifier::deserialize(deserializer)?;
        Self::from_fields(raw.into_fields()).map_err(D::Error::custom)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier {}", self.value)
    }
}

/// Identifier of an instrument owner (e.g. an ORCID or ROR ID).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OwnerIdentifier {
    value: NonEmptyText,
    #[serde(rename = "type")]
    identifier_type: String,
}

impl OwnerIdentifier {
    const VALUE_LABEL: &'static str = "Owner identifier value";
    const TYPE_LABEL: &'static str = "Owner identifier type";

    /// Create an owner identifier, validating every attribute
    pub fn new(value: impl Into<String>, identifier_type: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: NonEmptyText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type)?,
        })
    }

    /// The owner identifier value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The identifier type token
    pub fn identifier_type(&self) -> &str {
        &self.identifier_type
    }

    /// Validate and replace the value
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        Ok(())
    }

    /// Validate and replace the identifier type token
    pub fn set_identifier_type(&mut self, identifier_type: impl Into<String>) -> Result<()> {
        self.identifier_type = Self::check_type(identifier_type)?;
        Ok(())
    }

    fn check_type(identifier_type: impl Into<String>) -> Result<String> {
        vocabulary_token(VocabularyKind::OwnerIdentifierType, Self::TYPE_LABEL, identifier_type)
    }
}

impl Record for OwnerIdentifier {
    const ENTITY: &'static str = "OwnerIdentifier";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let value = take_field(&mut fields, VALUE).into_text(Self::VALUE_LABEL)?;
        let value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        let identifier_type = take_field(&mut fields, TYPE).into_text(Self::TYPE_LABEL)?;
        let identifier_type = Self::check_type(identifier_type)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(Self {
            value,
            identifier_type,
        })
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            VALUE => Ok(self.value().into()),
            TYPE => Ok(self.identifier_type().into()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            VALUE => value
                .into_text(Self::VALUE_LABEL)
                .and_then(|v| self.set_value(v)),
            TYPE => value
                .into_text(Self::TYPE_LABEL)
                .and_then(|v| self.set_identifier_type(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::OwnerIdentifier(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::OwnerIdentifier(identifier) => Ok(identifier),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for OwnerIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawIdentifier::deserialize(deserializer)?;
        Self::from_fields(raw.into_fields()).map_err(D::Error::custom)
    }
}

impl fmt::Display for OwnerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner Identifier {}", self.value)
    }
}

/// Identifier of an instrument manufacturer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ManufacturerIdentifier {
    value: NonEmptyText,
    #[serde(rename = "type")]
    identifier_type: String,
}

impl ManufacturerIdentifier {
    const VALUE_LABEL: &'static str = "Manufacturer identifier value";
    const TYPE_LABEL: &'static str = "Manufacturer identifier type";

    /// Create a manufacturer identifier, validating every attribute
    pub fn new(value: impl Into<String>, identifier_type: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: NonEmptyText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type)?,
        })
    }

    /// The manufacturer identifier value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The identifier type token
    pub fn identifier_type(&self) -> &str {
        &self.identifier_type
    }

    /// Validate and replace the value
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        Ok(())
    }

    /// Validate and replace the identifier type token
    pub fn set_identifier_type(&mut self, identifier_type: impl Into<String>) -> Result<()> {
        self.identifier_type = Self::check_type(identifier_type)?;
        Ok(())
    }

    fn check_type(identifier_type: impl Into<String>) -> Result<String> {
        vocabulary_token(
            VocabularyKind::ManufacturerIdentifierType,
            Self::TYPE_LABEL,
            identifier_type,
        )
    }
}

impl Record for ManufacturerIdentifier {
    const ENTITY: &'static str = "ManufacturerIdentifier";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let value = take_field(&mut fields, VALUE).into_text(Self::VALUE_LABEL)?;
        let value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        let identifier_type = take_field(&mut fields, TYPE).into_text(Self::TYPE_LABEL)?;
        let identifier_type = Self::check_type(identifier_type)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(Self {
            value,
            identifier_type,
        })
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            VALUE => Ok(self.value().into()),
            TYPE => Ok(self.identifier_type().into()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            VALUE => value
                .into_text(Self::VALUE_LABEL)
                .and_then(|v| self.set_value(v)),
            TYPE => value
                .into_text(Self::TYPE_LABEL)
                .and_then(|v| self.set_identifier_type(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::ManufacturerIdentifier(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::ManufacturerIdentifier(identifier) => Ok(identifier),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for ManufacturerIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawIdentifier::deserialize(deserializer)?;
        Self::from_fields(raw.into_fields()).map_err(D::Error::custom)
    }
}

impl fmt::Display for ManufacturerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Manufacturer Identifier {}", self.value)
    }
}

/// Identifier of an instrument model.
///
/// The type token is only vocabulary-checked when the installed
/// [`Vocabularies`](crate::Vocabularies) carries `model_identifier_types`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ModelIdentifier {
    value: NonEmptyText,
    #[serde(rename = "type")]
    identifier_type: String,
}

impl ModelIdentifier {
    const VALUE_LABEL: &'static str = "Model identifier value";
    const TYPE_LABEL: &'static str = "Model identifier type";

    /// Create a model identifier, validating every attribute
    pub fn new(value: impl Into<String>, identifier_type: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: NonEmptyText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type)?,
        })
    }

    /// The model identifier value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The identifier type token
    pub fn identifier_type(&self) -> &str {
        &self.identifier_type
    }

    /// Validate and replace the value
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        Ok(())
    }

    /// Validate and replace the identifier type token
    pub fn set_identifier_type(&mut self, identifier_type: impl Into<String>) -> Result<()> {
        self.identifier_type = Self::check_type(identifier_type)?;
        Ok(())
    }

    fn check_type(identifier_type: impl Into<String>) -> Result<String> {
        vocabulary_token(VocabularyKind::ModelIdentifierType, Self::TYPE_LABEL, identifier_type)
    }
}

impl Record for ModelIdentifier {
    const ENTITY: &'static str = "ModelIdentifier";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let value = take_field(&mut fields, VALUE).into_text(Self::VALUE_LABEL)?;
        let value = NonEmptyText::parse(Self::VALUE_LABEL, value)?;
        let identifier_type = take_field(&mut fields, TYPE).into_text(Self::TYPE_LABEL)?;
        let identifier_type = Self::check_type(identifier_type)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(Self {
            value,
            identifier_type,
        })
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            VALUE => Ok(self.value().into()),
            TYPE => Ok(self.identifier_type().into()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            VALUE => value
                .into_text(Self::VALUE_LABEL)
                .and_then(|v| self.set_value(v)),
            TYPE => value
                .into_text(Self::TYPE_LABEL)
                .and_then(|v| self.set_identifier_type(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::ModelIdentifier(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::ModelIdentifier(identifier) => Ok(identifier),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for ModelIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawIdentifier::deserialize(deserializer)?;
        Self::from_fields(raw.into_fields()).map_err(D::Error::custom)
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model Identifier {}", self.value)
    }
}

/// Identifier of a resource related to the instrument (documentation,
/// components, datasets), with the nature of the relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RelatedIdentifier {
    value: BoundedText,
    #[serde(rename = "type")]
    identifier_type: String,
    relation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<NonEmptyText>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, expecting = "a related identifier object")]
struct RawRelatedIdentifier {
    #[serde(default)]
    value: serde_json::Value,
    #[serde(rename = "type", default)]
    identifier_type: serde_json::Value,
    #[serde(default)]
    relation_type: serde_json::Value,
    #[serde(default)]
    name: serde_json::Value,
}

impl RelatedIdentifier {
    const VALUE_LABEL: &'static str = "Related identifier value";
    const TYPE_LABEL: &'static str = "Related identifier type";
    const RELATION_TYPE_LABEL: &'static str = "Related identifier relation type";
    const NAME_LABEL: &'static str = "Related identifier name";

    /// Create an unnamed related identifier.
    pub fn new(
        value: impl Into<String>,
        identifier_type: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            value: BoundedText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type)?,
            relation_type: Self::check_relation_type(relation_type)?,
            name: None,
        })
    }

    /// Builder method to add a name
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        self.set_name(Some(name.into()))?;
        Ok(self)
    }

    /// The related identifier value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// The identifier type token
    pub fn identifier_type(&self) -> &str {
        &self.identifier_type
    }

    /// How the related resource relates to the instrument
    pub fn relation_type(&self) -> &str {
        &self.relation_type
    }

    /// Optional display name
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(NonEmptyText::as_str)
    }

    /// Validate and replace the value
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.value = BoundedText::parse(Self::VALUE_LABEL, value)?;
        Ok(())
    }

    /// Validate and replace the identifier type token
    pub fn set_identifier_type(&mut self, identifier_type: impl Into<String>) -> Result<()> {
        self.identifier_type = Self::check_type(identifier_type)?;
        Ok(())
    }

    /// Validate and replace the relation type token
    pub fn set_relation_type(&mut self, relation_type: impl Into<String>) -> Result<()> {
        self.relation_type = Self::check_relation_type(relation_type)?;
        Ok(())
    }

    /// `None` clears the name; `Some("")` is rejected.
    pub fn set_name(&mut self, name: Option<String>) -> Result<()> {
        self.name = name
            .map(|n| NonEmptyText::parse(Self::NAME_LABEL, n))
            .transpose()?;
        Ok(())
    }

    fn check_type(identifier_type: impl Into<String>) -> Result<String> {
        vocabulary_token(
            VocabularyKind::RelatedIdentifierType,
            Self::TYPE_LABEL,
            identifier_type,
        )
    }

    fn check_relation_type(relation_type: impl Into<String>) -> Result<String> {
        vocabulary_token(
            VocabularyKind::RelationType,
            Self::RELATION_TYPE_LABEL,
            relation_type,
        )
    }
}

impl Record for RelatedIdentifier {
    const ENTITY: &'static str = "RelatedIdentifier";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let value = take_field(&mut fields, VALUE).into_text(Self::VALUE_LABEL)?;
        let identifier_type = take_field(&mut fields, TYPE);
        let relation_type = take_field(&mut fields, RELATION_TYPE);
        let name = take_field(&mut fields, NAME);

        let mut related = Self {
            value: BoundedText::parse(Self::VALUE_LABEL, value)?,
            identifier_type: Self::check_type(identifier_type.into_text(Self::TYPE_LABEL)?)?,
            relation_type: Self::check_relation_type(
                relation_type.into_text(Self::RELATION_TYPE_LABEL)?,
            )?,
            name: None,
        };
        related.set_name(name.into_optional_text(Self::NAME_LABEL)?)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(related)
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            VALUE => Ok(self.value().into()),
            TYPE => Ok(self.identifier_type().into()),
            RELATION_TYPE => Ok(self.relation_type().into()),
            NAME => Ok(optional_text(self.name())),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            VALUE => value
                .into_text(Self::VALUE_LABEL)
                .and_then(|v| self.set_value(v)),
            TYPE => value
                .into_text(Self::TYPE_LABEL)
                .and_then(|v| self.set_identifier_type(v)),
            RELATION_TYPE => value
                .into_text(Self::RELATION_TYPE_LABEL)
                .and_then(|v| self.set_relation_type(v)),
            NAME => value
                .into_optional_text(Self::NAME_LABEL)
                .and_then(|v| self.set_name(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::RelatedIdentifier(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::RelatedIdentifier(identifier) => Ok(identifier),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for RelatedIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawRelatedIdentifier::deserialize(deserializer)?;
        let fields = fields! {
            VALUE => raw.value,
            TYPE => raw.identifier_type,
            RELATION_TYPE => raw.relation_type,
            NAME => raw.name,
        };
        Self::from_fields(fields).map_err(D::Error::custom)
    }
}

impl fmt::Display for RelatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Related Identifier {}", self.value)
    }
}
