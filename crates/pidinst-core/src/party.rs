//! Parties related to an instrument: owners, manufacturers and the model
//!
//! Each wraps a bounded name and an optional identifier of its own family.
//! Unlike the instrument PID, a party identifier may be replaced freely.

use crate::error::{PidInstError, Result};
use crate::fields;
use crate::identifier::{ManufacturerIdentifier, ModelIdentifier, OwnerIdentifier};
use crate::text::BoundedText;
use crate::value::{
    log_rejection, nested_record, optional_record, optional_text, reject_leftover, take_field,
    Entity, FieldMap, FieldValue, Record,
};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;

const NAME: &str = "name";
const CONTACT: &str = "contact";
const IDENTIFIER: &str = "identifier";

/// Serialized shape of a manufacturer or model.
#[derive(Deserialize)]
#[serde(deny_unknown_fields, expecting = "a manufacturer or model object")]
struct RawParty {
    #[serde(default)]
    name: serde_json::Value,
    #[serde(default)]
    identifier: serde_json::Value,
}

/// Institution or person that owns the instrument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Owner {
    name: BoundedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<OwnerIdentifier>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, expecting = "an owner object")]
struct RawOwner {
    #[serde(default)]
    name: serde_json::Value,
    #[serde(default)]
    contact: serde_json::Value,
    #[serde(default)]
    identifier: serde_json::Value,
}

impl Owner {
    const NAME_LABEL: &'static str = "Owner name";
    const CONTACT_LABEL: &'static str = "Owner contact";
    const IDENTIFIER_LABEL: &'static str = "Owner identifier";

    /// Create an owner, validating every attribute
    pub fn new(name: impl Into<String>, identifier: Option<OwnerIdentifier>) -> Result<Self> {
        Ok(Self {
            name: BoundedText::parse(Self::NAME_LABEL, name)?,
            contact: None,
            identifier,
        })
    }

    /// Builder method to add contact details (e.g. an email address)
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// The owner name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact details, if recorded
    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    /// The owner's identifier, if any
    pub fn identifier(&self) -> Option<&OwnerIdentifier> {
        self.identifier.as_ref()
    }

    /// Validate and replace the owner name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = BoundedText::parse(Self::NAME_LABEL, name)?;
        Ok(())
    }

    /// Replace or clear the contact details
    pub fn set_contact(&mut self, contact: Option<String>) {
        self.contact = contact;
    }

    /// Replace or clear the owner's identifier
    pub fn set_identifier(&mut self, identifier: Option<OwnerIdentifier>) {
        self.identifier = identifier;
    }
}

impl Record for Owner {
    const ENTITY: &'static str = "Owner";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let identifier =
            take_field(&mut fields, IDENTIFIER).into_optional_record(Self::IDENTIFIER_LABEL)?;
        let name = take_field(&mut fields, NAME).into_text(Self::NAME_LABEL)?;
        let mut owner = Self::new(name, identifier)?;
        owner.contact =
            take_field(&mut fields, CONTACT).into_optional_text(Self::CONTACT_LABEL)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(owner)
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            NAME => Ok(self.name().into()),
            CONTACT => Ok(optional_text(self.contact())),
            IDENTIFIER => Ok(optional_record(self.identifier())),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            NAME => value
                .into_text(Self::NAME_LABEL)
                .and_then(|v| self.set_name(v)),
            CONTACT => value
                .into_optional_text(Self::CONTACT_LABEL)
                .map(|v| self.set_contact(v)),
            IDENTIFIER => value
                .into_optional_record(Self::IDENTIFIER_LABEL)
                .map(|v| self.set_identifier(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::Owner(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::Owner(owner) => Ok(owner),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for Owner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawOwner::deserialize(deserializer)?;
        let fields = fields! {
            NAME => raw.name,
            CONTACT => raw.contact,
            IDENTIFIER => nested_record::<OwnerIdentifier, D::Error>(
                raw.identifier,
                Self::IDENTIFIER_LABEL,
            )?,
        };
        Self::from_fields(fields).map_err(D::Error::custom)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner {}", self.name)
    }
}

/// Organisation that built the instrument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Manufacturer {
    name: BoundedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<ManufacturerIdentifier>,
}

impl Manufacturer {
    const NAME_LABEL: &'static str = "Manufacturer name";
    const IDENTIFIER_LABEL: &'static str = "Manufacturer identifier";

    /// Create a manufacturer, validating every attribute
    pub fn new(
        name: impl Into<String>,
        identifier: Option<ManufacturerIdentifier>,
    ) -> Result<Self> {
        Ok(Self {
            name: BoundedText::parse(Self::NAME_LABEL, name)?,
            identifier,
        })
    }

    /// The manufacturer name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The manufacturer's identifier, if any
    pub fn identifier(&self) -> Option<&ManufacturerIdentifier> {
        self.identifier.as_ref()
    }

    /// Validate and replace the manufacturer name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = BoundedText::parse(Self::NAME_LABEL, name)?;
        Ok(())
    }

    /// Replace or clear the manufacturer's identifier
    pub fn set_identifier(&mut self, identifier: Option<ManufacturerIdentifier>) {
        self.identifier = identifier;
    }
}

impl Record for Manufacturer {
    const ENTITY: &'static str = "Manufacturer";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let identifier =
            take_field(&mut fields, IDENTIFIER).into_optional_record(Self::IDENTIFIER_LABEL)?;
        let name = take_field(&mut fields, NAME).into_text(Self::NAME_LABEL)?;
        let manufacturer = Self::new(name, identifier)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(manufacturer)
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            NAME => Ok(self.name().into()),
            IDENTIFIER => Ok(optional_record(self.identifier())),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            NAME => value
                .into_text(Self::NAME_LABEL)
                .and_then(|v| self.set_name(v)),
            IDENTIFIER => value
                .into_optional_record(Self::IDENTIFIER_LABEL)
                .map(|v| self.set_identifier(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::Manufacturer(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::Manufacturer(manufacturer) => Ok(manufacturer),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for Manufacturer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawParty::deserialize(deserializer)?;
        let identifier = nested_record::<ManufacturerIdentifier, D::Error>(
            raw.identifier,
            Self::IDENTIFIER_LABEL,
        )?;
        Self::from_fields(fields! { NAME => raw.name, IDENTIFIER => identifier })
            .map_err(D::Error::custom)
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Manufacturer {}", self.name)
    }
}

/// Instrument model (the product line an instrument instance belongs to).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Model {
    name: BoundedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<ModelIdentifier>,
}

impl Model {
    const NAME_LABEL: &'static str = "Model name";
    const IDENTIFIER_LABEL: &'static str = "Model identifier";

    /// Create a model, validating every attribute
    pub fn new(name: impl Into<String>, identifier: Option<ModelIdentifier>) -> Result<Self> {
        Ok(Self {
            name: BoundedText::parse(Self::NAME_LABEL, name)?,
            identifier,
        })
    }

    /// The model name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The model's identifier, if any
    pub fn identifier(&self) -> Option<&ModelIdentifier> {
        self.identifier.as_ref()
    }

    /// Validate and replace the model name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = BoundedText::parse(Self::NAME_LABEL, name)?;
        Ok(())
    }

    /// Replace or clear the model's identifier
    pub fn set_identifier(&mut self, identifier: Option<ModelIdentifier>) {
        self.identifier = identifier;
    }
}

impl Record for Model {
    const ENTITY: &'static str = "Model";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let identifier =
            take_field(&mut fields, IDENTIFIER).into_optional_record(Self::IDENTIFIER_LABEL)?;
        let name = take_field(&mut fields, NAME).into_text(Self::NAME_LABEL)?;
        let model = Self::new(name, identifier)?;
        reject_leftover(Self::ENTITY, fields)?;
        Ok(model)
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            NAME => Ok(self.name().into()),
            IDENTIFIER => Ok(optional_record(self.identifier())),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            NAME => value
                .into_text(Self::NAME_LABEL)
                .and_then(|v| self.set_name(v)),
            IDENTIFIER => value
                .into_optional_record(Self::IDENTIFIER_LABEL)
                .map(|v| self.set_identifier(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::Model(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::Model(model) => Ok(model),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawParty::deserialize(deserializer)?;
        let identifier =
            nested_record::<ModelIdentifier, D::Error>(raw.identifier, Self::IDENTIFIER_LABEL)?;
        Self::from_fields(fields! { NAME => raw.name, IDENTIFIER => identifier })
            .map_err(D::Error::custom)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::identifier::Identifier;

    fn orcid() -> OwnerIdentifier {
        OwnerIdentifier::new("0000-ABCD-1234-WXYZ", "ORCID").unwrap()
    }

    #[test]
    fn test_owner_with_identifier() {
        let owner = Owner::new("Jane Doe", Some(orcid()))
            .unwrap()
            .with_contact("jane.doe@email.com");
        assert_eq!(owner.name(), "Jane Doe");
        assert_eq!(owner.contact(), Some("jane.doe@email.com"));
        assert_eq!(owner.identifier().map(|i| i.value()), Some("0000-ABCD-1234-WXYZ"));
        assert_eq!(owner.to_string(), "Owner Jane Doe");
    }

    #[test]
    fn test_owner_empty_name() {
        let err = Owner::new("", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
        assert_eq!(err.to_string(), "Owner name cannot be an empty string");
    }

    #[test]
    fn test_owner_wrong_identifier_family() {
        let mut owner = Owner::new("Jane Doe", None).unwrap();
        let wrong = Identifier::new("10.1000/x", "DOI").unwrap();
        let err = owner.set_field(IDENTIFIER, wrong.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "Owner identifier must be an instance of OwnerIdentifier"
        );
        assert!(owner.identifier().is_none());
    }

    #[test]
    fn test_owner_missing_name() {
        let err = Owner::from_fields(fields! { CONTACT => "jane@example.org" }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.to_string(), "Owner name is required");
    }

    #[test]
    fn test_manufacturer_identifier_replace() {
        let mut manufacturer = Manufacturer::new("Acme Inc", None).unwrap();
        let first = ManufacturerIdentifier::new("https://www.acme.com", "URL").unwrap();
        let second = ManufacturerIdentifier::new("https://ror.org/03yrm5c26", "ROR").unwrap();

        manufacturer.set_identifier(Some(first));
        manufacturer.set_identifier(Some(second.clone()));
        assert_eq!(manufacturer.identifier(), Some(&second));
    }

    #[test]
    fn test_manufacturer_name_bounds() {
        assert!(Manufacturer::new("M".repeat(199), None).is_ok());
        let err = Manufacturer::new("M".repeat(200), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        let err = Manufacturer::new("", None).unwrap_err();
        assert_eq!(err.to_string(), "Manufacturer name cannot be an empty string");
    }

    #[test]
    fn test_model_identifier_replace() {
        let mut model = Model::new(
            "Model XYZ",
            Some(ModelIdentifier::new("ABC123", "URL").unwrap()),
        )
        .unwrap();
        model
            .set_field(IDENTIFIER, ModelIdentifier::new("DEF456", "URL").unwrap().into())
            .unwrap();
        assert_eq!(model.identifier().map(|i| i.value()), Some("DEF456"));

        model.set_field(IDENTIFIER, FieldValue::Null).unwrap();
        assert!(model.identifier().is_none());
    }

    #[test]
    fn test_model_name_type_mismatch() {
        let mut model = Model::new("Model XYZ", None).unwrap();
        let err = model.set_field(NAME, FieldValue::Number(3.0)).unwrap_err();
        assert_eq!(err.to_string(), "Model name must be a string");
        assert_eq!(model.name(), "Model XYZ");
    }

    #[test]
    fn test_deserialize_owner_nested_identifier() {
        let owner: Owner = serde_json::from_str(
            r#"{"name": "Jane Doe", "identifier": {"value": "0000-0001", "type": "ORCID"}}"#,
        )
        .unwrap();
        assert_eq!(owner.identifier().map(|i| i.identifier_type()), Some("ORCID"));

        let err = serde_json::from_str::<Owner>(r#"{"name": ""}"#).unwrap_err();
        assert!(err.to_string().contains("Owner name cannot be an empty string"));
    }

    #[test]
    fn test_manufacturer_missing_name() {
        let mut manufacturer = Manufacturer::new("Acme Inc", None).unwrap();
        let err = manufacturer.set_field(NAME, FieldValue::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.to_string(), "Manufacturer name is required");
        assert_eq!(manufacturer.name(), "Acme Inc");

        let err = Manufacturer::from_fields(FieldMap::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn test_model_missing_name() {
        let mut model = Model::new("Model XYZ", None).unwrap();
        let err = model.set_field(NAME, FieldValue::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.to_string(), "Model name is required");
        assert_eq!(model.name(), "Model XYZ");
    }

    #[test]
    fn test_deserialize_identifier_wrong_shape() {
        let json = r#"{"name": "Jane Doe", "identifier": "0000-0001"}"#;
        let err = serde_json::from_str::<Owner>(json).unwrap_err();
        assert!(err
            .to_string()
            .contains("Owner identifier must be an instance of OwnerIdentifier"));

        let err = serde_json::from_str::<Model>(r#"{"name": "Model XYZ", "identifier": 3}"#)
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("Model identifier must be an instance of ModelIdentifier"));
    }
}
