//! The instrument record
//!
//! `Instrument` is the aggregate root of a PIDInst record. It owns its
//! identifier, model and party collections outright; nothing it holds points
//! back at it.

use crate::error::{PidInstError, Result};
use crate::fields;
use crate::identifier::{Identifier, RelatedIdentifier};
use crate::party::{Manufacturer, Model, Owner};
use crate::text::BoundedText;
use crate::value::{
    log_rejection, nested_record, nested_record_list, optional_record, optional_text,
    record_list, reject_leftover, take_field, Entity, FieldMap, FieldValue, Record,
};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;

/// PIDInst schema version modelled by this crate.
pub const SCHEMA_VERSION: &str = "1.0";

const IDENTIFIER: &str = "identifier";
const LANDING_PAGE: &str = "landing_page";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const MODEL: &str = "model";
const OWNERS: &str = "owners";
const MANUFACTURERS: &str = "manufacturers";
const RELATED_IDENTIFIERS: &str = "related_identifiers";
const SCHEMA_VERSION_FIELD: &str = "schema_version";

/// A research instrument record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Instrument {
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    landing_page: Option<String>,
    name: BoundedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<Model>,
    owners: Vec<Owner>,
    manufacturers: Vec<Manufacturer>,
    related_identifiers: Vec<RelatedIdentifier>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, expecting = "an instrument object")]
struct RawInstrument {
    #[serde(default)]
    identifier: serde_json::Value,
    #[serde(default)]
    landing_page: serde_json::Value,
    #[serde(default)]
    name: serde_json::Value,
    #[serde(default)]
    description: serde_json::Value,
    #[serde(default)]
    model: serde_json::Value,
    #[serde(default)]
    owners: serde_json::Value,
    #[serde(default)]
    manufacturers: serde_json::Value,
    #[serde(default)]
    related_identifiers: serde_json::Value,
}

impl Instrument {
    const IDENTIFIER_LABEL: &'static str = "Instrument identifier";
    const LANDING_PAGE_LABEL: &'static str = "Instrument landing page";
    const NAME_LABEL: &'static str = "Instrument name";
    const DESCRIPTION_LABEL: &'static str = "Instrument description";
    const MODEL_LABEL: &'static str = "Instrument model";
    const OWNERS_LABEL: &'static str = "Instrument owners";
    const MANUFACTURERS_LABEL: &'static str = "Instrument manufacturers";
    const RELATED_IDENTIFIERS_LABEL: &'static str = "Instrument related identifiers";

    /// Create a record with only its name; everything else starts absent or empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            identifier: None,
            landing_page: None,
            name: BoundedText::parse(Self::NAME_LABEL, name)?,
            description: None,
            model: None,
            owners: Vec::new(),
            manufacturers: Vec::new(),
            related_identifiers: Vec::new(),
        })
    }

    /// Builder method to allocate the PID
    pub fn with_identifier(mut self, identifier: Identifier) -> Result<Self> {
        self.set_identifier(identifier)?;
        Ok(self)
    }

    /// Builder method to set the landing page
    pub fn with_landing_page(mut self, landing_page: impl Into<String>) -> Result<Self> {
        self.set_landing_page(Some(landing_page.into()))?;
        Ok(self)
    }

    /// Builder method to add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the model
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Builder method to append an owner
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owners.push(owner);
        self
    }

    /// Builder method to append a manufacturer
    pub fn with_manufacturer(mut self, manufacturer: Manufacturer) -> Self {
        self.manufacturers.push(manufacturer);
        self
    }

    /// Builder method to append a related identifier
    pub fn with_related_identifier(mut self, related: RelatedIdentifier) -> Self {
        self.related_identifiers.push(related);
        self
    }

    /// The allocated PID, if any
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Landing page URL, if set
    pub fn landing_page(&self) -> Option<&str> {
        self.landing_page.as_deref()
    }

    /// The instrument name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-text description, if set
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The instrument model, if set
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Owners in insertion order
    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    /// Manufacturers in insertion order
    pub fn manufacturers(&self) -> &[Manufacturer] {
        &self.manufacturers
    }

    /// Related identifiers in insertion order
    pub fn related_identifiers(&self) -> &[RelatedIdentifier] {
        &self.related_identifiers
    }

    /// The PIDInst schema version, identical for every record.
    pub fn schema_version(&self) -> &'static str {
        SCHEMA_VERSION
    }

    /// Allocate the record's PID. The identifier is write-once: any further
    /// attempt fails with `AlreadySet`, even with an equal value.
    pub fn set_identifier(&mut self, identifier: Identifier) -> Result<()> {
        if self.identifier.is_some() {
            return Err(self.refuse_identifier());
        }
        self.identifier = Some(identifier);
        Ok(())
    }

    /// Landing pages must start with "http", which admits https as well.
    pub fn set_landing_page(&mut self, landing_page: Option<String>) -> Result<()> {
        self.landing_page = landing_page.map(parse_landing_page).transpose()?;
        Ok(())
    }

    /// Validate and replace the instrument name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = BoundedText::parse(Self::NAME_LABEL, name)?;
        Ok(())
    }

    /// Replace or clear the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replace or clear the model
    pub fn set_model(&mut self, model: Option<Model>) {
        self.model = model;
    }

    /// Replace the owner list
    pub fn set_owners(&mut self, owners: Vec<Owner>) {
        self.owners = owners;
    }

    /// Replace the manufacturer list
    pub fn set_manufacturers(&mut self, manufacturers: Vec<Manufacturer>) {
        self.manufacturers = manufacturers;
    }

    /// Replace the related identifier list
    pub fn set_related_identifiers(&mut self, related_identifiers: Vec<RelatedIdentifier>) {
        self.related_identifiers = related_identifiers;
    }

    /// Append an owner after the existing ones
    pub fn append_owner(&mut self, owner: Owner) {
        self.owners.push(owner);
    }

    /// Append a manufacturer after the existing ones
    pub fn append_manufacturer(&mut self, manufacturer: Manufacturer) {
        self.manufacturers.push(manufacturer);
    }

    /// Append a related identifier after the existing ones
    pub fn append_related_identifier(&mut self, related: RelatedIdentifier) {
        self.related_identifiers.push(related);
    }

    /// Append a dynamically typed element to one of the collections.
    ///
    /// `collection` is "owners", "manufacturers" or "related_identifiers".
    /// A value of the wrong type leaves the collection untouched.
    pub fn append_field(&mut self, collection: &str, value: FieldValue) -> Result<()> {
        match collection {
            OWNERS => value.into_record("owner").map(|v| self.append_owner(v)),
            MANUFACTURERS => value
                .into_record("manufacturer")
                .map(|v| self.append_manufacturer(v)),
            RELATED_IDENTIFIERS => value
                .into_record("related identifier")
                .map(|v| self.append_related_identifier(v)),
            _ => Err(PidInstError::unknown(Self::ENTITY, collection)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, collection, err))
    }

    /// Dynamic identifier write. The write-once check runs before the type
    /// check; `Null` is a no-op only while no identifier is allocated.
    fn assign_identifier(&mut self, value: FieldValue) -> Result<()> {
        if self.identifier.is_some() {
            return Err(self.refuse_identifier());
        }
        match value.into_optional_record(Self::IDENTIFIER_LABEL)? {
            Some(identifier) => self.set_identifier(identifier),
            None => Ok(()),
        }
    }

    fn refuse_identifier(&self) -> PidInstError {
        tracing::warn!(
            instrument = %self.name,
            "refusing to replace an allocated instrument identifier"
        );
        PidInstError::AlreadySet {
            entity: Self::ENTITY.to_string(),
            field: IDENTIFIER.to_string(),
        }
    }
}

fn parse_landing_page(landing_page: String) -> Result<String> {
    if landing_page.starts_with("http") {
        Ok(landing_page)
    } else {
        Err(PidInstError::InvalidFormat {
            field: Instrument::LANDING_PAGE_LABEL.to_string(),
            reason: "must start with either http or https".to_string(),
        })
    }
}

fn read_only() -> PidInstError {
    PidInstError::ReadOnly {
        entity: Instrument::ENTITY.to_string(),
        field: SCHEMA_VERSION_FIELD.to_string(),
    }
}

impl Record for Instrument {
    const ENTITY: &'static str = "Instrument";

    fn from_fields(mut fields: FieldMap) -> Result<Self> {
        let identifier =
            take_field(&mut fields, IDENTIFIER).into_optional_record(Self::IDENTIFIER_LABEL)?;
        let landing_page = take_field(&mut fields, LANDING_PAGE)
            .into_optional_text(Self::LANDING_PAGE_LABEL)?
            .map(parse_landing_page)
            .transpose()?;
        let name = take_field(&mut fields, NAME).into_text(Self::NAME_LABEL)?;
        let name = BoundedText::parse(Self::NAME_LABEL, name)?;
        let owners = take_field(&mut fields, OWNERS)
            .into_record_list(Self::OWNERS_LABEL)?
            .unwrap_or_default();
        let manufacturers = take_field(&mut fields, MANUFACTURERS)
            .into_record_list(Self::MANUFACTURERS_LABEL)?
            .unwrap_or_default();
        let description =
            take_field(&mut fields, DESCRIPTION).into_optional_text(Self::DESCRIPTION_LABEL)?;
        let model = take_field(&mut fields, MODEL).into_optional_record(Self::MODEL_LABEL)?;
        let related_identifiers = take_field(&mut fields, RELATED_IDENTIFIERS)
            .into_record_list(Self::RELATED_IDENTIFIERS_LABEL)?
            .unwrap_or_default();
        if !take_field(&mut fields, SCHEMA_VERSION_FIELD).is_null() {
            return Err(read_only());
        }
        reject_leftover(Self::ENTITY, fields)?;

        Ok(Self {
            identifier,
            landing_page,
            name,
            description,
            model,
            owners,
            manufacturers,
            related_identifiers,
        })
    }

    fn get_field(&self, name: &str) -> Result<FieldValue> {
        match name {
            IDENTIFIER => Ok(optional_record(self.identifier())),
            LANDING_PAGE => Ok(optional_text(self.landing_page())),
            NAME => Ok(self.name().into()),
            DESCRIPTION => Ok(optional_text(self.description())),
            MODEL => Ok(optional_record(self.model())),
            OWNERS => Ok(record_list(self.owners())),
            MANUFACTURERS => Ok(record_list(self.manufacturers())),
            RELATED_IDENTIFIERS => Ok(record_list(self.related_identifiers())),
            SCHEMA_VERSION_FIELD => Ok(SCHEMA_VERSION.into()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            IDENTIFIER => self.assign_identifier(value),
            LANDING_PAGE => value
                .into_optional_text(Self::LANDING_PAGE_LABEL)
                .and_then(|v| self.set_landing_page(v)),
            NAME => value
                .into_text(Self::NAME_LABEL)
                .and_then(|v| self.set_name(v)),
            DESCRIPTION => value
                .into_optional_text(Self::DESCRIPTION_LABEL)
                .map(|v| self.set_description(v)),
            MODEL => value
                .into_optional_record(Self::MODEL_LABEL)
                .map(|v| self.set_model(v)),
            // Null clears a collection back to empty
            OWNERS => value
                .into_record_list(Self::OWNERS_LABEL)
                .map(|v| self.set_owners(v.unwrap_or_default())),
            MANUFACTURERS => value
                .into_record_list(Self::MANUFACTURERS_LABEL)
                .map(|v| self.set_manufacturers(v.unwrap_or_default())),
            RELATED_IDENTIFIERS => value
                .into_record_list(Self::RELATED_IDENTIFIERS_LABEL)
                .map(|v| self.set_related_identifiers(v.unwrap_or_default())),
            SCHEMA_VERSION_FIELD => Err(read_only()),
            _ => Err(PidInstError::unknown(Self::ENTITY, name)),
        }
        .inspect_err(|err| log_rejection(Self::ENTITY, name, err))
    }

    fn into_entity(self) -> Entity {
        Entity::Instrument(self)
    }

    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity> {
        match entity {
            Entity::Instrument(instrument) => Ok(instrument),
            other => Err(other),
        }
    }
}

impl<'de> Deserialize<'de> for Instrument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawInstrument::deserialize(deserializer)?;
        let fields = fields! {
            IDENTIFIER => nested_record::<Identifier, D::Error>(
                raw.identifier,
                Self::IDENTIFIER_LABEL,
            )?,
            LANDING_PAGE => raw.landing_page,
            NAME => raw.name,
            DESCRIPTION => raw.description,
            MODEL => nested_record::<Model, D::Error>(raw.model, Self::MODEL_LABEL)?,
            OWNERS => nested_record_list::<Owner, D::Error>(raw.owners, Self::OWNERS_LABEL)?,
            MANUFACTURERS => nested_record_list::<Manufacturer, D::Error>(
                raw.manufacturers,
                Self::MANUFACTURERS_LABEL,
            )?,
            RELATED_IDENTIFIERS => nested_record_list::<RelatedIdentifier, D::Error>(
                raw.related_identifiers,
                Self::RELATED_IDENTIFIERS_LABEL,
            )?,
        };
        Self::from_fields(fields).map_err(D::Error::custom)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instrument {}", self.name)
    }
}
