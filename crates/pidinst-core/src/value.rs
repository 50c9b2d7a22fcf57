//! Dynamically typed field access
//!
//! The typed API rejects wrong-type arguments at compile time. Values that
//! arrive from outside the type system (harvested JSON, scripting bridges)
//! go through [`FieldValue`] and the [`Record`] trait instead, which apply
//! the same validators plus the runtime type checks.

use crate::error::{PidInstError, Result};
use crate::identifier::{
    Identifier, ManufacturerIdentifier, ModelIdentifier, OwnerIdentifier, RelatedIdentifier,
};
use crate::instrument::Instrument;
use crate::party::{Manufacturer, Model, Owner};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Named field values, as passed to [`Record::from_fields`].
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A dynamically typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    /// Untyped key/value data; never accepted where an entity is expected
    Map(FieldMap),
    Entity(Box<Entity>),
}

/// Any model entity, for use inside a [`FieldValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Identifier(Identifier),
    OwnerIdentifier(OwnerIdentifier),
    ManufacturerIdentifier(ManufacturerIdentifier),
    ModelIdentifier(ModelIdentifier),
    RelatedIdentifier(RelatedIdentifier),
    Owner(Owner),
    Manufacturer(Manufacturer),
    Model(Model),
    Instrument(Instrument),
}

impl Entity {
    /// Entity type name, e.g. "OwnerIdentifier".
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Identifier(_) => Identifier::ENTITY,
            Entity::OwnerIdentifier(_) => OwnerIdentifier::ENTITY,
            Entity::ManufacturerIdentifier(_) => ManufacturerIdentifier::ENTITY,
            Entity::ModelIdentifier(_) => ModelIdentifier::ENTITY,
            Entity::RelatedIdentifier(_) => RelatedIdentifier::ENTITY,
            Entity::Owner(_) => Owner::ENTITY,
            Entity::Manufacturer(_) => Manufacturer::ENTITY,
            Entity::Model(_) => Model::ENTITY,
            Entity::Instrument(_) => Instrument::ENTITY,
        }
    }
}

/// Name-addressed attribute access shared by every entity.
pub trait Record: Sized {
    /// Entity type name used in error messages.
    const ENTITY: &'static str;

    /// Build from named fields. Absent required fields fail with
    /// `MissingField`; unrecognised names fail with `UnknownField`.
    fn from_fields(fields: FieldMap) -> Result<Self>;

    /// Read an attribute. Absent optional attributes read as `Null`.
    fn get_field(&self, name: &str) -> Result<FieldValue>;

    /// Validate and write an attribute. On failure the entity is unchanged.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()>;

    fn into_entity(self) -> Entity;

    /// Unwrap a matching entity, handing back anything else untouched.
    fn from_entity(entity: Entity) -> std::result::Result<Self, Entity>;
}

impl FieldValue {
    /// Short description of the runtime type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
            FieldValue::Entity(entity) => entity.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// `Null` reads as `None`; anything but text is a `TypeMismatch`.
    pub(crate) fn into_optional_text(self, field: &str) -> Result<Option<String>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(text) => Ok(Some(text)),
            _ => Err(PidInstError::mismatch(field, "a string")),
        }
    }

    /// Like [`Self::into_optional_text`] but `Null` is a `MissingField`.
    pub(crate) fn into_text(self, field: &str) -> Result<String> {
        self.into_optional_text(field)?
            .ok_or_else(|| PidInstError::missing(field))
    }

    pub(crate) fn into_optional_record<T: Record>(self, field: &str) -> Result<Option<T>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Entity(entity) => T::from_entity(*entity)
                .map(Some)
                .map_err(|_| instance_mismatch::<T>(field)),
            _ => Err(instance_mismatch::<T>(field)),
        }
    }

    pub(crate) fn into_record<T: Record>(self, field: &str) -> Result<T> {
        match self {
            FieldValue::Null => Err(instance_mismatch::<T>(field)),
            other => other
                .into_optional_record(field)?
                .ok_or_else(|| instance_mismatch::<T>(field)),
        }
    }

    /// A list whose every element is a `T`; no partial acceptance.
    pub(crate) fn into_record_list<T: Record>(self, field: &str) -> Result<Option<Vec<T>>> {
        let expected = || list_mismatch::<T>(field);
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::List(items) => items
                .into_iter()
                .map(|item| match item {
                    FieldValue::Entity(entity) => T::from_entity(*entity).map_err(|_| expected()),
                    _ => Err(expected()),
                })
                .collect::<Result<Vec<T>>>()
                .map(Some),
            _ => Err(expected()),
        }
    }
}

fn instance_mismatch<T: Record>(field: &str) -> PidInstError {
    PidInstError::mismatch(field, format!("an instance of {}", T::ENTITY))
}

fn list_mismatch<T: Record>(field: &str) -> PidInstError {
    PidInstError::mismatch(field, format!("a list of {} objects", T::ENTITY))
}

/// Deserialize a nested entity from JSON. Anything but an object or null
/// fails with a `TypeMismatch` naming `field`.
pub(crate) fn nested_record<T, E>(
    value: serde_json::Value,
    field: &str,
) -> std::result::Result<FieldValue, E>
where
    T: Record + DeserializeOwned,
    E: serde::de::Error,
{
    match value {
        serde_json::Value::Null => Ok(FieldValue::Null),
        serde_json::Value::Object(_) => serde_json::from_value::<T>(value)
            .map(|record| FieldValue::Entity(Box::new(record.into_entity())))
            .map_err(E::custom),
        _ => Err(E::custom(instance_mismatch::<T>(field))),
    }
}

/// Like [`nested_record`] for a JSON array of entities.
pub(crate) fn nested_record_list<T, E>(
    value: serde_json::Value,
    field: &str,
) -> std::result::Result<FieldValue, E>
where
    T: Record + DeserializeOwned,
    E: serde::de::Error,
{
    match value {
        serde_json::Value::Null => Ok(FieldValue::Null),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(_) => nested_record::<T, E>(item, field),
                _ => Err(E::custom(list_mismatch::<T>(field))),
            })
            .collect::<std::result::Result<Vec<_>, E>>()
            .map(FieldValue::List),
        _ => Err(E::custom(list_mismatch::<T>(field))),
    }
}

/// Remove a field from a constructor map; absent reads as `Null`.
pub(crate) fn take_field(fields: &mut FieldMap, name: &str) -> FieldValue {
    fields.remove(name).unwrap_or(FieldValue::Null)
}

/// Fail on any field a constructor did not consume.
pub(crate) fn reject_leftover(entity: &str, fields: FieldMap) -> Result<()> {
    match fields.into_keys().next() {
        Some(name) => Err(PidInstError::unknown(entity, &name)),
        None => Ok(()),
    }
}

pub(crate) fn log_rejection(entity: &str, field: &str, err: &PidInstError) {
    tracing::debug!(entity, field, kind = ?err.kind(), "rejected field assignment: {}", err);
}

pub(crate) fn optional_text(value: Option<&str>) -> FieldValue {
    value.map_or(FieldValue::Null, FieldValue::from)
}

pub(crate) fn optional_record<T: Record + Clone>(value: Option<&T>) -> FieldValue {
    value.map_or(FieldValue::Null, |v| {
        FieldValue::Entity(Box::new(v.clone().into_entity()))
    })
}

pub(crate) fn record_list<T: Record + Clone>(values: &[T]) -> FieldValue {
    FieldValue::List(
        values
            .iter()
            .map(|v| FieldValue::Entity(Box::new(v.clone().into_entity())))
            .collect(),
    )
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<Entity> for FieldValue {
    fn from(value: Entity) -> Self {
        FieldValue::Entity(Box::new(value))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl<T: Record> From<T> for Entity {
    fn from(value: T) -> Self {
        value.into_entity()
    }
}

impl<T: Record> From<T> for FieldValue {
    fn from(value: T) -> Self {
        FieldValue::Entity(Box::new(value.into_entity()))
    }
}

/// Build a [`FieldMap`] from `name => value` pairs.
///
/// ```
/// use pidinst_core::{fields, FieldValue};
/// let map = fields! { "value" => "10.1000/xyz", "type" => "DOI" };
/// assert_eq!(map.get("type"), Some(&FieldValue::from("DOI")));
/// ```
#[macro_export]
macro_rules! fields {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::FieldMap::new();
        $( map.insert(($name).to_string(), $crate::FieldValue::from($value)); )*
        map
    }};
}
