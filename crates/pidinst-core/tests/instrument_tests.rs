//! Instrument record integration tests

mod common;

use common::fixtures::{acme, instrument_pid, instrument_xyz, jane_doe, load_record_fixture};
use pidinst_core::{
    fields, ErrorKind, FieldValue, Identifier, Instrument, MandatoryField, Manufacturer,
    ManufacturerIdentifier, Model, ModelIdentifier, Owner, OwnerIdentifier, Record,
    RelatedIdentifier,
};
use rstest::rstest;

// === Bounded names ===

type NameCtor = fn(String) -> pidinst_core::Result<()>;

fn owner_name(name: String) -> pidinst_core::Result<()> {
    Owner::new(name, None).map(drop)
}

fn manufacturer_name(name: String) -> pidinst_core::Result<()> {
    Manufacturer::new(name, None).map(drop)
}

fn model_name(name: String) -> pidinst_core::Result<()> {
    Model::new(name, None).map(drop)
}

fn instrument_name(name: String) -> pidinst_core::Result<()> {
    Instrument::new(name).map(drop)
}

fn identifier_value(value: String) -> pidinst_core::Result<()> {
    Identifier::new(value, "DOI").map(drop)
}

fn related_identifier_value(value: String) -> pidinst_core::Result<()> {
    RelatedIdentifier::new(value, "DOI", "IsDescribedBy").map(drop)
}

#[rstest]
#[case::owner(owner_name as NameCtor)]
#[case::manufacturer(manufacturer_name as NameCtor)]
#[case::model(model_name as NameCtor)]
#[case::instrument(instrument_name as NameCtor)]
#[case::identifier(identifier_value as NameCtor)]
#[case::related_identifier(related_identifier_value as NameCtor)]
fn test_bounded_text_boundary(#[case] build: NameCtor) {
    assert_eq!(build(String::new()).unwrap_err().kind(), ErrorKind::EmptyValue);
    assert!(build("x".repeat(199)).is_ok());
    assert_eq!(build("x".repeat(200)).unwrap_err().kind(), ErrorKind::OutOfRange);
}

#[test]
fn test_length_counts_characters_not_bytes() {
    assert!(Instrument::new("é".repeat(199)).is_ok());
}

#[test]
fn test_party_identifier_values_have_no_ceiling() {
    let long = "x".repeat(500);
    assert!(OwnerIdentifier::new(long.as_str(), "URL").is_ok());
    assert!(ManufacturerIdentifier::new(long.as_str(), "URL").is_ok());
    assert!(ModelIdentifier::new(long.as_str(), "URL").is_ok());
    assert_eq!(
        OwnerIdentifier::new("", "URL").unwrap_err().kind(),
        ErrorKind::EmptyValue
    );
}

// === Controlled vocabularies ===

#[rstest]
#[case("DOI")]
#[case("Handle")]
fn test_instrument_identifier_type_stored_verbatim(#[case] token: &str) {
    let identifier = Identifier::new("10.1000/x", token).unwrap();
    assert_eq!(identifier.identifier_type(), token);
}

#[rstest]
#[case::lowercase("doi")]
#[case::unknown("ARK")]
#[case::padded(" DOI")]
fn test_instrument_identifier_type_rejected(#[case] token: &str) {
    let err = Identifier::new("10.1000/x", token).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    assert_eq!(err.field(), "Identifier type");
}

#[rstest]
#[case("ORCID", true)]
#[case("ROR", true)]
#[case("Crossref Funder ID", true)]
#[case("DOI", false)]
fn test_owner_identifier_types(#[case] token: &str, #[case] accepted: bool) {
    let result = OwnerIdentifier::new("some-id", token);
    assert_eq!(result.is_ok(), accepted);
    if let Ok(identifier) = result {
        assert_eq!(identifier.identifier_type(), token);
    }
}

#[rstest]
#[case("ROR", true)]
#[case("URL", true)]
#[case("ORCID", false)]
fn test_manufacturer_identifier_types(#[case] token: &str, #[case] accepted: bool) {
    let result = ManufacturerIdentifier::new("some-id", token);
    assert_eq!(result.is_ok(), accepted);
    if let Err(err) = result {
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    }
}

#[rstest]
#[case("RRID", "IsDescribedBy")]
#[case("DOI", "HasComponent")]
#[case("URL", "WasUsedIn")]
fn test_related_identifier_tokens(#[case] identifier_type: &str, #[case] relation: &str) {
    let related = RelatedIdentifier::new("ref-1", identifier_type, relation).unwrap();
    assert_eq!(related.identifier_type(), identifier_type);
    assert_eq!(related.relation_type(), relation);
}

#[test]
fn test_related_identifier_type_rejected() {
    let err = RelatedIdentifier::new("10.1000/x", "Bogus", "References").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    assert_eq!(err.field(), "Related identifier type");

    let mut related = RelatedIdentifier::new("10.1000/x", "DOI", "References").unwrap();
    let err = related.set_identifier_type("Bogus").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    assert_eq!(err.field(), "Related identifier type");
    assert_eq!(related.identifier_type(), "DOI");

    let err = related.set_relation_type("Bogus").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    assert_eq!(related.relation_type(), "References");
}

#[test]
fn test_model_identifier_type_unchecked_by_default() {
    let identifier = ModelIdentifier::new("ABC123", "Catalogue number").unwrap();
    assert_eq!(identifier.identifier_type(), "Catalogue number");
}

// === Write-once identifier ===

#[test]
fn test_identifier_write_once() {
    let mut instrument = instrument_xyz();
    instrument.set_identifier(instrument_pid()).unwrap();

    let other = Identifier::new("10.1000/other", "DOI").unwrap();
    let err = instrument.set_identifier(other).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadySet);
    let err = instrument.set_identifier(instrument_pid()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadySet);
    assert_eq!(instrument.identifier(), Some(&instrument_pid()));
}

// === Landing page ===

#[test]
fn test_landing_page() {
    let mut instrument = Instrument::new("Instrument XYZ").unwrap();
    instrument
        .set_landing_page(Some("https://x.org".to_string()))
        .unwrap();

    let err = instrument
        .set_landing_page(Some("ftp://x.org".to_string()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);

    let err = instrument
        .set_field("landing_page", FieldValue::Bool(true))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(instrument.landing_page(), Some("https://x.org"));

    instrument.set_landing_page(None).unwrap();
    assert!(instrument.landing_page().is_none());
}

// === Collections ===

#[test]
fn test_append_preserves_insertion_order() {
    let mut instrument = instrument_xyz();
    let a = Owner::new("A", None).unwrap();
    let b = Owner::new("B", None).unwrap();
    instrument.append_owner(a.clone());
    instrument.append_owner(b.clone());
    instrument.append_owner(a.clone());
    assert_eq!(instrument.owners(), &[a.clone(), b, a]);

    let first = RelatedIdentifier::new("10.1000/1", "DOI", "References").unwrap();
    let second = RelatedIdentifier::new("10.1000/2", "DOI", "IsNewVersionOf").unwrap();
    instrument.append_related_identifier(first.clone());
    instrument.append_related_identifier(second.clone());
    assert_eq!(instrument.related_identifiers(), &[first, second]);
}

#[rstest]
#[case::owners("owners")]
#[case::manufacturers("manufacturers")]
#[case::related_identifiers("related_identifiers")]
fn test_append_wrong_type_leaves_collection_unchanged(#[case] collection: &str) {
    let mut instrument = instrument_xyz();
    instrument.append_owner(jane_doe());
    instrument.append_manufacturer(acme());
    let before = instrument.clone();

    let err = instrument
        .append_field(collection, instrument_pid().into())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    let err = instrument
        .append_field(collection, FieldValue::from("Jane Doe"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(instrument, before);
}

#[test]
fn test_append_field_accepts_matching_entity() {
    let mut instrument = instrument_xyz();
    instrument.append_field("owners", jane_doe().into()).unwrap();
    instrument
        .append_field("manufacturers", acme().into())
        .unwrap();
    assert_eq!(instrument.owners().len(), 1);
    assert_eq!(instrument.manufacturers()[0].name(), "Acme Inc");
}

#[test]
fn test_collections_are_per_instance() {
    let mut first = Instrument::new("First").unwrap();
    let second = Instrument::new("Second").unwrap();
    first.append_owner(jane_doe());
    assert!(second.owners().is_empty());
}

// === Dynamic construction ===

#[test]
fn test_from_fields_builds_full_record() {
    let instrument = Instrument::from_fields(fields! {
        "identifier" => instrument_pid(),
        "landing_page" => "https://www.landingpage.com",
        "name" => "Instrument XYZ",
        "owners" => vec![jane_doe()],
        "manufacturers" => vec![acme()],
        "description" => "Benchtop X-ray diffractometer",
    })
    .unwrap();
    assert!(instrument.is_valid_pidinst());
    assert_eq!(
        instrument.get_field("description").unwrap(),
        FieldValue::from("Benchtop X-ray diffractometer")
    );
    assert!(instrument.get_field("model").unwrap().is_null());
}

#[test]
fn test_from_fields_rejects_untyped_maps() {
    let owner = serde_json::json!({"name": "Jane Doe"});
    let err = Instrument::from_fields(fields! {
        "name" => "Instrument XYZ",
        "owners" => FieldValue::List(vec![owner.into()]),
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        err.to_string(),
        "Instrument owners must be a list of Owner objects"
    );
}

#[test]
fn test_unknown_field() {
    let mut owner = jane_doe();
    let err = owner.set_field("email", FieldValue::from("x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert!(owner.get_field("email").is_err());
}

// === Completeness ===

#[test]
fn test_is_valid_pidinst_idempotent() {
    let instrument = instrument_xyz();
    let first = instrument.is_valid_pidinst();
    for _ in 0..3 {
        assert_eq!(instrument.is_valid_pidinst(), first);
    }
}

#[test]
fn test_scenario_complete_record_is_valid() {
    let mut instrument = instrument_xyz();
    instrument.set_identifier(instrument_pid()).unwrap();
    instrument.append_manufacturer(acme());
    instrument.append_owner(jane_doe());
    assert!(instrument.is_valid_pidinst());
}

#[test]
fn test_scenario_missing_identifier_is_invalid() {
    let mut instrument = instrument_xyz();
    instrument.append_manufacturer(acme());
    instrument.append_owner(jane_doe());
    assert!(!instrument.is_valid_pidinst());
    assert_eq!(
        instrument.missing_mandatory_fields(),
        vec![MandatoryField::Identifier]
    );
}

#[test]
fn test_scenario_missing_owner_is_invalid() {
    let mut instrument = instrument_xyz();
    instrument.set_identifier(instrument_pid()).unwrap();
    instrument.append_manufacturer(acme());
    assert!(!instrument.is_valid_pidinst());
}

#[test]
fn test_scenario_empty_owner_name() {
    let err = Owner::new("", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyValue);
    assert_eq!(err.to_string(), "Owner name cannot be an empty string");
}

#[test]
fn test_scenario_bogus_relation_type() {
    let err = RelatedIdentifier::new("10.1000/x", "DOI", "Bogus").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    assert_eq!(err.field(), "Related identifier relation type");
}

// === Harvested records ===

#[test]
fn test_load_complete_record() {
    let instrument: Instrument =
        serde_json::from_str(&load_record_fixture("complete.json")).unwrap();
    assert_eq!(instrument.name(), "Instrument XYZ");
    assert_eq!(instrument.model().map(|m| m.name()), Some("Model XYZ"));
    assert_eq!(instrument.owners()[0].contact(), Some("jane.doe@email.com"));
    assert_eq!(
        instrument.related_identifiers()[0].name(),
        Some("Operator manual")
    );
    assert!(instrument.is_valid_pidinst());
}

#[test]
fn test_load_record_missing_owners() {
    let instrument: Instrument =
        serde_json::from_str(&load_record_fixture("missing_owners.json")).unwrap();
    assert_eq!(
        instrument.missing_mandatory_fields(),
        vec![MandatoryField::Owners]
    );
}

#[test]
fn test_load_record_bad_relation_type() {
    let err = serde_json::from_str::<Instrument>(&load_record_fixture("bad_relation_type.json"))
        .unwrap_err();
    assert!(err.to_string().contains("Related identifier relation type"));
}
