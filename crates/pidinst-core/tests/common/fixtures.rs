//! Shared builders and fixture loading for integration tests

use pidinst_core::{
    Identifier, Instrument, Manufacturer, ManufacturerIdentifier, Owner, OwnerIdentifier,
};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a harvested instrument record
#[allow(dead_code)]
pub fn load_record_fixture(name: &str) -> String {
    load_fixture(&format!("records/{}", name))
}

/// Instrument XYZ with its landing page and nothing else
#[allow(dead_code)]
pub fn instrument_xyz() -> Instrument {
    Instrument::new("Instrument XYZ")
        .unwrap()
        .with_landing_page("https://www.landingpage.com")
        .unwrap()
}

#[allow(dead_code)]
pub fn instrument_pid() -> Identifier {
    Identifier::new("10.1000/retwebwb", "DOI").unwrap()
}

#[allow(dead_code)]
pub fn acme() -> Manufacturer {
    Manufacturer::new(
        "Acme Inc",
        Some(ManufacturerIdentifier::new("https://www.acme.com", "URL").unwrap()),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn jane_doe() -> Owner {
    Owner::new(
        "Jane Doe",
        Some(OwnerIdentifier::new("0000-ABCD-1234-WXYZ", "ORCID").unwrap()),
    )
    .unwrap()
    .with_contact("jane.doe@email.com")
}
