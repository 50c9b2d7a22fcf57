//! PIDInst completeness check
//!
//! A record may be built up piecemeal; before it is registered the
//! mandatory PIDInst properties must all be present. Related identifiers
//! and the model stay optional.

use crate::instrument::Instrument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property PIDInst requires for registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandatoryField {
    Identifier,
    SchemaVersion,
    LandingPage,
    Name,
    Owners,
    Manufacturers,
}

impl MandatoryField {
    pub const ALL: [MandatoryField; 6] = [
        MandatoryField::Identifier,
        MandatoryField::SchemaVersion,
        MandatoryField::LandingPage,
        MandatoryField::Name,
        MandatoryField::Owners,
        MandatoryField::Manufacturers,
    ];

    /// Attribute name as used by the dynamic field API.
    pub fn field_name(&self) -> &'static str {
        match self {
            MandatoryField::Identifier => "identifier",
            MandatoryField::SchemaVersion => "schema_version",
            MandatoryField::LandingPage => "landing_page",
            MandatoryField::Name => "name",
            MandatoryField::Owners => "owners",
            MandatoryField::Manufacturers => "manufacturers",
        }
    }
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl Instrument {
    /// Mandatory properties this record still lacks, in declaration order.
    pub fn missing_mandatory_fields(&self) -> Vec<MandatoryField> {
        MandatoryField::ALL
            .into_iter()
            .filter(|field| !self.has_mandatory(*field))
            .collect()
    }

    /// True when every mandatory property is present.
    ///
    /// Pure: already-validated attributes are not re-checked.
    pub fn is_valid_pidinst(&self) -> bool {
        let missing = self.missing_mandatory_fields();
        if !missing.is_empty() {
            tracing::trace!(instrument = %self.name(), ?missing, "record is not PIDInst complete");
        }
        missing.is_empty()
    }

    fn has_mandatory(&self, field: MandatoryField) -> bool {
        match field {
            MandatoryField::Identifier => self.identifier().is_some(),
            MandatoryField::SchemaVersion => !self.schema_version().is_empty(),
            MandatoryField::LandingPage => self.landing_page().is_some(),
            MandatoryField::Name => !self.name().is_empty(),
            MandatoryField::Owners => !self.owners().is_empty(),
            MandatoryField::Manufacturers => !self.manufacturers().is_empty(),
        }
    }
}
