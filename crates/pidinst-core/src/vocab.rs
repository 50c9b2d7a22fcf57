//! Controlled vocabularies for identifier and relation types
//!
//! The built-in token sets follow PIDInst schema 1.0. A different set can be
//! loaded from TOML or JSON and installed once per process, before the first
//! validator reads it:
//!
//! ```toml
//! instrument_identifier_types = ["DOI", "Handle"]
//! owner_identifier_types = ["ORCID", "ROR", "URL"]
//! manufacturer_identifier_types = ["ROR", "URL"]
//! related_identifier_types = ["DOI", "URL"]
//! relation_types = ["IsDescribedBy", "HasComponent"]
//!
//! # optional; when absent model identifier types are not checked
//! model_identifier_types = ["URL"]
//! ```
//!
//! Sections left out of a file keep their built-in tokens. Matching is exact:
//! no case folding or whitespace trimming.

use crate::error::{ConfigError, PidInstError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Persistent identifier types accepted for the instrument itself.
pub const INSTRUMENT_IDENTIFIER_TYPES: &[&str] = &["DOI", "Handle"];

/// Identifier schemes accepted for instrument owners.
pub const OWNER_IDENTIFIER_TYPES: &[&str] = &[
    "Crossref Funder ID",
    "GRID",
    "ISNI",
    "ORCID",
    "RINGGOLD",
    "ROR",
    "URL",
    "Wikidata",
];

/// Identifier schemes accepted for manufacturers.
pub const MANUFACTURER_IDENTIFIER_TYPES: &[&str] = &[
    "Crossref Funder ID",
    "GRID",
    "ISNI",
    "RINGGOLD",
    "ROR",
    "URL",
    "Wikidata",
];

/// Identifier types accepted for related resources (DataCite list).
pub const RELATED_IDENTIFIER_TYPES: &[&str] = &[
    "ARK", "arXiv", "bibcode", "DOI", "EAN13", "EISSN", "Handle", "IGSN", "ISBN", "ISSN", "ISTC",
    "LISSN", "LSID", "PMID", "PURL", "RRID", "UPC", "URL", "URN", "w3id",
];

/// Relations between the instrument and a related resource.
pub const RELATION_TYPES: &[&str] = &[
    "IsDescribedBy",
    "IsNewVersionOf",
    "IsPreviousVersionOf",
    "HasComponent",
    "IsComponentOf",
    "References",
    "HasMetadata",
    "WasUsedIn",
    "IsIdenticalTo",
    "IsAttachedTo",
];

/// Names a controlled vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VocabularyKind {
    InstrumentIdentifierType,
    OwnerIdentifierType,
    ManufacturerIdentifierType,
    ModelIdentifierType,
    RelatedIdentifierType,
    RelationType,
}

impl VocabularyKind {
    /// Display name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::InstrumentIdentifierType => "instrument identifier type",
            Self::OwnerIdentifierType => "owner identifier type",
            Self::ManufacturerIdentifierType => "manufacturer identifier type",
            Self::ModelIdentifierType => "model identifier type",
            Self::RelatedIdentifierType => "related identifier type",
            Self::RelationType => "related identifier relation type",
        }
    }
}

/// The full set of controlled vocabularies consulted by validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabularies {
    pub instrument_identifier_types: BTreeSet<String>,
    pub owner_identifier_types: BTreeSet<String>,
    pub manufacturer_identifier_types: BTreeSet<String>,
    pub related_identifier_types: BTreeSet<String>,
    pub relation_types: BTreeSet<String>,
    /// `None` leaves model identifier types unchecked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_identifier_types: Option<BTreeSet<String>>,
}

fn token_set(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self {
            instrument_identifier_types: token_set(INSTRUMENT_IDENTIFIER_TYPES),
            owner_identifier_types: token_set(OWNER_IDENTIFIER_TYPES),
            manufacturer_identifier_types: token_set(MANUFACTURER_IDENTIFIER_TYPES),
            related_identifier_types: token_set(RELATED_IDENTIFIER_TYPES),
            relation_types: token_set(RELATION_TYPES),
            model_identifier_types: None,
        }
    }
}

impl Vocabularies {
    /// Tokens of a vocabulary, or `None` when that vocabulary is unchecked.
    pub fn tokens(&self, kind: VocabularyKind) -> Option<&BTreeSet<String>> {
        match kind {
            VocabularyKind::InstrumentIdentifierType => Some(&self.instrument_identifier_types),
            VocabularyKind::OwnerIdentifierType => Some(&self.owner_identifier_types),
            VocabularyKind::ManufacturerIdentifierType => Some(&self.manufacturer_identifier_types),
            VocabularyKind::ModelIdentifierType => self.model_identifier_types.as_ref(),
            VocabularyKind::RelatedIdentifierType => Some(&self.related_identifier_types),
            VocabularyKind::RelationType => Some(&self.relation_types),
        }
    }

    /// Exact membership test. Unchecked vocabularies accept every token.
    pub fn contains(&self, kind: VocabularyKind, token: &str) -> bool {
        self.tokens(kind).map_or(true, |set| set.contains(token))
    }

    /// Fail with `InvalidEnumValue` unless `value` belongs to `kind`.
    pub fn check(&self, kind: VocabularyKind, field: &str, value: &str) -> Result<()> {
        if self.contains(kind, value) {
            return Ok(());
        }
        Err(PidInstError::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
            vocabulary: kind.display_name().to_string(),
        })
    }

    /// Load vocabularies from a TOML string
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize vocabularies to TOML
    pub fn to_toml(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load vocabularies from a JSON string
    pub fn from_json(json_str: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize vocabularies to JSON
    pub fn to_json(&self) -> std::result::Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let vocabularies = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            Some("json") => Self::from_json(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        vocabularies.validate()?;
        Ok(vocabularies)
    }

    /// Reject empty vocabularies and blank or padded tokens.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let kinds = [
            VocabularyKind::InstrumentIdentifierType,
            VocabularyKind::OwnerIdentifierType,
            VocabularyKind::ManufacturerIdentifierType,
            VocabularyKind::ModelIdentifierType,
            VocabularyKind::RelatedIdentifierType,
            VocabularyKind::RelationType,
        ];
        for kind in kinds {
            let Some(tokens) = self.tokens(kind) else {
                continue;
            };
            if tokens.is_empty() {
                return Err(ConfigError::EmptyVocabulary(kind.display_name().to_string()));
            }
            if let Some(bad) = tokens.iter().find(|t| t.is_empty() || t.trim() != t.as_str()) {
                return Err(ConfigError::InvalidToken {
                    vocabulary: kind.display_name().to_string(),
                    token: bad.clone(),
                });
            }
        }
        Ok(())
    }
}

static ACTIVE: OnceCell<Vocabularies> = OnceCell::new();

/// The process-wide vocabularies.
///
/// Falls back to [`Vocabularies::default`] on first read if nothing was
/// installed; from then on the set is fixed.
pub fn vocabularies() -> &'static Vocabularies {
    ACTIVE.get_or_init(Vocabularies::default)
}

/// Install the process-wide vocabularies.
///
/// Must run before any validator reads them. Fails with
/// [`ConfigError::AlreadyInstalled`] on a second call or after first use.
pub fn install_vocabularies(
    vocabularies: Vocabularies,
) -> std::result::Result<&'static Vocabularies, ConfigError> {
    vocabularies.validate()?;
    ACTIVE
        .set(vocabularies)
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    let installed = self::vocabularies();
    tracing::info!(
        instrument_identifier_types = installed.instrument_identifier_types.len(),
        related_identifier_types = installed.related_identifier_types.len(),
        relation_types = installed.relation_types.len(),
        model_types_checked = installed.model_identifier_types.is_some(),
        "installed PIDInst vocabularies"
    );
    Ok(installed)
}
