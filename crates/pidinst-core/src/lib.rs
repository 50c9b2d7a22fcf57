//! PIDInst Core - validated metadata records for research instruments
//!
//! This crate models the PIDInst 1.0 instrument record as plain Rust values
//! whose every write goes through a validator:
//!
//! - **Instrument**: The record itself, with a write-once PID, landing page,
//!   name, description, model and ordered owner/manufacturer/related lists
//! - **Parties**: Owner, Manufacturer and Model, each named and optionally identified
//! - **Identifiers**: Instrument PID, owner/manufacturer/model identifiers and
//!   related identifiers, type-checked against controlled vocabularies
//! - **Vocabularies**: Built-in PIDInst token sets, replaceable once per process
//!   from TOML or JSON
//! - **Completeness**: Which mandatory PIDInst properties a record still lacks
//!
//! # Typed and dynamic access
//!
//! The typed API (`Instrument::set_identifier`, `Owner::new`, ...) rejects
//! wrong-type arguments at compile time. Harvested or scripted input goes
//! through [`FieldValue`] and the [`Record`] trait, which add runtime type
//! checks on top of the same validators.
//!
//! ```
//! use pidinst_core::{Identifier, Instrument, Manufacturer, Owner};
//!
//! let mut instrument = Instrument::new("Instrument XYZ")?
//!     .with_landing_page("https://www.landingpage.com")?;
//! instrument.set_identifier(Identifier::new("10.1000/retwebwb", "DOI")?)?;
//! instrument.append_owner(Owner::new("Jane Doe", None)?);
//! instrument.append_manufacturer(Manufacturer::new("Acme Inc", None)?);
//! assert!(instrument.is_valid_pidinst());
//! # Ok::<(), pidinst_core::PidInstError>(())
//! ```

pub mod completeness;
pub mod error;
pub mod identifier;
pub mod instrument;
pub mod party;
pub mod text;
pub mod value;
pub mod vocab;

pub use completeness::MandatoryField;
pub use error::{ConfigError, ErrorKind, PidInstError, Result};
pub use identifier::*;
pub use instrument::{Instrument, SCHEMA_VERSION};
pub use party::*;
pub use text::{BoundedText, NonEmptyText, MAX_TEXT_LEN};
pub use value::{Entity, FieldMap, FieldValue, Record};
pub use vocab::*;
