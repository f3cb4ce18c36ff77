//! This crate implements the standard DICOM data dictionary
//! used by the dcmstream decoder, along with tag and UID constants.
//!
//! ## Run-time dictionary
//!
//! - [`data_element`] contains the information about the
//!   DICOM attributes known to the decoder,
//!   including a table of vendor private attributes
//!   keyed by their private creator.
//!
//! The records are compiled into the binary as tab separated tables
//! (see [`table`] for their format)
//! and indexed once, on first use,
//! behind the unit type [`StandardDataDictionary`].
//!
//! ## Constants
//!
//! - [`tags`], which map an attribute alias to a DICOM tag
//! - [`uids`], for the transfer syntax unique identifiers
pub mod data_element;
pub mod table;
pub mod tags;
pub mod uids;

pub use data_element::{StandardDataDictionary, StandardDataDictionaryRegistry};
