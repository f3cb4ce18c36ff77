#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of dcmstream,
//! containing the data structures shared by the DICOM element stream decoder.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the data types for DICOM element headers,
//!   including DICOM tags, value representations and their decoding kinds,
//!   value lengths, and decoded data elements.
//! - [`dictionary`] describes common behavior of DICOM data dictionaries,
//!   which translate tags (and private creators) to attribute information.
//! - [`value`] holds the decoded values of data elements.
//! - [`dataset`] holds the ordered data set type.

pub mod dataset;
pub mod dictionary;
pub mod header;
pub mod value;

pub use dataset::DataSet;
pub use dictionary::{DataDictionary, TagInfo, ValueMultiplicity, VirtualVr};
pub use header::{DataElement, DataElementHeader, Length, NumericKind, Tag, VrKind, VR};
pub use value::{Scalar, Value};

// re-export crates that are part of the public API
pub use smallvec;
