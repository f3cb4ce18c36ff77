#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! This crate decodes DICOM data sets and files
//! into ordered collections of fully decoded data elements.
//!
//! - [`stream`] holds the data element stream decoder,
//!   which reads tags, value representations, lengths and values,
//!   recursing into sequences and encapsulated pixel data.
//! - [`state`] holds the parsing state passed down to nested decoders.
//! - [`file`] reads whole files:
//!   preamble, magic code, file meta group and main data set.
//!
//! For the time being, all APIs are based on synchronous I/O.
//!
//! ```no_run
//! use dcmstream_dictionary_std::tags;
//! use dcmstream_parser::OpenFileOptions;
//!
//! let bytes = std::fs::read("image.dcm")?;
//! let file = OpenFileOptions::new().skip_pixel_data(true).from_bytes(&bytes)?;
//! if let Some(name) = file.dataset().get(tags::PATIENT_NAME) {
//!     println!("{}", name.value().to_str());
//! }
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```

pub mod error;
pub mod file;
pub mod source;
pub mod state;
pub mod stream;

pub use error::{Error, Result};
pub use file::{DicomFile, FileMetaSummary, OpenFileOptions, ReadPreamble};
pub use source::PeekableSource;
pub use state::ParseState;
pub use stream::{DataSetDecoder, Step, DEFAULT_MAX_SEQUENCE_DEPTH};
