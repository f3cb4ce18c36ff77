//! DICOM decoding primitives for the dcmstream decoder.
//!
//! This crate provides the byte-level pieces of data set decoding:
//!
//! - [`decode`] reads data element headers
//!   in explicit or implicit VR, in either byte order,
//!   and turns raw values into [`Value`](dcmstream_core::Value)s
//!   with the [`ValueCodec`](decode::ValueCodec);
//! - [`text`] decodes text in the supported specific character sets;
//! - [`transfer_syntax`] holds the known transfer syntaxes
//!   and resolves a transfer syntax UID into a byte order and VR mode.
//!
//! For the time being, all APIs are based on synchronous I/O.

pub mod decode;
pub mod text;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use decode::{Decode, DynDecoder, ValueCodec};
pub use text::SpecificCharacterSet;
pub use transfer_syntax::TransferSyntax;
