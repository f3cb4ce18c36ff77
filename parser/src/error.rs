//! Errors raised while decoding DICOM data sets and files.

use dcmstream_core::{Tag, VR};
use dcmstream_encoding::decode::Error as DecodeError;
use dcmstream_encoding::transfer_syntax::Error as TransferSyntaxError;
use snafu::{Backtrace, Snafu};
use std::io;

/// The error type of the data set decoder and the file reader.
///
/// Positions are byte offsets from the start of the original source.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Could not read data element tag at {}", position))]
    ReadTag {
        position: u64,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Could not decode header of element {} at {}", tag, position))]
    DecodeElementHeader {
        tag: Tag,
        position: u64,
        #[snafu(backtrace)]
        source: DecodeError,
    },
    #[snafu(display(
        "Could not read {} value bytes for element {} at {}",
        len,
        tag,
        position
    ))]
    ReadValue {
        tag: Tag,
        len: u32,
        position: u64,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Undefined length is not allowed for {} element {} at {}", vr, tag, position))]
    UndefinedLengthForVr {
        tag: Tag,
        vr: VR,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read pixel data item header at {}", position))]
    ReadItemHeader {
        position: u64,
        #[snafu(backtrace)]
        source: DecodeError,
    },
    #[snafu(display("Could not read pixel data fragment of {} bytes at {}", len, position))]
    ReadFragment {
        len: u32,
        position: u64,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Unexpected tag {} in encapsulated pixel data at {}", tag, position))]
    UnexpectedFragmentTag {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Undefined pixel data fragment length at {}", position))]
    UndefinedFragmentLength { position: u64, backtrace: Backtrace },
    #[snafu(display("Sequence nesting exceeds {} levels at {}", depth, position))]
    MaxSequenceDepth {
        depth: u32,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not skip pixel data at {}", position))]
    SkipPixelData {
        position: u64,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Could not look ahead in the source at {}", position))]
    PeekData {
        position: u64,
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Could not read the file preamble"))]
    ReadPreamble {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Invalid DICOM file (magic code check failed)"))]
    InvalidMagic { backtrace: Backtrace },
    #[snafu(display("Missing transfer syntax UID in the file meta group"))]
    MissingTransferSyntax { backtrace: Backtrace },
    #[snafu(display("Could not resolve the transfer syntax of the file"))]
    ResolveTransferSyntax {
        #[snafu(backtrace)]
        source: TransferSyntaxError,
    },
}

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
