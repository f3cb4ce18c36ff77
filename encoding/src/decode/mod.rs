//! This module contains the DICOM data element header decoding logic,
//! as well as the value codec.

use byteordered::Endianness;
use dcmstream_core::header::{DataElementHeader, Length};
use dcmstream_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit;
pub mod implicit;
pub mod value;

pub use self::explicit::ExplicitVrDecoder;
pub use self::implicit::ImplicitVrDecoder;
pub use self::value::ValueCodec;

/// Module-level error type:
/// for errors which may occur while decoding DICOM data element headers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header"))]
    ReadHeaderTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the item header"))]
    ReadItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes"))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field"))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's value representation"))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/** Type trait for reading and decoding basic data values from a data source.
 *
 * This trait aims to provide methods for reading binary numbers based on the
 * source's endianness. There are, and only will be, two
 * possible implementations (`LittleEndianBasicDecoder` and
 * `BigEndianBasicDecoder`), plus the run-time selected `BasicDecoder`.
 */
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S>(&self, source: S) -> io::Result<u16>
    where
        S: Read;

    /// Decode a sequence of unsigned shorts value from the given source
    /// into the given destination.
    fn decode_us_into<S>(&self, source: S, dst: &mut [u16]) -> io::Result<()>
    where
        S: Read;

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S>(&self, source: S) -> io::Result<u32>
    where
        S: Read;

    /// Decode an unsigned very long value from the given source.
    fn decode_uv<S>(&self, source: S) -> io::Result<u64>
    where
        S: Read;

    /// Decode a signed short value from the given source.
    fn decode_ss<S>(&self, source: S) -> io::Result<i16>
    where
        S: Read;

    /// Decode a signed long value from the given source.
    fn decode_sl<S>(&self, source: S) -> io::Result<i32>
    where
        S: Read;

    /// Decode a signed very long value from the given source.
    fn decode_sv<S>(&self, source: S) -> io::Result<i64>
    where
        S: Read;

    /// Decode a single precision float value from the given source.
    fn decode_fl<S>(&self, source: S) -> io::Result<f32>
    where
        S: Read;

    /// Decode a double precision float value from the given source.
    fn decode_fd<S>(&self, source: S) -> io::Result<f64>
    where
        S: Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, mut source: S) -> io::Result<Tag>
    where
        S: Read,
    {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(source)?;
        Ok(Tag(g, e))
    }
}

/** Type trait for reading and decoding DICOM data element headers.
 *
 * The specific behaviour of decoding, even when abstracted from the original source,
 * depends on the byte order and on whether value representations are explicit.
 */
pub trait Decode {
    /// Decode the rest of a data element header
    /// whose tag has already been read from the source.
    ///
    /// `creator` is the private creator reserving the element's block,
    /// if known, which implicit VR decoders use to resolve
    /// the value representation of private attributes.
    ///
    /// Item and delimiter tags (group `FFFE`) have no value representation
    /// in any transfer syntax:
    /// only their 4-byte length is read, and the VR is reported as `UN`.
    ///
    /// Returns the header and the number of bytes read after the tag.
    fn decode_header_rest<S>(
        &self,
        tag: Tag,
        creator: Option<&str>,
        source: &mut S,
    ) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next data element header from the given source.
    ///
    /// Returns the header and the exact number of bytes read from the source.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = self.decode_tag(source)?;
        let (header, read) = self.decode_header_rest(tag, None, source)?;
        Ok((header, read + 4))
    }

    /// Fetch and decode the next item header (tag and 4-byte length),
    /// as found in sequences and encapsulated pixel data.
    fn decode_item_header<S>(&self, source: &mut S) -> Result<(Tag, Length)>
    where
        S: ?Sized + Read;
}

/// A header decoder for any supported combination of byte order
/// and value representation encoding, decided at run-time.
#[derive(Debug, Clone)]
pub enum DynDecoder<D> {
    /// Explicit VR, in either byte order
    Explicit(ExplicitVrDecoder),
    /// Implicit VR, in either byte order
    Implicit(ImplicitVrDecoder<D>),
}

impl<D> DynDecoder<D> {
    /// Create a header decoder for the given encoding.
    pub fn new(endianness: Endianness, implicit_vr: bool, dict: D) -> Self {
        if implicit_vr {
            DynDecoder::Implicit(ImplicitVrDecoder::with_dict(endianness, dict))
        } else {
            DynDecoder::Explicit(ExplicitVrDecoder::new(endianness))
        }
    }

    /// Whether this decoder expects implicit value representations.
    pub fn is_implicit(&self) -> bool {
        matches!(self, DynDecoder::Implicit(_))
    }
}

impl<D> Decode for DynDecoder<D>
where
    D: dcmstream_core::DataDictionary,
{
    fn decode_header_rest<S>(
        &self,
        tag: Tag,
        creator: Option<&str>,
        source: &mut S,
    ) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        match self {
            DynDecoder::Explicit(d) => d.decode_header_rest(tag, creator, source),
            DynDecoder::Implicit(d) => d.decode_header_rest(tag, creator, source),
        }
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        match self {
            DynDecoder::Explicit(d) => d.decode_tag(source),
            DynDecoder::Implicit(d) => d.decode_tag(source),
        }
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<(Tag, Length)>
    where
        S: ?Sized + Read,
    {
        match self {
            DynDecoder::Explicit(d) => d.decode_item_header(source),
            DynDecoder::Implicit(d) => d.decode_item_header(source),
        }
    }
}
