//! The parsing state carried by the data set decoder.
//!
//! A [`ParseState`] is a small `Copy` value.
//! Nested decoders receive their own copy,
//! so whatever they change (byte order, VR mode, character set)
//! never leaks back into the enclosing data set.

use dcmstream_core::DataDictionary;
use dcmstream_encoding::decode::{DynDecoder, ValueCodec};
use dcmstream_encoding::text::SpecificCharacterSet;
use dcmstream_encoding::Endianness;

/// The encoding conventions in effect at some point of a data set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseState {
    endianness: Endianness,
    implicit_vr: bool,
    /// The VR mode in which the current scope was established,
    /// to which the decoder returns after a provisional switch.
    tracked_implicit_vr: bool,
    skip_pixel_data: bool,
    charset: SpecificCharacterSet,
}

impl Default for ParseState {
    fn default() -> Self {
        ParseState::explicit_vr_le()
    }
}

impl ParseState {
    /// Create a parsing state with the given byte order and VR mode,
    /// using the default character set.
    pub fn new(endianness: Endianness, implicit_vr: bool) -> Self {
        ParseState {
            endianness,
            implicit_vr,
            tracked_implicit_vr: implicit_vr,
            skip_pixel_data: false,
            charset: SpecificCharacterSet::Default,
        }
    }

    /// The state for Explicit VR Little Endian,
    /// as used by the file meta group.
    pub fn explicit_vr_le() -> Self {
        ParseState::new(Endianness::Little, false)
    }

    /// The state for Implicit VR Little Endian.
    pub fn implicit_vr_le() -> Self {
        ParseState::new(Endianness::Little, true)
    }

    /// Set whether root pixel data should be discarded.
    pub fn with_skip_pixel_data(mut self, skip: bool) -> Self {
        self.skip_pixel_data = skip;
        self
    }

    /// Set the character set of text values.
    pub fn with_charset(mut self, charset: SpecificCharacterSet) -> Self {
        self.charset = charset;
        self
    }

    /// Set the VR mode after checking it against the data itself.
    /// Both the current and the tracked mode take the given value.
    pub fn with_verified_mode(mut self, implicit_vr: bool) -> Self {
        self.implicit_vr = implicit_vr;
        self.tracked_implicit_vr = implicit_vr;
        self
    }

    /// The state used to decode the contents of a private element
    /// of unknown VR as a sequence.
    ///
    /// Such content is encoded in implicit VR,
    /// in the byte order its item markers were found in.
    pub fn with_provisional_implicit(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self.implicit_vr = true;
        self.tracked_implicit_vr = true;
        self
    }

    /// Return to the VR mode this scope was established in.
    pub fn tracked_mode_restored(mut self) -> Self {
        self.implicit_vr = self.tracked_implicit_vr;
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn is_implicit_vr(&self) -> bool {
        self.implicit_vr
    }

    pub fn tracked_implicit_vr(&self) -> bool {
        self.tracked_implicit_vr
    }

    pub fn skip_pixel_data(&self) -> bool {
        self.skip_pixel_data
    }

    pub fn charset(&self) -> SpecificCharacterSet {
        self.charset
    }

    /// Create a header decoder for the current byte order and VR mode.
    pub fn header_decoder<D>(&self, dict: D) -> DynDecoder<D>
    where
        D: DataDictionary,
    {
        DynDecoder::new(self.endianness, self.implicit_vr, dict)
    }

    /// Create a value codec for the current byte order and character set.
    pub fn value_codec(&self) -> ValueCodec {
        ValueCodec::new(self.endianness, self.charset)
    }
}
