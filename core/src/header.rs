//! This module contains the basic types needed for interpreting DICOM data elements:
//! the attribute tag, the value representation, the value length,
//! and the element types produced by the stream decoder.

use crate::value::Value;
use snafu::{ensure, Backtrace, ResultExt, Snafu};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Error type for a failed attempt to parse a tag from text.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ParseTagError {
    /// The text does not have the shape of a tag.
    #[snafu(display("Not a tag expression: {:?}", text))]
    Shape { text: String, backtrace: Backtrace },
    /// A component is not a hexadecimal number.
    #[snafu(display("Bad tag component {:?}", part))]
    Component {
        part: String,
        source: ParseIntError,
        backtrace: Backtrace,
    },
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// Tags are ordered by group number first, element number second.
/// A tag with an odd group number is a private tag.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Whether the tag belongs to an odd (vendor-defined) group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 % 2 == 1
    }

    /// Whether the tag is a private creator slot,
    /// `(gggg,00xx)` with an odd group and `xx` in `10..=FF`.
    #[inline]
    pub fn is_private_creator(self) -> bool {
        self.is_private() && (0x0010..=0x00FF).contains(&self.1)
    }

    /// Whether the tag is a group length tag `(gggg,0000)`.
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0x0000
    }

    /// For a private data element `(gggg,xxyy)`,
    /// retrieve the creator slot `(gggg,00xx)` reserving its block.
    ///
    /// Returns `None` for public tags and for private tags
    /// which are not in a reserved block.
    pub fn private_block(self) -> Option<Tag> {
        if !self.is_private() || self.1 < 0x1000 {
            return None;
        }
        Some(Tag(self.0, self.1 >> 8))
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// Parse a tag from one of the forms
/// `(gggg,eeee)`, `gggg,eeee`, or `ggggeeee`.
impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);

        let (group, element) = match inner.split_once(',') {
            Some((g, e)) => (g.trim(), e.trim()),
            None => {
                ensure!(
                    inner.len() == 8 && inner.is_char_boundary(4),
                    ShapeSnafu { text }
                );
                inner.split_at(4)
            }
        };
        ensure!(group.len() == 4 && element.len() == 4, ShapeSnafu { text });

        let parse = |part: &str| {
            u16::from_str_radix(part, 16).context(ComponentSnafu { part })
        };
        Ok(Tag(parse(group)?, parse(element)?))
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// An enum type for a DICOM value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    ///
    /// Letter case is not significant: `b"ob"` and `b"OB"` are the same VR.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        let upper = [chars[0].to_ascii_uppercase(), chars[1].to_ascii_uppercase()];
        std::str::from_utf8(&upper)
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Whether an explicit VR header for this VR
    /// has two reserved bytes followed by a 4-byte value length.
    ///
    /// All other VRs use a 2-byte value length field.
    pub fn has_long_length(self) -> bool {
        use VR::*;
        matches!(
            self,
            OB | OD | OF | OL | OV | OW | SQ | SV | UC | UN | UR | UT | UV
        )
    }

    /// Whether elements of this VR must always have a defined length.
    pub fn requires_defined_length(self) -> bool {
        matches!(self, VR::UC | VR::UR | VR::UT)
    }

    /// Obtain the decoding kind of a value with this VR.
    ///
    /// Pixel data is identified by tag, see [`VrKind::classify`].
    pub fn kind(self) -> VrKind {
        use VR::*;
        match self {
            AE | AS | CS | LO | PN | SH | UC | UI => VrKind::Strings,
            LT | ST | UT | UR => VrKind::Text,
            DA | DT | TM => VrKind::DateTime,
            IS => VrKind::NumericString(NumericKind::Integer),
            DS | OF | OD => VrKind::NumericString(NumericKind::Float),
            SS => VrKind::Int16,
            US => VrKind::UInt16,
            SL => VrKind::Int32,
            UL => VrKind::UInt32,
            SV => VrKind::Int64,
            UV => VrKind::UInt64,
            FL => VrKind::Float32,
            FD => VrKind::Float64,
            OB | OL | OV | UN => VrKind::Bytes,
            OW => VrKind::Words,
            AT => VrKind::Tags,
            SQ => VrKind::Sequence,
        }
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// The target type of a numeric string component.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum NumericKind {
    /// Integer String (IS)
    Integer,
    /// Decimal String (DS) and textual OF/OD values
    Float,
}

/// The decoding kind of a value,
/// which determines how its raw bytes map to a [`Value`].
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum VrKind {
    /// Backslash separated text values.
    Strings,
    /// A single text value, never split.
    Text,
    /// Backslash separated dates, times or date-times.
    DateTime,
    /// Backslash separated numbers in textual form.
    NumericString(NumericKind),
    /// Signed 16-bit integers
    Int16,
    /// Unsigned 16-bit integers
    UInt16,
    /// Signed 32-bit integers
    Int32,
    /// Unsigned 32-bit integers
    UInt32,
    /// Signed 64-bit integers
    Int64,
    /// Unsigned 64-bit integers
    UInt64,
    /// 32-bit IEEE floats
    Float32,
    /// 64-bit IEEE floats
    Float64,
    /// Opaque bytes
    Bytes,
    /// 16-bit words, repacked in native byte order
    Words,
    /// Native (non-encapsulated) pixel data
    PixelData,
    /// Attribute tags
    Tags,
    /// Sequence of items
    Sequence,
}

impl VrKind {
    /// Classify the value of an element by its tag and value representation.
    ///
    /// This is the same as [`VR::kind`],
    /// except for the pixel data attribute `(7FE0,0010)`.
    pub fn classify(tag: Tag, vr: VR) -> VrKind {
        match (tag, vr) {
            (Tag(0x7FE0, 0x0010), VR::OB | VR::OW | VR::UN) => VrKind::PixelData,
            _ => vr.kind(),
        }
    }
}

/// A type for representing data set content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length, which would have to be determined
/// with a traversal based on the content's encoding.
///
/// Two undefined lengths are not equal.
///
/// ```
/// # use dcmstream_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!(!(Length::UNDEFINED < Length::new(64)));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    #[inline]
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", l),
        }
    }
}

/// A data structure for a data element header, containing
/// a tag, value representation and specified length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DataElementHeader {
    /// DICOM tag
    pub tag: Tag,
    /// Value Representation
    pub vr: VR,
    /// Element length
    pub len: Length,
}

impl DataElementHeader {
    /// Create a new data element header with the given properties.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            len,
        }
    }

    /// Check whether this is the header of an item.
    pub fn is_item(&self) -> bool {
        self.tag == Tag(0xFFFE, 0xE000)
    }

    /// Check whether this is the header of an item delimiter.
    pub fn is_item_delimiter(&self) -> bool {
        self.tag == Tag(0xFFFE, 0xE00D)
    }

    /// Check whether this is the header of a sequence delimiter.
    pub fn is_sequence_delimiter(&self) -> bool {
        self.tag == Tag(0xFFFE, 0xE0DD)
    }

    /// Check whether this is the header of an encapsulated pixel data.
    pub fn is_encapsulated_pixeldata(&self) -> bool {
        self.tag == Tag(0x7FE0, 0x0010) && self.len.is_undefined()
    }
}

/// A fully decoded DICOM data element.
///
/// Elements are created by the stream decoder and are not modified afterwards.
///
/// Unlike [`Length`], element equality compares recorded lengths bitwise,
/// so an element of undefined length is equal to itself.
#[derive(Debug, Clone)]
pub struct DataElement {
    header: DataElementHeader,
    name: Cow<'static, str>,
    value: Value,
}

impl DataElement {
    /// Create a data element from its header, resolved name and value.
    pub fn new<N>(header: DataElementHeader, name: N, value: Value) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        DataElement {
            header,
            name: name.into(),
            value,
        }
    }

    /// Retrieve the element header.
    pub fn header(&self) -> &DataElementHeader {
        &self.header
    }

    /// Retrieve the element's tag.
    pub fn tag(&self) -> Tag {
        self.header.tag
    }

    /// Retrieve the element's value representation.
    pub fn vr(&self) -> VR {
        self.header.vr
    }

    /// Retrieve the value length as recorded in the header.
    pub fn length(&self) -> Length {
        self.header.len
    }

    /// Retrieve the attribute name,
    /// `"PrivateTag"` or `"UNKNOWN"` if the dictionary does not know it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieve the element's value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Move the value out of the element.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Shortcut for the value as a single string, if it is one.
    pub fn string(&self) -> Option<&str> {
        self.value.string()
    }

    /// Retrieve the nested elements of a sequence element.
    pub fn items(&self) -> Option<&[DataElement]> {
        self.value.items()
    }
}

impl PartialEq for DataElement {
    fn eq(&self, other: &Self) -> bool {
        self.header.tag == other.header.tag
            && self.header.vr == other.header.vr
            && self.header.len.0 == other.header.len.0
            && self.name == other.name
            && self.value == other.value
    }
}
