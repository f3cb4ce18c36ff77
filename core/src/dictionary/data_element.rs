//! Core data element dictionary types

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};

use crate::{Tag, VR};

/// Specification of a range of tags pertaining to an attribute.
/// Very often, the dictionary of attributes indicates a unique
/// group part and element part `(group,elem)`,
/// but occasionally an attribute may cover
/// a range of groups or elements instead.
/// For example,
/// _Overlay Data_ (60xx,3000) has more than one possible tag,
/// since it is part of a repeating group.
/// Moreover, a unique variant is defined for group length tags
/// and another one for private creator tags.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TagRange {
    /// Only a specific tag
    Single(Tag),
    /// The two rightmost digits of the _group_ portion are open:
    /// `(GGxx,EEEE)`
    Group100(Tag),
    /// The two rightmost digits of the _element_ portion are open:
    /// `(GGGG,EExx)`
    Element100(Tag),
    /// Generic group length tag,
    /// refers to any attribute of the form `(GGGG,0000)`,
    /// save for those with their own single tag record.
    GroupLength,
    /// Generic private creator tag,
    /// refers to any tag from (GGGG,0010) to (GGGG,00FF),
    /// where `GGGG` is an odd number.
    PrivateCreator,
}

impl TagRange {
    /// Retrieve the inner tag representation of this range.
    ///
    /// Open components are zeroed out.
    pub fn inner(self) -> Tag {
        match self {
            TagRange::Single(tag) => tag,
            TagRange::Group100(tag) => tag,
            TagRange::Element100(tag) => tag,
            TagRange::GroupLength => Tag(0x0000, 0x0000),
            TagRange::PrivateCreator => Tag(0x0009, 0x0010),
        }
    }

    /// Check whether the given tag is covered by this range.
    pub fn contains(self, tag: Tag) -> bool {
        match self {
            TagRange::Single(t) => t == tag,
            TagRange::Group100(t) => t.0 == tag.0 & 0xFF00 && t.1 == tag.1,
            TagRange::Element100(t) => t.0 == tag.0 && t.1 == tag.1 & 0xFF00,
            TagRange::GroupLength => tag.is_group_length(),
            TagRange::PrivateCreator => tag.is_private_creator(),
        }
    }
}

/// An error returned when parsing an invalid tag range.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum TagRangeParseError {
    #[snafu(display("Not enough tag components, expected tag (group, element)"))]
    MissingTag { backtrace: Backtrace },
    #[snafu(display("Not enough tag components, expected tag element"))]
    MissingTagElement { backtrace: Backtrace },
    #[snafu(display(
        "tag component `group` has an invalid length: got {} but must be 4",
        got
    ))]
    InvalidGroupLength { got: usize, backtrace: Backtrace },
    #[snafu(display(
        "tag component `element` has an invalid length: got {} but must be 4",
        got
    ))]
    InvalidElementLength { got: usize, backtrace: Backtrace },
    #[snafu(display("unsupported tag range"))]
    UnsupportedTagRange { backtrace: Backtrace },
    #[snafu(display("invalid tag component `group`"))]
    InvalidTagGroup {
        backtrace: Backtrace,
        source: std::num::ParseIntError,
    },
    #[snafu(display("invalid tag component `element`"))]
    InvalidTagElement {
        backtrace: Backtrace,
        source: std::num::ParseIntError,
    },
}

impl FromStr for TagRange {
    type Err = TagRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(s);
        let mut parts = s.split(',');
        let group = parts.next().context(MissingTagSnafu)?.trim();
        let elem = parts.next().context(MissingTagElementSnafu)?.trim();
        ensure!(
            group.len() == 4 && group.is_ascii(),
            InvalidGroupLengthSnafu { got: group.len() }
        );
        ensure!(
            elem.len() == 4 && elem.is_ascii(),
            InvalidElementLengthSnafu { got: elem.len() }
        );

        let open = |part: &str| part[2..].eq_ignore_ascii_case("xx");
        match (open(group), open(elem)) {
            (true, true) => UnsupportedTagRangeSnafu.fail(),
            (true, false) => {
                let group =
                    u16::from_str_radix(&group[..2], 16).context(InvalidTagGroupSnafu)? << 8;
                let elem = u16::from_str_radix(elem, 16).context(InvalidTagElementSnafu)?;
                Ok(TagRange::Group100(Tag(group, elem)))
            }
            (false, true) => {
                let group = u16::from_str_radix(group, 16).context(InvalidTagGroupSnafu)?;
                let elem =
                    u16::from_str_radix(&elem[..2], 16).context(InvalidTagElementSnafu)? << 8;
                Ok(TagRange::Element100(Tag(group, elem)))
            }
            (false, false) => {
                let group = u16::from_str_radix(group, 16).context(InvalidTagGroupSnafu)?;
                let elem = u16::from_str_radix(elem, 16).context(InvalidTagElementSnafu)?;
                Ok(TagRange::Single(Tag(group, elem)))
            }
        }
    }
}

/// A "virtual" value representation (VR) descriptor
/// which extends the standard enumeration with context-dependent VRs.
///
/// It is used by element dictionary entries to describe circumstances
/// in which the real VR may depend on context.
/// As an example, the _Pixel Data_ attribute
/// can have a value representation of either [`OB`](VR::OB) or [`OW`](VR::OW).
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum VirtualVr {
    /// The value representation is exactly known
    /// and does not depend on context.
    Exact(VR),
    /// `US or SS`, depending on the pixel representation.
    Xs,
    /// Overlay data, `OB or OW`.
    Ox,
    /// Pixel data, `OB or OW`.
    Px,
    /// LUT data, `US or OW`.
    Lt,
}

impl From<VR> for VirtualVr {
    fn from(value: VR) -> Self {
        VirtualVr::Exact(value)
    }
}

impl VirtualVr {
    /// Return the underlying value representation
    /// in the case that it can be unambiguously defined without context.
    pub fn exact(self) -> Option<VR> {
        match self {
            VirtualVr::Exact(vr) => Some(vr),
            _ => None,
        }
    }

    /// Return the underlying value representation,
    /// making a relaxed conversion if it cannot be
    /// accurately resolved without context.
    ///
    /// - [`Xs`](VirtualVr::Xs) is relaxed to [`US`](VR::US)
    /// - [`Ox`](VirtualVr::Ox) is relaxed to [`OW`](VR::OW)
    /// - [`Px`](VirtualVr::Px) is relaxed to [`OW`](VR::OW)
    /// - [`Lt`](VirtualVr::Lt) is relaxed to [`OW`](VR::OW)
    pub fn relaxed(self) -> VR {
        match self {
            VirtualVr::Exact(vr) => vr,
            VirtualVr::Xs => VR::US,
            VirtualVr::Ox => VR::OW,
            VirtualVr::Px => VR::OW,
            VirtualVr::Lt => VR::OW,
        }
    }
}

/// Parse the VR column of a dictionary table,
/// such as `"UI"`, `"OB or OW"`, or `"US or SS or OW"`.
impl FromStr for VirtualVr {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "US or SS" | "SS or US" => Ok(VirtualVr::Xs),
            "OB or OW" | "OW or OB" => Ok(VirtualVr::Px),
            "US or OW" | "US or SS or OW" => Ok(VirtualVr::Lt),
            other => other.parse().map(VirtualVr::Exact),
        }
    }
}

/// The value multiplicity of an attribute,
/// describing how many values an element may hold.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueMultiplicity {
    /// Exactly `n` values, e.g. `1` or `3`.
    Exact(u32),
    /// Between `min` and `max` values, e.g. `1-3`.
    Range(u32, u32),
    /// At least `min` values, e.g. `1-n`.
    Unbounded {
        /// the minimum number of values
        min: u32,
    },
    /// A positive multiple of `step` values, starting at `min`,
    /// e.g. `2-2n` or `3-3n`.
    Step {
        /// the minimum number of values
        min: u32,
        /// the step between admissible counts
        step: u32,
    },
}

impl Default for ValueMultiplicity {
    fn default() -> Self {
        ValueMultiplicity::Exact(1)
    }
}

impl ValueMultiplicity {
    /// Check whether a number of values satisfies this multiplicity.
    pub fn admits(self, count: u32) -> bool {
        match self {
            ValueMultiplicity::Exact(n) => count == n,
            ValueMultiplicity::Range(min, max) => (min..=max).contains(&count),
            ValueMultiplicity::Unbounded { min } => count >= min,
            ValueMultiplicity::Step { min, step } => {
                count >= min && step > 0 && (count - min) % step == 0
            }
        }
    }
}

impl fmt::Display for ValueMultiplicity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValueMultiplicity::Exact(n) => write!(f, "{}", n),
            ValueMultiplicity::Range(min, max) => write!(f, "{}-{}", min, max),
            ValueMultiplicity::Unbounded { min } => write!(f, "{}-n", min),
            ValueMultiplicity::Step { min, step } => write!(f, "{}-{}n", min, step),
        }
    }
}

/// An error returned when parsing an invalid value multiplicity.
#[derive(Debug, Snafu)]
#[snafu(display("invalid value multiplicity {:?}", text))]
pub struct ParseMultiplicityError {
    text: String,
    backtrace: Backtrace,
}

impl FromStr for ValueMultiplicity {
    type Err = ParseMultiplicityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let number = |part: &str| part.parse::<u32>().ok();
        let vm = match text.split_once('-') {
            None => number(text).map(ValueMultiplicity::Exact),
            Some((min, "n")) => number(min).map(|min| ValueMultiplicity::Unbounded { min }),
            Some((min, max)) => match max.strip_suffix('n') {
                Some(step) => number(min)
                    .zip(number(step))
                    .map(|(min, step)| ValueMultiplicity::Step { min, step }),
                None => number(min)
                    .zip(number(max))
                    .map(|(min, max)| ValueMultiplicity::Range(min, max)),
            },
        };
        vm.context(ParseMultiplicitySnafu { text })
    }
}

/// Dictionary information about an attribute,
/// as attached to each decoded data element.
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    /// The typical value representation,
    /// or `None` if the attribute is not known.
    pub vr: Option<VirtualVr>,
    /// The attribute's keyword, or a placeholder name
    pub name: Cow<'static, str>,
    /// The value multiplicity
    pub vm: ValueMultiplicity,
    /// Whether the attribute is retired from the standard
    pub retired: bool,
}

impl TagInfo {
    /// The name given to unknown private attributes.
    pub const PRIVATE_TAG: &'static str = "PrivateTag";
    /// The name given to unknown public attributes.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    /// Create the placeholder record for a tag
    /// which is not in the dictionary.
    pub fn unknown(tag: Tag) -> Self {
        let name = if tag.is_private() {
            TagInfo::PRIVATE_TAG
        } else {
            TagInfo::UNKNOWN
        };
        TagInfo {
            vr: None,
            name: Cow::Borrowed(name),
            vm: ValueMultiplicity::default(),
            retired: false,
        }
    }

    /// Whether this is a placeholder for an attribute not in the dictionary.
    pub fn is_unknown(&self) -> bool {
        self.vr.is_none()
    }

    /// The value representation to assume when decoding without one,
    /// [`UN`](VR::UN) for unknown attributes.
    pub fn implicit_vr(&self) -> VR {
        self.vr.map(VirtualVr::relaxed).unwrap_or(VR::UN)
    }
}

/// The dictionary entry data type, representing a DICOM attribute.
pub trait DataDictionaryEntry {
    /// The full possible tag range of the attribute.
    fn tag_range(&self) -> TagRange;

    /// Fetch a single tag applicable to this attribute.
    fn tag(&self) -> Tag {
        self.tag_range().inner()
    }

    /// The alias of the attribute, with no spaces, usually in UpperCamelCase.
    fn alias(&self) -> &str;

    /// The _typical_ value representation of the attribute.
    fn vr(&self) -> VirtualVr;

    /// The value multiplicity of the attribute.
    fn vm(&self) -> ValueMultiplicity;

    /// Whether the attribute has been retired.
    fn is_retired(&self) -> bool;

    /// Produce the information record of this entry.
    fn info(&self) -> TagInfo {
        TagInfo {
            vr: Some(self.vr()),
            name: Cow::Owned(self.alias().to_string()),
            vm: self.vm(),
            retired: self.is_retired(),
        }
    }
}

/// A data type for a dictionary entry with full ownership.
#[derive(Debug, PartialEq, Clone)]
pub struct DataDictionaryEntryBuf {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute, with no spaces, usually UpperCamelCase
    pub alias: String,
    /// The _typical_ value representation of the attribute
    pub vr: VirtualVr,
    /// The value multiplicity
    pub vm: ValueMultiplicity,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl DataDictionaryEntry for DataDictionaryEntryBuf {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias.as_str()
    }
    fn vr(&self) -> VirtualVr {
        self.vr
    }
    fn vm(&self) -> ValueMultiplicity {
        self.vm
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

/// A data type for a dictionary entry with a string slice for its alias.
#[derive(Debug, PartialEq, Clone)]
pub struct DataDictionaryEntryRef<'a> {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute, with no spaces, usually UpperCamelCase
    pub alias: &'a str,
    /// The _typical_ value representation of the attribute
    pub vr: VirtualVr,
    /// The value multiplicity
    pub vm: ValueMultiplicity,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl<'a> DataDictionaryEntry for DataDictionaryEntryRef<'a> {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VirtualVr {
        self.vr
    }
    fn vm(&self) -> ValueMultiplicity {
        self.vm
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl DataDictionaryEntryRef<'static> {
    /// Produce the information record of this entry
    /// without copying the alias.
    pub fn static_info(&self) -> TagInfo {
        TagInfo {
            vr: Some(self.vr),
            name: Cow::Borrowed(self.alias),
            vm: self.vm,
            retired: self.retired,
        }
    }
}
