//! The data element stream decoder.
//!
//! A [`DataSetDecoder`] reads data elements one after the other
//! from a byte source, following the [`ParseState`] it was given.
//! Sequences and encapsulated pixel data are decoded recursively,
//! so every element it yields is complete.
//!
//! # Example
//!
//! ```
//! # use dcmstream_parser::{DataSetDecoder, ParseState};
//! # use dcmstream_core::Tag;
//! #[rustfmt::skip]
//! let raw: &[u8] = &[
//!     0x28, 0x00, 0x10, 0x00, // (0028,0010) Rows
//!     b'U', b'S', 0x02, 0x00, // VR: US, length: 2
//!     0x00, 0x02,             // 512
//! ];
//! let dataset = DataSetDecoder::new(raw, ParseState::explicit_vr_le()).read_dataset()?;
//! assert_eq!(dataset.get(Tag(0x0028, 0x0010)).unwrap().value().int(), Some(512));
//! # Ok::<(), dcmstream_parser::Error>(())
//! ```

use crate::error::*;
use crate::source::PeekableSource;
use crate::state::ParseState;
use dcmstream_core::header::{DataElement, DataElementHeader, Length, Tag, VrKind, VR};
use dcmstream_core::value::{Scalar, Value};
use dcmstream_core::{DataDictionary, DataSet};
use dcmstream_dictionary_std::tags;
use dcmstream_dictionary_std::StandardDataDictionary;
use dcmstream_encoding::decode::basic::BasicDecoder;
use dcmstream_encoding::decode::{BasicDecode, Decode};
use dcmstream_encoding::text::SpecificCharacterSet;
use dcmstream_encoding::Endianness;
use smallvec::SmallVec;
use snafu::ResultExt;
use std::io::{self, Read};

/// Upper bound for the buffer preallocated for a single value,
/// so that bogus lengths do not reserve absurd amounts of memory.
const MAX_VALUE_PREALLOCATION: usize = 0x10_0000;

/// The default maximum sequence nesting level.
///
/// Sequences are decoded recursively,
/// so this also bounds the stack space taken by a decoder.
pub const DEFAULT_MAX_SEQUENCE_DEPTH: u32 = 64;

/// The outcome of one decoding step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A complete data element.
    Element(DataElement),
    /// An item marker or some other structure which yields no element.
    Skipped,
    /// The delimiter of the sequence being decoded.
    SequenceEnd,
    /// The end of the data set.
    End,
}

/// Where the root data set stops, other than at the end of the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum StopCondition {
    /// Stop before the first element whose tag is at least this one.
    Before(Tag),
    /// Stop before the first element outside of this group.
    OutsideGroup(u16),
}

impl StopCondition {
    fn reached(self, tag: Tag) -> bool {
        match self {
            StopCondition::Before(limit) => tag >= limit,
            StopCondition::OutsideGroup(group) => tag.group() != group,
        }
    }
}

/// The private creators and character set of the data set
/// (or sequence item) being decoded.
#[derive(Debug, Clone)]
struct Scope {
    state: ParseState,
    /// character set in effect at the start of each item
    item_charset: SpecificCharacterSet,
    /// private creator slots seen so far, as `(gggg,00xx)` tags
    creators: SmallVec<[(Tag, String); 4]>,
    /// whether a sequence delimiter ends this scope
    in_sequence: bool,
}

impl Scope {
    fn new(state: ParseState, in_sequence: bool) -> Self {
        Scope {
            state,
            item_charset: state.charset(),
            creators: SmallVec::new(),
            in_sequence,
        }
    }
}

/// Find the creator of the private block reserved for the given tag.
fn find_creator(creators: &[(Tag, String)], tag: Tag) -> Option<&str> {
    let block = tag.private_block()?;
    creators
        .iter()
        .rev()
        .find(|(t, _)| *t == block)
        .map(|(_, creator)| creator.as_str())
}

/// Check for item or item delimitation markers
/// at the start of the given bytes,
/// returning the byte order they are encoded in.
fn marker_endianness(bytes: &[u8]) -> Option<Endianness> {
    match bytes.get(..4)? {
        [0xFE, 0xFF, 0x00, 0xE0] | [0xFE, 0xFF, 0x0D, 0xE0] => Some(Endianness::Little),
        [0xFF, 0xFE, 0xE0, 0x00] | [0xFF, 0xFE, 0xE0, 0x0D] => Some(Endianness::Big),
        _ => None,
    }
}

/// Whether a private element of unknown VR should be decoded as a sequence:
/// its length is undefined,
/// or its value starts with an item (or item delimitation) marker
/// in either byte order.
pub fn is_private_sequence_candidate(header: &DataElementHeader, first_bytes: &[u8]) -> bool {
    header.vr == VR::UN
        && header.tag.is_private()
        && (header.len.is_undefined() || marker_endianness(first_bytes).is_some())
}

/// A decoder of DICOM data elements from a byte source.
///
/// `S` is the source type and `D` the data dictionary,
/// used to resolve value representations in implicit VR
/// and the names of the decoded elements.
#[derive(Debug)]
pub struct DataSetDecoder<S, D = StandardDataDictionary> {
    source: PeekableSource<S>,
    dict: D,
    scope: Scope,
    /// sequence nesting level, 0 for the root data set
    depth: u32,
    max_depth: u32,
    file_size: Option<u64>,
    stop: Option<StopCondition>,
    /// whether the root data set was fully consumed or a fault occurred
    done: bool,
}

impl<S> DataSetDecoder<S>
where
    S: Read,
{
    /// Create a data set decoder using the standard data dictionary.
    pub fn new(source: S, state: ParseState) -> Self {
        DataSetDecoder::with_dict(source, state, StandardDataDictionary)
    }
}

impl<S, D> DataSetDecoder<S, D>
where
    S: Read,
    D: DataDictionary + Clone,
{
    /// Create a data set decoder using the given data dictionary.
    pub fn with_dict(source: S, state: ParseState, dict: D) -> Self {
        DataSetDecoder::from_source(PeekableSource::new(source), state, dict)
    }

    /// Create a data set decoder over a source which may already
    /// have been partially read or peeked into.
    pub fn from_source(source: PeekableSource<S>, state: ParseState, dict: D) -> Self {
        DataSetDecoder {
            source,
            dict,
            scope: Scope::new(state, false),
            depth: 0,
            max_depth: DEFAULT_MAX_SEQUENCE_DEPTH,
            file_size: None,
            stop: None,
            done: false,
        }
    }

    /// Stop decoding the root data set
    /// before the first element with a tag greater than or equal to `tag`.
    pub fn read_until(mut self, tag: Tag) -> Self {
        self.stop = Some(StopCondition::Before(tag));
        self
    }

    /// Decode the root data set only while it stays within the given group.
    /// The first tag of another group is left in the source.
    pub fn read_group(mut self, group: u16) -> Self {
        self.stop = Some(StopCondition::OutsideGroup(group));
        self
    }

    /// Set the maximum sequence nesting level.
    ///
    /// Decoding a sequence any deeper fails with
    /// [`Error::MaxSequenceDepth`].
    pub fn max_sequence_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Declare the total size of the source in bytes,
    /// which bounds the bytes discarded when skipping pixel data.
    pub fn file_size(mut self, size: Option<u64>) -> Self {
        self.file_size = size;
        self
    }

    /// The number of bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// The current parsing state of the root data set.
    pub fn state(&self) -> ParseState {
        self.scope.state
    }

    /// Recover the underlying source,
    /// along with any bytes peeked but not consumed.
    pub fn into_source(self) -> PeekableSource<S> {
        self.source
    }

    /// Decode the remaining elements of the root data set.
    pub fn read_dataset(self) -> Result<DataSet> {
        self.collect()
    }

    /// Perform one decoding step.
    ///
    /// A partial tag, header or value is an error.
    /// A clean end of the source between elements is [`Step::End`].
    pub fn decode_step(&mut self) -> Result<Step> {
        if self.done {
            return Ok(Step::End);
        }
        let position = self.source.position();

        let mut tag_bytes = [0u8; 4];
        let peeked = self
            .source
            .peek(4)
            .context(PeekDataSnafu { position })?;
        if peeked.is_empty() {
            return Ok(Step::End);
        }
        let tag = if peeked.len() == 4 {
            tag_bytes.copy_from_slice(peeked);
            BasicDecoder::new(self.scope.state.endianness())
                .decode_tag(&tag_bytes[..])
                .context(ReadTagSnafu { position })?
        } else {
            let msg = format!("only {} of 4 tag bytes available", peeked.len());
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, msg))
                .context(ReadTagSnafu { position });
        };

        if self.depth == 0 {
            if let Some(stop) = self.stop {
                if stop.reached(tag) {
                    return Ok(Step::End);
                }
            }
        }
        self.source
            .read_exact(&mut tag_bytes)
            .context(ReadTagSnafu { position })?;

        match tag {
            tags::ITEM | tags::ITEM_DELIMITATION_ITEM => {
                self.read_marker_length(tag, position)?;
                if tag == tags::ITEM {
                    // each item is a data set of its own
                    self.scope.creators.clear();
                    self.scope.state = self.scope.state.with_charset(self.scope.item_charset);
                }
                return Ok(Step::Skipped);
            }
            tags::SEQUENCE_DELIMITATION_ITEM => {
                self.read_marker_length(tag, position)?;
                if self.scope.in_sequence {
                    return Ok(Step::SequenceEnd);
                }
                tracing::warn!("Unexpected sequence delimiter at {}, ignoring", position);
                return Ok(Step::Skipped);
            }
            tags::PIXEL_DATA if self.depth == 0 && self.scope.state.skip_pixel_data() => {
                self.discard_rest(position)?;
                return Ok(Step::End);
            }
            _ => {}
        }

        let creator = find_creator(&self.scope.creators, tag).map(String::from);
        let decoder = self.scope.state.header_decoder(&self.dict);
        let (header, _) = decoder
            .decode_header_rest(tag, creator.as_deref(), &mut self.source)
            .context(DecodeElementHeaderSnafu { tag, position })?;
        tracing::trace!(
            "{} {} {} at {}",
            header.tag,
            header.vr,
            header.len,
            position
        );

        if header.len.is_undefined() && header.vr.requires_defined_length() {
            return UndefinedLengthForVrSnafu {
                tag,
                vr: header.vr,
                position,
            }
            .fail();
        }

        let value = self.read_value(&header)?;

        if tag.is_private_creator() {
            if let Some(name) = value.string() {
                self.scope.creators.retain(|(t, _)| *t != tag);
                self.scope.creators.push((tag, name.to_string()));
            }
        }
        if tag == tags::SPECIFIC_CHARACTER_SET {
            self.switch_charset(&value);
        }

        let info = match creator.as_deref() {
            Some(creator) => self
                .dict
                .lookup_private(tag.group(), creator, tag.element()),
            None => self.dict.lookup(tag),
        };
        Ok(Step::Element(DataElement::new(header, info.name, value)))
    }

    /// Consume the 4-byte length of an item or delimiter.
    /// The content of an item is decoded as regular elements.
    fn read_marker_length(&mut self, tag: Tag, position: u64) -> Result<Length> {
        let (header, _) = self
            .scope
            .state
            .header_decoder(&self.dict)
            .decode_header_rest(tag, None, &mut self.source)
            .context(DecodeElementHeaderSnafu { tag, position })?;
        Ok(header.len)
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<Value> {
        let position = self.source.position();
        let kind = VrKind::classify(header.tag, header.vr);

        if header.len.is_undefined() {
            if header.vr == VR::SQ {
                let state = self.scope.state;
                return self.read_sequence(state).map(Value::Sequence);
            }
            if kind == VrKind::PixelData {
                return self.read_fragments().map(Value::Bytes);
            }
            if header.vr == VR::UN {
                let peeked = self
                    .source
                    .peek(4)
                    .context(PeekDataSnafu { position })?;
                let endianness = marker_endianness(peeked).unwrap_or(Endianness::Little);
                if is_private_sequence_candidate(header, peeked) {
                    tracing::debug!(
                        "Decoding private element {} of unknown VR as a sequence",
                        header.tag
                    );
                } else {
                    tracing::debug!(
                        "Decoding element {} of unknown VR and undefined length as a sequence",
                        header.tag
                    );
                }
                let state = self.scope.state.with_provisional_implicit(endianness);
                let items = self.read_sequence(state)?;
                self.scope.state = self.scope.state.tracked_mode_restored();
                return Ok(Value::Sequence(items));
            }
            tracing::warn!(
                "Element {} ({}) has undefined length, decoding as a sequence",
                header.tag,
                header.vr
            );
            let state = self.scope.state;
            return self.read_sequence(state).map(Value::Sequence);
        }

        let len = header.len.0;
        let raw = self.read_raw(len).context(ReadValueSnafu {
            tag: header.tag,
            len,
            position,
        })?;
        if raw.len() < len as usize {
            if kind == VrKind::PixelData {
                tracing::warn!(
                    "Pixel data truncated: expected {} bytes, found {}",
                    len,
                    raw.len()
                );
            } else {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof)).context(
                    ReadValueSnafu {
                        tag: header.tag,
                        len,
                        position,
                    },
                );
            }
        }

        if header.vr == VR::SQ {
            let state = self.scope.state;
            return self.read_nested(&raw, state, position).map(Value::Sequence);
        }
        if is_private_sequence_candidate(header, &raw) {
            tracing::debug!(
                "Decoding private element {} of unknown VR as a sequence",
                header.tag
            );
            let endianness = marker_endianness(&raw).unwrap_or(Endianness::Little);
            let state = self.scope.state.with_provisional_implicit(endianness);
            let items = self.read_nested(&raw, state, position)?;
            self.scope.state = self.scope.state.tracked_mode_restored();
            return Ok(Value::Sequence(items));
        }

        Ok(self.scope.state.value_codec().decode(kind, &raw, header))
    }

    /// Read up to `len` bytes of value data.
    fn read_raw(&mut self, len: u32) -> io::Result<Vec<u8>> {
        let mut raw = Vec::with_capacity((len as usize).min(MAX_VALUE_PREALLOCATION));
        self.source
            .by_ref()
            .take(u64::from(len))
            .read_to_end(&mut raw)?;
        Ok(raw)
    }

    /// Decode a sequence of undefined length on the same source,
    /// up to and including its delimiter.
    fn read_sequence(&mut self, state: ParseState) -> Result<Vec<DataElement>> {
        self.check_depth()?;
        let parent = std::mem::replace(&mut self.scope, Scope::new(state, true));
        self.depth += 1;
        let out = self.read_until_delimiter();
        self.depth -= 1;
        self.scope = parent;
        out
    }

    fn check_depth(&self) -> Result<()> {
        if self.depth >= self.max_depth {
            return MaxSequenceDepthSnafu {
                depth: self.max_depth,
                position: self.source.position(),
            }
            .fail();
        }
        Ok(())
    }

    fn read_until_delimiter(&mut self) -> Result<Vec<DataElement>> {
        let mut elements = Vec::new();
        loop {
            match self.decode_step()? {
                Step::Element(e) => elements.push(e),
                Step::Skipped => {}
                Step::SequenceEnd => return Ok(elements),
                Step::End => {
                    tracing::warn!(
                        "Sequence not terminated before the end of data at {}",
                        self.source.position()
                    );
                    return Ok(elements);
                }
            }
        }
    }

    /// Decode the content of a sequence of defined length,
    /// already read into memory, with a separate decoder.
    fn read_nested(
        &self,
        raw: &[u8],
        state: ParseState,
        position: u64,
    ) -> Result<Vec<DataElement>> {
        self.check_depth()?;
        let mut nested = DataSetDecoder {
            source: PeekableSource::with_position(raw, position),
            dict: self.dict.clone(),
            scope: Scope::new(state, false),
            depth: self.depth + 1,
            max_depth: self.max_depth,
            file_size: None,
            stop: None,
            done: false,
        };
        let mut elements = Vec::new();
        loop {
            match nested.decode_step()? {
                Step::Element(e) => elements.push(e),
                Step::Skipped | Step::SequenceEnd => {}
                Step::End => return Ok(elements),
            }
        }
    }

    /// Read the fragments of encapsulated pixel data,
    /// up to and including the sequence delimiter.
    ///
    /// The first fragment (the basic offset table) is discarded,
    /// the others are concatenated.
    fn read_fragments(&mut self) -> Result<Vec<u8>> {
        let decoder = self.scope.state.header_decoder(&self.dict);
        let mut data = Vec::new();
        let mut index = 0_u32;
        loop {
            let position = self.source.position();
            let (tag, len) = decoder
                .decode_item_header(&mut self.source)
                .context(ReadItemHeaderSnafu { position })?;
            match tag {
                tags::SEQUENCE_DELIMITATION_ITEM => return Ok(data),
                tags::ITEM => {
                    let len = match len.get() {
                        Some(len) => len,
                        None => return UndefinedFragmentLengthSnafu { position }.fail(),
                    };
                    let mut fragment = self.source.by_ref().take(u64::from(len));
                    let read = if index == 0 {
                        io::copy(&mut fragment, &mut io::sink())
                    } else {
                        fragment.read_to_end(&mut data).map(|n| n as u64)
                    };
                    let read = read.context(ReadFragmentSnafu { len, position })?;
                    if read < u64::from(len) {
                        return Err(io::Error::from(io::ErrorKind::UnexpectedEof))
                            .context(ReadFragmentSnafu { len, position });
                    }
                    index += 1;
                }
                tag => return UnexpectedFragmentTagSnafu { tag, position }.fail(),
            }
        }
    }

    /// Discard the rest of the source, up to the declared file size.
    fn discard_rest(&mut self, position: u64) -> Result<()> {
        let discarded = match self.file_size {
            Some(size) => {
                let remaining = size.saturating_sub(self.source.position());
                io::copy(&mut self.source.by_ref().take(remaining), &mut io::sink())
            }
            None => io::copy(&mut self.source, &mut io::sink()),
        };
        let discarded = discarded.context(SkipPixelDataSnafu { position })?;
        tracing::debug!("Skipped {} bytes of pixel data at {}", discarded, position);
        self.done = true;
        Ok(())
    }

    fn switch_charset(&mut self, value: &Value) {
        let charset = match value {
            Value::Empty => Some(SpecificCharacterSet::Default),
            value => SpecificCharacterSet::from_codes(value.scalars().filter_map(Scalar::as_str)),
        };
        match charset {
            Some(charset) => self.scope.state = self.scope.state.with_charset(charset),
            None => tracing::warn!(
                "Unsupported specific character set {:?}, keeping {:?}",
                value.to_str(),
                self.scope.state.charset()
            ),
        }
    }
}

impl<S, D> Iterator for DataSetDecoder<S, D>
where
    S: Read,
    D: DataDictionary + Clone,
{
    type Item = Result<DataElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.decode_step() {
                Ok(Step::Element(e)) => return Some(Ok(e)),
                Ok(Step::Skipped) | Ok(Step::SequenceEnd) => {}
                Ok(Step::End) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
