//! Reading complete DICOM files:
//! preamble, magic code, file meta group and the main data set.

use crate::error::*;
use crate::source::PeekableSource;
use crate::state::ParseState;
use crate::stream::DataSetDecoder;
use dcmstream_core::{DataDictionary, DataSet, Tag};
use dcmstream_dictionary_std::tags;
use dcmstream_dictionary_std::StandardDataDictionary;
use dcmstream_encoding::transfer_syntax::{self, TransferSyntax};
use snafu::{OptionExt, ResultExt};
use std::io::Read;

/// The size of the file preamble, in bytes.
const PREAMBLE_LENGTH: usize = 128;

/// The magic code which follows the preamble.
const DICM_MAGIC: &[u8; 4] = b"DICM";

/// The length of the file meta group length element
/// in explicit VR little endian.
const GROUP_LENGTH_ELEMENT_LENGTH: u64 = 12;

/// A builder type for reading a DICOM file.
///
/// Call adaptor methods in a chain,
/// and finish the operation with
/// [`.from_reader()`](OpenFileOptions::from_reader)
/// or [`.from_bytes()`](OpenFileOptions::from_bytes).
///
/// ```no_run
/// # use dcmstream_parser::OpenFileOptions;
/// # let bytes: Vec<u8> = Vec::new();
/// let file = OpenFileOptions::new()
///     .skip_pixel_data(true)
///     .from_bytes(&bytes)?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct OpenFileOptions<D = StandardDataDictionary> {
    data_dictionary: D,
    skip_pixel_data: bool,
    skip_dataset_after_meta: bool,
    file_size: Option<u64>,
    allow_non_compliant: bool,
    read_until: Option<Tag>,
    read_preamble: ReadPreamble,
    max_sequence_depth: Option<u32>,
}

impl OpenFileOptions {
    pub fn new() -> Self {
        OpenFileOptions::default()
    }
}

impl<D> OpenFileOptions<D> {
    /// Set whether to discard the root pixel data
    /// and everything after it.
    pub fn skip_pixel_data(mut self, skip: bool) -> Self {
        self.skip_pixel_data = skip;
        self
    }

    /// Set whether to stop after the file meta group.
    pub fn skip_dataset_after_meta(mut self, skip: bool) -> Self {
        self.skip_dataset_after_meta = skip;
        self
    }

    /// Declare the size of the file in bytes.
    ///
    /// When skipping pixel data,
    /// no more than this many bytes are consumed from the source.
    pub fn file_size(mut self, size: u64) -> Self {
        self.file_size = Some(size);
        self
    }

    /// Set whether to accept files without a preamble,
    /// and data sets without a magic code or file meta group.
    pub fn allow_non_compliant(mut self, allow: bool) -> Self {
        self.allow_non_compliant = allow;
        self
    }

    /// Set the operation to read only until the given tag is found.
    ///
    /// The reading process ends immediately before this tag,
    /// or any other tag that is next in the standard DICOM tag ordering,
    /// is found in the object's root data set.
    pub fn read_until(mut self, tag: Tag) -> Self {
        self.read_until = Some(tag);
        self
    }

    /// Set the operation to read all elements of the data set to the end.
    ///
    /// This is the default behavior.
    pub fn read_all(mut self) -> Self {
        self.read_until = None;
        self
    }

    /// Set whether to read the 128-byte DICOM file preamble.
    pub fn read_preamble(mut self, option: ReadPreamble) -> Self {
        self.read_preamble = option;
        self
    }

    /// Set the maximum sequence nesting level.
    ///
    /// Defaults to [`DEFAULT_MAX_SEQUENCE_DEPTH`](crate::stream::DEFAULT_MAX_SEQUENCE_DEPTH).
    /// Deeper sequences fail with [`Error::MaxSequenceDepth`](crate::Error::MaxSequenceDepth).
    pub fn max_sequence_depth(mut self, depth: u32) -> Self {
        self.max_sequence_depth = Some(depth);
        self
    }

    /// Set the data element dictionary to use when reading the file.
    pub fn dictionary<Di>(self, dict: Di) -> OpenFileOptions<Di>
    where
        Di: DataDictionary,
        Di: Clone,
    {
        OpenFileOptions {
            data_dictionary: dict,
            skip_pixel_data: self.skip_pixel_data,
            skip_dataset_after_meta: self.skip_dataset_after_meta,
            file_size: self.file_size,
            allow_non_compliant: self.allow_non_compliant,
            read_until: self.read_until,
            read_preamble: self.read_preamble,
            max_sequence_depth: self.max_sequence_depth,
        }
    }

    /// Decode a DICOM file held in memory.
    pub fn from_bytes(self, bytes: &[u8]) -> Result<DicomFile>
    where
        D: DataDictionary,
        D: Clone,
    {
        let size = self.file_size.unwrap_or(bytes.len() as u64);
        self.file_size(size).from_reader(bytes)
    }

    /// Decode a DICOM file from a byte source.
    pub fn from_reader<R>(self, from: R) -> Result<DicomFile>
    where
        R: Read,
        D: DataDictionary,
        D: Clone,
    {
        let mut source = PeekableSource::new(from);

        if !self.read_magic(&mut source)? {
            // a bare data set, its encoding is guessed from the data
            let position = source.position();
            let peeked = source.peek(6).context(PeekDataSnafu { position })?;
            let implicit = transfer_syntax::verify_consistency(peeked, true);
            let state = ParseState::implicit_vr_le().with_verified_mode(implicit);
            let dataset = self.read_body(source, state)?;
            return Ok(DicomFile {
                meta: DataSet::new(),
                dataset,
            });
        }

        let meta_start = source.position();
        let mut meta_decoder = DataSetDecoder::from_source(
            source,
            ParseState::explicit_vr_le(),
            self.data_dictionary.clone(),
        )
        .read_group(0x0002);
        let meta = meta_decoder.by_ref().collect::<Result<DataSet>>()?;
        let mut source = meta_decoder.into_source();
        check_group_length(&meta, source.position() - meta_start);

        let uid = meta
            .get(tags::TRANSFER_SYNTAX_UID)
            .and_then(|e| e.string())
            .context(MissingTransferSyntaxSnafu)?;
        let (endianness, implicit) =
            transfer_syntax::resolve(uid).context(ResolveTransferSyntaxSnafu)?;

        if self.skip_dataset_after_meta {
            return Ok(DicomFile {
                meta,
                dataset: DataSet::new(),
            });
        }

        let position = source.position();
        let peeked = source.peek(6).context(PeekDataSnafu { position })?;
        let implicit = transfer_syntax::verify_consistency(peeked, implicit);
        let state = ParseState::new(endianness, implicit).with_verified_mode(implicit);
        let dataset = self.read_body(source, state)?;
        Ok(DicomFile { meta, dataset })
    }

    /// Consume the preamble and the magic code.
    ///
    /// Returns `false` if the source is a bare data set,
    /// which is only accepted for non-compliant files.
    fn read_magic<R>(&self, source: &mut PeekableSource<R>) -> Result<bool>
    where
        R: Read,
    {
        let peeked = source
            .peek(PREAMBLE_LENGTH + DICM_MAGIC.len())
            .context(PeekDataSnafu { position: 0_u64 })?;
        let magic_after_preamble = peeked.get(PREAMBLE_LENGTH..) == Some(&DICM_MAGIC[..]);
        let magic_at_start = peeked.starts_with(DICM_MAGIC);

        let skip = match self.read_preamble {
            ReadPreamble::Always => PREAMBLE_LENGTH,
            ReadPreamble::Never => 0,
            ReadPreamble::Auto if magic_after_preamble => PREAMBLE_LENGTH,
            ReadPreamble::Auto if magic_at_start && self.allow_non_compliant => {
                tracing::warn!("File has no preamble");
                0
            }
            ReadPreamble::Auto if self.allow_non_compliant => {
                tracing::warn!("File has no preamble nor magic code, reading as a bare data set");
                return Ok(false);
            }
            ReadPreamble::Auto => return InvalidMagicSnafu.fail(),
        };

        let mut preamble = [0u8; PREAMBLE_LENGTH];
        source
            .read_exact(&mut preamble[..skip])
            .context(ReadPreambleSnafu)?;

        let peeked = source
            .peek(DICM_MAGIC.len())
            .context(PeekDataSnafu { position: skip as u64 })?;
        if peeked == DICM_MAGIC {
            let mut magic = [0u8; 4];
            source.read_exact(&mut magic).context(ReadPreambleSnafu)?;
            Ok(true)
        } else if self.allow_non_compliant {
            tracing::warn!("File has no magic code, reading as a bare data set");
            Ok(false)
        } else {
            InvalidMagicSnafu.fail()
        }
    }

    fn read_body<R>(&self, source: PeekableSource<R>, state: ParseState) -> Result<DataSet>
    where
        R: Read,
        D: DataDictionary,
        D: Clone,
    {
        let state = state.with_skip_pixel_data(self.skip_pixel_data);
        let mut decoder = DataSetDecoder::from_source(source, state, self.data_dictionary.clone())
            .file_size(self.file_size);
        if let Some(tag) = self.read_until {
            decoder = decoder.read_until(tag);
        }
        if let Some(depth) = self.max_sequence_depth {
            decoder = decoder.max_sequence_depth(depth);
        }
        decoder.read_dataset()
    }
}

/// Compare the declared file meta group length
/// with the number of bytes the group actually took.
fn check_group_length(meta: &DataSet, meta_len: u64) {
    let declared = match meta
        .get(tags::FILE_META_INFORMATION_GROUP_LENGTH)
        .and_then(|e| e.value().int())
    {
        Some(len) => len,
        None => {
            tracing::warn!("File meta group length is missing");
            return;
        }
    };
    let actual = meta_len.saturating_sub(GROUP_LENGTH_ELEMENT_LENGTH);
    if declared != actual as i64 {
        tracing::warn!(
            "File meta group length is {} but the group has {} bytes",
            declared,
            actual
        );
    }
}

/// An enumerate of supported options for
/// whether to read the 128-byte DICOM file preamble.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ReadPreamble {
    /// Read the preamble if the magic code is found after it.
    /// Otherwise the file is only accepted
    /// if non-compliant files are allowed.
    Auto,
    /// Never read the preamble,
    /// thus assuming that the source starts with the magic code.
    Never,
    /// Always read the preamble first,
    /// thus assuming that the original source always has it.
    Always,
}

impl Default for ReadPreamble {
    fn default() -> Self {
        ReadPreamble::Auto
    }
}

/// A decoded DICOM file: its file meta group and its main data set.
#[derive(Debug, Clone, PartialEq)]
pub struct DicomFile {
    meta: DataSet,
    dataset: DataSet,
}

impl DicomFile {
    /// The file meta group.
    /// Empty if the file was read as a bare data set.
    pub fn meta(&self) -> &DataSet {
        &self.meta
    }

    /// The main data set.
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    pub fn into_parts(self) -> (DataSet, DataSet) {
        (self.meta, self.dataset)
    }

    /// The transfer syntax UID declared in the file meta group,
    /// without padding.
    pub fn transfer_syntax_uid(&self) -> Option<&str> {
        self.meta
            .get(tags::TRANSFER_SYNTAX_UID)
            .and_then(|e| e.string())
            .map(transfer_syntax::trim_uid)
    }

    /// The declared transfer syntax,
    /// if it is one of the registered transfer syntaxes.
    pub fn transfer_syntax(&self) -> Option<&'static TransferSyntax> {
        self.transfer_syntax_uid().and_then(transfer_syntax::get)
    }

    /// A summary of the main attributes of the file meta group.
    pub fn meta_summary(&self) -> FileMetaSummary {
        let uid = |tag: Tag| {
            self.meta
                .get(tag)
                .and_then(|e| e.string())
                .map(|s| transfer_syntax::trim_uid(s).to_string())
        };
        FileMetaSummary {
            media_storage_sop_class_uid: uid(tags::MEDIA_STORAGE_SOP_CLASS_UID),
            media_storage_sop_instance_uid: uid(tags::MEDIA_STORAGE_SOP_INSTANCE_UID),
            transfer_syntax: uid(tags::TRANSFER_SYNTAX_UID),
            implementation_class_uid: uid(tags::IMPLEMENTATION_CLASS_UID),
        }
    }
}

/// The identifying attributes of a file meta group.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileMetaSummary {
    pub media_storage_sop_class_uid: Option<String>,
    pub media_storage_sop_instance_uid: Option<String>,
    pub transfer_syntax: Option<String>,
    pub implementation_class_uid: Option<String>,
}
