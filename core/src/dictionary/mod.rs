//! This module contains the concept of a DICOM data dictionary.
//!
//! The standard data dictionary is provided by the
//! `dcmstream-dictionary-std` crate.
//! A [stub dictionary](stub::StubDataDictionary),
//! which does not know any attribute, is available here.

mod data_element;
pub mod stub;

pub use self::data_element::{
    DataDictionaryEntry, DataDictionaryEntryBuf, DataDictionaryEntryRef, ParseMultiplicityError,
    TagInfo, TagRange, TagRangeParseError, ValueMultiplicity, VirtualVr,
};

use crate::header::Tag;

/// Type trait for a dictionary of DICOM attributes.
///
/// The main purpose of an attribute dictionary is
/// to retrieve a record containing additional information about a data element,
/// in one of the following ways:
///
/// - By DICOM tag, via [`by_tag`](DataDictionary::by_tag);
/// - By its keyword (also known as alias) via [`by_name`](DataDictionary::by_name);
/// - By private creator and tag, via [`by_private_tag`](DataDictionary::by_private_tag);
/// - By an expression which may either be a keyword
///   or a tag printed in one of its standard forms,
///   using [`by_expr`](DataDictionary::by_expr).
///
/// These methods return `None` when the attribute is not recognized.
/// The [`lookup`](DataDictionary::lookup) family never fails,
/// yielding a placeholder record for unknown attributes instead.
///
/// A dictionary is meant to be built once and then shared read-only
/// by every decoder.
pub trait DataDictionary {
    /// The type of the dictionary entry.
    type Entry: DataDictionaryEntry;

    /// Fetch a data element entry by its tag.
    ///
    /// Implementations should try an exact match first,
    /// then repeating groups, then repeating elements.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its usual alias
    /// (e.g. "PatientName" or "SOPInstanceUID").
    /// Aliases are case sensitive.
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch a private data element entry
    /// by the private creator identifier reserving its block
    /// and the element's tag.
    ///
    /// Only the lower byte of the element number is significant.
    fn by_private_tag(&self, creator: &str, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its alias or by DICOM tag expression,
    /// in the `(gggg,eeee)`, `gggg,eeee`, or `ggggeeee` forms.
    fn by_expr(&self, tag: &str) -> Option<&Self::Entry> {
        match tag.parse() {
            Ok(tag) => self.by_tag(tag),
            Err(_) => self.by_name(tag),
        }
    }

    /// Use this data element dictionary to interpret a DICOM tag,
    /// either in one of its text forms or by keyword.
    fn parse_tag(&self, tag: &str) -> Option<Tag> {
        tag.parse()
            .ok()
            .or_else(|| self.by_name(tag).map(|e| e.tag()))
    }

    /// Retrieve the information record of an attribute.
    ///
    /// Unknown attributes yield a placeholder record
    /// with no VR and the name `"PrivateTag"` (odd groups)
    /// or `"UNKNOWN"` (even groups).
    fn lookup(&self, tag: Tag) -> TagInfo {
        match self.by_tag(tag) {
            Some(entry) => entry.info(),
            None => TagInfo::unknown(tag),
        }
    }

    /// Retrieve the information record of a private attribute
    /// reserved by the given private creator.
    ///
    /// Falls back to [`lookup`](DataDictionary::lookup)
    /// when the creator does not define the element.
    fn lookup_private(&self, group: u16, creator: &str, element: u16) -> TagInfo {
        let tag = Tag(group, element);
        match self.by_private_tag(creator, tag) {
            Some(entry) => entry.info(),
            None => self.lookup(tag),
        }
    }
}

impl<'a, D: DataDictionary + ?Sized> DataDictionary for &'a D {
    type Entry = D::Entry;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        (**self).by_tag(tag)
    }

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        (**self).by_name(name)
    }

    fn by_private_tag(&self, creator: &str, tag: Tag) -> Option<&Self::Entry> {
        (**self).by_private_tag(creator, tag)
    }

    fn lookup(&self, tag: Tag) -> TagInfo {
        (**self).lookup(tag)
    }

    fn lookup_private(&self, group: u16, creator: &str, element: u16) -> TagInfo {
        (**self).lookup_private(group, creator, element)
    }
}
