//! Implicit VR decoding, with value representations
//! resolved through a data dictionary.

use crate::decode::basic::BasicDecoder;
use crate::decode::{
    BasicDecode, Decode, ReadHeaderTagSnafu, ReadItemHeaderSnafu, ReadLengthSnafu, Result,
};
use byteordered::Endianness;
use dcmstream_core::dictionary::DataDictionary;
use dcmstream_core::header::{DataElementHeader, Length};
use dcmstream_core::{Tag, VR};
use snafu::ResultExt;
use std::fmt;
use std::io::Read;

/// A data element header decoder for implicit VR encodings,
/// such as the Implicit VR Little Endian transfer syntax.
/// This type contains an attribute dictionary for resolving
/// value representations.
#[derive(Clone)]
pub struct ImplicitVrDecoder<D> {
    dict: D,
    basic: BasicDecoder,
}

impl<D> fmt::Debug for ImplicitVrDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImplicitVrDecoder")
            .field("dict", &"«omitted»")
            .field("basic", &self.basic)
            .finish()
    }
}

impl<D> ImplicitVrDecoder<D> {
    /// Create an implicit VR decoder in the given byte order,
    /// using a custom data dictionary.
    pub fn with_dict(endianness: Endianness, dict: D) -> Self {
        ImplicitVrDecoder {
            dict,
            basic: BasicDecoder::new(endianness),
        }
    }
}

impl<D> ImplicitVrDecoder<D>
where
    D: DataDictionary,
{
    /// Resolve the value representation of an element
    /// from the dictionary.
    ///
    /// Pixel Data (7FE0,0010) and Overlay Data (60xx,3000)
    /// are always OW.
    /// Private attributes are looked up under their private creator,
    /// when one is known.
    /// Attributes missing from the dictionary are UN.
    pub fn resolve_vr(&self, tag: Tag, creator: Option<&str>) -> VR {
        if tag == Tag(0x7FE0, 0x0010) || (tag.0 >> 8 == 0x60 && tag.1 == 0x3000) {
            return VR::OW;
        }
        if tag.group() == 0xFFFE {
            return VR::UN;
        }
        let info = match creator {
            Some(creator) if tag.is_private() => {
                self.dict.lookup_private(tag.group(), creator, tag.element())
            }
            _ => self.dict.lookup(tag),
        };
        info.implicit_vr()
    }
}

impl<D> Decode for ImplicitVrDecoder<D>
where
    D: DataDictionary,
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
        let len = self
            .basic
            .decode_ul(&mut *source)
            .context(ReadLengthSnafu)?;
        let vr = self.resolve_vr(tag, creator);
        Ok((DataElementHeader::new(tag, vr, Length(len)), 4))
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic
            .decode_tag(&mut *source)
            .context(ReadHeaderTagSnafu)
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<(Tag, Length)>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut *source)
            .context(ReadItemHeaderSnafu)?;
        let len = self
            .basic
            .decode_ul(&mut *source)
            .context(ReadItemHeaderSnafu)?;
        Ok((tag, Length(len)))
    }
}

#[cfg(test)]
mod tests {
    use super::ImplicitVrDecoder;
    use crate::decode::Decode;
    use byteordered::Endianness;
    use dcmstream_core::dictionary::{
        DataDictionary, DataDictionaryEntryRef, TagRange, ValueMultiplicity, VirtualVr,
    };
    use dcmstream_core::header::Length;
    use dcmstream_core::{Tag, VR};
    use std::io::{Cursor, Read};

    /// A tiny dictionary, enough for these tests.
    #[derive(Debug)]
    struct TestDictionary {
        entries: Vec<DataDictionaryEntryRef<'static>>,
        private: Vec<(&'static str, DataDictionaryEntryRef<'static>)>,
    }

    fn entry(tag: Tag, alias: &'static str, vr: VirtualVr) -> DataDictionaryEntryRef<'static> {
        DataDictionaryEntryRef {
            tag: TagRange::Single(tag),
            alias,
            vr,
            vm: ValueMultiplicity::Exact(1),
            retired: false,
        }
    }

    impl TestDictionary {
        fn new() -> Self {
            TestDictionary {
                entries: vec![
                    entry(Tag(0x0008, 0x0016), "SOPClassUID", VirtualVr::Exact(VR::UI)),
                    entry(Tag(0x0028, 0x0106), "SmallestImagePixelValue", VirtualVr::Xs),
                ],
                private: vec![(
                    "ACME 1.0",
                    entry(Tag(0x0009, 0x1002), "AcmeNumber", VirtualVr::Exact(VR::FD)),
                )],
            }
        }
    }

    impl DataDictionary for TestDictionary {
        type Entry = DataDictionaryEntryRef<'static>;

        fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
            self.entries.iter().find(|e| e.tag.inner() == tag)
        }

        fn by_name(&self, name: &str) -> Option<&Self::Entry> {
            self.entries.iter().find(|e| e.alias == name)
        }

        fn by_private_tag(&self, creator: &str, tag: Tag) -> Option<&Self::Entry> {
            self.private
                .iter()
                .find(|(c, e)| {
                    *c == creator
                        && e.tag.inner().group() == tag.group()
                        && e.tag.inner().element() & 0xFF == tag.element() & 0xFF
                })
                .map(|(_, e)| e)
        }
    }

    // manually crafting some DICOM data elements
    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x08, 0x00, 0x16, 0x00,     // (0008,0016) (LE) SOP Class UID
            0x04, 0x00, 0x00, 0x00, // Length: 4 (LE)
                b'1', b'.', b'2', 0x00,
        0x28, 0x00, 0x06, 0x01,     // (0028,0106) (LE) Smallest Image Pixel Value
            0x02, 0x00, 0x00, 0x00, // Length: 2 (LE)
                0x00, 0x00,
        0xE0, 0x7F, 0x10, 0x00,     // (7FE0,0010) (LE) Pixel Data
            0x00, 0x00, 0x00, 0x00, // Length: 0
    ];

    #[test]
    fn decode_implicit_vr_le_headers() {
        let dec = ImplicitVrDecoder::with_dict(Endianness::Little, TestDictionary::new());
        let mut cursor = Cursor::new(RAW);

        let (header, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(header.tag, Tag(0x0008, 0x0016));
        assert_eq!(header.vr, VR::UI);
        assert_eq!(header.len, Length(4));
        assert_eq!(bytes_read, 8);
        let mut value = [0; 4];
        cursor.read_exact(&mut value).unwrap();

        // US or SS is relaxed to US
        let (header, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(header.vr, VR::US);
        let mut value = [0; 2];
        cursor.read_exact(&mut value).unwrap();

        let (header, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(header.vr, VR::OW);
        assert_eq!(cursor.position() as usize, RAW.len());
    }

    #[test]
    fn resolve_vr_cases() {
        let dec = ImplicitVrDecoder::with_dict(Endianness::Little, TestDictionary::new());

        assert_eq!(dec.resolve_vr(Tag(0x6002, 0x3000), None), VR::OW);
        assert_eq!(dec.resolve_vr(Tag(0x0010, 0x0010), None), VR::UN);
        assert_eq!(dec.resolve_vr(Tag(0x0009, 0x1002), None), VR::UN);
        assert_eq!(dec.resolve_vr(Tag(0x0009, 0x1002), Some("ACME 1.0")), VR::FD);
        assert_eq!(dec.resolve_vr(Tag(0x0009, 0x1102), Some("ACME 1.0")), VR::FD);
        assert_eq!(dec.resolve_vr(Tag(0x0009, 0x1002), Some("OTHER")), VR::UN);
    }

    #[test]
    fn decode_implicit_vr_be_length() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0x00, 0x08, 0x00, 0x16, // (0008,0016) (BE) SOP Class UID
            0x00, 0x00, 0x00, 0x04, // Length: 4 (BE)
        ];
        let dec = ImplicitVrDecoder::with_dict(Endianness::Big, TestDictionary::new());
        let (header, _) = dec.decode_header(&mut &raw[..]).unwrap();
        assert_eq!(header.tag, Tag(0x0008, 0x0016));
        assert_eq!(header.len, Length(4));
    }
}
