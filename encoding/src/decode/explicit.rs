//! Explicit VR decoding, in either byte order.

use crate::decode::basic::BasicDecoder;
use crate::decode::{
    BasicDecode, Decode, ReadHeaderTagSnafu, ReadItemHeaderSnafu, ReadLengthSnafu,
    ReadReservedSnafu, ReadVrSnafu, Result,
};
use byteordered::Endianness;
use dcmstream_core::header::{DataElementHeader, Length};
use dcmstream_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Read;

/// A data element header decoder for explicit VR encodings,
/// such as the Explicit VR Little Endian transfer syntax.
#[derive(Debug, Clone)]
pub struct ExplicitVrDecoder {
    basic: BasicDecoder,
}

impl Default for ExplicitVrDecoder {
    fn default() -> Self {
        ExplicitVrDecoder::new(Endianness::Little)
    }
}

impl ExplicitVrDecoder {
    /// Create an explicit VR decoder in the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ExplicitVrDecoder {
            basic: BasicDecoder::new(endianness),
        }
    }
}

impl Decode for ExplicitVrDecoder {
    fn decode_header_rest<S>(
        &self,
        tag: Tag,
        _creator: Option<&str>,
        source: &mut S,
    ) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        if tag.group() == 0xFFFE {
            // item delimiters do not have VR or reserved field
            let len = self
                .basic
                .decode_ul(&mut *source)
                .context(ReadLengthSnafu)?;
            return Ok((DataElementHeader::new(tag, VR::UN, Length(len)), 4));
        }

        // retrieve explicit VR
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf).context(ReadVrSnafu)?;
        let vr = VR::from_binary(buf).unwrap_or_else(|| {
            tracing::trace!("Unknown VR code {:?} in {}, reading as UN", buf, tag);
            VR::UN
        });

        if vr.has_long_length() {
            // 2 reserved bytes, then 4 bytes for data length
            source.read_exact(&mut buf).context(ReadReservedSnafu)?;
            let len = self
                .basic
                .decode_ul(&mut *source)
                .context(ReadLengthSnafu)?;
            Ok((DataElementHeader::new(tag, vr, Length(len)), 8))
        } else {
            let len = self
                .basic
                .decode_us(&mut *source)
                .context(ReadLengthSnafu)?;
            let len = if len == 0xFFFF {
                Length::UNDEFINED
            } else {
                Length(u32::from(len))
            };
            Ok((DataElementHeader::new(tag, vr, len), 4))
        }
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
