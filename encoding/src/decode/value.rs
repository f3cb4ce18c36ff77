//! Decoding of primitive data element values.
//!
//! The [`ValueCodec`] turns the raw bytes of a value
//! into a [`Value`] according to the value's [decoding kind](VrKind).
//! It performs no I/O and never fails:
//! anomalies such as trailing partial numbers or odd-length words
//! are logged and worked around.

use crate::decode::basic::BasicDecoder;
use crate::decode::BasicDecode;
use crate::text::SpecificCharacterSet;
use byteordered::Endianness;
use dcmstream_core::header::{DataElementHeader, NumericKind, VrKind};
use dcmstream_core::value::{Scalar, Value};
use dcmstream_core::VR;
use std::io;

/// Characters removed from the end of text values.
const TEXT_PADDING: &[char] = &[' ', '\0'];

/// A decoder of primitive values,
/// bound to a byte order and a character set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueCodec {
    basic: BasicDecoder,
    charset: SpecificCharacterSet,
}

impl Default for ValueCodec {
    fn default() -> Self {
        ValueCodec::new(Endianness::Little, SpecificCharacterSet::Default)
    }
}

impl ValueCodec {
    /// Create a value codec.
    pub fn new(endianness: Endianness, charset: SpecificCharacterSet) -> Self {
        ValueCodec {
            basic: BasicDecoder::new(endianness),
            charset,
        }
    }

    /// The byte order of binary values.
    pub fn endianness(&self) -> Endianness {
        self.basic.endianness()
    }

    /// The character set of text values.
    pub fn charset(&self) -> SpecificCharacterSet {
        self.charset
    }

    /// Decode the raw bytes of a value of the given kind.
    ///
    /// The header identifies the element in log messages,
    /// and distinguishes OB from OW pixel data.
    ///
    /// Sequences are not primitive values:
    /// if asked to decode one, the raw bytes are kept as they are.
    pub fn decode(&self, kind: VrKind, raw: &[u8], header: &DataElementHeader) -> Value {
        match kind {
            VrKind::Strings => self.decode_strings(raw, self.charset),
            VrKind::DateTime => self.decode_strings(raw, SpecificCharacterSet::Default),
            VrKind::Text => match trim_text(self.charset.decode_lossy(raw)) {
                s if s.is_empty() => Value::Empty,
                s => Value::Single(Scalar::Str(s)),
            },
            VrKind::NumericString(numeric) => self.decode_numeric_strings(raw, numeric),
            VrKind::Int16 => self.decode_binary(raw, 2, header, |b, c| {
                b.decode_ss(c).map(|v| Scalar::Int(v.into()))
            }),
            VrKind::UInt16 => self.decode_binary(raw, 2, header, |b, c| {
                b.decode_us(c).map(|v| Scalar::Int(v.into()))
            }),
            VrKind::Int32 => self.decode_binary(raw, 4, header, |b, c| {
                b.decode_sl(c).map(|v| Scalar::Int(v.into()))
            }),
            VrKind::UInt32 => self.decode_binary(raw, 4, header, |b, c| {
                b.decode_ul(c).map(|v| Scalar::Int(v.into()))
            }),
            VrKind::Int64 => {
                self.decode_binary(raw, 8, header, |b, c| b.decode_sv(c).map(Scalar::Int))
            }
            VrKind::UInt64 => {
                self.decode_binary(raw, 8, header, |b, c| b.decode_uv(c).map(Scalar::UInt))
            }
            VrKind::Float32 => self.decode_binary(raw, 4, header, |b, c| {
                b.decode_fl(c).map(|v| Scalar::Float(v.into()))
            }),
            VrKind::Float64 => {
                self.decode_binary(raw, 8, header, |b, c| b.decode_fd(c).map(Scalar::Float))
            }
            VrKind::Tags => {
                self.decode_binary(raw, 4, header, |b, c| b.decode_tag(c).map(Scalar::Tag))
            }
            VrKind::Words => {
                warn_odd_length(raw, header);
                Value::Bytes(self.normalize_words(raw))
            }
            VrKind::PixelData => {
                warn_odd_length(raw, header);
                if header.vr == VR::OW {
                    Value::Bytes(self.normalize_words(raw))
                } else {
                    Value::Bytes(raw.to_vec())
                }
            }
            VrKind::Bytes => Value::Bytes(raw.to_vec()),
            VrKind::Sequence => {
                tracing::warn!(
                    "Sequence {} passed to the value codec, keeping raw bytes",
                    header.tag
                );
                Value::Bytes(raw.to_vec())
            }
        }
    }

    fn decode_strings(&self, raw: &[u8], charset: SpecificCharacterSet) -> Value {
        let text = trim_text(charset.decode_lossy(raw));
        if text.is_empty() {
            return Value::Empty;
        }
        if !text.contains('\\') {
            return Value::Single(Scalar::Str(text));
        }
        Value::from_scalars(text.split('\\').map(Scalar::from))
    }

    fn decode_numeric_strings(&self, raw: &[u8], numeric: NumericKind) -> Value {
        let text = trim_text(SpecificCharacterSet::Default.decode_lossy(raw));
        if text.is_empty() {
            return Value::Empty;
        }
        Value::from_scalars(text.split('\\').map(|part| {
            let trimmed = part.trim();
            let parsed = match numeric {
                NumericKind::Integer => trimmed.parse::<i64>().ok().map(Scalar::Int),
                NumericKind::Float => trimmed.parse::<f64>().ok().map(Scalar::Float),
            };
            parsed.unwrap_or_else(|| Scalar::from(part))
        }))
    }

    /// Decode consecutive binary numbers of `size` bytes each.
    fn decode_binary<F>(
        &self,
        raw: &[u8],
        size: usize,
        header: &DataElementHeader,
        read: F,
    ) -> Value
    where
        F: Fn(&BasicDecoder, &[u8]) -> io::Result<Scalar>,
    {
        let chunks = raw.chunks_exact(size);
        if !chunks.remainder().is_empty() {
            tracing::warn!(
                "Ignoring {} trailing bytes of {} ({}), not a multiple of {}",
                chunks.remainder().len(),
                header.tag,
                header.vr,
                size
            );
        }
        Value::from_scalars(chunks.filter_map(|chunk| read(&self.basic, chunk).ok()))
    }

    /// Repack 16-bit words from the source byte order into native byte order.
    /// A trailing odd byte is kept as is.
    fn normalize_words(&self, raw: &[u8]) -> Vec<u8> {
        let whole = raw.len() & !1;
        let mut words = vec![0u16; whole / 2];
        if let Err(e) = self.basic.decode_us_into(&raw[..whole], &mut words) {
            tracing::warn!("Could not repack words: {}", e);
            return raw.to_vec();
        }
        let mut out: Vec<u8> = Vec::with_capacity(raw.len());
        for word in words {
            out.extend_from_slice(&word.to_ne_bytes());
        }
        out.extend_from_slice(&raw[whole..]);
        out
    }
}

/// Remove trailing spaces and null characters.
fn trim_text(mut text: String) -> String {
    let len = text.trim_end_matches(TEXT_PADDING).len();
    text.truncate(len);
    text
}

fn warn_odd_length(raw: &[u8], header: &DataElementHeader) {
    if raw.len() % 2 != 0 {
        tracing::warn!(
            "Odd value length {} for {} ({})",
            raw.len(),
            header.tag,
            header.vr
        );
    }
}
