//! This module contains reusable components for decoding text in DICOM
//! data structures, including support for character repertoires.
//!
//! Text decoding support is limited to single-byte ISO 8859 repertoires,
//! UTF-8 and GB18030.
//! Please see [`SpecificCharacterSet`] for a complete enumeration
//! of all supported text encodings.

use encoding::all::{GB18030, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, UTF_8};
use encoding::{DecoderTrap, Encoding, RawDecoder, StringWriter};
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;

/// An error type for text decoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    DecodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

type DecodeResult<T> = Result<T, DecodeTextError>;

/// A holder of decoding mechanisms for text in DICOM content,
/// which according to the standard, depends on the specific character set.
pub trait TextCodec {
    /// Obtain the defined term (unique name) of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008, 0005) element to refer to this codec.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting string
    /// _may_ contain backslash characters ('\') to delimit individual values,
    /// and should be split later on if required.
    fn decode(&self, text: &[u8]) -> DecodeResult<String>;
}

impl<'a, T: ?Sized> TextCodec for &'a T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        (**self).decode(text)
    }
}

/// An enum type for all currently supported character sets.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SpecificCharacterSet {
    /// **ISO-IR 6**: the default character set.
    Default,
    /// **ISO-IR 100** (ISO-8859-1): Right-hand part of the Latin alphabet no. 1,
    /// the Western Europe character set.
    IsoIr100,
    /// **ISO-IR 101** (ISO-8859-2): Right-hand part of the Latin alphabet no. 2,
    /// the Central/Eastern Europe character set.
    IsoIr101,
    /// **ISO-IR 109** (ISO-8859-3): Right-hand part of the Latin alphabet no. 3,
    /// the South Europe character set.
    IsoIr109,
    /// **ISO-IR 110** (ISO-8859-4): Right-hand part of the Latin alphabet no. 4,
    /// the North Europe character set.
    IsoIr110,
    /// **ISO-IR 144** (ISO-8859-5): The Latin/Cyrillic character set.
    IsoIr144,
    /// **ISO-IR 192**: The Unicode character set based on the UTF-8 encoding.
    IsoIr192,
    /// **GB18030**: The Simplified Chinese character set.
    Gb18030,
}

impl Default for SpecificCharacterSet {
    fn default() -> Self {
        SpecificCharacterSet::Default
    }
}

impl SpecificCharacterSet {
    /// Obtain the specific character set identified by the given code string.
    ///
    /// Supported code strings include the possible values
    /// in the respective DICOM element (0008, 0005).
    ///
    /// # Example
    ///
    /// ```
    /// # use dcmstream_encoding::text::SpecificCharacterSet;
    /// let character_set = SpecificCharacterSet::from_code("ISO_IR 100");
    /// assert_eq!(character_set, Some(SpecificCharacterSet::IsoIr100));
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim_end_matches(|c| c == ' ' || c == '\0').trim_start() {
            "" | "Default" | "ISO_IR_6" | "ISO_IR 6" | "ISO 2022 IR 6" => Some(Default),
            "ISO_IR_100" | "ISO_IR 100" | "ISO 2022 IR 100" => Some(IsoIr100),
            "ISO_IR_101" | "ISO_IR 101" | "ISO 2022 IR 101" => Some(IsoIr101),
            "ISO_IR_109" | "ISO_IR 109" | "ISO 2022 IR 109" => Some(IsoIr109),
            "ISO_IR_110" | "ISO_IR 110" | "ISO 2022 IR 110" => Some(IsoIr110),
            "ISO_IR_144" | "ISO_IR 144" | "ISO 2022 IR 144" => Some(IsoIr144),
            "ISO_IR_192" | "ISO_IR 192" => Some(IsoIr192),
            "GB18030" => Some(Gb18030),
            _ => None,
        }
    }

    /// Obtain the character set declared by
    /// all values of a Specific Character Set element.
    ///
    /// The first recognized value wins.
    /// An empty first value stands for the default repertoire,
    /// as in `\ISO 2022 IR 100`, so later values are checked too.
    pub fn from_codes<'a, I>(codes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = None;
        for code in codes {
            match SpecificCharacterSet::from_code(code) {
                Some(SpecificCharacterSet::Default) => {
                    found.get_or_insert(SpecificCharacterSet::Default);
                }
                Some(charset) => return Some(charset),
                None => {}
            }
        }
        found
    }

    /// Decode the text, falling back to a lossless byte-to-char reading
    /// (as in ISO 8859-1) if the character set cannot decode it.
    pub fn decode_lossy(&self, text: &[u8]) -> String {
        self.decode(text).unwrap_or_else(|e| {
            tracing::warn!("Could not decode text as {}: {}", self.name(), e);
            text.iter().copied().map(char::from).collect()
        })
    }
}

impl TextCodec for SpecificCharacterSet {
    fn name(&self) -> &'static str {
        match self {
            SpecificCharacterSet::Default => "ISO_IR 6",
            SpecificCharacterSet::IsoIr100 => "ISO_IR 100",
            SpecificCharacterSet::IsoIr101 => "ISO_IR 101",
            SpecificCharacterSet::IsoIr109 => "ISO_IR 109",
            SpecificCharacterSet::IsoIr110 => "ISO_IR 110",
            SpecificCharacterSet::IsoIr144 => "ISO_IR 144",
            SpecificCharacterSet::IsoIr192 => "ISO_IR 192",
            SpecificCharacterSet::Gb18030 => "GB18030",
        }
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        match self {
            SpecificCharacterSet::Default => DefaultCharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr100 => IsoIr100CharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr101 => IsoIr101CharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr109 => IsoIr109CharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr110 => IsoIr110CharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr144 => IsoIr144CharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr192 => Utf8CharacterSetCodec.decode(text),
            SpecificCharacterSet::Gb18030 => Gb18030CharacterSetCodec.decode(text),
        }
    }
}

/// Write an undecodable byte as a backslash and three octal digits.
fn decode_text_trap(
    _decoder: &mut dyn RawDecoder,
    input: &[u8],
    output: &mut dyn StringWriter,
) -> bool {
    let c = input[0];
    let o0 = c & 7;
    let o1 = (c & 56) >> 3;
    let o2 = (c & 192) >> 6;
    output.write_char('\\');
    output.write_char((o2 + b'0') as char);
    output.write_char((o1 + b'0') as char);
    output.write_char((o0 + b'0') as char);
    true
}

/// Create and implement a character set type using the `encoding` crate.
macro_rules! decl_character_set {
    ($typ: ident, $term: literal, $val: expr) => {
        #[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
        #[doc = "Data type for the "]
        #[doc = $term]
        #[doc = "character set encoding."]
        pub struct $typ;

        impl TextCodec for $typ {
            fn name(&self) -> &'static str {
                $term
            }

            fn decode(&self, text: &[u8]) -> DecodeResult<String> {
                $val.decode(text, DecoderTrap::Call(decode_text_trap))
                    .map_err(|message| DecodeCustomSnafu { message }.build())
            }
        }
    };
}

decl_character_set!(DefaultCharacterSetCodec, "ISO_IR 6", ISO_8859_1);
decl_character_set!(IsoIr100CharacterSetCodec, "ISO_IR 100", ISO_8859_1);
decl_character_set!(IsoIr101CharacterSetCodec, "ISO_IR 101", ISO_8859_2);
decl_character_set!(IsoIr109CharacterSetCodec, "ISO_IR 109", ISO_8859_3);
decl_character_set!(IsoIr110CharacterSetCodec, "ISO_IR 110", ISO_8859_4);
decl_character_set!(IsoIr144CharacterSetCodec, "ISO_IR 144", ISO_8859_5);
decl_character_set!(Utf8CharacterSetCodec, "ISO_IR 192", UTF_8);
decl_character_set!(Gb18030CharacterSetCodec, "GB18030", GB18030);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec<T>(codec: T, string: &str, bytes: &[u8])
    where
        T: TextCodec,
    {
        assert_eq!(codec.decode(bytes).expect("decoding"), string);
    }

    #[test]
    fn iso_ir_6_baseline() {
        let codec = SpecificCharacterSet::Default;
        test_codec(codec, "Smith^John", b"Smith^John");
    }

    #[test]
    fn iso_ir_192_baseline() {
        let codec = SpecificCharacterSet::IsoIr192;
        test_codec(&codec, "Simões^John", "Simões^John".as_bytes());
        test_codec(codec, "Иванков^Андрей", "Иванков^Андрей".as_bytes());
    }

    #[test]
    fn iso_ir_100_baseline() {
        let codec = SpecificCharacterSet::IsoIr100;
        test_codec(&codec, "Simões^João", b"Sim\xF5es^Jo\xE3o");
        test_codec(codec, "Günther^Hans", b"G\xfcnther^Hans");
    }

    #[test]
    fn iso_ir_144_baseline() {
        let codec = SpecificCharacterSet::IsoIr144;
        test_codec(
            codec,
            "Иванков^Андрей",
            b"\xb8\xd2\xd0\xdd\xda\xde\xd2^\xb0\xdd\xd4\xe0\xd5\xd9",
        );
    }

    #[test]
    fn invalid_utf8_is_escaped() {
        let codec = SpecificCharacterSet::IsoIr192;
        assert_eq!(codec.decode_lossy(b"A\xFFB"), "A\\377B");
    }

    #[test]
    fn character_set_codes() {
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 192 "),
            Some(SpecificCharacterSet::IsoIr192)
        );
        assert_eq!(SpecificCharacterSet::from_code("ISO_IR 999"), None);
        assert_eq!(
            SpecificCharacterSet::from_codes(vec!["", "ISO 2022 IR 100"]),
            Some(SpecificCharacterSet::IsoIr100)
        );
        assert_eq!(
            SpecificCharacterSet::from_codes(vec!["ISO_IR 6"]),
            Some(SpecificCharacterSet::Default)
        );
        assert_eq!(SpecificCharacterSet::from_codes(vec!["KLINGON"]), None);
    }
}
