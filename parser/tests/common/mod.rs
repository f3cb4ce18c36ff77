//! Builders of raw DICOM content for the integration tests.
#![allow(dead_code)]

use dcmstream_core::{Tag, VR};

pub use dcmstream_dictionary_std::uids::{
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN as DEFLATED, ENCAPSULATED_FAMILY_PREFIX,
    EXPLICIT_VR_BIG_ENDIAN as EXPLICIT_VR_BE, EXPLICIT_VR_LITTLE_ENDIAN as EXPLICIT_VR_LE,
    IMPLICIT_VR_LITTLE_ENDIAN as IMPLICIT_VR_LE, JPEG_BASELINE8_BIT as JPEG_BASELINE,
};

/// An element in Explicit VR Little Endian.
pub fn explicit_le(tag: Tag, vr: VR, value: &[u8]) -> Vec<u8> {
    explicit_header_le(tag, vr, value.len() as u32)
        .into_iter()
        .chain(value.iter().copied())
        .collect()
}

/// The header of an element in Explicit VR Little Endian.
pub fn explicit_header_le(tag: Tag, vr: VR, len: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.0.to_le_bytes());
    out.extend_from_slice(&tag.1.to_le_bytes());
    out.extend_from_slice(vr.to_string().as_bytes());
    if vr.has_long_length() {
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&len.to_le_bytes());
    } else {
        out.extend_from_slice(&(len as u16).to_le_bytes());
    }
    out
}

/// An element in Explicit VR Big Endian.
pub fn explicit_be(tag: Tag, vr: VR, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.0.to_be_bytes());
    out.extend_from_slice(&tag.1.to_be_bytes());
    out.extend_from_slice(vr.to_string().as_bytes());
    if vr.has_long_length() {
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(value.len() as u32).to_be_bytes());
    } else {
        out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    }
    out.extend_from_slice(value);
    out
}

/// An element in Implicit VR Little Endian.
pub fn implicit_le(tag: Tag, value: &[u8]) -> Vec<u8> {
    let mut out = implicit_header_le(tag, value.len() as u32);
    out.extend_from_slice(value);
    out
}

/// The header of an element, item or delimiter in Implicit VR Little Endian.
pub fn implicit_header_le(tag: Tag, len: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.0.to_le_bytes());
    out.extend_from_slice(&tag.1.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out
}

/// An item, sequence or fragment marker in little endian.
pub fn marker_le(element: u16, len: u32) -> Vec<u8> {
    implicit_header_le(Tag(0xFFFE, element), len)
}

/// A UID value, padded with a null character to even length.
pub fn uid(value: &str) -> Vec<u8> {
    let mut out = value.as_bytes().to_vec();
    if out.len() % 2 != 0 {
        out.push(0);
    }
    out
}

/// A file meta group for the given transfer syntax,
/// starting with a correct group length.
pub fn meta_group(transfer_syntax: &str) -> Vec<u8> {
    let mut rest = Vec::new();
    rest.extend(explicit_le(Tag(0x0002, 0x0001), VR::OB, &[0x00, 0x01]));
    rest.extend(explicit_le(
        Tag(0x0002, 0x0002),
        VR::UI,
        &uid("1.2.840.10008.5.1.4.1.1.7"),
    ));
    rest.extend(explicit_le(
        Tag(0x0002, 0x0003),
        VR::UI,
        &uid("2.25.1234567890"),
    ));
    rest.extend(explicit_le(Tag(0x0002, 0x0010), VR::UI, &uid(transfer_syntax)));
    rest.extend(explicit_le(
        Tag(0x0002, 0x0012),
        VR::UI,
        &uid("1.2.3.4.100"),
    ));

    let mut out = explicit_le(
        Tag(0x0002, 0x0000),
        VR::UL,
        &(rest.len() as u32).to_le_bytes(),
    );
    out.extend(rest);
    out
}

/// A complete file: preamble, magic code, file meta group and body.
pub fn dicom_file(transfer_syntax: &str, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(meta_group(transfer_syntax));
    out.extend_from_slice(body);
    out
}
