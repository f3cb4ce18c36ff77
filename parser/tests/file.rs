//! Reading complete files: preamble, meta group and data set.

mod common;

use common::*;
use dcmstream_core::{Tag, VR};
use dcmstream_dictionary_std::tags;
use dcmstream_encoding::Endianness;
use dcmstream_parser::{Error, FileMetaSummary, OpenFileOptions, ReadPreamble};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn explicit_body() -> Vec<u8> {
    let mut body = explicit_le(tags::SOP_CLASS_UID, VR::UI, &uid("1.2.840.10008.5.1.4.1.1.7"));
    body.extend(explicit_le(tags::MODALITY, VR::CS, b"OT"));
    body.extend(explicit_le(tags::PATIENT_NAME, VR::PN, b"Doe^John"));
    body.extend(explicit_le(tags::ROWS, VR::US, &[0x02, 0x00]));
    body.extend(explicit_le(tags::PIXEL_DATA, VR::OB, &[1, 2, 3, 4]));
    body
}

fn implicit_body() -> Vec<u8> {
    let mut body = implicit_le(tags::SOP_CLASS_UID, &uid("1.2.840.10008.5.1.4.1.1.7"));
    body.extend(implicit_le(tags::MODALITY, b"OT"));
    body.extend(implicit_le(tags::PATIENT_NAME, b"Doe^John"));
    body.extend(implicit_le(tags::ROWS, &[0x02, 0x00]));
    body.extend(implicit_le(tags::PIXEL_DATA, &[1, 2, 3, 4]));
    body
}

#[test]
fn read_explicit_vr_le_file() {
    let bytes = dicom_file(EXPLICIT_VR_LE, &explicit_body());
    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();

    assert_eq!(file.meta().len(), 6);
    assert_eq!(file.transfer_syntax_uid(), Some(EXPLICIT_VR_LE));
    let ts = file.transfer_syntax().unwrap();
    assert!(ts.is_explicit_vr());
    assert_eq!(ts.endianness(), Endianness::Little);

    assert_eq!(
        file.meta_summary(),
        FileMetaSummary {
            media_storage_sop_class_uid: Some("1.2.840.10008.5.1.4.1.1.7".to_string()),
            media_storage_sop_instance_uid: Some("2.25.1234567890".to_string()),
            transfer_syntax: Some(EXPLICIT_VR_LE.to_string()),
            implementation_class_uid: Some("1.2.3.4.100".to_string()),
        }
    );

    let dataset = file.dataset();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.get(tags::ROWS).unwrap().value().int(), Some(2));
    assert_eq!(
        dataset.element_by_expr("(0010,0010)").unwrap().string(),
        Some("Doe^John")
    );
    assert_eq!(
        dataset.get(tags::PIXEL_DATA).unwrap().value().bytes(),
        Some(&[1, 2, 3, 4][..])
    );
}

#[test]
fn read_implicit_vr_le_file() {
    let bytes = dicom_file(IMPLICIT_VR_LE, &implicit_body());
    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    let dataset = file.dataset();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.get(tags::MODALITY).unwrap().vr(), VR::CS);
    assert_eq!(dataset.get(tags::PATIENT_NAME).unwrap().string(), Some("Doe^John"));
    // pixel data is always OW in implicit VR
    assert_eq!(dataset.get(tags::PIXEL_DATA).unwrap().vr(), VR::OW);
}

#[test]
fn read_explicit_vr_be_file() {
    let mut body = explicit_be(tags::MODALITY, VR::CS, b"OT");
    body.extend(explicit_be(tags::ROWS, VR::US, &[0x00, 0x40]));
    body.extend(explicit_be(Tag(0x0018, 0x9074), VR::FD, &1.5_f64.to_be_bytes()));
    let bytes = dicom_file(EXPLICIT_VR_BE, &body);

    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    let dataset = file.dataset();
    assert_eq!(dataset.get(tags::ROWS).unwrap().value().int(), Some(64));
    assert_eq!(
        dataset.get(Tag(0x0018, 0x9074)).unwrap().value().float(),
        Some(1.5)
    );
}

/// The declared VR mode is corrected by looking at the data set.
#[rstest]
#[case(EXPLICIT_VR_LE, false)]
#[case(EXPLICIT_VR_LE, true)]
#[case(IMPLICIT_VR_LE, false)]
#[case(IMPLICIT_VR_LE, true)]
fn mode_follows_the_data(#[case] declared: &str, #[case] implicit_body_data: bool) {
    let body = if implicit_body_data {
        implicit_body()
    } else {
        explicit_body()
    };
    let bytes = dicom_file(declared, &body);
    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    let dataset = file.dataset();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.get(tags::MODALITY).unwrap().string(), Some("OT"));
    assert_eq!(dataset.get(tags::ROWS).unwrap().value().int(), Some(2));
}

#[test]
fn compressed_file_keeps_fragments() {
    let mut body = explicit_le(tags::ROWS, VR::US, &[0x10, 0x00]);
    body.extend(explicit_header_le(tags::PIXEL_DATA, VR::OB, 0xFFFF_FFFF));
    body.extend(marker_le(0xE000, 0));
    body.extend(marker_le(0xE000, 6));
    body.extend(&[0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9]);
    body.extend(marker_le(0xE0DD, 0));
    let bytes = dicom_file(JPEG_BASELINE, &body);

    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    assert!(file.transfer_syntax().unwrap().is_encapsulated());
    assert_eq!(
        file.dataset().get(tags::PIXEL_DATA).unwrap().value().bytes(),
        Some(&[0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9][..])
    );
}

#[test]
fn unregistered_family_member_is_resolved() {
    let uid = format!("{}110", ENCAPSULATED_FAMILY_PREFIX);
    let bytes = dicom_file(&uid, &explicit_body());
    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    assert!(file.transfer_syntax().is_none());
    assert_eq!(file.dataset().len(), 5);
}

#[test]
fn deflated_file_is_not_resolved() {
    let bytes = dicom_file(DEFLATED, &[0x78, 0x9C, 0x01, 0x02]);
    let err = OpenFileOptions::new().from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::ResolveTransferSyntax { .. }));
}

#[test]
fn skip_pixel_data_and_beyond() {
    let mut body = explicit_body();
    body.extend(explicit_le(Tag(0xFFFA, 0xFFFA), VR::OB, &[0; 8]));
    let bytes = dicom_file(EXPLICIT_VR_LE, &body);

    let file = OpenFileOptions::new()
        .skip_pixel_data(true)
        .from_bytes(&bytes)
        .unwrap();
    let dataset = file.dataset();
    assert_eq!(dataset.len(), 4);
    assert!(dataset.get(tags::PIXEL_DATA).is_none());
}

#[test]
fn skip_dataset_after_meta() {
    let bytes = dicom_file(EXPLICIT_VR_LE, &explicit_body());
    let file = OpenFileOptions::new()
        .skip_dataset_after_meta(true)
        .from_bytes(&bytes)
        .unwrap();
    assert_eq!(file.meta().len(), 6);
    assert!(file.dataset().is_empty());
}

#[test]
fn read_until_a_tag() {
    let bytes = dicom_file(EXPLICIT_VR_LE, &explicit_body());
    let file = OpenFileOptions::new()
        .read_until(tags::PATIENT_NAME)
        .from_bytes(&bytes)
        .unwrap();
    let tags_read: Vec<_> = file.dataset().iter().map(|e| e.tag()).collect();
    assert_eq!(tags_read, vec![tags::SOP_CLASS_UID, tags::MODALITY]);
}

#[test]
fn specific_character_set_in_file() {
    let mut body = explicit_le(tags::SPECIFIC_CHARACTER_SET, VR::CS, b"\\ISO 2022 IR 100");
    body.extend(explicit_le(tags::PATIENT_NAME, VR::PN, b"G\xfcnther^Hans"));
    let bytes = dicom_file(EXPLICIT_VR_LE, &body);
    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    assert_eq!(
        file.dataset().get(tags::PATIENT_NAME).unwrap().string(),
        Some("Günther^Hans")
    );
}

#[test]
fn file_without_preamble() {
    let bytes = dicom_file(EXPLICIT_VR_LE, &explicit_body());
    let without_preamble = &bytes[128..];

    let err = OpenFileOptions::new().from_bytes(without_preamble).unwrap_err();
    assert!(matches!(err, Error::InvalidMagic { .. }));

    let file = OpenFileOptions::new()
        .allow_non_compliant(true)
        .from_bytes(without_preamble)
        .unwrap();
    assert_eq!(file.dataset().len(), 5);

    let file = OpenFileOptions::new()
        .read_preamble(ReadPreamble::Never)
        .from_bytes(without_preamble)
        .unwrap();
    assert_eq!(file.dataset().len(), 5);
}

#[test]
fn bare_data_set_is_accepted_when_non_compliant() {
    for body in [implicit_body(), explicit_body()].iter() {
        let err = OpenFileOptions::new().from_bytes(body).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { .. }));

        let file = OpenFileOptions::new()
            .allow_non_compliant(true)
            .from_bytes(body)
            .unwrap();
        assert!(file.meta().is_empty());
        assert_eq!(file.transfer_syntax(), None);
        assert_eq!(file.dataset().len(), 5);
        assert_eq!(file.dataset().get(tags::MODALITY).unwrap().string(), Some("OT"));
    }
}

#[test]
fn truncated_meta_group_fails() {
    let bytes = dicom_file(EXPLICIT_VR_LE, &[]);
    let truncated = &bytes[..bytes.len() - 3];
    let err = OpenFileOptions::new().from_bytes(truncated).unwrap_err();
    assert!(matches!(err, Error::ReadValue { .. }));
}

#[test]
fn sequence_depth_limit_applies_to_the_body() {
    let mut body = explicit_header_le(tags::REFERENCED_IMAGE_SEQUENCE, VR::SQ, 0xFFFF_FFFF);
    body.extend(marker_le(0xE000, 0xFFFF_FFFF));
    body.extend(explicit_header_le(tags::REFERENCED_IMAGE_SEQUENCE, VR::SQ, 0xFFFF_FFFF));
    body.extend(marker_le(0xE000, 0xFFFF_FFFF));
    body.extend(explicit_le(tags::MODALITY, VR::CS, b"OT"));
    let bytes = dicom_file(EXPLICIT_VR_LE, &body);

    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    assert_eq!(file.dataset().len(), 1);

    let err = OpenFileOptions::new()
        .max_sequence_depth(1)
        .from_bytes(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::MaxSequenceDepth { depth: 1, .. }));
}

#[test]
fn lowercase_vr_keeps_the_explicit_mode() {
    let mut body = explicit_le(tags::MODALITY, VR::CS, b"MR");
    body[4..6].copy_from_slice(b"cs");
    body.extend(explicit_le(tags::ROWS, VR::US, &[0x02, 0x00]));
    let bytes = dicom_file(EXPLICIT_VR_LE, &body);

    let file = OpenFileOptions::new().from_bytes(&bytes).unwrap();
    let modality = file.dataset().get(tags::MODALITY).unwrap();
    assert_eq!(modality.vr(), VR::CS);
    assert_eq!(modality.string(), Some("MR"));
    assert_eq!(file.dataset().get(tags::ROWS).unwrap().value().int(), Some(2));
}
