//! Tag constants for the attributes which the decoder gives special treatment,
//! along with a few common ones.

use dcmstream_core::Tag;

/// FileMetaInformationGroupLength (0002,0000) UL 1
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// FileMetaInformationVersion (0002,0001) OB 1
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// MediaStorageSOPClassUID (0002,0002) UI 1
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// MediaStorageSOPInstanceUID (0002,0003) UI 1
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// TransferSyntaxUID (0002,0010) UI 1
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// ImplementationClassUID (0002,0012) UI 1
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// ImplementationVersionName (0002,0013) SH 1
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// SourceApplicationEntityTitle (0002,0016) AE 1
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/// SpecificCharacterSet (0008,0005) CS 1-n
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// ImageType (0008,0008) CS 2-n
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/// SOPClassUID (0008,0016) UI 1
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOPInstanceUID (0008,0018) UI 1
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// StudyDate (0008,0020) DA 1
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/// Modality (0008,0060) CS 1
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// ReferencedImageSequence (0008,1140) SQ 1
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
/// PatientName (0010,0010) PN 1
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// PatientID (0010,0020) LO 1
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// StudyInstanceUID (0020,000D) UI 1
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// SeriesInstanceUID (0020,000E) UI 1
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// InstanceNumber (0020,0013) IS 1
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/// Rows (0028,0010) US 1
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011) US 1
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// PixelSpacing (0028,0030) DS 2
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// BitsAllocated (0028,0100) US 1
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// IconImageSequence (0088,0200) SQ 1
pub const ICON_IMAGE_SEQUENCE: Tag = Tag(0x0088, 0x0200);
/// OverlayData (6000,3000) OB or OW 1, repeating in groups 60xx
pub const OVERLAY_DATA: Tag = Tag(0x6000, 0x3000);
/// PixelData (7FE0,0010) OB or OW 1
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
/// Item (FFFE,E000)
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// ItemDelimitationItem (FFFE,E00D)
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/// SequenceDelimitationItem (FFFE,E0DD)
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);
