//! Transfer syntax UID declarations.

/// Transfer Syntax: Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Transfer Syntax: Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
/// Transfer Syntax: Encapsulated Uncompressed Explicit VR Little Endian
pub const ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.98";
/// Transfer Syntax: Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
/// Transfer Syntax: Explicit VR Big Endian (Retired)
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
/// Transfer Syntax: JPEG Baseline (Process 1)
pub const JPEG_BASELINE8_BIT: &str = "1.2.840.10008.1.2.4.50";
/// Transfer Syntax: JPEG Extended (Process 2 & 4)
pub const JPEG_EXTENDED12_BIT: &str = "1.2.840.10008.1.2.4.51";
/// Transfer Syntax: JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS: &str = "1.2.840.10008.1.2.4.57";
/// Transfer Syntax: JPEG Lossless, Non-Hierarchical, First-Order Prediction
pub const JPEG_LOSSLESS_SV1: &str = "1.2.840.10008.1.2.4.70";
/// Transfer Syntax: JPEG-LS Lossless Image Compression
pub const JPEGLS_LOSSLESS: &str = "1.2.840.10008.1.2.4.80";
/// Transfer Syntax: JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEGLS_NEAR_LOSSLESS: &str = "1.2.840.10008.1.2.4.81";
/// Transfer Syntax: JPEG 2000 Image Compression (Lossless Only)
pub const JPEG2000_LOSSLESS: &str = "1.2.840.10008.1.2.4.90";
/// Transfer Syntax: JPEG 2000 Image Compression
pub const JPEG2000: &str = "1.2.840.10008.1.2.4.91";
/// Transfer Syntax: MPEG2 Main Profile / Main Level
pub const MPEG2MPML: &str = "1.2.840.10008.1.2.4.100";
/// Transfer Syntax: MPEG-4 AVC/H.264 High Profile / Level 4.1
pub const MPEG4HP41: &str = "1.2.840.10008.1.2.4.102";
/// Transfer Syntax: HEVC/H.265 Main Profile / Level 5.1
pub const HEVCMP51: &str = "1.2.840.10008.1.2.4.107";
/// Transfer Syntax: RLE Lossless
pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// The prefix shared by the JPEG, JPEG-LS, JPEG 2000,
/// MPEG and HEVC transfer syntaxes.
pub const ENCAPSULATED_FAMILY_PREFIX: &str = "1.2.840.10008.1.2.4.";
