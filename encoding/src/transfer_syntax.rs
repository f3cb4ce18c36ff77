//! Module containing the transfer syntax specifiers
//! known to the decoder,
//! and the resolution of transfer syntax UIDs
//! into a byte order and value representation mode.
//!
//! Only the way data sets are encoded is of interest here.
//! Encapsulated pixel data is passed through as opaque fragments,
//! so compressed transfer syntaxes resolve to Explicit VR Little Endian.

use byteordered::Endianness;
use dcmstream_core::VR;
use snafu::{Backtrace, Snafu};

/// An error resolving a transfer syntax.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The transfer syntax UID is not known,
    /// or its data set encoding is not supported.
    #[snafu(display("Unresolved transfer syntax `{}`", uid))]
    UnresolvedTransferSyntax { uid: String, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A DICOM transfer syntax specifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// Whether pixel data is encapsulated in fragments.
    encapsulated: bool,
}

impl TransferSyntax {
    /// Create a new transfer syntax descriptor.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        encapsulated: bool,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            encapsulated,
        }
    }

    /// Create a new descriptor
    /// for an encapsulated transfer syntax in explicit VR little endian.
    pub const fn new_encapsulated(uid: &'static str, name: &'static str) -> Self {
        TransferSyntax::new(uid, name, Endianness::Little, true, true)
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Whether value representations are explicit.
    pub const fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Whether pixel data is encapsulated in fragments.
    pub const fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }
}

/// A list of the transfer syntax specifiers known to the decoder.
pub mod entries {
    use super::TransferSyntax as Ts;
    use byteordered::Endianness;

    // -- the three base transfer syntaxes --

    /// Implicit VR Little Endian: Default Transfer Syntax for DICOM
    pub const IMPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
        "1.2.840.10008.1.2",
        "Implicit VR Little Endian",
        Endianness::Little,
        false,
        false,
    );

    /// Explicit VR Little Endian
    pub const EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
        "1.2.840.10008.1.2.1",
        "Explicit VR Little Endian",
        Endianness::Little,
        true,
        false,
    );

    /// Explicit VR Big Endian
    pub const EXPLICIT_VR_BIG_ENDIAN: Ts = Ts::new(
        "1.2.840.10008.1.2.2",
        "Explicit VR Big Endian",
        Endianness::Big,
        true,
        false,
    );

    /// Encapsulated Uncompressed Explicit VR Little Endian
    pub const ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.1.98",
        "Encapsulated Uncompressed Explicit VR Little Endian",
    );

    // -- encapsulated pixel data --

    /// JPEG Baseline (Process 1): Default Transfer Syntax for Lossy JPEG 8-bit Image Compression
    pub const JPEG_BASELINE: Ts =
        Ts::new_encapsulated("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");
    /// JPEG Extended (Process 2 & 4)
    pub const JPEG_EXTENDED: Ts =
        Ts::new_encapsulated("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");
    /// JPEG Lossless, Non-Hierarchical (Process 14)
    pub const JPEG_LOSSLESS_NON_HIERARCHICAL: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.57",
        "JPEG Lossless, Non-Hierarchical (Process 14)",
    );
    /// JPEG Lossless, Non-Hierarchical, First-Order Prediction
    pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.70",
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    );
    /// JPEG-LS Lossless Image Compression
    pub const JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.80",
        "JPEG-LS Lossless Image Compression",
    );
    /// JPEG-LS Lossy (Near-Lossless) Image Compression
    pub const JPEG_LS_LOSSY_IMAGE_COMPRESSION: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.81",
        "JPEG-LS Lossy (Near-Lossless) Image Compression",
    );
    /// JPEG 2000 Image Compression (Lossless Only)
    pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.90",
        "JPEG 2000 Image Compression (Lossless Only)",
    );
    /// JPEG 2000 Image Compression
    pub const JPEG_2000_IMAGE_COMPRESSION: Ts =
        Ts::new_encapsulated("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression");
    /// MPEG2 Main Profile / Main Level
    pub const MPEG2_MAIN_PROFILE_MAIN_LEVEL: Ts =
        Ts::new_encapsulated("1.2.840.10008.1.2.4.100", "MPEG2 Main Profile / Main Level");
    /// MPEG-4 AVC/H.264 High Profile / Level 4.1
    pub const MPEG4_AVC_H264_HIGH_PROFILE: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.102",
        "MPEG-4 AVC/H.264 High Profile / Level 4.1",
    );
    /// HEVC/H.265 Main Profile / Level 5.1
    pub const HEVC_H265_MAIN_PROFILE: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.107",
        "HEVC/H.265 Main Profile / Level 5.1",
    );
    /// High-Throughput JPEG 2000 Image Compression (Lossless Only)
    pub const HIGH_THROUGHPUT_JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.201",
        "High-Throughput JPEG 2000 Image Compression (Lossless Only)",
    );
    /// High-Throughput JPEG 2000 Image Compression
    pub const HIGH_THROUGHPUT_JPEG_2000_IMAGE_COMPRESSION: Ts = Ts::new_encapsulated(
        "1.2.840.10008.1.2.4.203",
        "High-Throughput JPEG 2000 Image Compression",
    );
    /// RLE Lossless
    pub const RLE_LOSSLESS: Ts = Ts::new_encapsulated("1.2.840.10008.1.2.5", "RLE Lossless");
}

use self::entries::*;

static REGISTRY: &[TransferSyntax] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    ENCAPSULATED_UNCOMPRESSED_EXPLICIT_VR_LITTLE_ENDIAN,
    JPEG_BASELINE,
    JPEG_EXTENDED,
    JPEG_LOSSLESS_NON_HIERARCHICAL,
    JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION,
    JPEG_LS_LOSSLESS_IMAGE_COMPRESSION,
    JPEG_LS_LOSSY_IMAGE_COMPRESSION,
    JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
    JPEG_2000_IMAGE_COMPRESSION,
    MPEG2_MAIN_PROFILE_MAIN_LEVEL,
    MPEG4_AVC_H264_HIGH_PROFILE,
    HEVC_H265_MAIN_PROFILE,
    HIGH_THROUGHPUT_JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
    HIGH_THROUGHPUT_JPEG_2000_IMAGE_COMPRESSION,
    RLE_LOSSLESS,
];

/// UID prefixes of transfer syntax families
/// whose data sets are encoded in explicit VR little endian.
const ENCAPSULATED_FAMILIES: &[&str] = &[
    // JPEG, JPEG-LS, JPEG 2000, MPEG, HEVC, HTJ2K and JPEG XL
    "1.2.840.10008.1.2.4.",
    // RLE
    "1.2.840.10008.1.2.5",
];

/// Remove the trailing padding of a UID value.
pub fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(|c: char| c == '\0' || c == ' ')
}

/// Iterate over all registered transfer syntaxes.
pub fn iter() -> impl Iterator<Item = &'static TransferSyntax> {
    REGISTRY.iter()
}

/// Retrieve the registered transfer syntax with the given UID.
pub fn get(uid: &str) -> Option<&'static TransferSyntax> {
    let uid = trim_uid(uid);
    REGISTRY.iter().find(|ts| ts.uid() == uid)
}

/// Resolve a transfer syntax UID into
/// the byte order of the data set
/// and whether its value representations are implicit.
///
/// Unregistered members of the compressed families
/// resolve to Explicit VR Little Endian.
/// Deflated data sets are not supported.
pub fn resolve(uid: &str) -> Result<(Endianness, bool)> {
    if let Some(ts) = get(uid) {
        return Ok((ts.endianness(), !ts.is_explicit_vr()));
    }
    let uid = trim_uid(uid);
    if ENCAPSULATED_FAMILIES
        .iter()
        .any(|prefix| uid.starts_with(prefix))
    {
        tracing::debug!(
            "Unknown transfer syntax {} resolved by family as Explicit VR Little Endian",
            uid
        );
        return Ok((Endianness::Little, false));
    }
    UnresolvedTransferSyntaxSnafu { uid }.fail()
}

/// Check the declared value representation mode
/// against the first bytes of a data set (at least 6).
///
/// The mode is explicit if bytes 4 and 5 form a known VR code
/// in either letter case, implicit otherwise.
/// With fewer than 6 bytes, the declared mode is kept.
///
/// Returns whether the data set should be read in implicit VR.
pub fn verify_consistency(peek: &[u8], declared_implicit: bool) -> bool {
    if peek.len() < 6 {
        return declared_implicit;
    }
    let code = [peek[4], peek[5]];
    let explicit = VR::from_binary(code).is_some();
    let implicit = !explicit;
    if implicit != declared_implicit {
        tracing::debug!(
            "Data set declared as {} VR, but reads as {} VR",
            if declared_implicit { "implicit" } else { "explicit" },
            if implicit { "implicit" } else { "explicit" },
        );
    }
    implicit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.840.10008.1.2", Endianness::Little, true)]
    #[case("1.2.840.10008.1.2\0", Endianness::Little, true)]
    #[case("1.2.840.10008.1.2.1", Endianness::Little, false)]
    #[case("1.2.840.10008.1.2.1 ", Endianness::Little, false)]
    #[case("1.2.840.10008.1.2.2", Endianness::Big, false)]
    #[case("1.2.840.10008.1.2.4.50", Endianness::Little, false)]
    #[case("1.2.840.10008.1.2.4.91", Endianness::Little, false)]
    #[case("1.2.840.10008.1.2.5", Endianness::Little, false)]
    // not registered, but part of a compressed family
    #[case("1.2.840.10008.1.2.4.110", Endianness::Little, false)]
    fn resolve_known_uids(
        #[case] uid: &str,
        #[case] endianness: Endianness,
        #[case] implicit: bool,
    ) {
        assert_eq!(resolve(uid).unwrap(), (endianness, implicit));
    }

    #[rstest]
    #[case("1.2.840.10008.1.2.1.99")]
    #[case("1.2.3.4")]
    #[case("")]
    fn unresolved_uids(#[case] uid: &str) {
        assert!(matches!(
            resolve(uid),
            Err(Error::UnresolvedTransferSyntax { .. })
        ));
    }

    #[test]
    fn registry_lookup() {
        let ts = get("1.2.840.10008.1.2.4.50\0").unwrap();
        assert_eq!(ts.name(), "JPEG Baseline (Process 1)");
        assert!(ts.is_encapsulated());
        assert!(ts.is_explicit_vr());
        assert!(iter().all(|ts| ts.uid().starts_with("1.2.840.10008.1.2")));
    }

    #[test]
    fn consistency_heuristic() {
        #[rustfmt::skip]
        let explicit: &[u8] = &[
            0x08, 0x00, 0x05, 0x00, // (0008,0005)
            b'C', b'S',             // VR: CS
        ];
        #[rustfmt::skip]
        let implicit: &[u8] = &[
            0x08, 0x00, 0x05, 0x00, // (0008,0005)
            0x0A, 0x00, 0x00, 0x00, // Length: 10
        ];

        // declared correctly
        assert!(!verify_consistency(explicit, false));
        assert!(verify_consistency(implicit, true));
        // flipped in either direction
        assert!(!verify_consistency(explicit, true));
        assert!(verify_consistency(implicit, false));
        // VR codes in lower case are read by the explicit VR decoder too
        #[rustfmt::skip]
        let lowercase: &[u8] = &[
            0x08, 0x00, 0x60, 0x00, // (0008,0060)
            b'c', b's',             // VR: cs
            0x02, 0x00,             // Length: 2
        ];
        assert!(!verify_consistency(lowercase, false));
        assert!(!verify_consistency(lowercase, true));
        // not enough bytes to tell
        assert!(verify_consistency(&explicit[..5], true));
        assert!(!verify_consistency(&implicit[..4], false));
    }
}
