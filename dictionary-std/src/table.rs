//! Parsing of the textual attribute tables.
//!
//! Each non-empty line which does not start with `#` describes one attribute,
//! with tab separated fields.
//!
//! Public table lines have the form
//! `(gggg,eeee)  VR  Keyword  VM  [RET]`,
//! private table lines the form
//! `creator  (gggg,xxee)  VR  Keyword  VM  [RET]`.
//!
//! The group part of a public tag may be
//! a repeating group (`60xx`),
//! or a range over odd or even groups
//! (`6001-o-60FF`, `6000-e-601E`),
//! which is expanded into one entry per group.
//! The element part may be a repeating element (`31xx`).

use dcmstream_core::dictionary::{DataDictionaryEntryRef, TagRange, ValueMultiplicity, VirtualVr};
use dcmstream_core::Tag;
use snafu::{ensure, Backtrace, OptionExt, Snafu};

/// An error in a line of an attribute table.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum TableError {
    /// A required field is missing.
    #[snafu(display("Missing field `{}` in {:?}", field, line))]
    MissingField {
        field: &'static str,
        line: String,
        backtrace: Backtrace,
    },
    /// The tag pattern could not be understood.
    #[snafu(display("Bad tag pattern {:?}", pattern))]
    BadTag {
        pattern: String,
        backtrace: Backtrace,
    },
    /// The value representation is not known.
    #[snafu(display("Bad value representation {:?}", vr))]
    BadVr { vr: String, backtrace: Backtrace },
    /// The value multiplicity could not be understood.
    #[snafu(display("Bad value multiplicity {:?}", vm))]
    BadVm { vm: String, backtrace: Backtrace },
}

pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// A private attribute definition,
/// specific to one private creator.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateEntry {
    /// The private creator identifier
    pub creator: &'static str,
    /// The group number, always odd
    pub group: u16,
    /// The lower byte of the element number
    pub element: u8,
    /// The attribute entry,
    /// with its tag in the first private block (`gggg,10ee`)
    pub entry: DataDictionaryEntryRef<'static>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum GroupPattern {
    Exact(u16),
    /// `ggxx`, the lower byte zeroed
    Repeating(u16),
    /// `gggg-o-gggg` or `gggg-e-gggg`
    Range { first: u16, last: u16 },
}

fn hex(part: &str) -> Option<u16> {
    if part.len() != 4 {
        return None;
    }
    u16::from_str_radix(part, 16).ok()
}

fn is_open(part: &str) -> bool {
    part.len() == 4 && part.is_ascii() && part[2..].eq_ignore_ascii_case("xx")
}

fn parse_group(part: &str) -> Option<GroupPattern> {
    let mut range = part.split('-');
    match (range.next(), range.next(), range.next()) {
        (Some(first), Some(parity @ ("o" | "e")), Some(last)) => {
            let mut first = hex(first)?;
            let last = hex(last)?;
            let odd = parity == "o";
            if (first % 2 == 1) != odd {
                first = first.checked_add(1)?;
            }
            if first > last {
                return None;
            }
            Some(GroupPattern::Range { first, last })
        }
        (Some(group), None, None) if is_open(group) => {
            Some(GroupPattern::Repeating(hex(&format!("{}00", &group[..2]))?))
        }
        (Some(group), None, None) => hex(group).map(GroupPattern::Exact),
        _ => None,
    }
}

fn split_tag(pattern: &str) -> Option<(&str, &str)> {
    let inner = pattern.strip_prefix('(')?.strip_suffix(')')?;
    let (group, element) = inner.split_once(',')?;
    Some((group.trim(), element.trim()))
}

/// Parse the tag pattern of a public table line
/// into the tag ranges it covers.
fn parse_public_tag(pattern: &str) -> Option<Vec<TagRange>> {
    let (group, element) = split_tag(pattern)?;
    let group = parse_group(group)?;
    let element_open = is_open(element);
    let element = if element_open {
        hex(&format!("{}00", &element[..2]))?
    } else {
        hex(element)?
    };

    let single = |g: u16| {
        if element_open {
            TagRange::Element100(Tag(g, element))
        } else {
            TagRange::Single(Tag(g, element))
        }
    };

    match group {
        GroupPattern::Exact(g) => Some(vec![single(g)]),
        GroupPattern::Repeating(_) if element_open => None,
        GroupPattern::Repeating(g) => Some(vec![TagRange::Group100(Tag(g, element))]),
        GroupPattern::Range { first, last } => Some(
            (first..=last)
                .step_by(2)
                .map(single)
                .collect(),
        ),
    }
}

struct Fields<'a> {
    line: &'a str,
    parts: std::str::Split<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Fields {
            line,
            parts: line.split('\t'),
        }
    }

    fn required(&mut self, field: &'static str) -> Result<&'a str> {
        let line = self.line;
        self.parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context(MissingFieldSnafu { field, line })
    }

    fn retired(&mut self) -> bool {
        self.parts.any(|p| p.trim() == "RET")
    }
}

fn parse_vr(vr: &str) -> Result<VirtualVr> {
    vr.parse().ok().context(BadVrSnafu { vr })
}

fn parse_vm(vm: &str) -> Result<ValueMultiplicity> {
    vm.parse().ok().context(BadVmSnafu { vm })
}

/// Check whether a table line holds an attribute definition.
pub fn is_definition(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

/// Parse one line of the public attribute table.
///
/// A line with a group range yields one entry per group in the range.
pub fn parse_public_line(line: &'static str) -> Result<Vec<DataDictionaryEntryRef<'static>>> {
    let mut fields = Fields::new(line);
    let pattern = fields.required("tag")?;
    let vr = parse_vr(fields.required("VR")?)?;
    let alias = fields.required("keyword")?;
    let vm = parse_vm(fields.required("VM")?)?;
    let retired = fields.retired();

    let ranges = parse_public_tag(pattern).context(BadTagSnafu { pattern })?;
    Ok(ranges
        .into_iter()
        .map(|tag| DataDictionaryEntryRef {
            tag,
            alias,
            vr,
            vm,
            retired,
        })
        .collect())
}

/// Parse one line of the private attribute table.
pub fn parse_private_line(line: &'static str) -> Result<PrivateEntry> {
    let mut fields = Fields::new(line);
    let creator = fields.required("creator")?;
    let pattern = fields.required("tag")?;
    let vr = parse_vr(fields.required("VR")?)?;
    let alias = fields.required("keyword")?;
    let vm = parse_vm(fields.required("VM")?)?;
    let retired = fields.retired();

    let (group, element) = split_tag(pattern).context(BadTagSnafu { pattern })?;
    let group = hex(group).context(BadTagSnafu { pattern })?;
    ensure!(group % 2 == 1, BadTagSnafu { pattern });
    ensure!(
        element.len() == 4 && element.is_ascii() && element[..2].eq_ignore_ascii_case("xx"),
        BadTagSnafu { pattern }
    );
    let element = u8::from_str_radix(&element[2..], 16)
        .ok()
        .context(BadTagSnafu { pattern })?;

    Ok(PrivateEntry {
        creator,
        group,
        element,
        entry: DataDictionaryEntryRef {
            tag: TagRange::Single(Tag(group, 0x1000 | u16::from(element))),
            alias,
            vr,
            vm,
            retired,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmstream_core::VR;

    #[test]
    fn public_line_single_tag() {
        let entries = parse_public_line("(0010,0010)\tPN\tPatientName\t1").unwrap();
        assert_eq!(
            entries,
            vec![DataDictionaryEntryRef {
                tag: TagRange::Single(Tag(0x0010, 0x0010)),
                alias: "PatientName",
                vr: VirtualVr::Exact(VR::PN),
                vm: ValueMultiplicity::Exact(1),
                retired: false,
            }]
        );
    }

    #[test]
    fn public_line_retired_and_repeating() {
        let entries = parse_public_line("(50xx,3000)\tOB or OW\tCurveData\t1\tRET").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tag, TagRange::Group100(Tag(0x5000, 0x3000)));
        assert_eq!(entries[0].vr, VirtualVr::Px);
        assert!(entries[0].retired);

        let entries = parse_public_line("(0020,31xx)\tCS\tSourceImageIDs\t1-n\tRET").unwrap();
        assert_eq!(entries[0].tag, TagRange::Element100(Tag(0x0020, 0x3100)));
        assert_eq!(entries[0].vm, ValueMultiplicity::Unbounded { min: 1 });
    }

    #[test]
    fn public_line_odd_group_range_is_expanded() {
        let entries = parse_public_line("(6001-o-6007,0010)\tLO\tVendorLabel\t1").unwrap();
        let tags: Vec<_> = entries.iter().map(|e| e.tag).collect();
        assert_eq!(
            tags,
            vec![
                TagRange::Single(Tag(0x6001, 0x0010)),
                TagRange::Single(Tag(0x6003, 0x0010)),
                TagRange::Single(Tag(0x6005, 0x0010)),
                TagRange::Single(Tag(0x6007, 0x0010)),
            ]
        );

        // an even start is moved to the first odd group
        let entries = parse_public_line("(6000-o-6004,0010)\tLO\tVendorLabel\t1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, TagRange::Single(Tag(0x6001, 0x0010)));

        let entries = parse_public_line("(6000-e-6004,0010)\tLO\tVendorLabel\t1").unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn bad_public_lines() {
        assert!(matches!(
            parse_public_line("(0010,0010)\tPN"),
            Err(TableError::MissingField { field: "keyword", .. })
        ));
        assert!(matches!(
            parse_public_line("(0010,0010)\tZZ\tPatientName\t1"),
            Err(TableError::BadVr { .. })
        ));
        assert!(matches!(
            parse_public_line("(60xx,30xx)\tOW\tNothing\t1"),
            Err(TableError::BadTag { .. })
        ));
        assert!(matches!(
            parse_public_line("(0010,0010)\tPN\tPatientName\tmany"),
            Err(TableError::BadVm { .. })
        ));
    }

    #[test]
    fn private_line() {
        let entry =
            parse_private_line("SIEMENS CSA HEADER\t(0029,xx10)\tOB\tCSAImageHeaderInfo\t1")
                .unwrap();
        assert_eq!(entry.creator, "SIEMENS CSA HEADER");
        assert_eq!(entry.group, 0x0029);
        assert_eq!(entry.element, 0x10);
        assert_eq!(entry.entry.tag, TagRange::Single(Tag(0x0029, 0x1010)));
        assert_eq!(entry.entry.vr, VirtualVr::Exact(VR::OB));

        // private attributes live in odd groups only
        assert!(parse_private_line("ACME\t(0028,xx10)\tOB\tThing\t1").is_err());
        assert!(parse_private_line("ACME\t(0029,1010)\tOB\tThing\t1").is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert!(!is_definition("# a comment"));
        assert!(!is_definition("   "));
        assert!(is_definition("(0010,0010)\tPN\tPatientName\t1"));
    }
}
