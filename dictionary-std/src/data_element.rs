use crate::table::{self, PrivateEntry};
use dcmstream_core::dictionary::{
    DataDictionary, DataDictionaryEntryRef, TagInfo, TagRange::*, ValueMultiplicity, VirtualVr,
};
use dcmstream_core::header::Tag;
use dcmstream_core::VR;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};

static PUBLIC_TABLE: &str = include_str!("../data/public.tsv");
static PRIVATE_TABLE: &str = include_str!("../data/private.tsv");

static DICT: Lazy<StandardDataDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// Note that one does not generally have to call this
/// unless when retrieving the underlying registry is important.
/// The unit type [`StandardDataDictionary`]
/// already provides a lazy loaded singleton implementing the necessary traits.
#[inline]
pub fn registry() -> &'static StandardDataDictionaryRegistry {
    &DICT
}

/// The data struct actually containing the standard dictionary.
///
/// This structure is made opaque via the unit type [`StandardDataDictionary`],
/// which provides a lazy loaded singleton.
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: name → tag key in `by_tag`
    by_name: HashMap<&'static str, Tag>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, DataDictionaryEntryRef<'static>>,
    /// repeating elements of the form (ggxx, eeee). The `xx` portion is zeroed.
    repeating_ggxx: HashSet<Tag>,
    /// repeating elements of the form (gggg, eexx). The `xx` portion is zeroed.
    repeating_eexx: HashSet<Tag>,
    /// mapping: private creator → (group, element low byte) → entry
    private: HashMap<&'static str, HashMap<(u16, u8), DataDictionaryEntryRef<'static>>>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> StandardDataDictionaryRegistry {
        StandardDataDictionaryRegistry {
            by_name: HashMap::with_capacity(256),
            by_tag: HashMap::with_capacity(256),
            repeating_ggxx: HashSet::with_capacity(16),
            repeating_eexx: HashSet::new(),
            private: HashMap::new(),
        }
    }

    /// record the given dictionary entry
    fn index(&mut self, entry: DataDictionaryEntryRef<'static>) -> &mut Self {
        let tag = entry.tag.inner();
        self.by_name.entry(entry.alias).or_insert(tag);
        match entry.tag {
            Group100(tag) => {
                self.repeating_ggxx.insert(tag);
            }
            Element100(tag) => {
                self.repeating_eexx.insert(tag);
            }
            _ => {}
        }
        self.by_tag.insert(tag, entry);
        self
    }

    /// record the given private dictionary entry
    fn index_private(&mut self, entry: PrivateEntry) -> &mut Self {
        self.private
            .entry(entry.creator)
            .or_default()
            .insert((entry.group, entry.element), entry.entry);
        self
    }

    /// The number of public attribute entries in the registry.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Whether the registry has no public attribute entries.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Iterate over the private creators known to the registry.
    pub fn private_creators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.private.keys().copied()
    }
}

/// Generic Group Length dictionary entry.
static GROUP_LENGTH_ENTRY: DataDictionaryEntryRef<'static> = DataDictionaryEntryRef {
    tag: GroupLength,
    alias: "GenericGroupLength",
    vr: VirtualVr::Exact(VR::UL),
    vm: ValueMultiplicity::Exact(1),
    retired: false,
};

/// Generic Private Creator dictionary entry.
static PRIVATE_CREATOR_ENTRY: DataDictionaryEntryRef<'static> = DataDictionaryEntryRef {
    tag: PrivateCreator,
    alias: "PrivateCreator",
    vr: VirtualVr::Exact(VR::LO),
    vm: ValueMultiplicity::Exact(1),
    retired: false,
};

/// A data element dictionary which consults
/// the library's global DICOM attribute registry.
///
/// This is the type which would generally be used
/// whenever a data element dictionary is needed,
/// such as when reading DICOM files.
///
/// The dictionary index is automatically initialized upon the first use,
/// and is never modified afterwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl StandardDataDictionary {
    fn indexed_tag(tag: Tag) -> Option<&'static DataDictionaryEntryRef<'static>> {
        let r = registry();

        r.by_tag
            .get(&tag)
            .or_else(|| {
                // check tags repeating in different groups
                let group_trimmed = Tag(tag.0 & 0xFF00, tag.1);
                if r.repeating_ggxx.contains(&group_trimmed) {
                    return r.by_tag.get(&group_trimmed);
                }
                // check tags repeating in different elements
                let elem_trimmed = Tag(tag.0, tag.1 & 0xFF00);
                if r.repeating_eexx.contains(&elem_trimmed) {
                    return r.by_tag.get(&elem_trimmed);
                }

                None
            })
            .or_else(|| {
                if tag.is_private_creator() {
                    return Some(&PRIVATE_CREATOR_ENTRY);
                }
                if tag.is_group_length() {
                    return Some(&GROUP_LENGTH_ENTRY);
                }

                None
            })
    }

    fn indexed_private_tag(
        creator: &str,
        tag: Tag,
    ) -> Option<&'static DataDictionaryEntryRef<'static>> {
        if !tag.is_private() || tag.element() < 0x1000 {
            return None;
        }
        registry()
            .private
            .get(creator.trim_end_matches(|c| c == ' ' || c == '\0'))?
            .get(&(tag.group(), (tag.element() & 0x00FF) as u8))
    }
}

impl DataDictionary for StandardDataDictionary {
    type Entry = DataDictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        let r = registry();
        r.by_name.get(name).and_then(|tag| r.by_tag.get(tag))
    }

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        StandardDataDictionary::indexed_tag(tag)
    }

    fn by_private_tag(&self, creator: &str, tag: Tag) -> Option<&Self::Entry> {
        StandardDataDictionary::indexed_private_tag(creator, tag)
    }

    fn lookup(&self, tag: Tag) -> TagInfo {
        match StandardDataDictionary::indexed_tag(tag) {
            Some(entry) => entry.static_info(),
            None => TagInfo::unknown(tag),
        }
    }

    fn lookup_private(&self, group: u16, creator: &str, element: u16) -> TagInfo {
        let tag = Tag(group, element);
        match StandardDataDictionary::indexed_private_tag(creator, tag) {
            Some(entry) => entry.static_info(),
            None => self.lookup(tag),
        }
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for line in PUBLIC_TABLE.lines().filter(|l| table::is_definition(l)) {
        match table::parse_public_line(line) {
            Ok(entries) => {
                for entry in entries {
                    d.index(entry);
                }
            }
            Err(e) => tracing::warn!("Skipping public dictionary line: {}", e),
        }
    }
    for line in PRIVATE_TABLE.lines().filter(|l| table::is_definition(l)) {
        match table::parse_private_line(line) {
            Ok(entry) => {
                d.index_private(entry);
            }
            Err(e) => tracing::warn!("Skipping private dictionary line: {}", e),
        }
    }
    d
}
