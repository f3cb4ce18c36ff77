//! This module contains a stub dictionary.

use super::{DataDictionary, DataDictionaryEntryRef};
use crate::header::Tag;

/// An empty attribute dictionary.
///
/// Every lookup yields the placeholder record for unknown attributes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubDataDictionary;

impl DataDictionary for StubDataDictionary {
    type Entry = DataDictionaryEntryRef<'static>;

    fn by_name(&self, _: &str) -> Option<&DataDictionaryEntryRef<'static>> {
        None
    }

    fn by_tag(&self, _: Tag) -> Option<&DataDictionaryEntryRef<'static>> {
        None
    }

    fn by_private_tag(&self, _: &str, _: Tag) -> Option<&DataDictionaryEntryRef<'static>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::StubDataDictionary;
    use crate::dictionary::DataDictionary;
    use crate::header::Tag;

    #[test]
    fn stub_knows_nothing() {
        let dict = StubDataDictionary;
        assert!(dict.by_tag(Tag(0x0010, 0x0010)).is_none());
        assert!(dict.by_expr("PatientName").is_none());
        assert_eq!(dict.lookup(Tag(0x0010, 0x0010)).name, "UNKNOWN");
        assert_eq!(dict.lookup_private(0x0029, "SIEMENS", 0x1008).name, "PrivateTag");
        assert_eq!(dict.parse_tag("(0010,0010)"), Some(Tag(0x0010, 0x0010)));
    }
}
