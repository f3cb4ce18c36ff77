//! An ordered collection of decoded data elements.

use crate::header::{DataElement, Tag};
use std::iter::FromIterator;

/// A data set, as the ordered list of the data elements
/// in the order in which they were decoded.
///
/// No uniqueness is imposed on tags:
/// duplicate elements are all retained,
/// and [`get`](DataSet::get) returns the first one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataSet {
    elements: Vec<DataElement>,
}

impl DataSet {
    /// Create an empty data set.
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Append an element to the end of the data set.
    pub fn push(&mut self, element: DataElement) {
        self.elements.push(element);
    }

    /// Retrieve the first element with the given tag.
    pub fn get(&self, tag: Tag) -> Option<&DataElement> {
        self.elements.iter().find(|e| e.tag() == tag)
    }

    /// Iterate over all elements with the given tag, in encounter order.
    pub fn get_all(&self, tag: Tag) -> impl Iterator<Item = &DataElement> {
        self.elements.iter().filter(move |e| e.tag() == tag)
    }

    /// Retrieve the first element by a tag expression,
    /// either `(gggg,eeee)` or `ggggeeee`.
    pub fn element_by_expr(&self, expr: &str) -> Option<&DataElement> {
        let tag: Tag = expr.parse().ok()?;
        self.get(tag)
    }

    /// Retrieve the first element with the given attribute name.
    pub fn element_by_name(&self, name: &str) -> Option<&DataElement> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// The number of elements in the data set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the elements in encounter order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataElement> {
        self.elements.iter()
    }

    /// Obtain the elements as a slice.
    pub fn as_slice(&self) -> &[DataElement] {
        &self.elements
    }

    /// Move the elements out of the data set.
    pub fn into_elements(self) -> Vec<DataElement> {
        self.elements
    }
}

impl From<Vec<DataElement>> for DataSet {
    fn from(elements: Vec<DataElement>) -> Self {
        DataSet { elements }
    }
}

impl FromIterator<DataElement> for DataSet {
    fn from_iter<T: IntoIterator<Item = DataElement>>(iter: T) -> Self {
        DataSet {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Extend<DataElement> for DataSet {
    fn extend<T: IntoIterator<Item = DataElement>>(&mut self, iter: T) {
        self.elements.extend(iter)
    }
}

impl IntoIterator for DataSet {
    type Item = DataElement;
    type IntoIter = std::vec::IntoIter<DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a DataElement;
    type IntoIter = std::slice::Iter<'a, DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::DataSet;
    use crate::header::{DataElement, DataElementHeader, Length, Tag, VR};
    use crate::value::Value;

    fn element(tag: Tag, name: &'static str, value: &str) -> DataElement {
        DataElement::new(
            DataElementHeader::new(tag, VR::LO, Length(value.len() as u32)),
            name,
            Value::from(value),
        )
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let dataset: DataSet = vec![
            element(Tag(0x0010, 0x0010), "PatientName", "Doe^John"),
            element(Tag(0x0010, 0x0020), "PatientID", "ID1"),
            element(Tag(0x0010, 0x0010), "PatientName", "Doe^Jane"),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.len(), 3);
        let first = dataset.get(Tag(0x0010, 0x0010)).unwrap();
        assert_eq!(first.string(), Some("Doe^John"));
        let all: Vec<_> = dataset
            .get_all(Tag(0x0010, 0x0010))
            .filter_map(|e| e.string())
            .collect();
        assert_eq!(all, vec!["Doe^John", "Doe^Jane"]);
    }

    #[test]
    fn data_set_with_a_sequence_equals_its_clone() {
        let sequence = DataElement::new(
            DataElementHeader::new(Tag(0x0008, 0x1140), VR::SQ, Length::UNDEFINED),
            "ReferencedImageSequence",
            Value::Sequence(vec![element(Tag(0x0008, 0x1150), "ReferencedSOPClassUID", "1.2.3")]),
        );
        let dataset = DataSet::from(vec![sequence]);
        assert_eq!(dataset, dataset.clone());
    }

    #[test]
    fn lookup_by_expression() {
        let dataset = DataSet::from(vec![element(Tag(0x0010, 0x0020), "PatientID", "ID1")]);
        assert_eq!(
            dataset.element_by_expr("(0010,0020)").and_then(|e| e.string()),
            Some("ID1")
        );
        assert_eq!(
            dataset.element_by_expr("00100020").and_then(|e| e.string()),
            Some("ID1")
        );
        assert!(dataset.element_by_expr("(0010,0010)").is_none());
        assert!(dataset.element_by_expr("garbage").is_none());
        assert!(dataset.element_by_name("PatientID").is_some());
    }
}
