//! Separate test suite for building values in an isolated context,
//! without direct access to dependency `smallvec`

// empty module makes `smallvec` dependency unreachable,
// as would be typical in dependents of `dcmstream_core`
// unless they include it themselves
mod smallvec {}

use dcmstream_core::{DataElement, DataElementHeader, DataSet, Length, Scalar, Tag, Value, VR};

#[test]
fn build_values_through_reexports() {
    let value = Value::Multi(dcmstream_core::smallvec::smallvec![
        Scalar::from("BASE"),
        Scalar::from("LIGHT"),
        Scalar::from("DARK"),
    ]);
    assert_eq!(value.to_str(), "BASE\\LIGHT\\DARK");
    assert_eq!(value.multiplicity(), 3);

    // a single scalar collapses
    let value = Value::from_scalars(vec![Scalar::from("PALETTE COLOR")]);
    assert_eq!(value.string(), Some("PALETTE COLOR"));
}

#[test]
fn collect_elements_into_a_data_set() {
    let dataset: DataSet = vec![
        DataElement::new(
            DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(8)),
            "PatientName",
            Value::from("Doe^John"),
        ),
        DataElement::new(
            DataElementHeader::new(Tag(0x0028, 0x0010), VR::US, Length(2)),
            "Rows",
            Value::Single(Scalar::Int(512)),
        ),
    ]
    .into_iter()
    .collect();

    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.element_by_expr("00100010").map(|e| e.name()),
        Some("PatientName")
    );
    assert_eq!(dataset.get(Tag(0x0028, 0x0010)).unwrap().value().int(), Some(512));
}
