//! Decoded data element values.
//!
//! The shape of a [`Value`] is fully determined
//! by the decoding kind of the element's value representation:
//! text and numeric kinds produce a [single](Value::Single) scalar
//! or a [list](Value::Multi) of two or more scalars,
//! opaque kinds produce [bytes](Value::Bytes),
//! and sequences produce a flat list of [nested elements](Value::Sequence).

use crate::header::{DataElement, Tag};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// A single primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A text value
    Str(String),
    /// A signed integer, from integer strings or binary integers
    Int(i64),
    /// An unsigned 64-bit integer (UV)
    UInt(u64),
    /// A floating point number, from decimal strings or binary floats
    Float(f64),
    /// An attribute tag (AT)
    Tag(Tag),
}

impl Scalar {
    /// Retrieve the scalar as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Retrieve the scalar as a signed integer, if it is an integer
    /// representable as `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Scalar::Int(v) => Some(v),
            Scalar::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Retrieve the scalar as a floating point number, if it is numeric.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Scalar::Float(v) => Some(v),
            Scalar::Int(v) => Some(v as f64),
            Scalar::UInt(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::UInt(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Tag(t) => write!(f, "{}", t),
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<Tag> for Scalar {
    fn from(value: Tag) -> Self {
        Scalar::Tag(value)
    }
}

/// The value of a decoded data element.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (zero length)
    Empty,
    /// Exactly one value
    Single(Scalar),
    /// Two or more values, in the order they were encoded
    Multi(C<Scalar>),
    /// Opaque bytes, such as pixel data
    Bytes(Vec<u8>),
    /// The data elements nested in a sequence, in encounter order
    Sequence(Vec<DataElement>),
}

impl Value {
    /// Build a value from a list of scalars,
    /// collapsing a single scalar into [`Value::Single`]
    /// and no scalars into [`Value::Empty`].
    pub fn from_scalars<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Scalar>,
    {
        let mut values: C<Scalar> = values.into_iter().collect();
        match values.len() {
            0 => Value::Empty,
            1 => match values.pop() {
                Some(single) => Value::Single(single),
                None => Value::Empty,
            },
            _ => Value::Multi(values),
        }
    }

    /// The number of individual values.
    ///
    /// Byte blobs count as one value,
    /// sequences count their nested elements.
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Single(_) => 1,
            Value::Multi(values) => values.len(),
            Value::Bytes(_) => 1,
            Value::Sequence(elements) => elements.len(),
        }
    }

    /// Whether the value holds more than one scalar.
    pub fn is_multi(&self) -> bool {
        matches!(self, Value::Multi(_))
    }

    /// Iterate over the scalars of a primitive value.
    /// Yields nothing for byte blobs and sequences.
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> {
        let slice: &[Scalar] = match self {
            Value::Single(v) => std::slice::from_ref(v),
            Value::Multi(values) => values,
            _ => &[],
        };
        slice.iter()
    }

    /// Retrieve the single text value, if that is what this holds.
    pub fn string(&self) -> Option<&str> {
        match self {
            Value::Single(v) => v.as_str(),
            _ => None,
        }
    }

    /// Retrieve the single value as an integer.
    pub fn int(&self) -> Option<i64> {
        match self {
            Value::Single(v) => v.as_int(),
            _ => None,
        }
    }

    /// Retrieve the single value as a floating point number.
    pub fn float(&self) -> Option<f64> {
        match self {
            Value::Single(v) => v.as_float(),
            _ => None,
        }
    }

    /// Retrieve the raw bytes of an opaque value.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Retrieve the nested elements of a sequence value.
    pub fn items(&self) -> Option<&[DataElement]> {
        match self {
            Value::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    /// Convert the primitive value to text,
    /// joining multiple values with a backslash.
    ///
    /// Byte blobs and sequences are summarized rather than converted.
    pub fn to_str(&self) -> Cow<str> {
        match self {
            Value::Empty => Cow::Borrowed(""),
            Value::Single(Scalar::Str(s)) => Cow::Borrowed(s),
            Value::Single(v) => Cow::Owned(v.to_string()),
            Value::Multi(values) => Cow::Owned(
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("\\"),
            ),
            Value::Bytes(bytes) => Cow::Owned(format!("[{} bytes]", bytes.len())),
            Value::Sequence(elements) => Cow::Owned(format!("[{} elements]", elements.len())),
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Single(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Single(Scalar::from(value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}
