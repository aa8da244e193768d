//! The binary value nodes try to agree on.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A binary signal, or the marker for a value nobody can observe.
///
/// On the wire `Zero` and `One` are the JSON numbers `0` and `1`, and
/// `Unknown` is the string `"?"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// The binary value `0`.
    #[default]
    Zero,
    /// The binary value `1`.
    One,
    /// Unset or unobservable.
    Unknown,
}

impl Value {
    /// Marker used for [`Value::Unknown`] on the wire.
    pub const UNKNOWN_MARKER: &'static str = "?";

    /// Returns true for `Zero` and `One`.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Converts a bit into a value. Anything other than 0 or 1 is rejected.
    pub const fn from_bit(bit: u64) -> Option<Self> {
        match bit {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            _ => None,
        }
    }

    /// Returns the bit for a known value.
    pub const fn as_bit(&self) -> Option<u8> {
        match self {
            Self::Zero => Some(0),
            Self::One => Some(1),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_bit() {
            Some(bit) => write!(f, "{bit}"),
            None => f.write_str(Self::UNKNOWN_MARKER),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_bit() {
            Some(bit) => serializer.serialize_u8(bit),
            None => serializer.serialize_str(Self::UNKNOWN_MARKER),
        }
    }
}

struct ValueVisitor;

impl Visitor<'_> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0, 1 or \"?\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Value::from_bit(v).ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        u64::try_from(v)
            .ok()
            .and_then(Value::from_bit)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        if v == Value::UNKNOWN_MARKER {
            Ok(Value::Unknown)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
