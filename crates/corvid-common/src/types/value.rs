//! The tagged property value ([`Value`]) and its pinned binary encoding
//! (spec §4.1). The wire layout is a durability contract: WAL records and
//! snapshots embed it directly, so any change here is a storage-format
//! change.

use crate::types::Timestamp;
use crate::utils::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A node or edge property key.
///
/// Cheap to clone: the underlying string is reference-counted, since the
/// same key name (`"name"`, `"weight"`, ...) is typically repeated across
/// every record of a label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyKey(Arc<str>);

impl PropertyKey {
    /// Constructs a property key from a string-like value.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

/// The tag of a [`Value`], used for type-mismatch errors and property-index
/// type declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// UTF-8 text.
    String,
    /// Signed 64-bit integer.
    Int,
    /// IEEE-754 double.
    Float,
    /// Boolean.
    Bool,
    /// Seconds since the Unix epoch.
    Timestamp,
    /// Opaque byte string.
    Bytes,
    /// Dense float32 vector (embeddings).
    Vector,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "STRING",
            Self::Int => "INT64",
            Self::Float => "FLOAT64",
            Self::Bool => "BOOL",
            Self::Timestamp => "TIMESTAMP",
            Self::Bytes => "BYTES",
            Self::Vector => "VECTOR",
        };
        write!(f, "{name}")
    }
}

const TAG_STRING: u8 = 0;
const TAG_INT: u8 = 1;
const TAG_FLOAT: u8 = 2;
const TAG_BOOL: u8 = 3;
const TAG_TIMESTAMP: u8 = 4;
const TAG_BYTES: u8 = 5;
const TAG_VECTOR: u8 = 6;

/// A typed property value.
///
/// A `Value` is self-describing: its binary form carries a one-byte tag so
/// [`Value::decode`] never needs out-of-band type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 text.
    String(String),
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE-754 double.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Seconds since the Unix epoch.
    Timestamp(Timestamp),
    /// Opaque byte string.
    Bytes(Vec<u8>),
    /// Dense float32 vector (embeddings, similarity scoring).
    Vector(Vec<f32>),
}

impl Value {
    /// Returns this value's tag.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Bool(_) => ValueType::Bool,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Vector(_) => ValueType::Vector,
        }
    }

    /// Returns the tag's display name (`"STRING"`, `"INT64"`, ...).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.value_type() {
            ValueType::String => "STRING",
            ValueType::Int => "INT64",
            ValueType::Float => "FLOAT64",
            ValueType::Bool => "BOOL",
            ValueType::Timestamp => "TIMESTAMP",
            ValueType::Bytes => "BYTES",
            ValueType::Vector => "VECTOR",
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: self.type_name().to_string(),
        }
    }

    /// Reads this value as a string, failing if the tag differs.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s.as_str()),
            other => Err(other.mismatch("STRING")),
        }
    }

    /// Reads this value as an `i64`, failing if the tag differs.
    pub fn as_int64(&self) -> Result<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(other.mismatch("INT64")),
        }
    }

    /// Reads this value as an `f64`, failing if the tag differs.
    pub fn as_float64(&self) -> Result<f64> {
        match self {
            Self::Float(v) => Ok(*v),
            other => Err(other.mismatch("FLOAT64")),
        }
    }

    /// Reads this value as a `bool`, failing if the tag differs.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.mismatch("BOOL")),
        }
    }

    /// Reads this value as a [`Timestamp`], failing if the tag differs.
    pub fn as_timestamp(&self) -> Result<Timestamp> {
        match self {
            Self::Timestamp(v) => Ok(*v),
            other => Err(other.mismatch("TIMESTAMP")),
        }
    }

    /// Reads this value as a byte slice, failing if the tag differs.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Self::Bytes(v) => Ok(v.as_slice()),
            other => Err(other.mismatch("BYTES")),
        }
    }

    /// Reads this value as a float32 vector, failing if the tag differs.
    pub fn as_vector(&self) -> Result<&[f32]> {
        match self {
            Self::Vector(v) => Ok(v.as_slice()),
            other => Err(other.mismatch("VECTOR")),
        }
    }

    /// Encodes this value into its self-describing binary form, appending to
    /// `buf`.
    ///
    /// Layout: one tag byte, then the payload. Strings/bytes/vectors are a
    /// `u32` little-endian length prefix followed by their content; integers
    /// and floats are fixed-width little-endian; booleans are a single byte.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Self::String(s) => {
                buf.push(TAG_STRING);
                encode_len_prefixed(buf, s.as_bytes());
            }
            Self::Int(v) => {
                buf.push(TAG_INT);
                let mut tmp = [0u8; 8];
                LittleEndian::write_i64(&mut tmp, *v);
                buf.extend_from_slice(&tmp);
            }
            Self::Float(v) => {
                buf.push(TAG_FLOAT);
                let mut tmp = [0u8; 8];
                LittleEndian::write_f64(&mut tmp, *v);
                buf.extend_from_slice(&tmp);
            }
            Self::Bool(v) => {
                buf.push(TAG_BOOL);
                buf.push(u8::from(*v));
            }
            Self::Timestamp(v) => {
                buf.push(TAG_TIMESTAMP);
                let mut tmp = [0u8; 8];
                LittleEndian::write_i64(&mut tmp, v.as_secs());
                buf.extend_from_slice(&tmp);
            }
            Self::Bytes(v) => {
                buf.push(TAG_BYTES);
                encode_len_prefixed(buf, v);
            }
            Self::Vector(v) => {
                buf.push(TAG_VECTOR);
                let len = u32::try_from(v.len()).expect("vector length fits in u32");
                let mut len_buf = [0u8; 4];
                LittleEndian::write_u32(&mut len_buf, len);
                buf.extend_from_slice(&len_buf);
                for elem in v {
                    let mut tmp = [0u8; 4];
                    LittleEndian::write_f32(&mut tmp, *elem);
                    buf.extend_from_slice(&tmp);
                }
            }
        }
    }

    /// Decodes a value from the front of `buf`, returning the value and the
    /// number of bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let tag = *buf
            .first()
            .ok_or_else(|| Error::CorruptData("value: empty buffer".into()))?;
        let body = &buf[1..];
        match tag {
            TAG_STRING => {
                let (bytes, consumed) = decode_len_prefixed(body)?;
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|_| Error::CorruptData("value: invalid utf-8 in STRING".into()))?;
                Ok((Self::String(s), 1 + consumed))
            }
            TAG_INT => {
                let raw = read_fixed::<8>(body)?;
                Ok((Self::Int(LittleEndian::read_i64(&raw)), 1 + 8))
            }
            TAG_FLOAT => {
                let raw = read_fixed::<8>(body)?;
                Ok((Self::Float(LittleEndian::read_f64(&raw)), 1 + 8))
            }
            TAG_BOOL => {
                let b = *body
                    .first()
                    .ok_or_else(|| Error::CorruptData("value: truncated BOOL".into()))?;
                Ok((Self::Bool(b != 0), 1 + 1))
            }
            TAG_TIMESTAMP => {
                let raw = read_fixed::<8>(body)?;
                Ok((
                    Self::Timestamp(Timestamp::from_secs(LittleEndian::read_i64(&raw))),
                    1 + 8,
                ))
            }
            TAG_BYTES => {
                let (bytes, consumed) = decode_len_prefixed(body)?;
                Ok((Self::Bytes(bytes.to_vec()), 1 + consumed))
            }
            TAG_VECTOR => {
                let len_raw = read_fixed::<4>(body)?;
                let len = LittleEndian::read_u32(&len_raw) as usize;
                let start: usize = 4;
                let end = start
                    .checked_add(len.checked_mul(4).ok_or_else(|| {
                        Error::CorruptData("value: VECTOR length overflow".into())
                    })?)
                    .ok_or_else(|| Error::CorruptData("value: VECTOR length overflow".into()))?;
                let elems = body
                    .get(start..end)
                    .ok_or_else(|| Error::CorruptData("value: truncated VECTOR".into()))?;
                let mut out = Vec::with_capacity(len);
                for chunk in elems.chunks_exact(4) {
                    out.push(LittleEndian::read_f32(chunk));
                }
                Ok((Self::Vector(out), 1 + end))
            }
            other => Err(Error::CorruptData(format!("value: unknown tag {other}"))),
        }
    }

    /// Encodes this value into a freestanding byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }

    /// Decodes a value from a freestanding byte slice, requiring that the
    /// entire slice is consumed.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let (value, consumed) = Self::decode(buf)?;
        if consumed != buf.len() {
            return Err(Error::CorruptData(
                "value: trailing bytes after decode".into(),
            ));
        }
        Ok(value)
    }
}

fn encode_len_prefixed(buf: &mut Vec<u8>, content: &[u8]) {
    let len = u32::try_from(content.len()).expect("length fits in u32");
    let mut len_buf = [0u8; 4];
    LittleEndian::write_u32(&mut len_buf, len);
    buf.extend_from_slice(&len_buf);
    buf.extend_from_slice(content);
}

fn decode_len_prefixed(body: &[u8]) -> Result<(&[u8], usize)> {
    let len_raw = read_fixed::<4>(body)?;
    let len = LittleEndian::read_u32(&len_raw) as usize;
    let content = body
        .get(4..4 + len)
        .ok_or_else(|| Error::CorruptData("value: truncated length-prefixed field".into()))?;
    Ok((content, 4 + len))
}

fn read_fixed<const N: usize>(body: &[u8]) -> Result<[u8; N]> {
    let slice = body
        .get(..N)
        .ok_or_else(|| Error::CorruptData("value: truncated fixed-width field".into()))?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Self::Vector(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_round_trip() {
        let v: Value = "Alice".into();
        assert_eq!(v.as_str().unwrap(), "Alice");

        let v: Value = 30i64.into();
        assert_eq!(v.as_int64().unwrap(), 30);

        let v: Value = true.into();
        assert!(v.as_bool().unwrap());
    }

    #[test]
    fn accessor_on_wrong_tag_is_type_mismatch() {
        let v: Value = 30i64.into();
        let err = v.as_str().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn string_round_trips_through_bytes() {
        let v: Value = "hello, graph".into();
        let bytes = v.to_bytes();
        let decoded = Value::from_bytes(&bytes).unwrap();
        assert_eq!(v, decoded);
    }

    #[test]
    fn int_round_trips_through_bytes() {
        let v = Value::Int(-42);
        let bytes = v.to_bytes();
        assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn float_round_trips_through_bytes() {
        let v = Value::Float(std::f64::consts::PI);
        let bytes = v.to_bytes();
        assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn bool_round_trips_through_bytes() {
        for b in [true, false] {
            let v = Value::Bool(b);
            let bytes = v.to_bytes();
            assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
        }
    }

    #[test]
    fn vector_round_trips_through_bytes() {
        let v = Value::Vector(vec![1.0, -2.5, 0.0, 3.75]);
        let bytes = v.to_bytes();
        assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn empty_vector_round_trips() {
        let v = Value::Vector(vec![]);
        let bytes = v.to_bytes();
        assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn bytes_round_trip() {
        let v = Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let bytes = v.to_bytes();
        assert_eq!(Value::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let buf = [255u8];
        assert!(Value::decode(&buf).is_err());
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let buf = [TAG_INT, 1, 2, 3];
        assert!(Value::decode(&buf).is_err());
    }

    #[test]
    fn from_bytes_rejects_trailing_garbage() {
        let mut bytes = Value::Int(1).to_bytes();
        bytes.push(0xff);
        assert!(Value::from_bytes(&bytes).is_err());
    }

    #[test]
    fn property_key_from_str_and_display() {
        let k: PropertyKey = "name".into();
        assert_eq!(k.as_str(), "name");
        assert_eq!(k.to_string(), "name");
    }

    #[test]
    fn value_type_display_matches_type_name() {
        let v: Value = "x".into();
        assert_eq!(v.value_type().to_string(), v.type_name());
    }
}
