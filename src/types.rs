//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Native value types exchanged with the database.
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::result::Result;
use tracing::warn;

pub use dynamodb_client_derive::*;

use crate::error::DynamoError;
use crate::error::DynamoErrorCode::Deserialization;

macro_rules! de_err {
    ($($t:tt)*) => {{
        Err(DynamoError {
            code: Deserialization,
            message: format!($($t)*),
        })
    }};
}

pub(crate) use de_err;

/// A specific struct to distingush between a contiguous array of bytes (Binary) versus
/// a list of numbers.
///
/// This is a simple wrapper struct around `Vec<u8>` so the [`DynamoColumnToFieldValue`] and
/// [`DynamoColumnFromFieldValue`] traits can correctly identify when an attribute should
/// hold binary data versus a list of small integers.
/// It is left as a pure public struct to allow direct setting and taking of the underlying
/// vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamoBinary {
    pub data: Vec<u8>,
}

/// The application-facing value of a single attribute.
///
/// `FieldValue` is untagged from the caller's point of view: the client chooses the
/// wire type tag when the value is encoded, and picks the variant back when a returned
/// item is decoded. The mapping to wire tags is:
///
/// | variant | wire tag |
/// | ------- | -------- |
/// | `String` | `S` |
/// | `Integer`, `Double` | `N` |
/// | `Boolean` | `BOOL` |
/// | `Binary` | `B` |
/// | `Array` of only strings / only numbers / only binaries | `SS` / `NS` / `BS` |
/// | any other `Array` | `L` |
/// | `Map` | `M` |
/// | `Null` | `NULL` |
///
/// `FieldValue` instances are created in several ways:
///
///  - From native Rust values, using implementations of the [`DynamoColumnToFieldValue`] trait.
///  - Inherently from [`MapValue::column()`] calls. This is the typical path when creating
///    items to be written to tables.
///  - Returned by read operations, decoded from the service response.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Binary(Vec<u8>),
    Array(Vec<FieldValue>),
    Map(MapValue),
    #[default]
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
    pub fn as_i64(&self) -> Result<i64, DynamoError> {
        if let FieldValue::Integer(i) = self {
            return Ok(*i);
        }
        de_err!("as_i64 called for {:?}", self)
    }
    pub fn as_f64(&self) -> Result<f64, DynamoError> {
        match self {
            FieldValue::Integer(i) => Ok(*i as f64),
            FieldValue::Double(d) => Ok(*d),
            _ => de_err!("as_f64 called for {:?}", self),
        }
    }
    pub fn as_str(&self) -> Result<&str, DynamoError> {
        if let FieldValue::String(s) = self {
            return Ok(s);
        }
        de_err!("as_str called for {:?}", self)
    }
}

pub trait DynamoColumnToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl DynamoColumnToFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}
impl DynamoColumnToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Double(*self)
    }
}
impl DynamoColumnToFieldValue for f32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Double(*self as f64)
    }
}
impl DynamoColumnToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}
impl DynamoColumnToFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self as i64)
    }
}
impl DynamoColumnToFieldValue for i16 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self as i64)
    }
}
impl DynamoColumnToFieldValue for i8 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self as i64)
    }
}
impl DynamoColumnToFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self as i64)
    }
}
impl DynamoColumnToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}
impl DynamoColumnToFieldValue for &str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}
impl DynamoColumnToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}
impl DynamoColumnToFieldValue for DynamoBinary {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Binary(self.data.to_vec())
    }
}
impl DynamoColumnToFieldValue for MapValue {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Map(self.clone())
    }
}

// Integer literals must fit an i64 and other literals a finite f64. Anything
// else has no native representation and is left out by the callers.
fn json_number(n: &serde_json::Number) -> Option<FieldValue> {
    if let Some(i) = n.as_i64() {
        return Some(FieldValue::Integer(i));
    }
    let lit = n.to_string();
    if !lit.contains(['.', 'e', 'E']) {
        return None;
    }
    match n.as_f64() {
        Some(d) if d.is_finite() => Some(FieldValue::Double(d)),
        _ => None,
    }
}

pub(crate) fn json_to_field_value(v: &serde_json::Value) -> Option<FieldValue> {
    match v {
        serde_json::Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        serde_json::Value::String(s) => Some(FieldValue::String(s.clone())),
        serde_json::Value::Null => Some(FieldValue::Null),
        serde_json::Value::Number(n) => json_number(n),
        serde_json::Value::Array(a) => {
            let mut list = Vec::with_capacity(a.len());
            for e in a {
                match json_to_field_value(e) {
                    Some(fv) => list.push(fv),
                    None => warn!("dropping unsupported json list element: {}", e),
                }
            }
            Some(FieldValue::Array(list))
        }
        serde_json::Value::Object(o) => Some(FieldValue::Map(MapValue::from_json_map(o))),
    }
}

/// A number that does not fit an `i64` or a finite `f64` has no native
/// representation. It becomes [`FieldValue::Null`] here, and is left out
/// entirely when it is part of a JSON object or array.
impl DynamoColumnToFieldValue for serde_json::value::Value {
    fn to_field_value(&self) -> FieldValue {
        json_to_field_value(self).unwrap_or_else(|| {
            warn!("unsupported json value {} converted to null", self);
            FieldValue::Null
        })
    }
}

impl<T: DynamoColumnToFieldValue> DynamoColumnToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        if let Some(v) = self {
            v.to_field_value()
        } else {
            FieldValue::Null
        }
    }
}

impl<T: DynamoColumnToFieldValue> DynamoColumnToFieldValue for &T {
    fn to_field_value(&self) -> FieldValue {
        let v = *self;
        v.to_field_value()
    }
}

impl<T: DynamoColumnToFieldValue> DynamoColumnToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        let v: Vec<FieldValue> = self.iter().map(|i| i.to_field_value()).collect();
        FieldValue::Array(v)
    }
}

impl<T: DynamoColumnToFieldValue> DynamoColumnToFieldValue for HashMap<String, T> {
    fn to_field_value(&self) -> FieldValue {
        let mut m = MapValue::new();
        for (k, v) in self {
            m.put(k, v);
        }
        FieldValue::Map(m)
    }
}
impl<T: DynamoColumnToFieldValue> DynamoColumnToFieldValue for BTreeMap<String, T> {
    fn to_field_value(&self) -> FieldValue {
        let mut m = MapValue::new();
        for (k, v) in self {
            m.put(k, v);
        }
        FieldValue::Map(m)
    }
}

pub trait DynamoColumnFromFieldValue {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError>
    where
        Self: Sized;

    /// Value to use when the attribute is absent from the item. Only optional
    /// targets accept a missing attribute.
    fn from_missing(key: &str) -> Result<Self, DynamoError>
    where
        Self: Sized,
    {
        de_err!("missing attribute '{}'", key)
    }
}

// a simple macro to make the following impls easier to read
macro_rules! ffv {
    ($f:expr, $a:path, $b:literal) => {{
        if let $a(v) = $f {
            return Ok(v.clone());
        }
        de_err!("wrong type for attribute: expected {}, actual: {:?}", $b, $f)
    }};
}

// integers narrower than i64 must fit, otherwise the item does not match the struct
macro_rules! ffv_int {
    ($t:ty) => {
        impl DynamoColumnFromFieldValue for $t {
            fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
                if let FieldValue::Integer(i) = fv {
                    return match <$t>::try_from(*i) {
                        Ok(v) => Ok(v),
                        Err(_) => de_err!(
                            "integer {} out of range for {}",
                            i,
                            stringify!($t)
                        ),
                    };
                }
                de_err!("wrong type for attribute: expected Integer, actual: {:?}", fv)
            }
        }
    };
}

ffv_int!(i32);
ffv_int!(i16);
ffv_int!(i8);
ffv_int!(u32);

impl DynamoColumnFromFieldValue for i64 {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        ffv! {fv, FieldValue::Integer, "Integer"}
    }
}
impl DynamoColumnFromFieldValue for f64 {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        match fv {
            FieldValue::Double(d) => Ok(*d),
            // a whole-number literal comes back as an Integer
            FieldValue::Integer(i) => Ok(*i as f64),
            _ => de_err!("wrong type for attribute: expected Double, actual: {:?}", fv),
        }
    }
}
impl DynamoColumnFromFieldValue for f32 {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        Ok(f64::from_field(fv)? as f32)
    }
}
impl DynamoColumnFromFieldValue for String {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        ffv! {fv, FieldValue::String, "String"}
    }
}
impl DynamoColumnFromFieldValue for bool {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        ffv! {fv, FieldValue::Boolean, "Boolean"}
    }
}
impl DynamoColumnFromFieldValue for DynamoBinary {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        if let FieldValue::Binary(v) = fv {
            return Ok(DynamoBinary { data: v.clone() });
        }
        de_err!("wrong type for attribute: expected Binary, actual: {:?}", fv)
    }
}
impl DynamoColumnFromFieldValue for MapValue {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        ffv! {fv, FieldValue::Map, "Map"}
    }
}
impl DynamoColumnFromFieldValue for FieldValue {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        Ok(fv.clone())
    }
}
impl<T: DynamoColumnFromFieldValue> DynamoColumnFromFieldValue for Option<T> {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        if fv.is_null() {
            return Ok(None);
        }
        Ok(Some(T::from_field(fv)?))
    }
    fn from_missing(_key: &str) -> Result<Self, DynamoError> {
        Ok(None)
    }
}
impl<T: DynamoColumnFromFieldValue> DynamoColumnFromFieldValue for Vec<T> {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        if let FieldValue::Array(v) = fv {
            let mut v1: Vec<T> = Vec::with_capacity(v.len());
            for i in v {
                v1.push(T::from_field(i)?);
            }
            return Ok(v1);
        }
        de_err!("wrong type for attribute: expected Array, actual: {:?}", fv)
    }
}
impl<T: DynamoColumnFromFieldValue> DynamoColumnFromFieldValue for HashMap<String, T> {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        if let FieldValue::Map(v) = fv {
            let mut m1: HashMap<String, T> = HashMap::new();
            for (s, v) in v.iter() {
                m1.insert(s.to_string(), T::from_field(v)?);
            }
            return Ok(m1);
        }
        de_err!("wrong type for attribute: expected Map, actual: {:?}", fv)
    }
}
impl<T: DynamoColumnFromFieldValue> DynamoColumnFromFieldValue for BTreeMap<String, T> {
    fn from_field(fv: &FieldValue) -> Result<Self, DynamoError> {
        if let FieldValue::Map(v) = fv {
            let mut m1: BTreeMap<String, T> = BTreeMap::new();
            for (s, v) in v.iter() {
                m1.insert(s.to_string(), T::from_field(v)?);
            }
            return Ok(m1);
        }
        de_err!("wrong type for attribute: expected Map, actual: {:?}", fv)
    }
}

/// Used by the [`derive@DynamoRow`] derive to populate a single struct field from an item.
pub trait DynamoColumnFromMapValue {
    fn from_map(&self, key: &str, mv: &MapValue) -> Result<Self, DynamoError>
    where
        Self: Sized;
}

impl<T: DynamoColumnFromFieldValue> DynamoColumnFromMapValue for T {
    fn from_map(&self, key: &str, mv: &MapValue) -> Result<Self, DynamoError> {
        match mv.get_field_value(key) {
            Some(fv) => T::from_field(fv).map_err(|e| DynamoError {
                code: e.code,
                message: format!("attribute '{}': {}", key, e.message),
            }),
            None => T::from_missing(key),
        }
    }
}

/// A single item (record) in a table, or a key, or a set of expression values.
///
/// This struct is basically a Map of `String` to [`FieldValue`]. It is the primary
/// struct for specifying the data in a single item.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MapValue {
    pub(crate) m: BTreeMap<String, FieldValue>,
}

impl MapValue {
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a MapValue from a JSON object. Members whose value has no native
    /// representation (such as `1e400`) are left out.
    pub fn from_json_map(json: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut mv = MapValue::new();
        for (key, val) in json {
            match json_to_field_value(val) {
                Some(fv) => mv.put_field_value(key, fv),
                None => warn!("dropping attribute '{}': unsupported json value {}", key, val),
            }
        }
        mv
    }

    pub fn from_json_object(json: &serde_json::value::Value) -> Result<Self, DynamoError> {
        if let serde_json::Value::Object(o) = json {
            return Ok(Self::from_json_map(o));
        }
        de_err!("from_json_object: json value is not an Object: {:#?}", json)
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn iter(&self) -> Iter<String, FieldValue> {
        self.m.iter()
    }

    pub fn put(&mut self, key: &str, val: impl DynamoColumnToFieldValue) {
        self.m.insert(key.to_string(), val.to_field_value());
    }

    pub fn column(mut self, key: &str, val: impl DynamoColumnToFieldValue) -> MapValue {
        self.m.insert(key.to_string(), val.to_field_value());
        self
    }

    pub fn put_i64(&mut self, key: &str, val: i64) {
        self.m.insert(key.to_string(), FieldValue::Integer(val));
    }
    pub fn i64(mut self, key: &str, val: i64) -> MapValue {
        self.put_i64(key, val);
        self
    }
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        if let FieldValue::Integer(i) = self.m.get(key)? {
            Some(*i)
        } else {
            None
        }
    }

    pub fn put_float64(&mut self, key: &str, val: f64) {
        self.m.insert(key.to_string(), FieldValue::Double(val));
    }
    pub fn f64(mut self, key: &str, val: f64) -> MapValue {
        self.put_float64(key, val);
        self
    }
    pub fn get_float64(&self, key: &str) -> Option<f64> {
        match self.m.get(key)? {
            FieldValue::Double(d) => Some(*d),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn put_str(&mut self, key: &str, val: &str) {
        self.put_string(key, val.to_string())
    }
    pub fn str(mut self, key: &str, val: &str) -> MapValue {
        self.put_str(key, val);
        self
    }
    pub fn put_string(&mut self, key: &str, val: String) {
        self.m.insert(key.to_string(), FieldValue::String(val));
    }
    pub fn string(mut self, key: &str, val: String) -> MapValue {
        self.put_string(key, val);
        self
    }
    pub fn get_string(&self, key: &str) -> Option<String> {
        if let FieldValue::String(s) = self.m.get(key)? {
            Some(s.clone())
        } else {
            None
        }
    }

    pub fn put_bool(&mut self, key: &str, val: bool) {
        self.m.insert(key.to_string(), FieldValue::Boolean(val));
    }
    pub fn bool(mut self, key: &str, val: bool) -> MapValue {
        self.put_bool(key, val);
        self
    }
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        if let FieldValue::Boolean(b) = self.m.get(key)? {
            Some(*b)
        } else {
            None
        }
    }

    pub fn put_binary(&mut self, key: &str, val: Vec<u8>) {
        self.m.insert(key.to_string(), FieldValue::Binary(val));
    }
    pub fn binary(mut self, key: &str, val: Vec<u8>) -> MapValue {
        self.put_binary(key, val);
        self
    }
    pub fn get_binary(&self, key: &str) -> Option<&Vec<u8>> {
        if let FieldValue::Binary(b) = self.m.get(key)? {
            Some(b)
        } else {
            None
        }
    }

    pub fn put_null(&mut self, key: &str) {
        self.m.insert(key.to_string(), FieldValue::Null);
    }
    pub fn null(mut self, key: &str) -> MapValue {
        self.put_null(key);
        self
    }

    pub fn put_array(&mut self, key: &str, val: Vec<FieldValue>) {
        self.m.insert(key.to_string(), FieldValue::Array(val));
    }
    pub fn get_array(&self, key: &str) -> Option<&Vec<FieldValue>> {
        if let FieldValue::Array(a) = self.m.get(key)? {
            Some(a)
        } else {
            None
        }
    }

    pub fn put_field_value(&mut self, key: &str, val: FieldValue) {
        self.m.insert(key.to_string(), val);
    }
    pub fn get_field_value(&self, key: &str) -> Option<&FieldValue> {
        self.m.get(key)
    }
    pub fn get_map(&self, key: &str) -> Option<&MapValue> {
        if let FieldValue::Map(a) = self.m.get(key)? {
            Some(a)
        } else {
            None
        }
    }

    pub fn put_json_map_value(&mut self, key: &str, json: &str) -> Result<(), DynamoError> {
        let v: serde_json::Value = serde_json::from_str(json)?;
        let mv = MapValue::from_json_object(&v)?;
        self.put_field_value(key, FieldValue::Map(mv));
        Ok(())
    }
}

impl std::fmt::Display for MapValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#?}", self)
    }
}

impl FromIterator<(String, FieldValue)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        MapValue {
            m: iter.into_iter().collect(),
        }
    }
}

/// Trait that defines methods to convert to and from a [`MapValue`].
///
/// It is typically not necessary to implement this trait for structs. Instead,
/// use the [`derive@DynamoRow`] derive macro to automatically
/// have a struct implement this trait.
pub trait DynamoRow {
    /// Create a new [`MapValue`] based on the contents of `Self`.
    fn to_map_value(&self) -> Result<MapValue, DynamoError>;
    /// Populate `Self` with the contents of a given [`MapValue`].
    fn from_map_value(&mut self, value: &MapValue) -> Result<(), DynamoError>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_object_to_map_value() -> Result<(), DynamoError> {
        let v: serde_json::Value = serde_json::from_str(
            r#"{"id": "Test", "num": 21, "ratio": 0.5, "tags": ["a", 1], "inner": {"ok": true}, "none": null}"#,
        )?;
        let mv = MapValue::from_json_object(&v)?;
        assert_eq!(mv.get_string("id"), Some("Test".to_string()));
        assert_eq!(mv.get_i64("num"), Some(21));
        assert_eq!(mv.get_float64("ratio"), Some(0.5));
        assert_eq!(
            mv.get_array("tags"),
            Some(&vec![FieldValue::String("a".into()), FieldValue::Integer(1)])
        );
        assert_eq!(mv.get_map("inner").and_then(|m| m.get_bool("ok")), Some(true));
        assert_eq!(mv.get_field_value("none"), Some(&FieldValue::Null));
        Ok(())
    }

    #[test]
    fn test_json_numbers_out_of_range_are_dropped() -> Result<(), DynamoError> {
        let v: serde_json::Value = serde_json::from_str(
            r#"{"big": 18446744073709551615, "huge": 1e400, "neg": -99999999999999999999,
                "ok": 7, "list": [1, 1e400, 2.5]}"#,
        )?;
        let mv = MapValue::from_json_object(&v)?;
        assert_eq!(mv.len(), 2);
        assert_eq!(mv.get_i64("ok"), Some(7));
        assert!(mv.get_field_value("big").is_none());
        assert!(mv.get_field_value("huge").is_none());
        assert_eq!(
            mv.get_array("list"),
            Some(&vec![FieldValue::Integer(1), FieldValue::Double(2.5)])
        );
        let lone: serde_json::Value = serde_json::from_str("18446744073709551615")?;
        assert_eq!(lone.to_field_value(), FieldValue::Null);
        Ok(())
    }

    #[test]
    fn test_binary_and_array_accessors() -> Result<(), DynamoError> {
        let mut mv = MapValue::new().binary("blob", vec![0, 159, 255]);
        mv.put_array("mixed", vec![FieldValue::Integer(1), FieldValue::Null]);
        assert_eq!(mv.get_binary("blob"), Some(&vec![0, 159, 255]));
        assert_eq!(mv.get_binary("mixed"), None);
        assert_eq!(mv.get_binary("absent"), None);
        assert_eq!(
            mv.get_array("mixed"),
            Some(&vec![FieldValue::Integer(1), FieldValue::Null])
        );
        assert_eq!(mv.get_array("blob"), None);

        // binary values read back after a trip through the wire format
        let back = crate::codec::map_value_from_json(&crate::codec::map_value_to_json(&mv));
        assert_eq!(back.get_binary("blob"), Some(&vec![0, 159, 255]));
        let wire: serde_json::Value = serde_json::from_str(r#"{"bs": {"BS": ["AJ//", "aGk="]}}"#)?;
        let decoded = crate::codec::map_value_from_json(wire.as_object().unwrap());
        assert_eq!(
            decoded.get_array("bs"),
            Some(&vec![FieldValue::Binary(vec![0, 159, 255]), FieldValue::Binary(b"hi".to_vec())])
        );
        Ok(())
    }

    #[test]
    fn test_put_json_map_value() -> Result<(), DynamoError> {
        let mut mv = MapValue::new();
        mv.put_json_map_value("addr", r#"{"street": "Main", "zip": 12345}"#)?;
        let addr = mv.get_map("addr").unwrap();
        assert_eq!(addr.get_string("street"), Some("Main".to_string()));
        assert_eq!(addr.get_i64("zip"), Some(12345));
        let err = mv.put_json_map_value("bad", "[1, 2]").unwrap_err();
        assert_eq!(err.code, Deserialization);
        assert!(mv.put_json_map_value("bad", "{not json").is_err());
        assert!(mv.get_field_value("bad").is_none());
        Ok(())
    }

    #[test]
    fn test_from_field_shape_mismatch() {
        let err = i64::from_field(&FieldValue::String("21".into())).unwrap_err();
        assert_eq!(err.code, Deserialization);
        let err = i32::from_field(&FieldValue::Integer(i64::MAX)).unwrap_err();
        assert_eq!(err.code, Deserialization);
        assert_eq!(f64::from_field(&FieldValue::Integer(3)).unwrap(), 3.0);
    }

    #[test]
    fn test_optional_and_missing_attributes() -> Result<(), DynamoError> {
        let mv = MapValue::new().null("gone").i64("n", 4);
        let x: Option<i64> = None;
        assert_eq!(x.from_map("gone", &mv)?, None);
        assert_eq!(x.from_map("absent", &mv)?, None);
        assert_eq!(x.from_map("n", &mv)?, Some(4));
        let y: i64 = 0;
        let err = y.from_map("absent", &mv).unwrap_err();
        assert_eq!(err.code, Deserialization);
        Ok(())
    }
}
