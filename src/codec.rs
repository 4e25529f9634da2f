//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Conversion between native [`FieldValue`]s and the type-tagged wire representation.
//!
//! Every attribute on the wire is a JSON object with exactly one key, the type tag,
//! mapping to a tag-specific payload, e.g. `{"N": "21"}`. Values that cannot be
//! represented (on encode) or that are malformed (on decode) are dropped from their
//! containing record, list or map rather than failing the whole call. Each drop is
//! reported as a `tracing` warning.
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::types::{FieldValue, MapValue};

pub(crate) const TAG_S: &str = "S";
pub(crate) const TAG_N: &str = "N";
pub(crate) const TAG_BOOL: &str = "BOOL";
pub(crate) const TAG_B: &str = "B";
pub(crate) const TAG_SS: &str = "SS";
pub(crate) const TAG_NS: &str = "NS";
pub(crate) const TAG_BS: &str = "BS";
pub(crate) const TAG_L: &str = "L";
pub(crate) const TAG_M: &str = "M";
pub(crate) const TAG_NULL: &str = "NULL";

/// A single type-tagged attribute value as exchanged with the service.
///
/// Number literals and binary payloads are kept in their wire text form; they are
/// only interpreted when decoded into a [`FieldValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    /// base64 text
    B(String),
    Ss(Vec<String>),
    Ns(Vec<String>),
    /// base64 text per element
    Bs(Vec<String>),
    L(Vec<AttributeValue>),
    M(Record),
    Null,
}

/// A mapping of attribute name to wire value: an item, a key, or a set of
/// expression substitution values.
pub type Record = BTreeMap<String, AttributeValue>;

impl AttributeValue {
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => TAG_S,
            AttributeValue::N(_) => TAG_N,
            AttributeValue::Bool(_) => TAG_BOOL,
            AttributeValue::B(_) => TAG_B,
            AttributeValue::Ss(_) => TAG_SS,
            AttributeValue::Ns(_) => TAG_NS,
            AttributeValue::Bs(_) => TAG_BS,
            AttributeValue::L(_) => TAG_L,
            AttributeValue::M(_) => TAG_M,
            AttributeValue::Null => TAG_NULL,
        }
    }

    /// Render as the single-entry JSON object used on the wire.
    pub fn to_json(&self) -> Value {
        let payload = match self {
            AttributeValue::S(s) | AttributeValue::N(s) | AttributeValue::B(s) => {
                Value::String(s.clone())
            }
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Ss(v) | AttributeValue::Ns(v) | AttributeValue::Bs(v) => {
                Value::Array(v.iter().map(|s| Value::String(s.clone())).collect())
            }
            AttributeValue::L(v) => Value::Array(v.iter().map(|a| a.to_json()).collect()),
            AttributeValue::M(r) => Value::Object(record_to_json(r)),
            AttributeValue::Null => Value::Bool(true),
        };
        let mut m = Map::with_capacity(1);
        m.insert(self.tag().to_string(), payload);
        Value::Object(m)
    }

    /// Parse a wire value. Returns `None` unless `v` is an object with exactly one
    /// recognized tag whose payload has the expected JSON shape.
    pub fn from_json(v: &Value) -> Option<AttributeValue> {
        let obj = v.as_object()?;
        if obj.len() != 1 {
            return None;
        }
        let (tag, payload) = obj.iter().next()?;
        match tag.as_str() {
            TAG_S => Some(AttributeValue::S(payload.as_str()?.to_string())),
            TAG_N => Some(AttributeValue::N(payload.as_str()?.to_string())),
            TAG_BOOL => Some(AttributeValue::Bool(payload.as_bool()?)),
            TAG_B => Some(AttributeValue::B(payload.as_str()?.to_string())),
            TAG_SS => Some(AttributeValue::Ss(string_array(payload)?)),
            TAG_NS => Some(AttributeValue::Ns(string_array(payload)?)),
            TAG_BS => Some(AttributeValue::Bs(string_array(payload)?)),
            TAG_L => {
                let mut list = Vec::new();
                for elem in payload.as_array()? {
                    match AttributeValue::from_json(elem) {
                        Some(a) => list.push(a),
                        None => warn!("dropping malformed list element: {}", elem),
                    }
                }
                Some(AttributeValue::L(list))
            }
            TAG_M => Some(AttributeValue::M(record_from_json(payload.as_object()?))),
            TAG_NULL => {
                if payload.as_bool()? {
                    Some(AttributeValue::Null)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn string_array(v: &Value) -> Option<Vec<String>> {
    let arr = v.as_array()?;
    let mut out = Vec::with_capacity(arr.len());
    for s in arr {
        out.push(s.as_str()?.to_string());
    }
    Some(out)
}

pub fn record_to_json(r: &Record) -> Map<String, Value> {
    r.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

/// Parse a JSON object of attribute name to wire value. Attributes whose value
/// violates the single-tag rule are dropped.
pub fn record_from_json(obj: &Map<String, Value>) -> Record {
    let mut r = Record::new();
    for (k, v) in obj {
        match AttributeValue::from_json(v) {
            Some(a) => {
                r.insert(k.clone(), a);
            }
            None => warn!("dropping attribute '{}': malformed wire value {}", k, v),
        }
    }
    r
}

// Number text for the N / NS tags. Debug formatting of f64 always keeps a
// fractional part or exponent, so a Double never decodes back as an Integer.
fn number_literal(fv: &FieldValue) -> Option<String> {
    match fv {
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Double(d) if d.is_finite() => Some(format!("{:?}", d)),
        _ => None,
    }
}

#[derive(PartialEq)]
enum SetKind {
    Strings,
    Numbers,
    Binaries,
}

// Non-empty lists whose elements all share a scalar kind are sent as sets.
fn set_kind(arr: &[FieldValue]) -> Option<SetKind> {
    let kind = match arr.first()? {
        FieldValue::String(_) => SetKind::Strings,
        FieldValue::Integer(_) => SetKind::Numbers,
        FieldValue::Double(d) if d.is_finite() => SetKind::Numbers,
        FieldValue::Binary(_) => SetKind::Binaries,
        _ => return None,
    };
    // a non-finite double has no literal, so it keeps the list out of NS
    let same = arr.iter().all(|e| match (e, &kind) {
        (FieldValue::String(_), SetKind::Strings) => true,
        (FieldValue::Integer(_), SetKind::Numbers) => true,
        (FieldValue::Double(d), SetKind::Numbers) => d.is_finite(),
        (FieldValue::Binary(_), SetKind::Binaries) => true,
        _ => false,
    });
    if same {
        Some(kind)
    } else {
        None
    }
}

/// Encode a single native value. Returns `None` if the value cannot be represented
/// on the wire (a non-finite number).
pub fn encode_value(fv: &FieldValue) -> Option<AttributeValue> {
    match fv {
        FieldValue::String(s) => Some(AttributeValue::S(s.clone())),
        FieldValue::Boolean(b) => Some(AttributeValue::Bool(*b)),
        FieldValue::Integer(_) | FieldValue::Double(_) => {
            Some(AttributeValue::N(number_literal(fv)?))
        }
        FieldValue::Binary(b) => Some(AttributeValue::B(BASE64_STANDARD.encode(b))),
        FieldValue::Null => Some(AttributeValue::Null),
        FieldValue::Map(m) => Some(AttributeValue::M(encode_map(m))),
        FieldValue::Array(arr) => Some(encode_array(arr)),
    }
}

fn encode_array(arr: &[FieldValue]) -> AttributeValue {
    match set_kind(arr) {
        Some(SetKind::Strings) => AttributeValue::Ss(
            arr.iter()
                .filter_map(|e| e.as_str().ok().map(str::to_string))
                .collect(),
        ),
        Some(SetKind::Numbers) => {
            let mut nums = Vec::with_capacity(arr.len());
            for e in arr {
                match number_literal(e) {
                    Some(n) => nums.push(n),
                    None => warn!("dropping unsupported number set element: {:?}", e),
                }
            }
            AttributeValue::Ns(nums)
        }
        Some(SetKind::Binaries) => AttributeValue::Bs(
            arr.iter()
                .filter_map(|e| match e {
                    FieldValue::Binary(b) => Some(BASE64_STANDARD.encode(b)),
                    _ => None,
                })
                .collect(),
        ),
        None => {
            let mut list = Vec::with_capacity(arr.len());
            for e in arr {
                match encode_value(e) {
                    Some(a) => list.push(a),
                    None => warn!("dropping unsupported list element: {:?}", e),
                }
            }
            AttributeValue::L(list)
        }
    }
}

/// Encode every attribute of a native map. Attributes that cannot be encoded are
/// left out of the result.
pub fn encode_map(mv: &MapValue) -> Record {
    let mut r = Record::new();
    for (k, v) in mv.iter() {
        match encode_value(v) {
            Some(a) => {
                r.insert(k.clone(), a);
            }
            None => warn!("dropping attribute '{}': unsupported value {:?}", k, v),
        }
    }
    r
}

// Integer when the literal is a lossless i64, otherwise a finite f64.
fn parse_number(lit: &str) -> Option<FieldValue> {
    if let Ok(i) = lit.parse::<i64>() {
        return Some(FieldValue::Integer(i));
    }
    match lit.parse::<f64>() {
        Ok(d) if d.is_finite() => Some(FieldValue::Double(d)),
        _ => None,
    }
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    BASE64_STANDARD.decode(text).ok()
}

/// Decode a single wire value. Returns `None` if the payload is malformed
/// (an unparseable number literal or invalid base64).
pub fn decode_value(av: &AttributeValue) -> Option<FieldValue> {
    match av {
        AttributeValue::S(s) => Some(FieldValue::String(s.clone())),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Some(FieldValue::Boolean(*b)),
        AttributeValue::B(b) => decode_base64(b).map(FieldValue::Binary),
        AttributeValue::Null => Some(FieldValue::Null),
        AttributeValue::Ss(v) => Some(FieldValue::Array(
            v.iter().map(|s| FieldValue::String(s.clone())).collect(),
        )),
        AttributeValue::Ns(v) => {
            let mut nums = Vec::with_capacity(v.len());
            for lit in v {
                match parse_number(lit) {
                    Some(n) => nums.push(n),
                    None => warn!("dropping malformed number set element '{}'", lit),
                }
            }
            Some(FieldValue::Array(nums))
        }
        AttributeValue::Bs(v) => {
            let mut bins = Vec::with_capacity(v.len());
            for text in v {
                match decode_base64(text) {
                    Some(b) => bins.push(FieldValue::Binary(b)),
                    None => warn!("dropping malformed binary set element '{}'", text),
                }
            }
            Some(FieldValue::Array(bins))
        }
        AttributeValue::L(v) => {
            let mut list = Vec::with_capacity(v.len());
            for a in v {
                match decode_value(a) {
                    Some(fv) => list.push(fv),
                    None => warn!("dropping malformed list element: {:?}", a),
                }
            }
            Some(FieldValue::Array(list))
        }
        AttributeValue::M(r) => Some(FieldValue::Map(decode_record(r))),
    }
}

/// Decode every attribute of a record. Malformed attributes are left out of the result.
pub fn decode_record(r: &Record) -> MapValue {
    let mut mv = MapValue::new();
    for (k, a) in r {
        match decode_value(a) {
            Some(fv) => mv.put_field_value(k, fv),
            None => warn!("dropping attribute '{}': malformed value {:?}", k, a),
        }
    }
    mv
}

/// Convenience: native map straight to the wire JSON object.
pub fn map_value_to_json(mv: &MapValue) -> Map<String, Value> {
    record_to_json(&encode_map(mv))
}

/// Convenience: wire JSON object straight to a native map.
pub fn map_value_from_json(obj: &Map<String, Value>) -> MapValue {
    decode_record(&record_from_json(obj))
}
