//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_derive::Deserialize;
use serde_json::{Map, Value};
use std::result::Result;
use tracing::debug;

use crate::codec::{map_value_from_json, map_value_to_json};
use crate::error::{DynamoError, DynamoErrorCode};
use crate::types::MapValue;

pub const API_VERSION: &str = "DynamoDB_20120810";
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
pub const TARGET_HEADER: &str = "x-amz-target";

// request/response field names
pub const CONDITION_EXPRESSION: &str = "ConditionExpression";
pub const CONSISTENT_READ: &str = "ConsistentRead";
pub const COUNT: &str = "Count";
pub const EXCLUSIVE_START_KEY: &str = "ExclusiveStartKey";
pub const EXPRESSION_ATTRIBUTE_NAMES: &str = "ExpressionAttributeNames";
pub const EXPRESSION_ATTRIBUTE_VALUES: &str = "ExpressionAttributeValues";
pub const FILTER_EXPRESSION: &str = "FilterExpression";
pub const INDEX_NAME: &str = "IndexName";
pub const ITEM: &str = "Item";
pub const ITEMS: &str = "Items";
pub const KEY: &str = "Key";
pub const KEY_CONDITION_EXPRESSION: &str = "KeyConditionExpression";
pub const LAST_EVALUATED_KEY: &str = "LastEvaluatedKey";
pub const LIMIT: &str = "Limit";
pub const PROJECTION_EXPRESSION: &str = "ProjectionExpression";
pub const SCANNED_COUNT: &str = "ScannedCount";
pub const TABLE_NAME: &str = "TableName";
pub const UPDATE_EXPRESSION: &str = "UpdateExpression";

// error type fragments that mark a response as transient
const PROVISIONED_THROUGHPUT_EXCEEDED: &str = "ProvisionedThroughputExceeded";
const THROTTLING: &str = "Throttling";

/// The service operations supported by this client.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OpCode {
    GetItem,
    PutItem,
    DeleteItem,
    UpdateItem,
    Query,
    Scan,
}

impl OpCode {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            OpCode::GetItem => "GetItem",
            OpCode::PutItem => "PutItem",
            OpCode::DeleteItem => "DeleteItem",
            OpCode::UpdateItem => "UpdateItem",
            OpCode::Query => "Query",
            OpCode::Scan => "Scan",
        }
    }

    /// Value of the `X-Amz-Target` header, e.g. `DynamoDB_20120810.GetItem`.
    pub(crate) fn target(&self) -> String {
        format!("{}.{}", API_VERSION, self.name())
    }
}

/// Assembles the JSON document sent for a single operation.
#[derive(Debug)]
pub(crate) struct RequestBody {
    m: Map<String, Value>,
}

impl RequestBody {
    pub(crate) fn new(table_name: &str) -> RequestBody {
        let mut m = Map::new();
        m.insert(TABLE_NAME.to_string(), Value::String(table_name.to_string()));
        RequestBody { m }
    }

    pub(crate) fn write_str(&mut self, field: &str, val: &str) {
        self.m.insert(field.to_string(), Value::String(val.to_string()));
    }

    pub(crate) fn write_opt_str(&mut self, field: &str, val: &Option<String>) {
        if let Some(s) = val {
            self.write_str(field, s);
        }
    }

    pub(crate) fn write_bool(&mut self, field: &str, val: bool) {
        self.m.insert(field.to_string(), Value::Bool(val));
    }

    pub(crate) fn write_opt_u32(&mut self, field: &str, val: Option<u32>) {
        if let Some(v) = val {
            self.m.insert(field.to_string(), Value::from(v));
        }
    }

    /// Write a native map as a record of wire values.
    pub(crate) fn write_record(&mut self, field: &str, val: &MapValue) {
        self.m
            .insert(field.to_string(), Value::Object(map_value_to_json(val)));
    }

    pub(crate) fn write_opt_record(&mut self, field: &str, val: &Option<MapValue>) {
        if let Some(mv) = val {
            self.write_record(field, mv);
        }
    }

    /// Write a plain string-to-string map (no type tags), used for attribute name substitutions.
    pub(crate) fn write_names(&mut self, field: &str, names: &Option<Vec<(String, String)>>) {
        if let Some(n) = names {
            let obj: Map<String, Value> = n
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            self.m.insert(field.to_string(), Value::Object(obj));
        }
    }

    pub(crate) fn write_projection(&mut self, attributes: &[String]) {
        if !attributes.is_empty() {
            self.write_str(PROJECTION_EXPRESSION, &attributes.join(","));
        }
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, DynamoError> {
        Ok(serde_json::to_vec(&self.m)?)
    }
}

/// Parse a successful response body. An empty body is treated as an empty object.
pub(crate) fn parse_response(body: &[u8]) -> Result<Map<String, Value>, DynamoError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(o) => Ok(o),
        other => Err(DynamoError::new(
            DynamoErrorCode::BadProtocolMessage,
            &format!("expected a JSON object in response, found {}", other),
        )),
    }
}

/// Decode a record-valued response field, if present.
pub(crate) fn read_record(resp: &Map<String, Value>, field: &str) -> Option<MapValue> {
    resp.get(field)?.as_object().map(map_value_from_json)
}

/// Decode a list-of-records response field. Entries that are not objects are skipped.
pub(crate) fn read_records(resp: &Map<String, Value>, field: &str) -> Vec<MapValue> {
    match resp.get(field).and_then(Value::as_array) {
        Some(arr) => arr
            .iter()
            .filter_map(Value::as_object)
            .map(map_value_from_json)
            .collect(),
        None => Vec::new(),
    }
}

pub(crate) fn read_u64(resp: &Map<String, Value>, field: &str) -> Option<u64> {
    resp.get(field)?.as_u64()
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    // the service is not consistent about the case of this field, and a
    // reason that is not a string is ignored rather than failing the parse
    message: Option<Value>,
    #[serde(rename = "Message")]
    message_upper: Option<Value>,
}

impl ErrorBody {
    fn reason(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .or_else(|| self.message_upper.as_ref().and_then(Value::as_str))
    }
}

/// Classify a non-success response into the error surfaced (or retried) by the executor.
pub(crate) fn classify_error(status: u16, body: &[u8]) -> DynamoError {
    if let Ok(eb) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(t) = &eb.error_type {
            let message = eb.reason();
            if t.contains(PROVISIONED_THROUGHPUT_EXCEEDED) {
                return DynamoError::new(
                    DynamoErrorCode::ProvisionedThroughputExceeded,
                    message.unwrap_or("the provisioned throughput for the table was exceeded"),
                );
            }
            if t.contains(THROTTLING) {
                return DynamoError::new(
                    DynamoErrorCode::Throttling,
                    message
                        .unwrap_or("request rate is too high, reduce the frequency of requests"),
                );
            }
            return DynamoError::general(message);
        }
    }
    match std::str::from_utf8(body) {
        Ok(text) if !text.trim().is_empty() => DynamoError::general(Some(text)),
        _ => {
            debug!("http status {} with no readable error body", status);
            DynamoError::general(None)
        }
    }
}
