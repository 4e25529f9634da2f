//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::protocol::*;
use crate::types::{DynamoColumnToFieldValue, DynamoRow, MapValue};
use serde_json::{Map, Value};
use std::result::Result;

/// Encapsulate a query on a table or secondary index.
///
/// A query returns the items whose key matches the key condition expression,
/// optionally filtered further by a filter expression. One call returns one page of
/// results; use [`QueryResult::last_evaluated_key()`] with
/// [`start_key()`](QueryRequest::start_key()) to fetch the following page:
/// ```no_run
/// use dynamodb_client::{Handle, QueryRequest};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().from_environment()?.build().await?;
/// let mut qreq = QueryRequest::new("orders", "customer = :c")
///     .expression_attribute_value(":c", "C-1001")
///     .limit(100);
/// loop {
///     let res = qreq.execute(&handle).await?;
///     for item in res.items() {
///         println!("{}", item);
///     }
///     match res.last_evaluated_key() {
///         Some(k) => qreq = qreq.start_key(k.clone()),
///         None => break,
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct QueryRequest {
    pub(crate) table_name: String,
    pub(crate) key_condition: String,
    pub(crate) index_name: Option<String>,
    pub(crate) filter: Option<String>,
    pub(crate) projection: Vec<String>,
    pub(crate) names: Option<Vec<(String, String)>>,
    pub(crate) values: Option<MapValue>,
    pub(crate) start_key: Option<MapValue>,
    pub(crate) limit: Option<u32>,
    pub(crate) consistent_read: bool,
}

/// Struct representing the result of a [`QueryRequest`] or [`ScanRequest`](crate::ScanRequest) execution.
#[derive(Default, Debug)]
pub struct QueryResult {
    pub(crate) items: Vec<MapValue>,
    pub(crate) last_evaluated_key: Option<MapValue>,
    pub(crate) count: u64,
    pub(crate) scanned_count: u64,
}

impl QueryResult {
    /// Get the items returned by the operation.
    pub fn items(&self) -> &Vec<MapValue> {
        &self.items
    }

    /// Take the items returned by the operation, leaving an empty vector in their place.
    pub fn take_items(&mut self) -> Vec<MapValue> {
        std::mem::take(&mut self.items)
    }

    /// The primary key of the last item processed. If this is `None`, there are no more results.
    pub fn last_evaluated_key(&self) -> Option<&MapValue> {
        self.last_evaluated_key.as_ref()
    }

    /// The number of items returned, after any filter expression was applied.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The number of items evaluated, before any filter expression was applied.
    pub fn scanned_count(&self) -> u64 {
        self.scanned_count
    }

    pub(crate) fn from_response(resp: &Map<String, Value>) -> QueryResult {
        let items = read_records(resp, ITEMS);
        // fall back to the decoded items when the service omits the counters
        let count = read_u64(resp, COUNT).unwrap_or(items.len() as u64);
        QueryResult {
            last_evaluated_key: read_record(resp, LAST_EVALUATED_KEY),
            scanned_count: read_u64(resp, SCANNED_COUNT).unwrap_or(count),
            count,
            items,
        }
    }

    /// Convert all items into native structs.
    ///
    /// The first item that does not fit `T` stops the conversion with a
    /// [`Deserialization`](crate::DynamoErrorCode::Deserialization) error.
    pub fn into_rows<T: DynamoRow + Default>(self) -> Result<Vec<T>, DynamoError> {
        let mut rows = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let mut row = T::default();
            row.from_map_value(item)?;
            rows.push(row);
        }
        Ok(rows)
    }
}

impl QueryRequest {
    /// Create a new QueryRequest.
    ///
    /// `key_condition_expression` is passed verbatim to the service, for example
    /// `"id = :id AND created > :since"`.
    pub fn new(table_name: &str, key_condition_expression: &str) -> Self {
        QueryRequest {
            table_name: table_name.to_string(),
            key_condition: key_condition_expression.to_string(),
            ..Default::default()
        }
    }

    /// Query a local or global secondary index instead of the table.
    pub fn index_name(mut self, index: &str) -> Self {
        self.index_name = Some(index.to_string());
        self
    }

    /// Filter the matched items on the server. The filter is applied after the limit.
    pub fn filter_expression(mut self, expr: &str) -> Self {
        self.filter = Some(expr.to_string());
        self
    }

    /// Specify the attributes to return. By default all attributes are returned.
    pub fn projection(mut self, attributes: &[&str]) -> Self {
        self.projection = attributes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a substitution token for an attribute name, such as `("#n", "name")`.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> Self {
        self.names
            .get_or_insert_with(Vec::new)
            .push((placeholder.to_string(), name.to_string()));
        self
    }

    /// Add a value that can be substituted in the key condition or filter expression.
    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl DynamoColumnToFieldValue,
    ) -> Self {
        self.values
            .get_or_insert_with(MapValue::new)
            .put(placeholder, val);
        self
    }

    /// Set all substitution values at once, replacing any previously added.
    pub fn expression_attribute_values(mut self, values: MapValue) -> Self {
        self.values = Some(values);
        self
    }

    /// Start after the item with this primary key, typically the
    /// [`last_evaluated_key()`](QueryResult::last_evaluated_key()) of a previous result.
    pub fn start_key(mut self, key: MapValue) -> Self {
        self.start_key = Some(key);
        self
    }

    /// Maximum number of items to evaluate. Must be greater than zero.
    pub fn limit(mut self, l: u32) -> Self {
        self.limit = Some(l);
        self
    }

    /// Request a strongly consistent read. Not supported on global secondary indexes.
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    /// Execute the query, returning one page of results as a [`QueryResult`].
    pub async fn execute(&self, h: &Handle) -> Result<QueryResult, DynamoError> {
        let body = self.serialize()?;
        let resp = h.send_and_receive(OpCode::Query, body).await?;
        Ok(QueryResult::from_response(&resp))
    }

    /// Execute the query, converting each returned item into a native struct.
    ///
    /// A shape mismatch between an item and `T` fails the whole call with a
    /// [`Deserialization`](crate::DynamoErrorCode::Deserialization) error.
    pub async fn execute_into<T: DynamoRow + Default>(
        &self,
        h: &Handle,
    ) -> Result<Vec<T>, DynamoError> {
        self.execute(h).await?.into_rows()
    }

    pub(crate) fn serialize(&self) -> Result<RequestBody, DynamoError> {
        if self.table_name.is_empty() {
            return ia_err!("table name must be non-empty");
        }
        if self.key_condition.is_empty() {
            return ia_err!("key condition expression must be non-empty");
        }
        if self.limit == Some(0) {
            return ia_err!("limit must be greater than zero");
        }
        let mut body = RequestBody::new(&self.table_name);
        body.write_str(KEY_CONDITION_EXPRESSION, &self.key_condition);
        body.write_bool(CONSISTENT_READ, self.consistent_read);
        body.write_opt_str(INDEX_NAME, &self.index_name);
        body.write_names(EXPRESSION_ATTRIBUTE_NAMES, &self.names);
        body.write_opt_record(EXPRESSION_ATTRIBUTE_VALUES, &self.values);
        body.write_projection(&self.projection);
        body.write_opt_record(EXCLUSIVE_START_KEY, &self.start_key);
        body.write_opt_str(FILTER_EXPRESSION, &self.filter);
        body.write_opt_u32(LIMIT, self.limit);
        Ok(body)
    }
}
