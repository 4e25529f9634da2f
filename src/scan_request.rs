//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::protocol::*;
use crate::query_request::QueryResult;
use crate::types::{DynamoColumnToFieldValue, DynamoRow, MapValue};
use std::result::Result;

/// Results of a scan have the same shape as query results.
pub type ScanResult = QueryResult;

/// Read every item in a table or secondary index, one page per call.
///
/// Paging works the same way as for [`QueryRequest`](crate::QueryRequest).
#[derive(Default, Debug)]
pub struct ScanRequest {
    pub(crate) table_name: String,
    pub(crate) index_name: Option<String>,
    pub(crate) filter: Option<String>,
    pub(crate) projection: Vec<String>,
    pub(crate) names: Option<Vec<(String, String)>>,
    pub(crate) values: Option<MapValue>,
    pub(crate) start_key: Option<MapValue>,
    pub(crate) limit: Option<u32>,
    pub(crate) consistent_read: bool,
}

impl ScanRequest {
    /// Create a new ScanRequest for the given table.
    pub fn new(table_name: &str) -> Self {
        ScanRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Scan a local or global secondary index instead of the table.
    pub fn index_name(mut self, index: &str) -> Self {
        self.index_name = Some(index.to_string());
        self
    }

    /// Filter the scanned items on the server. The filter is applied after the limit.
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

    /// Add a value that can be substituted in the filter expression.
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

    /// Execute the scan, returning one page of results.
    pub async fn execute(&self, h: &Handle) -> Result<ScanResult, DynamoError> {
        let body = self.serialize()?;
        let resp = h.send_and_receive(OpCode::Scan, body).await?;
        Ok(QueryResult::from_response(&resp))
    }

    /// Execute the scan, converting each returned item into a native struct.
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
        if self.limit == Some(0) {
            return ia_err!("limit must be greater than zero");
        }
        let mut body = RequestBody::new(&self.table_name);
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
