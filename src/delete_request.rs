//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::protocol::*;
use crate::types::{DynamoColumnToFieldValue, MapValue};
use std::result::Result;

/// Struct used for deleting a single item from a table.
///
/// Deleting an item that does not exist is not an error.
#[derive(Default, Debug)]
pub struct DeleteRequest {
    pub(crate) table_name: String,
    pub(crate) key: MapValue,
    pub(crate) condition: Option<String>,
    pub(crate) names: Option<Vec<(String, String)>>,
    pub(crate) values: Option<MapValue>,
}

/// Struct representing the result of a [`DeleteRequest`] execution.
///
/// This struct is returned from a [`DeleteRequest::execute()`] call.
#[derive(Default, Debug)]
pub struct DeleteResult {}

impl DeleteRequest {
    /// Create a new DeleteRequest.
    ///
    /// `table_name` and `key` are required. `key` must contain the partition key, and the
    /// sort key if the table has one.
    pub fn new(table_name: &str, key: MapValue) -> DeleteRequest {
        DeleteRequest {
            table_name: table_name.to_string(),
            key,
            ..Default::default()
        }
    }

    /// Only delete the item if the condition holds for it.
    pub fn condition_expression(mut self, expr: &str) -> DeleteRequest {
        self.condition = Some(expr.to_string());
        self
    }

    /// Add a substitution token for an attribute name, such as `("#n", "name")`.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> DeleteRequest {
        self.names
            .get_or_insert_with(Vec::new)
            .push((placeholder.to_string(), name.to_string()));
        self
    }

    /// Add a value that can be substituted in the condition.
    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl DynamoColumnToFieldValue,
    ) -> DeleteRequest {
        self.values
            .get_or_insert_with(MapValue::new)
            .put(placeholder, val);
        self
    }

    /// Set all substitution values at once, replacing any previously added.
    pub fn expression_attribute_values(mut self, values: MapValue) -> DeleteRequest {
        self.values = Some(values);
        self
    }

    /// Execute the request, returning a [`DeleteResult`].
    pub async fn execute(&self, h: &Handle) -> Result<DeleteResult, DynamoError> {
        let body = self.serialize()?;
        let _ = h.send_and_receive(OpCode::DeleteItem, body).await?;
        Ok(DeleteResult {})
    }

    pub(crate) fn serialize(&self) -> Result<RequestBody, DynamoError> {
        if self.table_name.is_empty() {
            return ia_err!("table name must be non-empty");
        }
        if self.key.is_empty() {
            return ia_err!("key must be non-empty");
        }
        let mut body = RequestBody::new(&self.table_name);
        body.write_record(KEY, &self.key);
        body.write_opt_str(CONDITION_EXPRESSION, &self.condition);
        body.write_names(EXPRESSION_ATTRIBUTE_NAMES, &self.names);
        body.write_opt_record(EXPRESSION_ATTRIBUTE_VALUES, &self.values);
        Ok(body)
    }
}
