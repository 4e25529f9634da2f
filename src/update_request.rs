//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::protocol::*;
use crate::types::{DynamoColumnToFieldValue, MapValue};
use std::result::Result;

/// Struct used for modifying attributes of a single item.
///
/// The changes are described by an update expression, for example:
/// ```no_run
/// use dynamodb_client::{Handle, UpdateRequest};
/// use dynamodb_client::types::MapValue;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().from_environment()?.build().await?;
/// UpdateRequest::new("people", MapValue::new().str("id", "123456"))
///     .update_expression("SET #n = :name ADD visits :one")
///     .expression_attribute_name("#n", "name")
///     .expression_attribute_value(":name", "Jane")
///     .expression_attribute_value(":one", 1)
///     .execute(&handle)
///     .await?;
/// # Ok(())
/// # }
/// ```
/// If the item does not exist, the service creates it, unless a
/// [`condition_expression()`](UpdateRequest::condition_expression()) prevents that.
#[derive(Default, Debug)]
pub struct UpdateRequest {
    pub(crate) table_name: String,
    pub(crate) key: MapValue,
    pub(crate) update: Option<String>,
    pub(crate) condition: Option<String>,
    pub(crate) names: Option<Vec<(String, String)>>,
    pub(crate) values: Option<MapValue>,
}

/// Struct representing the result of an [`UpdateRequest`] execution.
#[derive(Default, Debug)]
pub struct UpdateResult {}

impl UpdateRequest {
    /// Create a new UpdateRequest for the item with the given primary key.
    pub fn new(table_name: &str, key: MapValue) -> UpdateRequest {
        UpdateRequest {
            table_name: table_name.to_string(),
            key,
            ..Default::default()
        }
    }

    /// Set the update expression, passed verbatim to the service.
    pub fn update_expression(mut self, expr: &str) -> UpdateRequest {
        self.update = Some(expr.to_string());
        self
    }

    /// Only apply the update if the condition holds for the existing item.
    pub fn condition_expression(mut self, expr: &str) -> UpdateRequest {
        self.condition = Some(expr.to_string());
        self
    }

    /// Add a substitution token for an attribute name, such as `("#n", "name")`.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> UpdateRequest {
        self.names
            .get_or_insert_with(Vec::new)
            .push((placeholder.to_string(), name.to_string()));
        self
    }

    /// Add a value that can be substituted in the update or condition expression.
    ///
    /// `None` values are sent as NULL.
    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl DynamoColumnToFieldValue,
    ) -> UpdateRequest {
        self.values
            .get_or_insert_with(MapValue::new)
            .put(placeholder, val);
        self
    }

    /// Set all substitution values at once, replacing any previously added.
    pub fn expression_attribute_values(mut self, values: MapValue) -> UpdateRequest {
        self.values = Some(values);
        self
    }

    /// Execute the request, returning an [`UpdateResult`].
    pub async fn execute(&self, h: &Handle) -> Result<UpdateResult, DynamoError> {
        let body = self.serialize()?;
        let _ = h.send_and_receive(OpCode::UpdateItem, body).await?;
        Ok(UpdateResult {})
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
        body.write_opt_str(UPDATE_EXPRESSION, &self.update);
        Ok(body)
    }
}
