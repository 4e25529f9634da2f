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
use std::result::Result;

/// Struct used for writing a single item into a table.
///
/// This request can be used to write data represented as a [`MapValue`], or as
/// a native Rust struct using the [`macro@DynamoRow`](crate::DynamoRow) derive macro.
///
/// An existing item with the same primary key is replaced. Use
/// [`condition_expression()`](PutRequest::condition_expression()) to make the write
/// conditional, for example `attribute_not_exists(id)` to only create new items.
#[derive(Default, Debug)]
pub struct PutRequest {
    pub(crate) table_name: String,
    pub(crate) value: MapValue,
    pub(crate) condition: Option<String>,
    pub(crate) names: Option<Vec<(String, String)>>,
    pub(crate) values: Option<MapValue>,
}

/// Struct representing the result of a [`PutRequest`] execution.
///
/// This struct is returned from a [`PutRequest::execute()`] call.
#[derive(Default, Debug)]
pub struct PutResult {}

impl PutRequest {
    /// Create a new PutRequest.
    ///
    /// `table_name` should be the name of the table to insert the item into.
    pub fn new(table_name: &str) -> PutRequest {
        PutRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Set the item to write, as a [`MapValue`].
    ///
    /// ```no_run
    /// use dynamodb_client::{Handle, PutRequest};
    /// use dynamodb_client::types::MapValue;
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().from_environment()?.build().await?;
    /// let item = MapValue::new()
    ///     .str("id", "Test")
    ///     .i64("num", 21)
    ///     .bool("bool", false);
    /// PutRequest::new("things")
    ///     .value(item)
    ///     .execute(&handle)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn value(mut self, val: MapValue) -> PutRequest {
        self.value = val;
        self
    }

    /// Set the item to write, from a native Rust struct.
    ///
    /// `val` must implement [`DynamoRow`], typically through the derive:
    /// ```no_run
    /// use dynamodb_client::{DynamoRow, Handle, PutRequest};
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().from_environment()?.build().await?;
    /// #[derive(Default, Debug, DynamoRow)]
    /// struct Person {
    ///     pub id: String,
    ///     pub name: String,
    ///     #[dynamo(column = "yearsOld")]
    ///     pub age: i32,
    ///     pub nicknames: Vec<String>,
    /// }
    ///
    /// let p = Person {
    ///     id: "123456".to_string(),
    ///     name: "Jane".to_string(),
    ///     age: 42,
    ///     nicknames: vec!["JJ".to_string()],
    /// };
    /// PutRequest::new("people").put(&p)?.execute(&handle).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn put(self, val: &dyn DynamoRow) -> Result<PutRequest, DynamoError> {
        match val.to_map_value() {
            Ok(value) => Ok(self.value(value)),
            Err(e) => ia_err!("could not convert struct to MapValue: {}", e.message),
        }
    }

    /// Only write the item if the condition holds for the existing item (if any).
    pub fn condition_expression(mut self, expr: &str) -> PutRequest {
        self.condition = Some(expr.to_string());
        self
    }

    /// Add a substitution token for an attribute name, such as `("#n", "name")`.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> PutRequest {
        self.names
            .get_or_insert_with(Vec::new)
            .push((placeholder.to_string(), name.to_string()));
        self
    }

    /// Add a value that can be substituted in the condition, such as `(":v", 10)`.
    pub fn expression_attribute_value(
        mut self,
        placeholder: &str,
        val: impl DynamoColumnToFieldValue,
    ) -> PutRequest {
        self.values
            .get_or_insert_with(MapValue::new)
            .put(placeholder, val);
        self
    }

    /// Set all substitution values at once, replacing any previously added.
    pub fn expression_attribute_values(mut self, values: MapValue) -> PutRequest {
        self.values = Some(values);
        self
    }

    /// Execute the request, returning a [`PutResult`].
    ///
    /// A failed condition is returned as a
    /// [`GeneralError`](crate::DynamoErrorCode::GeneralError) carrying the service's message.
    pub async fn execute(&self, h: &Handle) -> Result<PutResult, DynamoError> {
        let body = self.serialize()?;
        let _ = h.send_and_receive(OpCode::PutItem, body).await?;
        Ok(PutResult {})
    }

    pub(crate) fn serialize(&self) -> Result<RequestBody, DynamoError> {
        if self.table_name.is_empty() {
            return ia_err!("table name must be non-empty");
        }
        if self.value.is_empty() {
            return ia_err!("item to put must be non-empty");
        }
        let mut body = RequestBody::new(&self.table_name);
        body.write_record(ITEM, &self.value);
        body.write_opt_str(CONDITION_EXPRESSION, &self.condition);
        body.write_names(EXPRESSION_ATTRIBUTE_NAMES, &self.names);
        body.write_opt_record(EXPRESSION_ATTRIBUTE_VALUES, &self.values);
        Ok(body)
    }
}
