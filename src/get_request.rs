//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DynamoErrorCode::ItemNotFound;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::protocol::*;
use crate::types::{DynamoRow, MapValue};
use std::result::Result;

/// Struct used for getting a single item from a table.
#[derive(Default, Debug)]
pub struct GetRequest {
    pub(crate) table_name: String,
    pub(crate) key: MapValue,
    pub(crate) projection: Vec<String>,
    pub(crate) consistent_read: bool,
    pub(crate) names: Option<Vec<(String, String)>>,
}

/// Struct representing the result of a [`GetRequest`] operation.
///
/// This struct is returned from a [`GetRequest::execute()`] call.
#[derive(Default, Debug)]
pub struct GetResult {
    pub(crate) item: Option<MapValue>,
}

impl GetResult {
    /// Get the returned item. If the item does not exist in the table, this value will be `None`.
    pub fn item(&self) -> Option<&MapValue> {
        self.item.as_ref()
    }
    /// Take ownership of the returned item.
    pub fn take_item(self) -> Option<MapValue> {
        self.item
    }
}

impl GetRequest {
    /// Create a new `GetRequest`.
    ///
    /// `table_name` is required and must be non-empty.
    pub fn new(table_name: &str) -> GetRequest {
        GetRequest {
            table_name: table_name.to_string(),
            ..Default::default()
        }
    }

    /// Specify the primary key of the item, from a [`MapValue`].
    ///
    /// `key` must contain the partition key, and the sort key if the table has one.
    pub fn key(mut self, key: MapValue) -> GetRequest {
        self.key = key;
        self
    }

    /// Specify the primary key of the item, from a native Rust struct.
    ///
    /// `row_key` must be an instance of a struct that implements the [`DynamoRow`] trait, which is
    /// done by adding the [`derive@DynamoRow`](crate::DynamoRow) derive to the struct definition.
    /// Every field of the struct is sent as part of the key, so it should only hold key attributes
    /// (use `Option` fields for the rest: `None` values are still sent, as NULL).
    pub fn row_key(self, row_key: &dyn DynamoRow) -> Result<GetRequest, DynamoError> {
        match row_key.to_map_value() {
            Ok(value) => Ok(self.key(value)),
            Err(e) => ia_err!("could not convert struct to MapValue: {}", e.message),
        }
    }

    /// Specify the attributes to return. By default all attributes are returned.
    ///
    /// The names are joined into a `ProjectionExpression` verbatim, so placeholders defined
    /// with [`expression_attribute_name()`](GetRequest::expression_attribute_name()) may be used.
    pub fn projection(mut self, attributes: &[&str]) -> GetRequest {
        self.projection = attributes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Request a strongly consistent read. The default is eventually consistent.
    pub fn consistent_read(mut self, consistent: bool) -> GetRequest {
        self.consistent_read = consistent;
        self
    }

    /// Add a substitution token for an attribute name, such as `("#n", "name")`.
    pub fn expression_attribute_name(mut self, placeholder: &str, name: &str) -> GetRequest {
        self.names
            .get_or_insert_with(Vec::new)
            .push((placeholder.to_string(), name.to_string()));
        self
    }

    /// Execute the request, returning a [`GetResult`].
    ///
    /// If the item exists in the table, [`GetResult::item()`] will be `Some()`.
    pub async fn execute(&self, h: &Handle) -> Result<GetResult, DynamoError> {
        let body = self.serialize()?;
        let resp = h.send_and_receive(OpCode::GetItem, body).await?;
        Ok(GetResult {
            item: read_record(&resp, ITEM),
        })
    }

    /// Execute the request, populating an existing Rust native struct.
    ///
    /// `row` must be an instance of a struct that implements the [`DynamoRow`] trait. `row`
    /// will have all of its fields populated if this method returns `Ok()`:
    /// ```no_run
    /// use dynamodb_client::{DynamoRow, GetRequest, Handle};
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().from_environment()?.build().await?;
    /// #[derive(Default, Debug, DynamoRow)]
    /// struct Person {
    ///     pub id: String,
    ///     pub name: String,
    ///     pub age: Option<i32>,
    /// }
    ///
    /// #[derive(Default, Debug, DynamoRow)]
    /// struct PersonKey {
    ///     pub id: String,
    /// }
    ///
    /// let mut person = Person::default();
    /// GetRequest::new("people")
    ///     .row_key(&PersonKey { id: "123456".to_string() })?
    ///     .execute_into(&handle, &mut person)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// If the item does not exist, an error with code
    /// [`ItemNotFound`](crate::DynamoErrorCode::ItemNotFound) is returned. If the item exists but
    /// does not fit the struct, the [`Deserialization`](crate::DynamoErrorCode::Deserialization)
    /// error is returned.
    pub async fn execute_into(&self, h: &Handle, row: &mut dyn DynamoRow) -> Result<(), DynamoError> {
        let resp = self.execute(h).await?;
        match resp.item() {
            Some(item) => row.from_map_value(item),
            None => Err(DynamoError::new(
                ItemNotFound,
                &format!("no item found in table '{}' for the given key", self.table_name),
            )),
        }
    }

    pub(crate) fn serialize(&self) -> Result<RequestBody, DynamoError> {
        if self.table_name.is_empty() {
            return ia_err!("table name must be non-empty");
        }
        if self.key.is_empty() {
            return ia_err!("key must be non-empty");
        }
        let mut body = RequestBody::new(&self.table_name);
        body.write_bool(CONSISTENT_READ, self.consistent_read);
        body.write_record(KEY, &self.key);
        body.write_projection(&self.projection);
        body.write_names(EXPRESSION_ATTRIBUTE_NAMES, &self.names);
        Ok(body)
    }
}
