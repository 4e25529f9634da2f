//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! DynamoDB Rust Client
//!
//! This is a typed, asynchronous client for the DynamoDB JSON API. Applications exchange
//! native values (a [`MapValue`](types::MapValue) of [`FieldValue`](types::FieldValue)s, or their
//! own structs using the [`derive@DynamoRow`] derive) and the client translates them to and from
//! the type-tagged wire format (`{"S": "text"}`, `{"N": "21"}`, ...).
//!
//! This client supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime. There is currently no blocking support.
//!
//! The general flow for an application is:
//! - Create a [`HandleBuilder`] with all needed parameters
//! - Create a [`Handle`] from the [`HandleBuilder`] that will be used throughout the application, across all threads
//! - Interact with the database using the [`Handle`] and Request structs such as [`GetRequest`], [`PutRequest`], [`QueryRequest`], etc.
//!
//! ## Simple Example
//! The following code creates a [`Handle`] from values in the current environment and then reads a single item from a table.
//! ```no_run
//! use dynamodb_client::{Handle, GetRequest};
//! use dynamodb_client::types::MapValue;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let handle = Handle::builder()
//!         .from_environment()?
//!         .build().await?;
//!     let getres = GetRequest::new("test_table")
//!         .key(MapValue::new().str("id", "Test"))
//!         .execute(&handle)
//!         .await?;
//!     println!("GetResult={:?}", getres);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuring the client
//!
//! A [`Handle`] needs credentials and either an endpoint or a region.
//! [`HandleBuilder::from_environment()`] reads the usual variables
//! (`AWS_REGION`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_PROFILE`, ...) plus
//! `DYNAMODB_ENDPOINT`, which is convenient for a local instance:
//! ```text
//! DYNAMODB_ENDPOINT=http://localhost:8000 AWS_ACCESS_KEY_ID=local AWS_SECRET_ACCESS_KEY=local cargo run --example quickstart
//! ```
//! Credentials can also be read from a shared credentials file with
//! [`HandleBuilder::credentials_from_file_with_profile()`], or given directly with
//! [`HandleBuilder::credentials()`].
//!
//! ## Throttling
//!
//! When the service reports that provisioned throughput was exceeded, or that the request was
//! throttled, the request is sent again after an exponentially growing delay (50ms, 100ms,
//! 200ms, ...). Once the next delay would reach the ceiling (60 seconds by default) the
//! throttling error is returned. See [`HandleBuilder::retry_base_delay()`] and
//! [`HandleBuilder::retry_max_delay()`]. All other errors, including transport failures,
//! are returned immediately.
//!
//! ## Values
//!
//! | native | wire |
//! | ------ | ---- |
//! | `String` | `S` |
//! | `Integer`, `Double` | `N` |
//! | `Boolean` | `BOOL` |
//! | `Binary` | `B` (base64) |
//! | `Null` | `NULL` |
//! | `Array` of only strings / numbers / binaries | `SS` / `NS` / `BS` |
//! | any other `Array` | `L` |
//! | `Map` | `M` |
//!
//! Values that cannot be represented (such as a non-finite double) are left out of the
//! encoded item, and malformed wire values are left out of decoded items. Both cases are
//! logged with `tracing` at `warn` level.
//!
//! ## License
//!
//! Copyright (C) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//!
//! This SDK is licensed under the Universal Permissive License 1.0.
//!

// lets the derive macro's `::dynamodb_client::` paths resolve inside this crate's own tests
extern crate self as dynamodb_client;

pub(crate) mod handle_builder;
pub use crate::handle_builder::HandleBuilder;

pub(crate) mod handle;
pub use crate::handle::Handle;

pub(crate) mod auth_common;
pub use crate::auth_common::config_file_credentials_provider::ConfigFileCredentialsProvider;
pub use crate::auth_common::credentials_provider::CredentialsProvider;
pub use crate::auth_common::simple_credentials_provider::SimpleCredentialsProvider;

pub mod codec;


pub(crate) mod delete_request;
pub use crate::delete_request::{DeleteRequest, DeleteResult};

pub(crate) mod error;
pub use crate::error::{DynamoError, DynamoErrorCode};

pub(crate) mod get_request;
pub use crate::get_request::{GetRequest, GetResult};

pub(crate) mod protocol;

pub(crate) mod put_request;
pub use crate::put_request::{PutRequest, PutResult};

pub(crate) mod query_request;
pub use crate::query_request::{QueryRequest, QueryResult};


pub(crate) mod retry;
pub use crate::retry::RetryConfig;

#[cfg(test)]
pub(crate) mod retry_tests;

pub(crate) mod scan_request;
pub use crate::scan_request::{ScanRequest, ScanResult};

pub mod transport;
pub use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub mod types;
pub use crate::types::{DynamoColumnToFieldValue, DynamoRow};

pub(crate) mod update_request;
pub use crate::update_request::{UpdateRequest, UpdateResult};
