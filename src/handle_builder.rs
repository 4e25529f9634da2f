//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`Handle`](crate::Handle)
//!

use std::default::Default;
use std::env;
use std::path::Path;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::auth_common::config_file_credentials_provider::{
    ConfigFileCredentialsProvider, DEFAULT_CREDENTIALS_FILE_PATH, DEFAULT_PROFILE,
};
use crate::auth_common::credentials_provider::CredentialsProvider;
use crate::auth_common::file_utils::expand_user_home;
use crate::auth_common::simple_credentials_provider::SimpleCredentialsProvider;
use crate::error::{ia_err, DynamoError};
use crate::handle::Handle;
use crate::retry::RetryConfig;
use crate::transport::Transport;
use reqwest::Client;

/// Builder used to set all the parameters to create a [`Handle`](crate::Handle).
///
/// At a minimum, credentials and either an endpoint or a region must be given:
///```no_run
/// # use dynamodb_client::Handle;
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
///   let handle = Handle::builder()
///       .region("eu-west-1")?
///       .credentials_from_file("~/.aws/credentials")?
///       .build()
///       .await?;
/// # Ok(())
/// # }
///```
#[derive(Default, Debug, Clone)]
pub struct HandleBuilder {
    pub(crate) endpoint: String,
    pub(crate) region: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) client: Option<Client>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) credentials: Option<Box<dyn CredentialsProvider>>,
    pub(crate) retry: RetryConfig,
    // For error messaging
    pub(crate) from_environment: bool,
}

impl HandleBuilder {
    /// Create a new HandleBuilder struct.
    ///
    /// The default HandleBuilder has no credentials and no endpoint. Consider calling
    /// [`from_environment()`](HandleBuilder::from_environment()) to collect all parameters from
    /// the local environment by default.
    pub fn new() -> Self {
        HandleBuilder {
            ..Default::default()
        }
    }
    /// Build a new [`Handle`].
    ///
    /// Note: if no [`Transport`] was given, the handle creates a
    /// [`ReqwestTransport`](crate::transport::ReqwestTransport), reusing the
    /// [`reqwest::Client`] given to [`reqwest_client()`](HandleBuilder::reqwest_client()) if any.
    pub async fn build(self) -> Result<Handle, DynamoError> {
        Handle::new(&self).await
    }
    /// Gather configuration settings from the current environment.
    ///
    /// The values can be overridden in code if this method is called first and other
    /// methods are called afterwards.
    ///
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `DYNAMODB_ENDPOINT` | The URL endpoint to use. See [`HandleBuilder::endpoint()`]. |
    /// | `AWS_REGION`, `AWS_DEFAULT_REGION` | The region, used for signing and to derive the endpoint. See [`HandleBuilder::region()`]. |
    /// | `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` | Static credentials. |
    /// | `AWS_SESSION_TOKEN` | Optional session token to go with the static credentials. |
    /// | `AWS_SHARED_CREDENTIALS_FILE` | Credentials file to use if no static credentials are set. Defaults to `~/.aws/credentials`. |
    /// | `AWS_PROFILE` | Profile to read from the credentials file. Defaults to `default`. |
    ///
    pub fn from_environment(mut self) -> Result<Self, DynamoError> {
        self.from_environment = true;
        if let Ok(val) = env::var("DYNAMODB_ENDPOINT") {
            self = self.endpoint(&val)?;
        }
        if let Some(val) = env::var("AWS_REGION")
            .ok()
            .or_else(|| env::var("AWS_DEFAULT_REGION").ok())
        {
            self = self.region(&val)?;
        }
        let key_id = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret = env::var("AWS_SECRET_ACCESS_KEY").ok();
        if let (Some(k), Some(s)) = (key_id, secret) {
            let token = env::var("AWS_SESSION_TOKEN").ok();
            return self.credentials(Box::new(SimpleCredentialsProvider::new(
                k,
                s,
                token,
                "".to_string(),
            )));
        }
        let profile = env::var("AWS_PROFILE").ok();
        let file = env::var("AWS_SHARED_CREDENTIALS_FILE").ok();
        if profile.is_some() || file.is_some() {
            return self.credentials_from_file_with_profile(
                file.as_deref().unwrap_or(DEFAULT_CREDENTIALS_FILE_PATH),
                profile.as_deref().unwrap_or(DEFAULT_PROFILE),
            );
        }
        // fall back to the default file only if it is there
        let default_path = expand_user_home(DEFAULT_CREDENTIALS_FILE_PATH)?;
        if Path::new(&default_path).exists() {
            return self.credentials_from_file(&default_path);
        }
        Ok(self)
    }
    /// Set a specific endpoint connection to use.
    ///
    /// This is typically used with a local or test instance of the database. It can also
    /// be used to override the regional endpoint.
    ///
    /// A trailing `/` is removed, and a bare `host[:port]` is given an `https://` scheme.
    /// Examples:
    /// ```text
    ///     // Local instance
    ///     http://localhost:8000
    ///
    ///     // Regional service endpoint
    ///     https://dynamodb.eu-west-1.amazonaws.com
    /// ```
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, DynamoError> {
        let ep = endpoint.trim().trim_end_matches('/');
        if ep.is_empty() {
            return ia_err!("endpoint must be non-empty");
        }
        if ep.starts_with("https://") || ep.starts_with("http://") {
            self.endpoint = ep.to_string();
        } else if ep.contains("://") {
            return ia_err!("unsupported scheme in endpoint '{}'", endpoint);
        } else {
            self.endpoint = format!("https://{}", ep);
        }
        Ok(self)
    }
    /// Specify the region, such as `us-west-2`.
    ///
    /// The region is part of every request signature. If no endpoint has been given,
    /// the regional endpoint `https://dynamodb.{region}.amazonaws.com` is used.
    pub fn region(mut self, region: &str) -> Result<Self, DynamoError> {
        let r = region.trim();
        if r.is_empty() || !r.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return ia_err!("invalid region '{}'", region);
        }
        self.region = Some(r.to_string());
        Ok(self)
    }
    /// Specify the credentials used to sign requests.
    pub fn credentials(
        mut self,
        provider: Box<dyn CredentialsProvider>,
    ) -> Result<Self, DynamoError> {
        if provider.access_key_id().is_empty() {
            return ia_err!("credentials must have a non-empty access key id");
        }
        if self.region.is_none() && !provider.region_id().is_empty() {
            self = self.region(&provider.region_id().to_string())?;
        }
        self.credentials = Some(provider);
        Ok(self)
    }
    /// Read credentials from a shared credentials file, using the `default` profile.
    pub fn credentials_from_file(self, config_file: &str) -> Result<Self, DynamoError> {
        self.credentials_from_file_with_profile(config_file, DEFAULT_PROFILE)
    }
    /// Read credentials from a shared credentials file, using the given profile.
    ///
    /// See [`ConfigFileCredentialsProvider`] for the file format. If the profile
    /// carries a `region` and no region was set yet, it is used.
    pub fn credentials_from_file_with_profile(
        self,
        config_file: &str,
        profile: &str,
    ) -> Result<Self, DynamoError> {
        let cfp = ConfigFileCredentialsProvider::new_from_file(config_file, profile)?;
        self.credentials(Box::new(cfp))
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, the [`Handle`](crate::Handle) creates an internal [`reqwest::Client`] to use for
    /// all communications. If your application already has a reqwest Client, you can pass that
    /// into the HandleBuilder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, DynamoError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Specify a custom [`Transport`].
    ///
    /// This replaces the default reqwest-based transport entirely; the values given to
    /// [`timeout()`](HandleBuilder::timeout()) and
    /// [`reqwest_client()`](HandleBuilder::reqwest_client()) are then ignored.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Result<Self, DynamoError> {
        self.transport = Some(transport);
        Ok(self)
    }
    /// Specify the timeout used for connections and requests.
    ///
    /// The default timeout is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, DynamoError> {
        if timeout.is_zero() {
            return ia_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }
    /// Specify the first backoff delay after a throttled request. The default is 50 milliseconds.
    pub fn retry_base_delay(mut self, delay: Duration) -> Result<Self, DynamoError> {
        if delay.is_zero() {
            return ia_err!("retry base delay must be greater than zero");
        }
        self.retry.base_delay = delay;
        Ok(self)
    }
    /// Specify the backoff ceiling: a throttling error is returned once the next
    /// backoff delay would reach this value. The default is 60 seconds.
    pub fn retry_max_delay(mut self, delay: Duration) -> Result<Self, DynamoError> {
        self.retry.max_delay = delay;
        Ok(self)
    }
}
