//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::CredentialsProvider;

/// A credentials provider holding static values.
///
/// This is the provider to use when credentials are not read from a shared
/// credentials file, for example when they come from the process environment
/// or from an application secret store.
#[derive(Clone)]
pub struct SimpleCredentialsProvider {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    region_id: String,
}

impl SimpleCredentialsProvider {
    /// Creates a new SimpleCredentialsProvider using the values passed in the arguments.
    ///
    /// # Arguments
    ///
    /// * `access_key_id` : The access key id
    /// * `secret_access_key`: The secret key matching `access_key_id`
    /// * `session_token`: The session token, for temporary credentials
    /// * `region_id`: The region to associate with these credentials. May be empty.
    ///
    pub fn new(
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
        region_id: String,
    ) -> Self {
        SimpleCredentialsProvider {
            access_key_id,
            secret_access_key,
            session_token,
            region_id,
        }
    }
}

// keep the secret out of debug logs
impl std::fmt::Debug for SimpleCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleCredentialsProvider")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .field("region_id", &self.region_id)
            .finish()
    }
}

impl CredentialsProvider for SimpleCredentialsProvider {
    fn access_key_id(&self) -> &str {
        &self.access_key_id
    }
    fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
    fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
    fn region_id(&self) -> &str {
        &self.region_id
    }
}
