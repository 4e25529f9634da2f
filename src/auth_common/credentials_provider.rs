//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use std::fmt::Debug;

/// Trait defining a source of request-signing credentials
pub trait CredentialsProvider: Send + Sync + Debug + CredentialsProviderClone {
    /// Returns the access key id used in the `Credential` scope of each signature
    fn access_key_id(&self) -> &str;
    /// Returns the secret key used to derive the signing key
    fn secret_access_key(&self) -> &str;
    /// Returns the session token for temporary credentials, if any
    fn session_token(&self) -> Option<&str>;
    /// Returns the region associated with these credentials, or an empty string
    fn region_id(&self) -> &str {
        ""
    }
}

// This allows users of this library to clone a Box<dyn CredentialsProvider>
pub trait CredentialsProviderClone {
    fn clone_box(&self) -> Box<dyn CredentialsProvider>;
}

impl<T> CredentialsProviderClone for T
where
    T: 'static + CredentialsProvider + Clone,
{
    fn clone_box(&self) -> Box<dyn CredentialsProvider> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn CredentialsProvider> {
    fn clone(&self) -> Box<dyn CredentialsProvider> {
        self.clone_box()
    }
}
