//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::CredentialsProvider;
use crate::auth_common::file_utils::expand_user_home;
use crate::auth_common::simple_credentials_provider::SimpleCredentialsProvider;
use crate::error::{ia_err, DynamoError};
use ini::Ini;

pub(crate) const DEFAULT_CREDENTIALS_FILE_PATH: &str = "~/.aws/credentials";
pub(crate) const DEFAULT_PROFILE: &str = "default";
const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";
const REGION: &str = "region";

/// Credentials provider that reads a named profile from a shared credentials file.
///
/// The file uses INI syntax, one section per profile:
/// ```text
/// [default]
/// aws_access_key_id = AKIDEXAMPLE
/// aws_secret_access_key = wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY
/// # optional
/// aws_session_token = ...
/// region = us-west-2
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFileCredentialsProvider {
    provider: SimpleCredentialsProvider,
}

fn get_section_variable(
    file: &str,
    props: &ini::Properties,
    var: &str,
) -> Result<String, DynamoError> {
    match props.get(var) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => ia_err!(
            "error reading credentials file '{}': missing field '{}'",
            file,
            var
        ),
    }
}

impl ConfigFileCredentialsProvider {
    /// Creates a new ConfigFileCredentialsProvider from the file at the path provided using the profile name provided.
    ///
    /// # Arguments
    ///
    /// * `config_file_path` : The path of the credentials file. A leading `~/` is expanded to the home directory.
    /// * `profile_name`: The name of the profile (section) to use
    ///
    pub fn new_from_file(config_file_path: &str, profile_name: &str) -> Result<Self, DynamoError> {
        tracing::debug!(
            "Creating a ConfigFileCredentialsProvider from file {} and profile {}",
            config_file_path,
            profile_name
        );
        let file_path = expand_user_home(config_file_path)?;
        let config = match Ini::load_from_file(&file_path) {
            Ok(c) => c,
            Err(e) => {
                return ia_err!("error reading credentials file '{}': {}", file_path, e);
            }
        };
        let profile_data = match config.section(Some(profile_name)) {
            Some(p) => p,
            None => {
                return ia_err!(
                    "error reading credentials file '{}': missing profile '{}'",
                    file_path,
                    profile_name
                );
            }
        };

        let access_key_id = get_section_variable(&file_path, profile_data, ACCESS_KEY_ID)?;
        let secret_access_key = get_section_variable(&file_path, profile_data, SECRET_ACCESS_KEY)?;

        // token and region are optional
        let session_token = get_section_variable(&file_path, profile_data, SESSION_TOKEN).ok();
        let region_id = get_section_variable(&file_path, profile_data, REGION).unwrap_or_default();
        if region_id.is_empty() {
            tracing::debug!("no '{}' specified in credentials file", REGION);
        }

        Ok(ConfigFileCredentialsProvider {
            provider: SimpleCredentialsProvider::new(
                access_key_id,
                secret_access_key,
                session_token,
                region_id,
            ),
        })
    }

    /// Creates a new ConfigFileCredentialsProvider from `~/.aws/credentials` using the profile name provided.
    pub fn new(profile_name: &str) -> Result<Self, DynamoError> {
        Self::new_from_file(DEFAULT_CREDENTIALS_FILE_PATH, profile_name)
    }
}

impl CredentialsProvider for ConfigFileCredentialsProvider {
    fn access_key_id(&self) -> &str {
        self.provider.access_key_id()
    }
    fn secret_access_key(&self) -> &str {
        self.provider.secret_access_key()
    }
    fn session_token(&self) -> Option<&str> {
        self.provider.session_token()
    }
    fn region_id(&self) -> &str {
        self.provider.region_id()
    }
}
