//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! AWS Signature Version 4 request signing.
use chrono::prelude::*;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use sha2::{Digest, Sha256};
use tracing::trace;
use url::Url;

use crate::auth_common::credentials_provider::CredentialsProvider;
use crate::error::{DynamoError, DynamoErrorCode};

type HmacSha256 = Hmac<Sha256>;

pub const SERVICE_NAME: &str = "dynamodb";

static ALGORITHM: &str = "AWS4-HMAC-SHA256";
static HOST_HEADER: &str = "host";
static X_AMZ_DATE: &str = "x-amz-date";
static X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";
static X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
static AUTHORIZATION_HEADER: &str = "authorization";
// rewritten by proxies, never signed
static USER_AGENT_HEADER: &str = "user-agent";

macro_rules! sign_err {
    ($($t:tt)*) => {
        DynamoError::new(DynamoErrorCode::SigningError, &format!($($t)*))
    };
}

/// Add the SigV4 headers (`host`, `x-amz-date`, `x-amz-content-sha256`,
/// `x-amz-security-token` when a session token is present, and `authorization`)
/// for a request to the database service.
pub fn get_required_headers(
    method: Method,
    payload: &[u8],
    original_headers: HeaderMap,
    url_data: &Url,
    credentials: &dyn CredentialsProvider,
    region: &str,
) -> Result<HeaderMap, DynamoError> {
    get_required_headers_ext(
        method,
        payload,
        original_headers,
        url_data,
        credentials,
        region,
        SERVICE_NAME,
        Utc::now(),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn get_required_headers_ext(
    method: Method,
    payload: &[u8],
    original_headers: HeaderMap,
    url_data: &Url,
    credentials: &dyn CredentialsProvider,
    region: &str,
    service: &str,
    now: DateTime<Utc>,
) -> Result<HeaderMap, DynamoError> {
    if credentials.access_key_id().is_empty() || credentials.secret_access_key().is_empty() {
        return Err(sign_err!("cannot sign request: credentials are empty"));
    }
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    let mut new_headers = original_headers;
    new_headers.insert(HOST_HEADER, host_value(url_data)?);
    new_headers.insert(X_AMZ_DATE, header_value(&amz_date)?);
    let payload_hash = hex::encode(Sha256::digest(payload));
    new_headers.insert(X_AMZ_CONTENT_SHA256, header_value(&payload_hash)?);
    if let Some(token) = credentials.session_token() {
        new_headers.insert(X_AMZ_SECURITY_TOKEN, header_value(token)?);
    }

    let (canonical, signed_headers) =
        canonical_request(&method, url_data, &new_headers, &payload_hash)?;
    trace!("canonical request:\n{}", canonical);
    let scope = format!("{}/{}/{}/aws4_request", date, region, service);
    let to_sign = string_to_sign(&amz_date, &scope, &canonical);
    let key = signing_key(credentials.secret_access_key(), &date, region, service)?;
    let signature = hex::encode(hmac(&key, to_sign.as_bytes())?);

    let authorization_header = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        credentials.access_key_id(),
        scope,
        signed_headers,
        signature
    );
    trace!("inserting auth header for scope {}", scope);
    new_headers.insert(AUTHORIZATION_HEADER, header_value(&authorization_header)?);
    Ok(new_headers)
}

fn header_value(s: &str) -> Result<HeaderValue, DynamoError> {
    HeaderValue::from_str(s).map_err(|e| sign_err!("invalid header value: {}", e))
}

fn host_value(url: &Url) -> Result<HeaderValue, DynamoError> {
    let host = url
        .host_str()
        .ok_or_else(|| sign_err!("no host in url '{}'", url))?;
    match url.port() {
        Some(p) => header_value(&format!("{}:{}", host, p)),
        None => header_value(host),
    }
}

/// Returns the canonical request and the `;`-joined list of signed header names.
pub(crate) fn canonical_request(
    method: &Method,
    url: &Url,
    headers: &HeaderMap,
    payload_hash: &str,
) -> Result<(String, String), DynamoError> {
    let mut names: Vec<&HeaderName> = headers
        .keys()
        .filter(|k| k.as_str() != USER_AGENT_HEADER && k.as_str() != AUTHORIZATION_HEADER)
        .collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    let mut canonical_headers = String::new();
    for name in &names {
        let values: Result<Vec<String>, DynamoError> = headers
            .get_all(*name)
            .iter()
            .map(|v| {
                v.to_str()
                    .map(canonical_header_value)
                    .map_err(|_| sign_err!("header '{}' is not visible ascii", name))
            })
            .collect();
        canonical_headers.push_str(name.as_str());
        canonical_headers.push(':');
        canonical_headers.push_str(&values?.join(","));
        canonical_headers.push('\n');
    }
    let signed_headers = names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<&str>>()
        .join(";");

    let path = if url.path().is_empty() { "/" } else { url.path() };
    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.as_str(),
        path,
        canonical_query(url),
        canonical_headers,
        signed_headers,
        payload_hash
    );
    Ok((canonical, signed_headers))
}

// trim and collapse sequential spaces
fn canonical_header_value(v: &str) -> String {
    v.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn canonical_query(url: &Url) -> String {
    match url.query() {
        Some(q) if !q.is_empty() => {
            let mut pairs: Vec<String> = q
                .split('&')
                .map(|p| {
                    if p.contains('=') {
                        p.to_string()
                    } else {
                        format!("{}=", p)
                    }
                })
                .collect();
            pairs.sort();
            pairs.join("&")
        }
        _ => String::new(),
    }
}

pub(crate) fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    )
}

pub(crate) fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, DynamoError> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, DynamoError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| sign_err!("invalid signing key: {}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::auth_common::simple_credentials_provider::SimpleCredentialsProvider;

    const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    #[test]
    fn test_signing_key_derivation() -> Result<(), DynamoError> {
        let key = signing_key(EXAMPLE_SECRET, "20120215", "us-east-1", "iam")?;
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
        Ok(())
    }

    #[test]
    fn test_signature_for_fixed_request() -> Result<(), DynamoError> {
        let url = Url::parse("https://example.amazon.com/")?;
        let mut headers = HeaderMap::new();
        headers.insert(HOST_HEADER, HeaderValue::from_static("example.amazon.com"));
        headers.insert(X_AMZ_DATE, HeaderValue::from_static("20150830T123600Z"));
        let empty_hash = hex::encode(Sha256::digest(b""));
        let (canonical, signed) = canonical_request(&Method::GET, &url, &headers, &empty_hash)?;
        assert_eq!(signed, "host;x-amz-date");
        assert_eq!(
            canonical,
            "GET\n/\n\nhost:example.amazon.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let scope = "20150830/us-east-1/service/aws4_request";
        let key = signing_key(EXAMPLE_SECRET, "20150830", "us-east-1", "service")?;
        let sig = hex::encode(hmac(
            &key,
            string_to_sign("20150830T123600Z", scope, &canonical).as_bytes(),
        )?);
        assert_eq!(
            sig,
            "7ab4567ae243ee168f6bf18206b2b40b61ce08277323168138fa113ed23c538e"
        );
        Ok(())
    }

    #[test]
    fn test_required_headers() -> Result<(), DynamoError> {
        let creds = SimpleCredentialsProvider::new(
            "AKIDEXAMPLE".to_string(),
            EXAMPLE_SECRET.to_string(),
            Some("session-token".to_string()),
            "".to_string(),
        );
        let url = Url::parse("http://localhost:8000")?;
        let mut headers = HeaderMap::new();
        headers.insert("x-amz-target", HeaderValue::from_static("DynamoDB_20120810.GetItem"));
        headers.insert("user-agent", HeaderValue::from_static("test"));
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 10, 11, 12).unwrap();
        let h = get_required_headers_ext(
            Method::POST,
            b"{}",
            headers,
            &url,
            &creds,
            "us-west-2",
            SERVICE_NAME,
            now,
        )?;
        assert_eq!(h[HOST_HEADER], "localhost:8000");
        assert_eq!(h[X_AMZ_DATE], "20240309T101112Z");
        assert_eq!(h[X_AMZ_SECURITY_TOKEN], "session-token");
        assert_eq!(
            h[X_AMZ_CONTENT_SHA256],
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        let auth = h[AUTHORIZATION_HEADER].to_str().unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240309/us-west-2/dynamodb/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token;x-amz-target, \
             Signature="
        ));
        assert_eq!(auth.rsplit('=').next().unwrap().len(), 64);
        Ok(())
    }

    #[test]
    fn test_empty_credentials_fail() {
        let creds =
            SimpleCredentialsProvider::new("".to_string(), "".to_string(), None, "".to_string());
        let url = Url::parse("https://dynamodb.us-east-1.amazonaws.com").unwrap();
        let err = get_required_headers(Method::POST, b"{}", HeaderMap::new(), &url, &creds, "us-east-1")
            .unwrap_err();
        assert_eq!(err.code, DynamoErrorCode::SigningError);
    }
}
