//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::credentials_provider::CredentialsProvider;
use crate::auth_common::signer;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};

use crate::error::{ia_err, user_agent};
use crate::error::DynamoError;
use crate::handle_builder::HandleBuilder;
use crate::protocol::{parse_response, OpCode, RequestBody, CONTENT_TYPE as AMZ_JSON, TARGET_HEADER};
use crate::retry::{send_with_retry, RetryConfig};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

use serde_json::{Map, Value};
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// **The main database handle**.
///
/// This should be created once and used
/// throughout the application lifetime, across all threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying handle.
#[derive(Clone, Debug)]
pub struct Handle {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<HandleRef>,
}

#[derive(Debug)]
pub(crate) struct HandleRef {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) endpoint: Url,
    pub(crate) region: String,
    pub(crate) credentials: Box<dyn CredentialsProvider>,
    pub(crate) retry: RetryConfig,
}

impl Handle {
    /// Create a new [`HandleBuilder`].
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }

    // Create the new Handle based on builder configuration
    pub(crate) async fn new(b: &HandleBuilder) -> Result<Handle, DynamoError> {
        let credentials = match &b.credentials {
            Some(c) => c.clone(),
            None => {
                if b.from_environment {
                    return ia_err!("cannot build handle: no credentials found. set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or AWS_PROFILE.");
                }
                return ia_err!("cannot build handle: no credentials specified");
            }
        };
        let ep = match (b.endpoint.is_empty(), &b.region) {
            (false, _) => b.endpoint.clone(),
            (true, Some(r)) => format!("https://dynamodb.{}.amazonaws.com", r),
            (true, None) => {
                if b.from_environment {
                    return ia_err!("can't determine endpoint: set DYNAMODB_ENDPOINT or AWS_REGION");
                }
                return ia_err!("can't determine endpoint: call HandleBuilder::endpoint() or HandleBuilder::region()");
            }
        };
        let endpoint = Url::parse(&ep)?;
        let region = match &b.region {
            Some(r) => r.clone(),
            None => region_from_host(endpoint.host_str().unwrap_or_default())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };
        let transport: Arc<dyn Transport> = match (&b.transport, &b.client) {
            (Some(t), _) => t.clone(),
            (None, Some(c)) => Arc::new(ReqwestTransport::with_client(c)),
            (None, None) => Arc::new(ReqwestTransport::new(b.timeout.unwrap_or(DEFAULT_TIMEOUT))?),
        };
        if b.retry.max_delay <= b.retry.base_delay {
            debug!("retry ceiling {:?} is not above the base delay: throttled requests will not be retried", b.retry.max_delay);
        }
        debug!(
            "Creating new Handle: endpoint={}, region={}, retry={:?}",
            endpoint, region, b.retry
        );
        Ok(Handle {
            inner: Arc::new(HandleRef {
                transport,
                endpoint,
                region,
                credentials,
                retry: b.retry,
            }),
        })
    }

    /// The endpoint all requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    /// The region used to sign requests.
    pub fn region(&self) -> &str {
        &self.inner.region
    }

    // Frame, sign once, and run the request through the retrying executor.
    pub(crate) async fn send_and_receive(
        &self,
        op: OpCode,
        body: RequestBody,
    ) -> Result<Map<String, Value>, DynamoError> {
        let data = body.to_bytes()?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(AMZ_JSON));
        headers.insert(TARGET_HEADER, HeaderValue::from_str(&op.target())?);
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent())?);

        trace!("Adding required headers for {}", op.name());
        let headers = signer::get_required_headers(
            reqwest::Method::POST,
            &data,
            headers,
            &self.inner.endpoint,
            self.inner.credentials.as_ref(),
            &self.inner.region,
        )?;
        let req = HttpRequest {
            url: self.inner.endpoint.to_string(),
            headers,
            body: data,
        };
        let bytes = send_with_retry(self.inner.transport.as_ref(), &req, &self.inner.retry).await?;
        parse_response(&bytes)
    }
}

// "dynamodb.{region}.amazonaws.com[.cn]"
fn region_from_host(host: &str) -> Option<String> {
    let mut parts = host.split('.');
    if parts.next()? != "dynamodb" {
        return None;
    }
    let region = parts.next()?;
    if parts.next()? != "amazonaws" || region.is_empty() {
        return None;
    }
    Some(region.to_string())
}
