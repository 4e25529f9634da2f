//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! The HTTP boundary used by the [`Handle`](crate::Handle).
//!
//! The default [`ReqwestTransport`] is created internally by
//! [`HandleBuilder::build()`](crate::HandleBuilder::build()). Applications (and tests)
//! can supply their own implementation with
//! [`HandleBuilder::transport()`](crate::HandleBuilder::transport()).
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::result::Result;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::trace;

use crate::error::DynamoError;

/// A fully signed request, ready to be POSTed.
///
/// The same `HttpRequest` is re-submitted unchanged on every retry.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The status and raw body of a completed exchange.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Future returned by [`Transport::send()`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, DynamoError>> + Send + 'a>>;

/// Sends a single HTTP exchange.
///
/// Any `Err` returned is treated as a transport failure: it is surfaced to the
/// caller immediately and never retried. A response with a non-2xx status must be
/// returned as `Ok` so it can be classified.
pub trait Transport: Send + Sync + Debug {
    fn send<'a>(&'a self, req: &'a HttpRequest) -> SendFuture<'a>;
}

/// [`Transport`] implementation over a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool and the given timeout.
    pub fn new(timeout: Duration) -> Result<ReqwestTransport, DynamoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(ReqwestTransport { client })
    }

    /// Use an existing client (and its connection pool).
    pub fn with_client(client: &reqwest::Client) -> ReqwestTransport {
        ReqwestTransport {
            client: client.clone(),
        }
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(&'a self, req: &'a HttpRequest) -> SendFuture<'a> {
        Box::pin(async move {
            trace!("POST {} ({} bytes)", req.url, req.body.len());
            let resp = self
                .client
                .post(&req.url)
                .headers(req.headers.clone())
                .body(req.body.clone())
                .send()
                .await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}
