//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DynamoErrorCode;
use crate::retry::{send_with_retry, RetryConfig};
use crate::transport::{HttpRequest, HttpResponse, SendFuture, Transport};
use crate::DynamoError;
use reqwest::header::{HeaderMap, HeaderValue};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub(crate) const THROTTLED: &str =
    r#"{"__type":"com.amazonaws.dynamodb.v20120810#ThrottlingException","message":"Rate of requests exceeds the allowed throughput."}"#;
pub(crate) const PTE: &str = r#"{"__type":"com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException","message":"The level of configured provisioned throughput for the table was exceeded."}"#;

/// Plays back canned responses in order, then repeats `fallback` (or fails
/// with a transport error if there is none). Records every request it sees.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, DynamoError>>>,
    fallback: Option<HttpResponse>,
    pub(crate) sent: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<HttpResponse, DynamoError>>) -> Self {
        ScriptedTransport {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub(crate) fn repeating(resp: HttpResponse) -> Self {
        ScriptedTransport {
            fallback: Some(resp),
            ..Default::default()
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    // gaps between consecutive attempts
    pub(crate) fn delays(&self) -> Vec<Duration> {
        let sent = self.sent.lock().unwrap();
        sent.windows(2).map(|w| w[1].0 - w[0].0).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a self, req: &'a HttpRequest) -> SendFuture<'a> {
        Box::pin(async move {
            self.sent.lock().unwrap().push((Instant::now(), req.clone()));
            if let Some(next) = self.script.lock().unwrap().pop_front() {
                return next;
            }
            match &self.fallback {
                Some(r) => Ok(r.clone()),
                None => Err(DynamoError::new(
                    DynamoErrorCode::TransportError,
                    "script exhausted",
                )),
            }
        })
    }
}

pub(crate) fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.as_bytes().to_vec(),
    }
}

fn request() -> HttpRequest {
    let mut headers = HeaderMap::new();
    headers.insert("x-amz-target", HeaderValue::from_static("DynamoDB_20120810.GetItem"));
    headers.insert("authorization", HeaderValue::from_static("AWS4-HMAC-SHA256 signed"));
    HttpRequest {
        url: "http://localhost:8000/".to_string(),
        headers,
        body: br#"{"TableName":"t"}"#.to_vec(),
    }
}

fn ms(v: &[u64]) -> Vec<Duration> {
    v.iter().map(|m| Duration::from_millis(*m)).collect()
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt() -> Result<(), DynamoError> {
    let t = ScriptedTransport::new(vec![Ok(response(200, r#"{"Item":{}}"#))]);
    let body = send_with_retry(&t, &request(), &RetryConfig::default()).await?;
    assert_eq!(body, br#"{"Item":{}}"#.to_vec());
    assert_eq!(t.attempts(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn throttled_three_times_then_success() -> Result<(), DynamoError> {
    let t = ScriptedTransport::new(vec![
        Ok(response(400, THROTTLED)),
        Ok(response(400, PTE)),
        Ok(response(400, THROTTLED)),
        Ok(response(200, "{}")),
    ]);
    let start = Instant::now();
    let body = send_with_retry(&t, &request(), &RetryConfig::default()).await?;
    assert_eq!(body, b"{}".to_vec());
    assert_eq!(t.attempts(), 4);
    assert_eq!(t.delays(), ms(&[50, 100, 200]));
    // the first attempt is immediate
    assert_eq!(t.sent.lock().unwrap()[0].0, start);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn every_retry_resends_the_same_signed_request() -> Result<(), DynamoError> {
    let t = ScriptedTransport::new(vec![
        Ok(response(400, THROTTLED)),
        Ok(response(400, THROTTLED)),
        Ok(response(200, "{}")),
    ]);
    let req = request();
    send_with_retry(&t, &req, &RetryConfig::default()).await?;
    let sent = t.sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    for (_, r) in sent.iter() {
        assert_eq!(r.url, req.url);
        assert_eq!(r.body, req.body);
        assert_eq!(r.headers, req.headers);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unbroken_throttling_stops_at_the_ceiling() {
    let t = ScriptedTransport::repeating(response(400, THROTTLED));
    let start = Instant::now();
    let err = send_with_retry(&t, &request(), &RetryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::Throttling);
    assert_eq!(
        err.message,
        "Rate of requests exceeds the allowed throughput."
    );
    assert_eq!(t.attempts(), 12);
    assert_eq!(
        t.delays(),
        ms(&[50, 100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200])
    );
    assert_eq!(start.elapsed(), Duration::from_millis(102_350));
}

#[tokio::test(start_paused = true)]
async fn provisioned_throughput_surfaces_its_own_code() {
    let cfg = RetryConfig {
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(100),
    };
    let t = ScriptedTransport::repeating(response(400, PTE));
    let err = send_with_retry(&t, &request(), &cfg).await.unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::ProvisionedThroughputExceeded);
    assert_eq!(t.attempts(), 5);
    assert_eq!(t.delays(), ms(&[10, 20, 40, 80]));
}

#[tokio::test(start_paused = true)]
async fn other_service_errors_are_not_retried() {
    let t = ScriptedTransport::new(vec![
        Ok(response(400, THROTTLED)),
        Ok(response(
            400,
            r#"{"__type":"com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException","message":"The conditional request failed"}"#,
        )),
        Ok(response(200, "{}")),
    ]);
    let err = send_with_retry(&t, &request(), &RetryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::GeneralError);
    assert_eq!(err.message, "The conditional request failed");
    assert_eq!(t.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_not_retried() {
    let t = ScriptedTransport::new(vec![
        Err(DynamoError::new(
            DynamoErrorCode::TransportError,
            "connection refused",
        )),
        Ok(response(200, "{}")),
    ]);
    let err = send_with_retry(&t, &request(), &RetryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::TransportError);
    assert_eq!(t.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_after_throttling_ends_the_call() {
    let t = ScriptedTransport::new(vec![
        Ok(response(400, THROTTLED)),
        Err(DynamoError::new(DynamoErrorCode::RequestTimeout, "timed out")),
    ]);
    let err = send_with_retry(&t, &request(), &RetryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::RequestTimeout);
    assert_eq!(t.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn empty_error_body_has_no_reason() {
    let t = ScriptedTransport::new(vec![Ok(response(500, ""))]);
    let err = send_with_retry(&t, &request(), &RetryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::GeneralError);
    assert_eq!(err.message, "no failure reason available");
    assert_eq!(t.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_calls_back_off_independently() {
    let a = ScriptedTransport::new(vec![Ok(response(400, THROTTLED)), Ok(response(200, "{}"))]);
    let b = ScriptedTransport::new(vec![Ok(response(200, "{}"))]);
    let cfg = RetryConfig::default();
    let req = request();
    let (ra, rb) = tokio::join!(
        send_with_retry(&a, &req, &cfg),
        send_with_retry(&b, &req, &cfg)
    );
    assert!(ra.is_ok());
    assert!(rb.is_ok());
    assert_eq!(a.attempts(), 2);
    assert_eq!(b.attempts(), 1);
    assert_eq!(a.delays(), ms(&[50]));
}
