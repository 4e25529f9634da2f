//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use dynamodb_client::transport::SendFuture;
use dynamodb_client::types::MapValue;
use dynamodb_client::{
    DeleteRequest, DynamoError, DynamoErrorCode, DynamoRow, GetRequest, Handle, HandleBuilder,
    HttpRequest, HttpResponse, PutRequest, QueryRequest, ScanRequest, SimpleCredentialsProvider,
    Transport, UpdateRequest,
};
use serde_json::{json, Map, Value};

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const THROTTLED: &str = r#"{"__type":"com.amazonaws.dynamodb.v20120810#ThrottlingException","message":"Rate of requests exceeds the allowed throughput."}"#;

// A tiny in-memory stand-in for the service. Items are stored in wire form and
// keyed by their "customer" and "id" attributes.
#[derive(Debug, Default)]
struct FakeService {
    items: Mutex<Vec<Map<String, Value>>>,
    requests: Mutex<Vec<HttpRequest>>,
    throttle_next: AtomicUsize,
}

fn ok(v: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: serde_json::to_vec(&v).unwrap(),
    }
}

fn fail(error_type: &str, message: &str) -> HttpResponse {
    let body = json!({
        "__type": format!("com.amazonaws.dynamodb.v20120810#{}", error_type),
        "message": message
    });
    HttpResponse {
        status: 400,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn key_of(item: &Map<String, Value>) -> Value {
    json!({"customer": item["customer"], "id": item["id"]})
}

fn matches_key(item: &Map<String, Value>, key: &Value) -> bool {
    key.as_object()
        .map(|k| k.iter().all(|(name, v)| item.get(name) == Some(v)))
        .unwrap_or(false)
}

impl FakeService {
    fn handle(&self, target: &str, req: Map<String, Value>) -> HttpResponse {
        let mut items = self.items.lock().unwrap();
        match target {
            "DynamoDB_20120810.PutItem" => {
                let item = req["Item"].as_object().unwrap().clone();
                let key = key_of(&item);
                items.retain(|i| !matches_key(i, &key));
                items.push(item);
                ok(json!({}))
            }
            "DynamoDB_20120810.GetItem" => match items.iter().find(|i| matches_key(i, &req["Key"])) {
                Some(i) => ok(json!({ "Item": i })),
                None => ok(json!({})),
            },
            "DynamoDB_20120810.DeleteItem" => {
                items.retain(|i| !matches_key(i, &req["Key"]));
                ok(json!({}))
            }
            "DynamoDB_20120810.UpdateItem" => {
                // only understands "SET note = :n"
                let note = req["ExpressionAttributeValues"][":n"].clone();
                match items.iter_mut().find(|i| matches_key(i, &req["Key"])) {
                    Some(i) => {
                        i.insert("note".to_string(), note);
                        ok(json!({}))
                    }
                    None => fail("ConditionalCheckFailedException", "The conditional request failed"),
                }
            }
            "DynamoDB_20120810.Query" => {
                let customer = &req["ExpressionAttributeValues"][":c"];
                let matching: Vec<&Map<String, Value>> =
                    items.iter().filter(|i| &i["customer"] == customer).collect();
                let start = match req.get("ExclusiveStartKey") {
                    Some(k) => matching
                        .iter()
                        .position(|i| matches_key(i, k))
                        .map(|p| p + 1)
                        .unwrap_or(0),
                    None => 0,
                };
                let limit = req
                    .get("Limit")
                    .and_then(Value::as_u64)
                    .unwrap_or(u64::MAX) as usize;
                let page: Vec<&Map<String, Value>> =
                    matching.iter().skip(start).take(limit).cloned().collect();
                let mut resp = json!({"Items": page, "Count": page.len(), "ScannedCount": page.len()});
                if start + page.len() < matching.len() {
                    if let Some(last) = page.last() {
                        resp["LastEvaluatedKey"] = key_of(last);
                    }
                }
                ok(resp)
            }
            other => fail(
                "ValidationException",
                &format!("operation {} is not supported here", other),
            ),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Debug, Default, Clone)]
struct SharedFake(Arc<FakeService>);

impl Transport for SharedFake {
    fn send<'a>(&'a self, req: &'a HttpRequest) -> SendFuture<'a> {
        Box::pin(async move {
            self.0.requests.lock().unwrap().push(req.clone());
            if self
                .0
                .throttle_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Ok(HttpResponse {
                    status: 400,
                    body: THROTTLED.as_bytes().to_vec(),
                });
            }
            let target = req
                .headers
                .get("x-amz-target")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body: Map<String, Value> = serde_json::from_slice(&req.body)?;
            Ok(self.0.handle(&target, body))
        })
    }
}

#[derive(Default, Debug, PartialEq, DynamoRow)]
struct Order {
    customer: String,
    id: String,
    total: f64,
    quantity: i32,
    tags: Vec<String>,
    note: Option<String>,
}

#[derive(Default, Debug, DynamoRow)]
struct OrderKey {
    customer: String,
    id: String,
}

fn order(customer: &str, id: &str, total: f64) -> Order {
    Order {
        customer: customer.to_string(),
        id: id.to_string(),
        total,
        quantity: 1,
        tags: vec!["new".to_string()],
        note: None,
    }
}

fn get_builder(fake: &SharedFake) -> Result<HandleBuilder, DynamoError> {
    Handle::builder()
        .endpoint("http://localhost:8000")?
        .region("us-west-2")?
        .credentials(Box::new(SimpleCredentialsProvider::new(
            "AKIDEXAMPLE".to_string(),
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            None,
            String::new(),
        )))?
        .transport(Arc::new(fake.clone()))
}

async fn get_handle(fake: &SharedFake) -> Result<Handle, DynamoError> {
    // Set RUST_LOG to see client logging
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    get_builder(fake)?.build().await
}

#[tokio::test]
async fn put_then_get_struct() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;

    let o = order("c1", "o-1", 12.5);
    PutRequest::new("orders").put(&o)?.execute(&handle).await?;

    let mut back = Order::default();
    GetRequest::new("orders")
        .row_key(&OrderKey {
            customer: "c1".to_string(),
            id: "o-1".to_string(),
        })?
        .consistent_read(true)
        .execute_into(&handle, &mut back)
        .await?;
    assert_eq!(back, o);

    // the raw item is available too
    let res = GetRequest::new("orders")
        .key(MapValue::new().str("customer", "c1").str("id", "o-1"))
        .execute(&handle)
        .await?;
    let item = res.item().ok_or("missing item")?;
    assert_eq!(item.get_float64("total"), Some(12.5));
    assert_eq!(item.get_i64("quantity"), Some(1));
    Ok(())
}

#[tokio::test]
async fn get_missing_item() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    let req = GetRequest::new("orders").key(MapValue::new().str("customer", "c9").str("id", "x"));

    let res = req.execute(&handle).await?;
    assert!(res.item().is_none());

    let mut o = Order::default();
    let err = req.execute_into(&handle, &mut o).await.unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::ItemNotFound);
    Ok(())
}

#[tokio::test]
async fn item_that_does_not_fit_the_struct() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    PutRequest::new("orders")
        .value(
            MapValue::new()
                .str("customer", "c1")
                .str("id", "o-2")
                .str("total", "twelve"),
        )
        .execute(&handle)
        .await?;
    let mut o = Order::default();
    let err = GetRequest::new("orders")
        .key(MapValue::new().str("customer", "c1").str("id", "o-2"))
        .execute_into(&handle, &mut o)
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::Deserialization);
    Ok(())
}

#[tokio::test]
async fn query_all_pages() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    for i in 0..5 {
        PutRequest::new("orders")
            .put(&order("c1", &format!("o-{}", i), i as f64))?
            .execute(&handle)
            .await?;
    }
    PutRequest::new("orders")
        .put(&order("c2", "o-9", 1.0))?
        .execute(&handle)
        .await?;

    let mut qreq = QueryRequest::new("orders", "customer = :c")
        .expression_attribute_value(":c", "c1")
        .limit(2);
    let mut ids = Vec::new();
    let mut pages = 0;
    loop {
        let res = qreq.execute(&handle).await?;
        pages += 1;
        assert!(res.count() <= 2);
        for item in res.items() {
            ids.push(item.get_string("id").unwrap_or_default());
        }
        match res.last_evaluated_key() {
            Some(k) => qreq = qreq.start_key(k.clone()),
            None => break,
        }
    }
    assert_eq!(pages, 3);
    assert_eq!(ids, vec!["o-0", "o-1", "o-2", "o-3", "o-4"]);

    let rows: Vec<Order> = QueryRequest::new("orders", "customer = :c")
        .expression_attribute_value(":c", "c2")
        .execute_into(&handle)
        .await?;
    assert_eq!(rows, vec![order("c2", "o-9", 1.0)]);
    Ok(())
}

#[tokio::test]
async fn update_and_delete() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    let key = MapValue::new().str("customer", "c1").str("id", "o-1");
    PutRequest::new("orders")
        .put(&order("c1", "o-1", 3.0))?
        .execute(&handle)
        .await?;

    UpdateRequest::new("orders", key.clone())
        .update_expression("SET note = :n")
        .expression_attribute_value(":n", "gift wrap")
        .execute(&handle)
        .await?;
    let mut o = Order::default();
    GetRequest::new("orders")
        .key(key.clone())
        .execute_into(&handle, &mut o)
        .await?;
    assert_eq!(o.note, Some("gift wrap".to_string()));

    DeleteRequest::new("orders", key.clone()).execute(&handle).await?;
    let res = GetRequest::new("orders").key(key.clone()).execute(&handle).await?;
    assert!(res.item().is_none());

    let err = UpdateRequest::new("orders", key)
        .update_expression("SET note = :n")
        .expression_attribute_value(":n", "late")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::GeneralError);
    assert_eq!(err.message, "The conditional request failed");
    Ok(())
}

#[tokio::test]
async fn requests_are_signed_and_framed() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    assert_eq!(handle.region(), "us-west-2");
    GetRequest::new("orders")
        .key(MapValue::new().str("customer", "c1").str("id", "o-1"))
        .execute(&handle)
        .await?;

    let reqs = fake.0.requests();
    assert_eq!(reqs.len(), 1);
    let r = &reqs[0];
    assert!(r.url.starts_with("http://localhost:8000"));
    let header = |name: &str| {
        r.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(header("x-amz-target"), "DynamoDB_20120810.GetItem");
    assert_eq!(header("content-type"), "application/x-amz-json-1.0");
    assert_eq!(header("host"), "localhost:8000");
    assert!(!header("x-amz-date").is_empty());
    let auth = header("authorization");
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(auth.contains("/us-west-2/dynamodb/aws4_request"));
    assert!(auth.contains("x-amz-target"));

    let body: Value = serde_json::from_slice(&r.body)?;
    assert_eq!(
        body,
        json!({
            "TableName": "orders",
            "Key": {"customer": {"S": "c1"}, "id": {"S": "o-1"}},
            "ConsistentRead": false
        })
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn throttled_requests_are_retried() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    fake.0.throttle_next.store(3, Ordering::SeqCst);

    let start = tokio::time::Instant::now();
    PutRequest::new("orders")
        .put(&order("c1", "o-1", 1.0))?
        .execute(&handle)
        .await?;
    assert_eq!(start.elapsed(), Duration::from_millis(50 + 100 + 200));

    let reqs = fake.0.requests();
    assert_eq!(reqs.len(), 4);
    for r in &reqs[1..] {
        assert_eq!(r.body, reqs[0].body);
        assert_eq!(r.headers, reqs[0].headers);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn retry_ceiling_is_configurable() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_builder(&fake)?
        .retry_base_delay(Duration::from_millis(100))?
        .retry_max_delay(Duration::from_millis(500))?
        .build()
        .await?;
    fake.0.throttle_next.store(100, Ordering::SeqCst);

    let err = GetRequest::new("orders")
        .key(MapValue::new().str("customer", "c1").str("id", "o-1"))
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::Throttling);
    // 100, 200, 400, then 800 would reach the ceiling
    assert_eq!(fake.0.requests().len(), 4);
    Ok(())
}

#[tokio::test]
async fn service_errors_are_returned() -> Result<(), Box<dyn Error>> {
    let fake = SharedFake::default();
    let handle = get_handle(&fake).await?;
    let err = ScanRequest::new("orders").execute(&handle).await.unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::GeneralError);
    assert!(err.message.contains("not supported"));
    assert_eq!(fake.0.requests().len(), 1);

    // invalid requests never reach the transport
    let err = QueryRequest::new("orders", "")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::IllegalArgument);
    assert_eq!(fake.0.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn build_requires_credentials() {
    let err = Handle::builder()
        .endpoint("http://localhost:8000")
        .unwrap()
        .transport(Arc::new(SharedFake::default()))
        .unwrap()
        .build()
        .await
        .unwrap_err();
    assert_eq!(err.code, DynamoErrorCode::IllegalArgument);
}

#[tokio::test]
async fn endpoint_from_region() -> Result<(), Box<dyn Error>> {
    let handle = Handle::builder()
        .region("eu-west-1")?
        .credentials(Box::new(SimpleCredentialsProvider::new(
            "AKID".to_string(),
            "secret".to_string(),
            Some("token".to_string()),
            String::new(),
        )))?
        .transport(Arc::new(SharedFake::default()))?
        .build()
        .await?;
    assert_eq!(handle.endpoint(), "https://dynamodb.eu-west-1.amazonaws.com/");
    assert_eq!(handle.region(), "eu-west-1");
    Ok(())
}
