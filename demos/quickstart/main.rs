//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing how a Handle can be shared across
// multiple tasks. It writes a batch of orders for a few customers from several
// tasks at once, reads some of them back, pages through a query, updates one
// order and deletes the rest.
//
// It expects an existing table named "demo_orders" with partition key
// "customer" (S) and sort key "id" (S). With a local instance:
//
//    aws dynamodb create-table --endpoint-url http://localhost:8000 \
//        --table-name demo_orders \
//        --attribute-definitions AttributeName=customer,AttributeType=S AttributeName=id,AttributeType=S \
//        --key-schema AttributeName=customer,KeyType=HASH AttributeName=id,KeyType=RANGE \
//        --billing-mode PAY_PER_REQUEST
//
// To run this example:
//    DYNAMODB_ENDPOINT=http://localhost:8000 AWS_ACCESS_KEY_ID=local \
//        AWS_SECRET_ACCESS_KEY=local cargo run --example quickstart
//
// for extra output:
//    RUST_LOG=debug cargo run --example quickstart
//
// or, for a LOT of tracing output:
//    RUST_LOG=trace cargo run --example quickstart

use dynamodb_client::types::MapValue;
use dynamodb_client::DeleteRequest;
use dynamodb_client::DynamoError;
use dynamodb_client::DynamoRow;
use dynamodb_client::GetRequest;
use dynamodb_client::Handle;
use dynamodb_client::PutRequest;
use dynamodb_client::QueryRequest;
use dynamodb_client::UpdateRequest;
use std::error::Error;
use std::time::Duration;
use tracing::info;

const TABLE: &str = "demo_orders";

#[derive(Default, Debug, DynamoRow)]
struct Order {
    customer: String,
    id: String,
    total: f64,
    quantity: i32,
    tags: Vec<String>,
    #[dynamo(column = "giftNote")]
    gift_note: Option<String>,
}

#[derive(Default, Debug, DynamoRow)]
struct OrderKey {
    customer: String,
    id: String,
}

// This method shows various ways to configure a Handle.
async fn get_handle() -> Result<Handle, DynamoError> {
    // Note: later methods called on this builder will override earlier methods.
    // This allows for setting desired defaults that can be overridden by, for example,
    // .from_environment().
    Handle::builder()
        // Default region, if not given by the environment or a credentials profile:
        .region("us-east-1")?
        //
        // For a local instance:
        // .endpoint("http://localhost:8000")?
        //
        // Using a shared credentials file:
        // .credentials_from_file_with_profile("~/.aws/credentials", "dev")?
        //
        // To read all of the above from environment variables:
        // or, to override above from environment;
        .from_environment()?
        //
        // Optional: set a different default timeout (default is 30 seconds)
        .timeout(Duration::from_secs(15))?
        //
        // Optional: give up on throttled requests sooner (default is 60 seconds)
        .retry_max_delay(Duration::from_secs(10))?
        //
        // Build the handle
        .build()
        .await
}

async fn write_orders(handle: Handle, customer: String, count: usize) -> Result<(), DynamoError> {
    for i in 0..count {
        let order = Order {
            customer: customer.clone(),
            id: format!("order-{:04}", i),
            total: 9.99 * (i + 1) as f64,
            quantity: (i % 3 + 1) as i32,
            tags: vec!["demo".to_string()],
            gift_note: None,
        };
        PutRequest::new(TABLE).put(&order)?.execute(&handle).await?;
    }
    info!("wrote {} orders for {}", count, customer);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .compact()
        .init();

    let handle = get_handle().await?;
    info!("connected to {} ({})", handle.endpoint(), handle.region());

    // The handle is cheap to clone: all clones share the same client.
    let mut tasks = Vec::new();
    for c in ["alice", "bob", "carol"] {
        tasks.push(tokio::spawn(write_orders(handle.clone(), c.to_string(), 25)));
    }
    for t in tasks {
        t.await??;
    }

    // Read one order back into a native struct
    let mut order = Order::default();
    GetRequest::new(TABLE)
        .row_key(&OrderKey {
            customer: "alice".to_string(),
            id: "order-0003".to_string(),
        })?
        .consistent_read(true)
        .execute_into(&handle, &mut order)
        .await?;
    info!("got order: {:?}", order);

    // Add a gift note, but only if the order still exists
    UpdateRequest::new(
        TABLE,
        MapValue::new().str("customer", "alice").str("id", "order-0003"),
    )
    .update_expression("SET #g = :g")
    .condition_expression("attribute_exists(id)")
    .expression_attribute_name("#g", "giftNote")
    .expression_attribute_value(":g", "Happy birthday!")
    .execute(&handle)
    .await?;

    // Page through bob's larger orders, 10 items at a time
    let mut qreq = QueryRequest::new(TABLE, "customer = :c")
        .filter_expression("total > :min")
        .expression_attribute_value(":c", "bob")
        .expression_attribute_value(":min", 100.0)
        .limit(10);
    let mut total = 0;
    loop {
        let res = qreq.execute(&handle).await?;
        info!(
            "query page: count={} scanned={}",
            res.count(),
            res.scanned_count()
        );
        total += res.items().len();
        match res.last_evaluated_key() {
            Some(k) => qreq = qreq.start_key(k.clone()),
            None => break,
        }
    }
    info!("bob has {} orders over 100.00", total);

    // Clean up
    for c in ["alice", "bob", "carol"] {
        let orders: Vec<OrderKey> = QueryRequest::new(TABLE, "customer = :c")
            .expression_attribute_value(":c", c)
            .projection(&["customer", "id"])
            .execute_into(&handle)
            .await?;
        for o in orders {
            DeleteRequest::new(TABLE, MapValue::new().string("customer", o.customer).string("id", o.id))
                .execute(&handle)
                .await?;
        }
    }
    info!("done");
    Ok(())
}
