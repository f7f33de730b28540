//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: POS API → raw JSON snapshots → curated Parquet

use arrow::datatypes::DataType;
use chrono::NaiveDate;
use clap::Parser;
use pos_etl::api::PosApi;
use pos_etl::cli::{Cli, RunPlan, RunSummary, Runner};
use pos_etl::config::ApiConfig;
use pos_etl::output::read_parquet_bytes;
use pos_etl::storage::ObjectStoreClient;
use pos_etl::Dimension;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TODAY: (i32, u32, u32) = (2024, 1, 10);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

fn plan(args: &[&str]) -> RunPlan {
    let mut argv = vec!["pos-etl"];
    argv.extend_from_slice(args);
    RunPlan::from_cli(&Cli::try_parse_from(argv).unwrap(), today()).unwrap()
}

fn api_for(server: &MockServer, dimensions: &[Dimension]) -> PosApi {
    let dimension_urls: HashMap<Dimension, String> = dimensions
        .iter()
        .map(|dim| (*dim, format!("{}/dim/{}", server.uri(), dim.name())))
        .collect();

    PosApi::new(ApiConfig {
        token: "secret".to_string(),
        transactions_url: Some(format!("{}/dash.getTransactions", server.uri())),
        dimension_urls,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn transactions() -> Value {
    json!({
        "response": [
            {
                "transaction_id": "101",
                "spot_id": "1",
                "user_id": "7",
                "date_close": "1704103200000",
                "payed_sum": "4500",
                "products": [
                    {"product_id": "11", "num": "1", "payed_sum": "1500"},
                    {"product_id": "12", "num": "2", "payed_sum": "3000"}
                ]
            },
            {
                "transaction_id": "102",
                "spot_id": "1",
                "user_id": "7",
                "date_close": "",
                "products": []
            }
        ]
    })
}

async fn mount_transactions(server: &MockServer, from: &str, to: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/dash.getTransactions"))
        .and(query_param("token", "secret"))
        .and(query_param("date_from", from))
        .and(query_param("date_to", to))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn curated_rows(store: &ObjectStoreClient, key: &str) -> usize {
    let bytes = store
        .get_bytes(key)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("missing {key}"));
    read_parquet_bytes(bytes)
        .unwrap()
        .iter()
        .map(|b| b.num_rows())
        .sum()
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[tokio::test]
async fn test_full_run_continues_past_failures() {
    let server = MockServer::start().await;

    mount_transactions(
        &server,
        "20240101",
        "20240101",
        ResponseTemplate::new(200).set_body_json(transactions()),
    )
    .await;
    mount_transactions(&server, "20240102", "20240102", ResponseTemplate::new(500)).await;

    Mock::given(method("GET"))
        .and(path("/dim/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [
                {"product_id": "11", "product_name": "Latte", "price": "1500", "category": {"id": "3"}},
                {"product_id": "12", "product_name": "Scone", "price": "", "category": {"id": "4"}}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dim/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dim/employees"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = ObjectStoreClient::in_memory();
    let runner = Runner::new(
        plan(&["--start_date", "2024-01-01", "--end_date", "2024-01-02"]),
        api_for(
            &server,
            &[Dimension::Products, Dimension::Categories, Dimension::Employees],
        ),
        store.clone(),
    );

    let summary = runner.run().await.unwrap();
    assert_eq!(summary.written, 4);
    assert_eq!(summary.empty, 2);
    assert_eq!(summary.missing, 3);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.failures[0].starts_with("extract_sales 2024-01-02"));
    assert!(summary.failures[1].starts_with("extract_dims employees"));

    // Raw snapshot keeps the envelope, including the receipt without products
    let raw = store
        .get_json("raw/sales/sales_2024-01-01.json")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw, transactions());

    // One row per product of receipt 101; receipt 102 is dropped
    assert_eq!(
        curated_rows(
            &store,
            "curated/sales/year=2024/month=1/day=1/sales_2024-01-01.parquet"
        )
        .await,
        2
    );

    // The failed day wrote nothing
    assert!(store
        .get_bytes("raw/sales/sales_2024-01-02.json")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .list(Some("curated/sales/year=2024/month=1/day=2"))
        .await
        .unwrap()
        .is_empty());

    // Dimensions are dated by the run date and stored unwrapped
    let products = store
        .get_json("raw/dimensions/products/products_dim_2024-01-10.json")
        .await
        .unwrap()
        .unwrap();
    assert!(products.is_array());
    assert_eq!(
        curated_rows(&store, "curated/dimensions/products/dt=2024-01-10/products.parquet").await,
        2
    );
}

#[tokio::test]
async fn test_curated_sales_types() {
    let server = MockServer::start().await;
    mount_transactions(
        &server,
        "20240101",
        "20240101",
        ResponseTemplate::new(200).set_body_json(transactions()),
    )
    .await;

    let store = ObjectStoreClient::in_memory();
    Runner::new(
        plan(&["--step", "all", "--start_date", "2024-01-01", "--end_date", "2024-01-01"]),
        api_for(&server, &[]),
        store.clone(),
    )
    .run()
    .await
    .unwrap();

    let bytes = store
        .get_bytes("curated/sales/year=2024/month=1/day=1/sales_2024-01-01.parquet")
        .await
        .unwrap()
        .unwrap();
    let batches = read_parquet_bytes(bytes).unwrap();
    let schema = batches[0].schema();

    assert_eq!(
        schema.field_with_name("receipt_payed_sum").unwrap().data_type(),
        &DataType::Float64
    );
    assert_eq!(
        schema
            .field_with_name("receipt_transaction_id")
            .unwrap()
            .data_type(),
        &DataType::Utf8
    );
    assert_eq!(
        schema.field_with_name("receipt_date_close").unwrap().data_type(),
        &DataType::Int64
    );
}

#[tokio::test]
async fn test_range_mode_writes_one_snapshot() {
    let server = MockServer::start().await;
    mount_transactions(
        &server,
        "20240101",
        "20240103",
        ResponseTemplate::new(200).set_body_json(transactions()),
    )
    .await;

    let store = ObjectStoreClient::in_memory();
    let summary = Runner::new(
        plan(&[
            "--step",
            "all",
            "--start_date",
            "2024-01-01",
            "--end_date",
            "2024-01-03",
            "--as_range",
        ]),
        api_for(&server, &[]),
        store.clone(),
    )
    .run()
    .await
    .unwrap();

    assert!(summary.is_clean());
    assert!(store
        .get_bytes("raw/sales/sales_2024-01-01_2024-01-03.json")
        .await
        .unwrap()
        .is_some());
    assert_eq!(
        curated_rows(&store, "curated/sales/sales_2024-01-01_2024-01-03.parquet").await,
        2
    );
}

#[tokio::test]
async fn test_unexpected_shape_writes_nothing() {
    let server = MockServer::start().await;
    mount_transactions(
        &server,
        "20240109",
        "20240109",
        ResponseTemplate::new(200).set_body_json(json!({"error": {"code": 10}})),
    )
    .await;

    let store = ObjectStoreClient::in_memory();
    let summary = Runner::new(
        plan(&["--step", "extract_sales"]),
        api_for(&server, &[]),
        store.clone(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            empty: 1,
            ..RunSummary::default()
        }
    );
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transform_rerun_is_byte_identical() {
    let server = MockServer::start().await;
    mount_transactions(
        &server,
        "20240109",
        "20240109",
        ResponseTemplate::new(200).set_body_json(transactions()),
    )
    .await;

    let store = ObjectStoreClient::in_memory();
    let api = api_for(&server, &[]);
    let extract = Runner::new(plan(&["--step", "extract_sales"]), api, store.clone());
    extract.run().await.unwrap();

    let key = "curated/sales/year=2024/month=1/day=9/sales_2024-01-09.parquet";
    let transform = Runner::new(
        plan(&["--step", "transform_sales"]),
        api_for(&server, &[]),
        store.clone(),
    );
    transform.run().await.unwrap();
    let first = store.get_bytes(key).await.unwrap().unwrap();
    transform.run().await.unwrap();
    let second = store.get_bytes(key).await.unwrap().unwrap();

    assert_eq!(first, second);
}
