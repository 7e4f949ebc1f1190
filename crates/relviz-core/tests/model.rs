//! End-to-end resolution scenarios over an in-memory catalog.

use std::sync::Arc;

use relviz_core::{CatalogModel, ColumnRow, KeyKind, MemoryCatalogSource};
use serde_json::{Value, json};

fn not_null(mut row: ColumnRow) -> ColumnRow {
    row.nullable = false;
    row
}

fn keyed(row: ColumnRow, key: KeyKind) -> ColumnRow {
    let mut row = not_null(row);
    row.key = key;
    row
}

/// `shop` with `orders(id PK, customer_id FK -> customers.id)` and
/// `customers(id PK)`.
fn shop_source() -> MemoryCatalogSource {
    let mut source = MemoryCatalogSource::new();
    source.add_table("shop", "orders", None);
    source.add_table("shop", "customers", None);
    source.add_column("shop", "orders", keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary));
    source.add_column(
        "shop",
        "orders",
        keyed(ColumnRow::new("customer_id", "int(11)"), KeyKind::Multiple),
    );
    source.add_column(
        "shop",
        "customers",
        keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary),
    );
    source.add_fk_edge("shop", "orders.customer_id", "customers.id");
    source
}

async fn load(source: MemoryCatalogSource) -> CatalogModel {
    CatalogModel::load(Arc::new(source))
        .await
        .expect("in-memory catalog loads")
}

#[tokio::test]
async fn foreign_keys_link_both_directions() {
    let model = load(shop_source()).await;

    let customer_id = model.field("shop", "orders", "customer_id").expect("field exists");
    assert!(customer_id.is_fk);
    assert_eq!(customer_id.fk_reference.as_deref(), Some("customers.id"));

    let id = model.field("shop", "customers", "id").expect("field exists");
    assert!(id.is_referenced);
    assert_eq!(id.referenced_by.as_deref(), Some("orders.customer_id"));

    assert_eq!(model.primary_key("shop", "orders"), Some("id"));
    assert_eq!(model.primary_key("shop", "customers"), Some("id"));
}

#[tokio::test]
async fn timestamp_and_date_columns_are_never_required() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("lab", "samples", None);
    source.add_column("lab", "samples", keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary));
    source.add_column("lab", "samples", not_null(ColumnRow::new("created", "timestamp")));
    source.add_column("lab", "samples", not_null(ColumnRow::new("received", "date")));
    source.add_column("lab", "samples", not_null(ColumnRow::new("barcode", "varchar(45)")));

    let model = load(source).await;
    assert!(!model.field("lab", "samples", "created").expect("field").required);
    assert!(!model.field("lab", "samples", "received").expect("field").required);
    assert!(model.field("lab", "samples", "barcode").expect("field").required);
    assert_eq!(model.required_fields("lab", "samples"), vec!["id", "barcode"]);
}

#[tokio::test]
async fn serialization_preserves_catalog_order() {
    let mut source = MemoryCatalogSource::new();
    for table in ["zebra", "apple", "mango"] {
        source.add_table("inventory", table, None);
        source.add_column(
            "inventory",
            table,
            keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary),
        );
    }

    let model = load(source).await;
    let document = model.to_json().expect("serializes");

    // registration order, not alphabetical order
    assert_eq!(
        document["struct"]["inventory"]["tables"],
        json!(["zebra", "apple", "mango"])
    );
    let keys: Vec<&String> = document["struct"]["inventory"]["struct"]
        .as_object()
        .expect("table map")
        .keys()
        .collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
}

#[tokio::test]
async fn reparsing_the_document_rebuilds_the_same_index() {
    let model = load(shop_source()).await;
    let rendered = serde_json::to_string(&model.to_json().expect("serializes")).expect("renders");
    let reparsed: Value = serde_json::from_str(&rendered).expect("parses back");

    let schema = model.schema("shop").expect("schema exists");
    let tables = reparsed["struct"]["shop"]["struct"]
        .as_object()
        .expect("table map");
    assert_eq!(tables.len(), schema.all_tables().len());
    for name in schema.all_tables() {
        let node = tables.get(name).expect("every table survives the round trip");
        assert_eq!(node["name"], json!(format!("shop.{}", name)));
    }
}

#[tokio::test]
async fn resolving_the_same_snapshot_twice_is_idempotent() {
    let source = shop_source();
    let first = load(source.clone()).await;
    let second = load(source).await;
    assert_eq!(
        first.to_json().expect("serializes"),
        second.to_json().expect("serializes")
    );
}

#[tokio::test]
async fn reserved_system_schemas_are_excluded() {
    let mut source = shop_source();
    source.add_table("information_schema", "TABLES", None);
    source.add_table("performance_schema", "threads", None);

    let model = load(source).await;
    assert_eq!(model.schemas(), ["shop"]);
    assert!(model.schema("information_schema").is_none());
    assert!(model.schema("performance_schema").is_none());
}

#[tokio::test]
async fn an_empty_schema_resolves_to_zero_tables() {
    let mut source = MemoryCatalogSource::new();
    source.add_schema("deserted");

    let model = load(source).await;
    let schema = model.schema("deserted").expect("schema resolves");
    assert!(schema.all_tables().is_empty());
    assert!(model.data_tables("deserted").is_empty());
}

#[tokio::test]
async fn lookups_by_unknown_name_are_explicit_not_found() {
    let model = load(shop_source()).await;

    assert!(model.schema("warehouse").is_none());
    assert!(model.table("shop", "refunds").is_none());
    assert!(model.field("shop", "orders", "tracking_code").is_none());
    assert_eq!(model.primary_key("shop", "refunds"), None);
    assert!(model.required_fields("shop", "refunds").is_empty());
    assert!(model.unique_values("warehouse", "orders").await.is_empty());
    assert!(model.fk_values("shop", "refunds").await.is_empty());
}

#[tokio::test]
async fn a_malformed_comment_does_not_cascade_to_sibling_tables() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("shop", "orders", Some("{this is not json"));
    source.add_table("shop", "customers", Some(r#"{"description": "people who buy"}"#));
    source.add_column("shop", "orders", keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary));
    source.add_column("shop", "customers", keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary));

    let model = load(source).await;
    let schema = model.schema("shop").expect("schema resolves");

    assert_eq!(schema.all_tables(), ["orders", "customers"]);
    assert_eq!(schema.table("orders").expect("resolves").comment, None);
    assert_eq!(schema.table_description("orders"), None);
    assert_eq!(schema.table_description("customers"), Some("people who buy"));
}

#[tokio::test]
async fn hidden_fields_stay_in_the_full_structure_only() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("lab", "samples", None);
    source.add_column("lab", "samples", keyed(ColumnRow::new("_UID", "int(11)"), KeyKind::Primary));
    source.add_column(
        "lab",
        "samples",
        keyed(ColumnRow::new("barcode", "varchar(45)"), KeyKind::Unique),
    );

    let model = load(source).await;
    let schema = model.schema("lab").expect("schema resolves");

    assert_eq!(schema.all_fields("samples"), vec!["_UID", "barcode"]);
    assert_eq!(model.visible_fields("lab", "samples"), vec!["barcode"]);
    assert_eq!(model.unique_fields("lab", "samples"), vec!["barcode"]);
    assert_eq!(model.required_fields("lab", "samples"), vec!["barcode"]);

    // still serialized: hidden is a view policy, not an omission
    let document = model.table_json("lab", "samples").expect("serializes").expect("exists");
    assert_eq!(document["fields"], json!(["_UID", "barcode"]));
    assert_eq!(document["struct"]["_UID"]["hidden"], json!(true));
}

#[tokio::test]
async fn absent_derived_values_serialize_as_null_not_omitted() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("wiki", "notes", None);
    source.add_column("wiki", "notes", ColumnRow::new("body", "text"));

    let model = load(source).await;
    let document = model.table_json("wiki", "notes").expect("serializes").expect("exists");

    assert_eq!(document["primary_key"], Value::Null);
    assert!(document.as_object().expect("object").contains_key("primary_key"));

    let body = &document["struct"]["body"];
    assert_eq!(body["length"], Value::Null);
    assert_eq!(body["fk_reference"], Value::Null);
    assert_eq!(body["referenced_by"], Value::Null);
    assert_eq!(body["default"], Value::Null);
    assert_eq!(body["is_fk"], json!(false));
}

#[tokio::test]
async fn declared_lengths_survive_into_the_document() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("shop", "customers", None);
    source.add_column("shop", "customers", not_null(ColumnRow::new("name", "varchar(45)")));
    source.add_column("shop", "customers", ColumnRow::new("notes", "text"));

    let model = load(source).await;
    let document = model.table_json("shop", "customers").expect("serializes").expect("exists");
    assert_eq!(document["struct"]["name"]["length"], json!(45));
    assert_eq!(document["struct"]["notes"]["length"], Value::Null);
}

#[tokio::test]
async fn a_zero_column_table_resolves_and_keeps_its_leaf_marker() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("shop", "ghost", None);

    let model = load(source).await;
    let table = model.table("shop", "ghost").expect("resolves");
    assert!(table.field_names().is_empty());
    assert_eq!(table.primary_key(), None);

    // the visualization layer treats a node carrying `fields` as a leaf
    let document = model.table_json("shop", "ghost").expect("serializes").expect("exists");
    assert_eq!(document["fields"], json!([]));
}

#[tokio::test]
async fn history_tables_are_excluded_from_data_tables() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("shop", "orders", None);
    source.add_table("shop", "orders_history", None);
    source.add_table("shop", "archive", Some(r#"{"history": true}"#));

    let model = load(source).await;
    let schema = model.schema("shop").expect("schema resolves");
    assert_eq!(schema.all_tables(), ["orders", "orders_history", "archive"]);
    assert_eq!(model.data_tables("shop"), vec!["orders"]);
}

#[tokio::test]
async fn value_enumeration_round_trips_to_the_source() {
    let mut source = shop_source();
    source.add_distinct_values("shop", "customers", "id", vec![json!("1"), json!("2"), json!("3")]);
    source.add_distinct_values("shop", "orders", "id", vec![json!("10"), json!("11")]);

    let model = load(source).await;

    // candidate FK values come from the referenced column
    let fk_values = model.fk_values("shop", "orders").await;
    assert_eq!(fk_values.get("customer_id"), Some(&vec![json!("1"), json!("2"), json!("3")]));

    // unique enumeration covers the visible unique fields
    let unique = model.unique_values("shop", "orders").await;
    assert_eq!(unique.get("id"), Some(&vec![json!("10"), json!("11")]));

    // a non-unique field never enumerates
    assert!(model.distinct_field_values("shop", "orders", "customer_id").await.is_empty());
}

#[tokio::test]
async fn keyed_unique_values_zip_against_the_key_field() {
    let mut source = MemoryCatalogSource::new();
    source.add_table("lab", "samples", None);
    source.add_column("lab", "samples", keyed(ColumnRow::new("id", "int(11)"), KeyKind::Primary));
    source.add_column(
        "lab",
        "samples",
        keyed(ColumnRow::new("barcode", "varchar(45)"), KeyKind::Unique),
    );
    source.add_distinct_values("lab", "samples", "id", vec![json!("1"), json!("2")]);
    source.add_distinct_values("lab", "samples", "barcode", vec![json!("AA"), json!("BB")]);

    let model = load(source).await;
    let keyed_values = model.keyed_unique_values("lab", "samples", "id").await;

    let barcodes = keyed_values.get("barcode").expect("barcode is unique");
    assert_eq!(barcodes.get("1"), Some(&json!("AA")));
    assert_eq!(barcodes.get("2"), Some(&json!("BB")));
}
