//! Live API tests, opt-in via `cargo test --features online`.

#![cfg(feature = "online")]

use statline::{normalize, Client, Selection};

#[test]
fn fetch_eurostat_jsonstat_live() {
    let client = Client::default();
    let dataset = client
        .get_dataset(&Selection::new("tag00070", &["IE", "DK", "NL"]))
        .expect("live fetch");
    let table = normalize::eurostat_table(&dataset).expect("normalize");
    assert!(!table.is_empty());
    assert!(table.rows.iter().any(|r| r.category == "IE"));
}

#[test]
fn fetch_eurostat_csv_live() {
    let client = Client::default();
    let body = client.get_dataset_csv("tag00070").expect("live fetch");
    let table = normalize::csv_table(&body).expect("normalize");
    assert!(!table.is_empty());
}
