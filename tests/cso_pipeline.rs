use chrono::NaiveDate;
use statline::models::{RenameMap, RpcResponse};
use statline::{normalize, stats, Error};

fn date(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

#[test]
fn cso_scenario_end_to_end() {
    // The envelope shape the CSO getDataset call answers with.
    let body = r#"{"result":{"data":[
        {"year":2024,"month":1,"value":10},
        {"year":2024,"month":2,"value":12}
    ]}}"#;
    let decoded: RpcResponse = serde_json::from_str(body).unwrap();
    let table = normalize::cso_table(&decoded.result.unwrap(), &RenameMap::new()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].date, date(2024, 1));
    assert_eq!(table.rows[1].date, date(2024, 2));
    assert_eq!(stats::format_mean(stats::mean(&table)), "11.00");
}

#[test]
fn derived_date_is_first_of_month() {
    assert_eq!(normalize::first_of_month(2024, 3), Some(date(2024, 3)));
}

#[test]
fn rename_map_renames_source_fields() {
    let body = r#"{"result":{"data":[
        {"Bliain":2024,"Mí":3,"VALUE":1.5,"Statistic":"New Dwellings"}
    ]}}"#;
    let decoded: RpcResponse = serde_json::from_str(body).unwrap();
    let renames = RenameMap::new()
        .map("Bliain", "year")
        .map("Mí", "month")
        .map("VALUE", "value")
        .map("Statistic", "category");

    let table = normalize::cso_table(&decoded.result.unwrap(), &renames).unwrap();
    assert_eq!(table.rows[0].date, date(2024, 3));
    assert_eq!(table.rows[0].category, "New Dwellings");
    assert_eq!(table.rows[0].value, Some(1.5));
}

#[test]
fn rename_application_is_idempotent() {
    let renames = RenameMap::new()
        .map("Bliain", "year")
        .map("Mí", "month")
        .map("VALUE", "value");

    let mut record = serde_json::json!({"Bliain": 2024, "Mí": 3, "VALUE": 1.5})
        .as_object()
        .unwrap()
        .clone();
    renames.apply(&mut record);
    let once = record.clone();
    renames.apply(&mut record);
    assert_eq!(record, once);

    // A record already in the target schema passes through untouched.
    let mut normalized = serde_json::json!({"year": 2024, "month": 3, "value": 1.5})
        .as_object()
        .unwrap()
        .clone();
    let before = normalized.clone();
    renames.apply(&mut normalized);
    assert_eq!(normalized, before);
}

#[test]
fn records_without_date_fields_are_flagged() {
    let body = r#"{"result":{"data":[{"quarter":"2024Q1","value":10}]}}"#;
    let decoded: RpcResponse = serde_json::from_str(body).unwrap();
    match normalize::cso_table(&decoded.result.unwrap(), &RenameMap::new()) {
        Err(Error::MissingColumns(cols)) => {
            assert_eq!(cols, vec!["year".to_string(), "month".to_string()])
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn non_finite_string_values_count_as_missing() {
    let body = r#"{"result":{"data":[
        {"year":2024,"month":1,"value":"NaN"},
        {"year":2024,"month":2,"value":12}
    ]}}"#;
    let decoded: RpcResponse = serde_json::from_str(body).unwrap();
    let table = normalize::cso_table(&decoded.result.unwrap(), &RenameMap::new()).unwrap();
    assert_eq!(table.rows[0].value, None);
    assert_eq!(stats::format_mean(stats::mean(&table)), "12.00");
}

#[test]
fn string_encoded_numbers_are_accepted() {
    // PxStat serializes some numeric fields as strings.
    let body = r#"{"result":{"data":[{"year":"2024","month":"06","value":"2.75"}]}}"#;
    let decoded: RpcResponse = serde_json::from_str(body).unwrap();
    let table = normalize::cso_table(&decoded.result.unwrap(), &RenameMap::new()).unwrap();
    assert_eq!(table.rows[0].date, date(2024, 6));
    assert_eq!(table.rows[0].value, Some(2.75));
}
