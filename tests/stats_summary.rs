use chrono::NaiveDate;
use statline::models::{Observation, Table};
use statline::stats::{format_mean, grouped_summary, mean};

fn obs(category: &str, year: i32, month: u32, v: Option<f64>) -> Observation {
    Observation {
        date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
        category: category.into(),
        value: v,
    }
}

fn table(rows: Vec<Observation>) -> Table {
    Table { label: None, rows }
}

#[test]
fn mean_formats_with_two_decimals() {
    let t = table(vec![
        obs("IE", 2020, 1, Some(10.0)),
        obs("IE", 2020, 2, Some(12.0)),
        obs("IE", 2020, 3, Some(14.0)),
    ]);
    assert_eq!(mean(&t), Some(12.0));
    assert_eq!(format_mean(mean(&t)), "12.00");
}

#[test]
fn mean_skips_missing_and_handles_empty() {
    let t = table(vec![
        obs("IE", 2020, 1, Some(10.0)),
        obs("IE", 2020, 2, None),
        obs("IE", 2020, 3, Some(12.0)),
    ]);
    assert_eq!(mean(&t), Some(11.0));
    assert_eq!(format_mean(mean(&t)), "11.00");

    assert_eq!(mean(&table(vec![])), None);
    assert_eq!(format_mean(None), "NA");
}

#[test]
fn grouped_stats_handle_missing_and_median_even_odd() {
    // Two groups: IE with values [1,2,3,4] -> median = (2+3)/2 = 2.5
    //             DK with [10, None, 30] -> missing = 1, median = 20
    let t = table(vec![
        obs("IE", 2018, 1, Some(1.0)),
        obs("IE", 2019, 1, Some(2.0)),
        obs("IE", 2020, 1, Some(3.0)),
        obs("IE", 2021, 1, Some(4.0)),
        obs("DK", 2018, 1, Some(10.0)),
        obs("DK", 2019, 1, None),
        obs("DK", 2020, 1, Some(30.0)),
    ]);
    let got = grouped_summary(&t);
    assert_eq!(got.len(), 2);

    let dk = &got[0];
    assert_eq!(dk.category, "DK");
    assert_eq!(dk.count, 2);
    assert_eq!(dk.missing, 1);
    assert_eq!(dk.min, Some(10.0));
    assert_eq!(dk.max, Some(30.0));
    assert_eq!(dk.mean.unwrap(), 20.0);
    assert_eq!(dk.median.unwrap(), 20.0);

    let ie = &got[1];
    assert_eq!(ie.category, "IE");
    assert_eq!(ie.count, 4);
    assert_eq!(ie.missing, 0);
    assert_eq!(ie.min, Some(1.0));
    assert_eq!(ie.max, Some(4.0));
    assert!((ie.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((ie.median.unwrap() - 2.5).abs() < 1e-9);
}

#[test]
fn nan_values_do_not_panic_the_summary() {
    // Defense in depth: even if a NaN slips past normalization, the sort
    // must stay total instead of unwrapping a failed comparison.
    let t = table(vec![
        obs("IE", 2020, 1, Some(f64::NAN)),
        obs("IE", 2020, 2, Some(1.0)),
    ]);
    let got = grouped_summary(&t);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].count, 2);
    assert_eq!(got[0].min, Some(1.0));
}

#[test]
fn all_missing_category_still_listed() {
    let t = table(vec![obs("NL", 2020, 1, None), obs("NL", 2020, 2, None)]);
    let got = grouped_summary(&t);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].category, "NL");
    assert_eq!(got[0].count, 0);
    assert_eq!(got[0].missing, 2);
    assert_eq!(got[0].mean, None);
}
