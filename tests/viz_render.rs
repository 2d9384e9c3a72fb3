use chrono::NaiveDate;
use statline::models::{Observation, Table};
use statline::{viz, Error};
use std::fs;
use tempfile::tempdir;

fn sample_table() -> Table {
    let mut rows = Vec::new();
    // Series 1: IE
    for (m, v) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
        rows.push(Observation {
            date: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            category: "IE".into(),
            value: Some(v),
        });
    }
    // Series 2: DK
    for (m, v) in [(1, 2.0), (2, 2.5), (3, 3.5)] {
        rows.push(Observation {
            date: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            category: "DK".into(),
            value: Some(v),
        });
    }
    Table {
        label: Some("Demo series".into()),
        rows,
    }
}

#[test]
fn renders_svg_line_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    viz::plot_lines(&sample_table(), &path, 800, 500).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("<svg"));
    assert!(contents.len() > 500);
}

#[test]
fn single_date_still_renders() {
    // Only one distinct date: the x range is widened instead of collapsing.
    let table = Table {
        label: None,
        rows: vec![
            Observation {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                category: "IE".into(),
                value: Some(5.0),
            },
            Observation {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                category: "DK".into(),
                value: Some(6.0),
            },
        ],
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("single.svg");
    viz::plot_lines(&table, &path, 400, 300).unwrap();
    assert!(path.exists());
}

#[test]
fn empty_table_is_a_plot_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.svg");
    match viz::plot_lines(&Table::default(), &path, 400, 300) {
        Err(Error::Plot(msg)) => assert!(msg.contains("no data")),
        other => panic!("expected Plot error, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn all_missing_values_is_a_plot_error() {
    let table = Table {
        label: None,
        rows: vec![Observation {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: "IE".into(),
            value: None,
        }],
    };
    let dir = tempdir().unwrap();
    match viz::plot_lines(&table, dir.path().join("missing.svg"), 400, 300) {
        Err(Error::Plot(msg)) => assert!(msg.contains("no numeric values")),
        other => panic!("expected Plot error, got {other:?}"),
    }
}
