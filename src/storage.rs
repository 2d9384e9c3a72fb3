use crate::error::Result;
use crate::models::Table;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save observations as CSV with header.
pub fn save_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("date", "category", "value"))?;
    for row in &table.rows {
        wtr.serialize((row.date, &row.category, row.value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&table.rows)
        .map_err(|e| crate::error::Error::Decode(e.to_string()))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, Table};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let table = Table {
            label: None,
            rows: vec![Observation {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                category: "IE".into(),
                value: Some(1.23),
            }],
        };
        save_csv(&table, &csvp).unwrap();
        save_json(&table, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }
}
