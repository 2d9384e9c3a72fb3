//! Normalization of source-specific payloads into the canonical [`Table`].
//!
//! Each fetch path gets its own adapter:
//!
//! - [`eurostat_table`] expands a JSON-stat 2.0 dataset's dimension space
//!   into one row per (time, geo) coordinate.
//! - [`csv_table`] parses the SDMX CSV body.
//! - [`cso_table`] reads the JSON-RPC `result.data` records, applying a
//!   [`RenameMap`] and deriving a `date` from separate year/month fields.
//!
//! Absent expected columns surface as [`Error::MissingColumns`] rather than a
//! panic; the presenter turns that into a warning.

use crate::error::{Error, Result};
use crate::models::{EurostatDataset, Observation, RenameMap, RpcDataset, Table};
use chrono::NaiveDate;
use serde_json::Value;

/// Expansion cap for JSON-stat dimension spaces, to avoid pathological jobs.
const MAX_CELLS: usize = 1_000_000;

/// Category assigned when the source has no usable category/geo column.
const DEFAULT_CATEGORY: &str = "all";

/// First day of the given (year, month), e.g. (2024, 3) → 2024-03-01.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parse a statistical time period into the date that starts it.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and SDMX quarters (`YYYY-Qn`).
pub fn parse_period(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Some((y, rest)) = s.split_once('-') {
        let year: i32 = y.parse().ok()?;
        if let Some(q) = rest.strip_prefix('Q').or_else(|| rest.strip_prefix('q')) {
            let quarter: u32 = q.parse().ok()?;
            if !(1..=4).contains(&quarter) {
                return None;
            }
            return first_of_month(year, (quarter - 1) * 3 + 1);
        }
        let month: u32 = rest.parse().ok()?;
        return first_of_month(year, month);
    }
    let year: i32 = s.parse().ok()?;
    first_of_month(year, 1)
}

/// Expand a Eurostat JSON-stat dataset into the canonical table.
///
/// Requires `time` and `geo` dimensions; other dimensions (freq, unit, …) are
/// walked as well so every stored cell is visited. The category of each row is
/// the geography code, matching what the dashboards plot by.
pub fn eurostat_table(ds: &EurostatDataset) -> Result<Table> {
    let time_pos = ds.id.iter().position(|id| id == "time");
    let geo_pos = ds.id.iter().position(|id| id == "geo");
    let (Some(ti), Some(gi)) = (time_pos, geo_pos) else {
        let missing = [("time", time_pos), ("geo", geo_pos)]
            .into_iter()
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(Error::MissingColumns(missing));
    };
    if ds.id.len() != ds.size.len() {
        return Err(Error::Decode(format!(
            "dimension id/size mismatch: {} ids vs {} sizes",
            ds.id.len(),
            ds.size.len()
        )));
    }

    // Position → code lookup per dimension, inverted from category.index.
    let mut axes: Vec<Vec<String>> = Vec::with_capacity(ds.id.len());
    for (dim_name, dim_size) in ds.id.iter().zip(&ds.size) {
        let dim = ds
            .dimension
            .get(dim_name)
            .ok_or_else(|| Error::Decode(format!("dimension `{dim_name}` not described")))?;
        let mut codes = vec![String::new(); *dim_size];
        for (code, pos) in &dim.category.index {
            if *pos < codes.len() {
                codes[*pos] = code.clone();
            }
        }
        axes.push(codes);
    }

    let total: usize = ds.size.iter().product();
    if total > MAX_CELLS {
        return Err(Error::Decode(format!(
            "dataset expands to {total} cells, over the {MAX_CELLS} cap"
        )));
    }

    // Row-major strides over the dimension space.
    let mut strides = vec![1usize; ds.size.len()];
    for i in (0..ds.size.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * ds.size[i + 1];
    }
    let mut rows = Vec::new();
    for flat in 0..total {
        let time_code = &axes[ti][(flat / strides[ti]) % ds.size[ti]];
        let geo_code = &axes[gi][(flat / strides[gi]) % ds.size[gi]];
        let Some(date) = parse_period(time_code) else {
            log::debug!("skipping unparsable time period `{time_code}`");
            continue;
        };
        rows.push(Observation {
            date,
            category: geo_code.clone(),
            value: ds.value.get(&flat.to_string()).copied(),
        });
    }

    Ok(Table {
        label: ds.label.clone(),
        rows,
    })
}

/// Parse an SDMX CSV body (as served by the dissemination endpoint) into the
/// canonical table.
///
/// Header matching is case-insensitive: time comes from `TIME_PERIOD`/`time`,
/// the value from `OBS_VALUE`/`value`, and the category from `geo` when
/// present. Non-numeric values (`:` marks missing) become `None`.
pub fn csv_table(body: &str) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };

    let time_idx = find(&["time_period", "time"]);
    let value_idx = find(&["obs_value", "value"]);
    let geo_idx = find(&["geo"]);

    let mut missing = Vec::new();
    if time_idx.is_none() {
        missing.push("time".to_string());
    }
    if value_idx.is_none() {
        missing.push("value".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }
    let (time_idx, value_idx) = (time_idx.unwrap(), value_idx.unwrap());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(date) = record.get(time_idx).and_then(parse_period) else {
            continue;
        };
        let category = geo_idx
            .and_then(|i| record.get(i))
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();
        // `f64::from_str` accepts literal NaN/inf; those are not plottable
        // numbers, so they count as missing like `:` does.
        let value = record
            .get(value_idx)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        rows.push(Observation {
            date,
            category,
            value,
        });
    }

    Ok(Table { label: None, rows })
}

fn field_i64(record: &serde_json::Map<String, Value>, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field_f64(record: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    let v = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        // String parsing accepts literal NaN/inf; keep only real numbers.
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

/// Build the canonical table from a CSO JSON-RPC `result` payload.
///
/// `renames` maps the source's field names onto `year`, `month`, `value` and
/// optionally `category`; application is idempotent, so records already in
/// the target schema pass through unchanged. The row date is the first day of
/// the record's (year, month).
pub fn cso_table(ds: &RpcDataset, renames: &RenameMap) -> Result<Table> {
    // Presence check on the first record only; the source is trusted to keep
    // a uniform schema within one response.
    if let Some(first) = ds.data.first() {
        let mut probe = first.clone();
        renames.apply(&mut probe);
        let missing: Vec<String> = ["year", "month", "value"]
            .iter()
            .filter(|k| !probe.contains_key(**k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }
    }

    let mut rows = Vec::new();
    for record in &ds.data {
        let mut record = record.clone();
        renames.apply(&mut record);
        let (Some(year), Some(month)) = (field_i64(&record, "year"), field_i64(&record, "month"))
        else {
            log::debug!("skipping record without year/month");
            continue;
        };
        let Some(date) = first_of_month(year as i32, month as u32) else {
            log::debug!("skipping record with out-of-range date {year}-{month}");
            continue;
        };
        let category = match record.get("category") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => DEFAULT_CATEGORY.to_string(),
        };
        rows.push(Observation {
            date,
            category,
            value: field_f64(&record, "value"),
        });
    }

    Ok(Table { label: None, rows })
}
