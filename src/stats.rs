use crate::models::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one category (geography code or series label).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub category: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Mean of all present values in the table, `None` when there are none.
pub fn mean(table: &Table) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in table.values() {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Format a mean for display with two decimals, `"NA"` when absent.
pub fn format_mean(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.2}", x),
        _ => "NA".to_string(),
    }
}

/// Compute grouped statistics per category.
pub fn grouped_summary(table: &Table) -> Vec<Summary> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut missing: BTreeMap<String, usize> = BTreeMap::new();
    for row in &table.rows {
        match row.value {
            Some(v) => groups.entry(row.category.clone()).or_default().push(v),
            None => *missing.entry(row.category.clone()).or_default() += 1,
        }
    }

    let mut out = Vec::new();
    for (category, mut vals) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        let miss = missing.remove(&category).unwrap_or(0);
        out.push(Summary {
            category,
            count,
            missing: miss,
            min,
            max,
            mean,
            median,
        });
    }
    // Categories with only missing values still show up in the summary.
    for (category, miss) in missing {
        out.push(Summary {
            category,
            count: 0,
            missing: miss,
            min: None,
            max: None,
            mean: None,
            median: None,
        });
    }
    out.sort_by(|a, b| a.category.cmp(&b.category));
    out
}
