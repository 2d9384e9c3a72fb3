use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// User-chosen dataset and geography filter, as supplied by the CLI or GUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Dataset code in the source catalog (e.g., `tag00070` for Eurostat).
    pub dataset: String,
    /// Geography codes to filter by (e.g., `["IE", "DK", "NL"]`). Empty means
    /// no filter.
    pub geo: Vec<String>,
}

impl Selection {
    pub fn new(dataset: impl Into<String>, geo: &[&str]) -> Self {
        Self {
            dataset: dataset.into(),
            geo: geo.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One observation in the canonical table schema (one row = one value at one
/// date for one category).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    /// Geography code for Eurostat sources, statistic/series label for CSO.
    pub category: String,
    /// `None` marks a missing observation (`:` in Eurostat CSV, absent index
    /// in JSON-stat). Rows without a value are kept for counting but excluded
    /// from plotting.
    pub value: Option<f64>,
}

/// Canonical table produced by the normalizer, regardless of source.
///
/// Never mutated after construction: renames and date derivation happen while
/// building the row vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Display title, when the source provides one (Eurostat dataset label).
    pub label: Option<String>,
    pub rows: Vec<Observation>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// First `n` rows, for data previews.
    pub fn head(&self, n: usize) -> &[Observation] {
        &self.rows[..self.rows.len().min(n)]
    }

    /// Iterator over present (non-missing) values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.value)
    }
}

/// Mapping from source-specific field names to the normalizer's expected
/// names (`year`, `month`, `value`, `category`).
///
/// Application is idempotent: a record whose fields already carry the target
/// names is left unchanged, so re-normalizing normalized data is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap(pub BTreeMap<String, String>);

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `source → target` field rename.
    pub fn map(mut self, source: &str, target: &str) -> Self {
        self.0.insert(source.to_string(), target.to_string());
        self
    }

    /// Rename the fields of one JSON record in place.
    ///
    /// Only fields present under their *source* name are touched; a field
    /// already present under the target name wins and is never overwritten.
    pub fn apply(&self, record: &mut Map<String, Value>) {
        for (source, target) in &self.0 {
            if source == target || record.contains_key(target) {
                continue;
            }
            if let Some(v) = record.remove(source) {
                record.insert(target.clone(), v);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Eurostat JSON-stat 2.0 payload (the "statistics" dissemination endpoint).
// ---------------------------------------------------------------------------

/// Raw Eurostat dataset as served by the JSON-stat 2.0 endpoint.
///
/// The value map is sparse: keys are stringified flat indices into the
/// row-major dimension space described by `id`/`size`.
#[derive(Debug, Clone, Deserialize)]
pub struct EurostatDataset {
    pub label: Option<String>,
    /// Dimension names in storage order (e.g., `["freq","unit","geo","time"]`).
    pub id: Vec<String>,
    /// Dimension sizes, same order as `id`.
    pub size: Vec<usize>,
    pub dimension: HashMap<String, Dimension>,
    #[serde(default)]
    pub value: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    pub label: Option<String>,
    pub category: DimensionCategory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionCategory {
    /// Code → position within the dimension.
    #[serde(default)]
    pub index: HashMap<String, usize>,
    /// Code → human-readable label.
    #[serde(default)]
    pub label: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// CSO PxStat JSON-RPC envelope.
// ---------------------------------------------------------------------------

/// Request envelope for the CSO `getDataset` call.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: RpcParams,
    pub id: u32,
}

impl RpcRequest {
    pub fn get_dataset(dataset_code: &str) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: "getDataset".into(),
            params: RpcParams {
                dataset_code: dataset_code.into(),
            },
            id: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcParams {
    #[serde(rename = "datasetCode")]
    pub dataset_code: String,
}

/// Response envelope: exactly one of `result` / `error` is populated.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub result: Option<RpcDataset>,
    pub error: Option<RpcError>,
}

/// The `result` member: an ordered sequence of flat JSON records.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcDataset {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}
