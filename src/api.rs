//! Synchronous clients for the **Eurostat dissemination API** and the
//! **CSO PxStat JSON-RPC API**.
//!
//! Three fetch paths are supported, all blocking, all one request per call
//! (no retries, no pagination):
//!
//! - `get_dataset` — Eurostat JSON-stat 2.0 (`statistics/1.0/data/{code}`),
//!   with an optional `geo` filter. This mirrors the dedicated Eurostat
//!   client-library path of the dashboards this crate replaces.
//! - `get_dataset_csv` — Eurostat SDMX CSV
//!   (`sdmx/2.1/data/{code}/all?format=csv`), returning the raw body.
//! - `get_cso_dataset` — POST of a `getDataset` JSON-RPC envelope to the CSO
//!   endpoint.
//!
//! Every failure maps to exactly one typed [`Error`]: transport problems to
//! `Network`, non-200 statuses to `Status`, malformed bodies to `Decode`,
//! and JSON-RPC `error` members to `Rpc`.

use crate::error::{Error, Result};
use crate::models::{EurostatDataset, RpcDataset, RpcRequest, RpcResponse, Selection};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Eurostat dissemination service version.
pub const VERSION: &str = "1.0";
/// Only json is currently served by the statistics endpoint.
pub const FORMAT: &str = "json";
/// Response language for labels.
pub const LANGUAGE: &str = "en";

// Allow -, _, . unescaped in codes (common for dataset ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL of the Eurostat dissemination API.
    pub eurostat_base: String,
    /// Full URL of the CSO JSON-RPC endpoint.
    pub cso_endpoint: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("statline/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            eurostat_base: "https://ec.europa.eu/eurostat/api/dissemination".into(),
            cso_endpoint: "https://ws.cso.ie/public/api.jsonrpc".into(),
            http,
        }
    }
}

impl Client {
    /// Override the Eurostat base URL (local servers in tests).
    pub fn with_eurostat_base(mut self, base: impl Into<String>) -> Self {
        self.eurostat_base = base.into();
        self
    }

    /// Override the CSO JSON-RPC endpoint.
    pub fn with_cso_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.cso_endpoint = endpoint.into();
        self
    }

    /// Fetch a Eurostat dataset as JSON-stat 2.0.
    ///
    /// - `selection.dataset`: dataset code (e.g., `"tag00070"`).
    /// - `selection.geo`: geography codes to filter by; repeated as `geo=`
    ///   query parameters. Empty requests the full geography axis.
    ///
    /// ### Errors
    /// - Network/HTTP error
    /// - Non-200 status
    /// - JSON decoding error
    pub fn get_dataset(&self, selection: &Selection) -> Result<EurostatDataset> {
        if selection.dataset.trim().is_empty() {
            return Err(Error::Decode("empty dataset code".into()));
        }
        let mut url = format!(
            "{}/statistics/{}/data/{}?format={}&lang={}",
            self.eurostat_base,
            VERSION,
            enc(&selection.dataset),
            FORMAT,
            LANGUAGE
        );
        for geo in &selection.geo {
            url.push_str(&format!("&geo={}", enc(geo)));
        }
        log::debug!("GET {url}");

        let resp = self.http.get(&url).send()?;
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(Error::Status { code: status, url });
        }
        let body = resp.text()?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("eurostat json-stat payload: {e}")))
    }

    /// Fetch a Eurostat dataset through the raw SDMX CSV endpoint.
    ///
    /// Returns the CSV body as text; parsing happens in the normalizer.
    pub fn get_dataset_csv(&self, dataset: &str) -> Result<String> {
        let url = format!(
            "{}/sdmx/2.1/data/{}/all?format=csv",
            self.eurostat_base,
            enc(dataset)
        );
        log::debug!("GET {url}");

        let resp = self.http.get(&url).send()?;
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(Error::Status { code: status, url });
        }
        Ok(resp.text()?)
    }

    /// Fetch a CSO dataset via the PxStat `getDataset` JSON-RPC call.
    pub fn get_cso_dataset(&self, dataset_code: &str) -> Result<RpcDataset> {
        let envelope = RpcRequest::get_dataset(dataset_code);
        log::debug!("POST {} getDataset {dataset_code}", self.cso_endpoint);

        let resp = self
            .http
            .post(&self.cso_endpoint)
            .header("Content-Type", "application/json")
            .json(&envelope)
            .send()?;
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(Error::Status {
                code: status,
                url: self.cso_endpoint.clone(),
            });
        }
        let body = resp.text()?;
        let decoded: RpcResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("cso json-rpc envelope: {e}")))?;
        if let Some(err) = decoded.error {
            return Err(Error::Rpc(format!("{} (code {})", err.message, err.code)));
        }
        decoded.result.ok_or_else(|| {
            Error::Decode("json-rpc response carries neither result nor error".into())
        })
    }
}
