use thiserror::Error;

/// Crate-wide error type.
///
/// Every failure in the fetch → normalize → present pipeline maps to exactly
/// one of these variants, so callers can distinguish "the network broke" from
/// "the dataset is missing the columns we plot by" and degrade accordingly
/// instead of treating an absent table as success.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-200 status.
    #[error("request failed with HTTP {code} for {url}")]
    Status { code: u16, url: String },

    /// The response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The CSO JSON-RPC endpoint returned an error member.
    #[error("cso api error: {0}")]
    Rpc(String),

    /// Expected columns/dimensions are absent from the source data.
    /// The presenter downgrades this to a warning instead of failing the run.
    #[error("missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Chart construction failed. Also downgraded by the presenter.
    #[error("chart error: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
