//! statline
//!
//! A lightweight Rust library for retrieving, normalizing, visualizing and
//! summarizing statistical datasets from Eurostat and Ireland's CSO.
//! Pairs with the `statline` CLI and the `statline-gui` desktop dashboard.
//!
//! ### Features
//! - Fetch Eurostat datasets (JSON-stat 2.0 or raw SDMX CSV) and CSO PxStat
//!   datasets (JSON-RPC `getDataset`)
//! - Normalize every source into one canonical (date, category, value) table
//! - Quick summary statistics (mean, grouped min/max/median)
//! - Generate SVG/PNG line charts from the data
//!
//! ### Example
//! ```no_run
//! use statline::{Client, Selection};
//!
//! let client = Client::default();
//! let dataset = client.get_dataset(&Selection::new("tag00070", &["IE", "DK", "NL"]))?;
//! let table = statline::normalize::eurostat_table(&dataset)?;
//! statline::viz::plot_lines(&table, "tag00070.svg", 1000, 600)?;
//! println!("mean = {}", statline::stats::format_mean(statline::stats::mean(&table)));
//! # Ok::<(), statline::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod normalize;
pub mod present;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::Client;
pub use error::{Error, Result};
pub use models::{Observation, RenameMap, Selection, Table};
