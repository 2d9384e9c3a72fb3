use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use statline::present::{ChartSpec, ReportOptions};
use statline::{Client, RenameMap, Selection, Table, normalize, present, stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statline",
    version,
    about = "Fetch, visualize & summarize Eurostat and CSO statistical datasets"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a Eurostat dataset (and optionally save, plot, and print stats).
    Eurostat(EurostatArgs),
    /// Fetch a CSO PxStat dataset via JSON-RPC; always reports the mean.
    Cso(CsoArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Save the normalized table to a file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Number of preview rows to print (0 disables).
    #[arg(long, default_value_t = 5)]
    preview: usize,
    /// Print grouped statistics per category.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct EurostatArgs {
    /// Eurostat dataset code (e.g., tag00070)
    #[arg(short, long)]
    dataset: String,
    /// Geography codes separated by comma or semicolon (e.g., IE,DK,NL)
    #[arg(short, long)]
    geo: Option<String>,
    /// Use the raw SDMX CSV endpoint instead of the JSON-stat one.
    /// The geo filter does not apply on this path.
    #[arg(long, default_value_t = false)]
    csv: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct CsoArgs {
    /// CSO dataset code
    #[arg(short, long)]
    dataset: String,
    /// Field renames as source=target pairs (targets: year, month, value, category)
    #[arg(long, value_name = "SRC=DST")]
    rename: Vec<String>,
    #[command(flatten)]
    output: OutputArgs,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_renames(pairs: &[String]) -> Result<RenameMap> {
    let mut map = RenameMap::new();
    for pair in pairs {
        let (src, dst) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid --rename `{pair}`, expected SRC=DST"))?;
        map = map.map(src.trim(), dst.trim());
    }
    Ok(map)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Eurostat(args) => cmd_eurostat(args),
        Command::Cso(args) => cmd_cso(args),
    }
}

fn cmd_eurostat(args: EurostatArgs) -> Result<()> {
    let client = Client::default();
    let geo = args.geo.as_deref().map(parse_list).unwrap_or_default();
    let selection = Selection {
        dataset: args.dataset.clone(),
        geo,
    };

    let result: statline::Result<Table> = if args.csv {
        client
            .get_dataset_csv(&selection.dataset)
            .and_then(|body| normalize::csv_table(&body))
    } else {
        client
            .get_dataset(&selection)
            .and_then(|ds| normalize::eurostat_table(&ds))
    };

    finish(result, &args.output, false)
}

fn cmd_cso(args: CsoArgs) -> Result<()> {
    let client = Client::default();
    let renames = parse_renames(&args.rename)?;

    let result: statline::Result<Table> = client
        .get_cso_dataset(&args.dataset)
        .and_then(|ds| normalize::cso_table(&ds, &renames));

    finish(result, &args.output, true)
}

/// Shared tail of both subcommands: export, stats, report, print.
fn finish(result: statline::Result<Table>, output: &OutputArgs, show_mean: bool) -> Result<()> {
    if let Ok(table) = &result {
        if let Some(path) = output.out.as_ref() {
            let fmt = match output.format {
                Some(OutFormat::Csv) => "csv",
                Some(OutFormat::Json) => "json",
                None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
            }
            .to_ascii_lowercase();
            match fmt.as_str() {
                "csv" => storage::save_csv(table, path)?,
                "json" => storage::save_json(table, path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} rows to {}", table.len(), path.display());
        }

        if output.stats {
            for s in stats::grouped_summary(table) {
                println!(
                    "{}  count={} missing={}  min={} max={} mean={} median={}",
                    s.category,
                    s.count,
                    s.missing,
                    fmt_opt(s.min),
                    fmt_opt(s.max),
                    fmt_opt(s.mean),
                    fmt_opt(s.median)
                );
            }
        }
    }

    let opts = ReportOptions {
        preview_rows: output.preview,
        show_mean,
        chart: output.plot.as_ref().map(|p| ChartSpec {
            path: p.clone(),
            width: output.width,
            height: output.height,
        }),
    };
    let report = present::report_result(result, &opts);

    println!("{}", report.status);
    for line in &report.preview {
        println!("{line}");
    }
    if let Some(mean) = &report.mean {
        println!("Mean value: {mean}");
    }
    if let Some(chart) = &report.chart {
        eprintln!("Wrote plot to {}", chart.display());
    }
    for warning in &report.warnings {
        eprintln!("{warning}");
    }

    Ok(())
}
