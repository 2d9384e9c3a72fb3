/*!
 * GUI application for statline - Eurostat/CSO data fetcher and visualizer
 *
 * A cross-platform desktop dashboard providing an intuitive interface for:
 * - Selecting a data source and dataset code
 * - Filtering Eurostat data by country
 * - Charting the normalized table and inspecting raw rows
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use eframe::egui;
use statline::present::{ChartSpec, Report, ReportOptions};
use statline::{Client, RenameMap, Selection, Table, normalize, present, storage};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

/// Raw-data preview size when the checkbox is ticked.
const RAW_PREVIEW_ROWS: usize = 15;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Statistical Datasets - statline"),
        ..Default::default()
    };

    eframe::run_native(
        "Statistical Datasets",
        options,
        Box::new(|_cc| Ok(Box::new(StatlineApp::new()))),
    )
}

/// Main application state
struct StatlineApp {
    // Input fields
    source: Source,
    dataset: String,
    geo_ie: bool,
    geo_dk: bool,
    geo_nl: bool,
    extra_geo: String,

    // Export options
    export_format: ExportFormat,
    output_path: String,
    create_plot: bool,
    plot_format: PlotFormat,
    plot_width: u32,
    plot_height: u32,

    // Display options
    show_raw: bool,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,
    warnings: Vec<String>,
    mean_display: String,
    raw_rows: Vec<String>,

    // Background operation
    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Source {
    EurostatJson,
    EurostatCsv,
    Cso,
}

#[derive(Debug, Clone, PartialEq)]
enum ExportFormat {
    None,
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
enum PlotFormat {
    Png,
    Svg,
}

#[derive(Debug)]
enum OperationResult {
    Success {
        report: Report,
        files: Vec<String>,
    },
    Error(String),
}

impl StatlineApp {
    fn new() -> Self {
        // Default to user's home directory for output
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        Self {
            source: Source::EurostatJson,
            dataset: "tag00070".to_string(),
            geo_ie: true,
            geo_dk: false,
            geo_nl: false,
            extra_geo: String::new(),

            export_format: ExportFormat::None,
            output_path: home_dir,
            create_plot: true,
            plot_format: PlotFormat::Png,
            plot_width: 1000,
            plot_height: 600,

            show_raw: false,

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            warnings: Vec::new(),
            mean_display: String::new(),
            raw_rows: Vec::new(),

            operation_receiver: None,
        }
    }

    fn selected_geo(&self) -> Vec<String> {
        let mut geo = Vec::new();
        if self.geo_ie {
            geo.push("IE".to_string());
        }
        if self.geo_dk {
            geo.push("DK".to_string());
        }
        if self.geo_nl {
            geo.push("NL".to_string());
        }
        geo.extend(parse_list(&self.extra_geo));
        geo
    }

    fn validate_inputs(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            anyhow::bail!("Please enter a dataset code (e.g., tag00070)");
        }

        if self.output_path.trim().is_empty() {
            anyhow::bail!("Please specify an output directory");
        }

        // Validate plot dimensions if creating plot
        if self.create_plot {
            if self.plot_width < 200 || self.plot_width > 3000 {
                anyhow::bail!("Plot width must be between 200 and 3000 pixels");
            }
            if self.plot_height < 200 || self.plot_height > 3000 {
                anyhow::bail!("Plot height must be between 200 and 3000 pixels");
            }
        }

        Ok(())
    }

    fn start_operation(&mut self) {
        if let Err(err) = self.validate_inputs() {
            self.error_message = format!("Validation error: {}", err);
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.warnings.clear();
        self.status_message = "Fetching data...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);

        // Clone the data we need for the background thread
        let source = self.source;
        let selection = Selection {
            dataset: self.dataset.trim().to_string(),
            geo: self.selected_geo(),
        };
        let config = OperationConfig {
            export_format: self.export_format.clone(),
            output_path: self.output_path.clone(),
            plot_config: if self.create_plot {
                Some(PlotConfig {
                    format: self.plot_format.clone(),
                    width: self.plot_width,
                    height: self.plot_height,
                })
            } else {
                None
            },
            preview_rows: if self.show_raw { RAW_PREVIEW_ROWS } else { 0 },
        };

        // Spawn background thread for the operation
        thread::spawn(move || {
            let result = perform_operation(source, selection, config);
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Success { report, files } => {
                    self.status_message = report.status;
                    if !files.is_empty() {
                        self.status_message
                            .push_str(&format!("\nFiles created:\n{}", files.join("\n")));
                    }
                    self.warnings = report.warnings;
                    self.mean_display = report.mean.unwrap_or_default();
                    self.raw_rows = report.preview;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                    self.mean_display.clear();
                    self.raw_rows.clear();
                }
            }
        }
    }
}

impl eframe::App for StatlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_operation_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Eurostat & CSO Statistics Dashboard");
                ui.add_space(10.0);

                // Main input section
                ui.group(|ui| {
                    ui.label("Data Selection");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Source:");
                        ui.radio_value(&mut self.source, Source::EurostatJson, "Eurostat");
                        ui.radio_value(&mut self.source, Source::EurostatCsv, "Eurostat (CSV)");
                        ui.radio_value(&mut self.source, Source::Cso, "CSO (Ireland)");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Dataset code:");
                        ui.text_edit_singleline(&mut self.dataset)
                            .on_hover_text("Eurostat code like tag00070, or a CSO PxStat matrix code");
                    });

                    if self.source == Source::EurostatJson {
                        ui.horizontal(|ui| {
                            ui.label("Select Countries:");
                            ui.checkbox(&mut self.geo_ie, "IE");
                            ui.checkbox(&mut self.geo_dk, "DK");
                            ui.checkbox(&mut self.geo_nl, "NL");
                            ui.text_edit_singleline(&mut self.extra_geo)
                                .on_hover_text("More geo codes separated by commas (e.g., DE,FR)");
                        });
                    }
                });

                ui.add_space(10.0);

                // Export options section
                ui.group(|ui| {
                    ui.label("Output Options");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Export:");
                        ui.radio_value(&mut self.export_format, ExportFormat::None, "None");
                        ui.radio_value(&mut self.export_format, ExportFormat::Csv, "CSV");
                        ui.radio_value(&mut self.export_format, ExportFormat::Json, "JSON");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Output path:");
                        ui.text_edit_singleline(&mut self.output_path);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.output_path = path.to_string_lossy().to_string();
                        }
                    });

                    ui.checkbox(&mut self.create_plot, "Create chart");

                    if self.create_plot {
                        ui.horizontal(|ui| {
                            ui.label("Chart format:");
                            ui.radio_value(&mut self.plot_format, PlotFormat::Png, "PNG");
                            ui.radio_value(&mut self.plot_format, PlotFormat::Svg, "SVG");
                        });

                        ui.horizontal(|ui| {
                            ui.label("Dimensions:");
                            ui.add(egui::DragValue::new(&mut self.plot_width).range(200..=3000));
                            ui.label("×");
                            ui.add(egui::DragValue::new(&mut self.plot_height).range(200..=3000));
                            ui.label("pixels");
                        });
                    }

                    ui.checkbox(&mut self.show_raw, "Show raw data");
                });

                ui.add_space(15.0);

                // Action buttons
                ui.horizontal(|ui| {
                    if ui.add_enabled(!self.is_loading, egui::Button::new("Fetch Data")).clicked() {
                        self.start_operation();
                    }

                    if self.is_loading {
                        ui.spinner();
                        ui.label("Processing...");
                    }
                });

                ui.add_space(10.0);

                // Status messages
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }

                if !self.mean_display.is_empty() {
                    ui.label(format!("Mean value: {}", self.mean_display));
                }

                for warning in &self.warnings {
                    ui.colored_label(egui::Color32::GOLD, warning);
                }

                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }

                if self.show_raw && !self.raw_rows.is_empty() {
                    ui.add_space(10.0);
                    ui.group(|ui| {
                        ui.label("Raw data");
                        for row in &self.raw_rows {
                            ui.monospace(row);
                        }
                    });
                }
            });
        });
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[derive(Debug)]
struct OperationConfig {
    export_format: ExportFormat,
    output_path: String,
    plot_config: Option<PlotConfig>,
    preview_rows: usize,
}

#[derive(Debug)]
struct PlotConfig {
    format: PlotFormat,
    width: u32,
    height: u32,
}

fn perform_operation(
    source: Source,
    selection: Selection,
    config: OperationConfig,
) -> OperationResult {
    // Fetch + normalize
    let client = Client::default();
    let result: statline::Result<Table> = match source {
        Source::EurostatJson => client
            .get_dataset(&selection)
            .and_then(|ds| normalize::eurostat_table(&ds)),
        Source::EurostatCsv => client
            .get_dataset_csv(&selection.dataset)
            .and_then(|body| normalize::csv_table(&body)),
        Source::Cso => client
            .get_cso_dataset(&selection.dataset)
            .and_then(|ds| normalize::cso_table(&ds, &RenameMap::new())),
    };

    let mut output_files = Vec::new();
    let output_dir = PathBuf::from(&config.output_path);

    // Export data
    if let Ok(table) = &result {
        match config.export_format {
            ExportFormat::Csv => {
                let csv_path = output_dir.join("statline_data.csv");
                if let Err(err) = storage::save_csv(table, &csv_path) {
                    return OperationResult::Error(format!("Failed to save CSV: {}", err));
                }
                output_files.push(csv_path.to_string_lossy().to_string());
            }
            ExportFormat::Json => {
                let json_path = output_dir.join("statline_data.json");
                if let Err(err) = storage::save_json(table, &json_path) {
                    return OperationResult::Error(format!("Failed to save JSON: {}", err));
                }
                output_files.push(json_path.to_string_lossy().to_string());
            }
            ExportFormat::None => {}
        }
    }

    let chart = config.plot_config.as_ref().map(|plot| {
        let extension = match plot.format {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        };
        ChartSpec {
            path: output_dir.join(format!("statline_chart.{}", extension)),
            width: plot.width,
            height: plot.height,
        }
    });

    let opts = ReportOptions {
        preview_rows: config.preview_rows,
        // Only the CSO dashboards surface the scalar metric.
        show_mean: source == Source::Cso,
        chart,
    };

    let report = present::report_result(result, &opts);
    if let Some(path) = &report.chart {
        output_files.push(path.to_string_lossy().to_string());
    }

    OperationResult::Success {
        report,
        files: output_files,
    }
}
