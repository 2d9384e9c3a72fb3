use crate::error::{Error, Result};
use crate::models::Table;
use chrono::{Months, NaiveDate};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Map a user-provided locale tag to a num-format Locale.
/// Supported tags (case-insensitive): "en", "de", "fr", "es", "it", "pt", "nl"
fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

fn plot_err<E: std::fmt::Debug>(e: E) -> Error {
    Error::Plot(format!("{e:?}"))
}

/// Render a multi-series line chart (x = date, y = value, one series per
/// category) to SVG or PNG, chosen by the output extension (default locale = "en").
pub fn plot_lines<P: AsRef<Path>>(table: &Table, out_path: P, width: u32, height: u32) -> Result<()> {
    plot_lines_locale(table, out_path, width, height, "en")
}

/// Same as `plot_lines` but with a locale tag for label formatting (e.g., "en" or "de").
pub fn plot_lines_locale<P: AsRef<Path>>(
    table: &Table,
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    if table.is_empty() {
        return Err(Error::Plot("no data to plot".into()));
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    // Rows without a value are excluded from plotting.
    let dates: Vec<NaiveDate> = table
        .rows
        .iter()
        .filter(|r| r.value.is_some())
        .map(|r| r.date)
        .collect();
    let (mut min_date, mut max_date) = match (dates.iter().min(), dates.iter().max()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => return Err(Error::Plot("no numeric values to plot".into())),
    };
    if min_date == max_date {
        min_date = min_date - Months::new(1);
        max_date = max_date + Months::new(1);
    }

    let values: Vec<f64> = table.values().collect();
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    let num_locale = map_locale(locale_tag);
    let caption = table.label.clone().unwrap_or_else(|| "Statistical series".into());

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(
            root, table, &caption, min_date, max_date, min_val, max_val, num_locale,
        )?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(
            root, table, &caption, min_date, max_date, min_val, max_val, num_locale,
        )?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
#[allow(clippy::too_many_arguments)]
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    table: &Table,
    caption: &str,
    min_date: NaiveDate,
    max_date: NaiveDate,
    min_val: f64,
    max_val: f64,
    num_locale: &Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(min_date..max_date, min_val..max_val)
        .map_err(plot_err)?;

    // Axis label formatters: Y uses locale thousands separators; integers only
    let y_label_fmt = |v: &f64| {
        let n = (*v).round() as i64;
        n.to_formatted_string(num_locale)
    };
    let x_label_fmt = |d: &NaiveDate| d.format("%Y-%m").to_string();

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Value")
        .x_labels(10)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    use std::collections::BTreeMap;
    let mut groups: BTreeMap<String, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for row in &table.rows {
        if let Some(v) = row.value {
            groups
                .entry(row.category.clone())
                .or_default()
                .push((row.date, v));
        }
    }
    for series in groups.values_mut() {
        series.sort_by_key(|(d, _)| *d);
    }

    // Distinct color per series, thicker strokes
    for (idx, (category, series)) in groups.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();

        let style = ShapeStyle {
            color: color.clone(),
            filled: false,
            stroke_width: 2,
        };

        chart
            .draw_series(LineSeries::new(series.clone(), style))
            .map_err(plot_err)?
            .label(category.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.clone()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
