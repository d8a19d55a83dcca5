use crate::gnuplot::fmt_g;
use crate::ir::{Figure, Panel};
use anyhow::{bail, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

/// Render `fig` as a PNG, `cell_width` x `cell_height` pixels per facet cell.
pub fn render_png(fig: &Figure, cell_width: u32, cell_height: u32) -> Result<Vec<u8>> {
    let (width, height) = figure_size(fig, cell_width, cell_height)?;
    let len = usize::try_from(u64::from(width) * u64::from(height) * 3)
        .context("figure too large for this platform")?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, fig)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(&buffer, width, height, image::ColorType::Rgb8)
        .context("Failed to encode PNG")?;
    Ok(png_bytes)
}

/// Render `fig` as an SVG document.
pub fn render_svg(fig: &Figure, cell_width: u32, cell_height: u32) -> Result<String> {
    let (width, height) = figure_size(fig, cell_width, cell_height)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_figure(&root, fig)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

/// Largest RGB buffer we are willing to allocate.
const MAX_BUFFER_BYTES: u64 = u32::MAX as u64;

fn figure_size(fig: &Figure, cell_width: u32, cell_height: u32) -> Result<(u32, u32)> {
    let width = u64::from(cell_width).saturating_mul(fig.n_cols.max(1) as u64);
    let height = u64::from(cell_height).saturating_mul(fig.n_rows.max(1) as u64);
    let too_large = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .map_or(true, |n| n > MAX_BUFFER_BYTES);
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if !too_large => Ok((w, h)),
        _ => bail!("figure too large: {}x{} pixels", width, height),
    }
}

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, fig: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    // split_evenly is row-major; cells are column-major.
    let areas = root.split_evenly((fig.n_rows.max(1), fig.n_cols.max(1)));
    for cell in &fig.cells {
        let Some(panel) = &cell.panel else {
            continue;
        };
        let Some(area) = areas.get(cell.row * fig.n_cols + cell.col) else {
            continue;
        };
        draw_panel(area, panel, fig)
            .with_context(|| format!("Failed to draw cell ({}, {})", cell.row, cell.col))?;
    }
    Ok(())
}

fn draw_panel<DB>(area: &DrawingArea<DB, Shift>, panel: &Panel, fig: &Figure) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    // 1. Data ranges in axis coordinates
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for pt in panel.series.iter().flat_map(|s| &s.points) {
        xs.extend(axis_value(pt.x, fig.log_x));
        ys.extend(axis_value(pt.y, fig.log_y));
        if let Some((lo, hi)) = pt.range {
            ys.extend(axis_value(lo, fig.log_y));
            ys.extend(axis_value(hi, fig.log_y));
        }
    }
    let (Some(x_range), Some(y_range)) = (padded_range(&xs), padded_range(&ys)) else {
        tracing::warn!(row = %panel.row_label, col = %panel.col_label, "no plottable points in cell");
        return Ok(());
    };

    // 2. Axes
    let caption = [panel.row_label.as_str(), panel.col_label.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(caption, ("sans-serif", 18))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")?;

    let x_fmt = |v: &f64| tick_label(*v, fig.log_x);
    let y_fmt = |v: &f64| tick_label(*v, fig.log_y);
    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()
        .context("Failed to draw mesh")?;

    // 3. Series: range ribbon, then the center line with its points
    let mut range_labeled = false;
    for series in &panel.series {
        let color = Palette99::pick(series.color.saturating_sub(1)).to_rgba();

        if series.has_range() {
            let mut lower = Vec::new();
            let mut upper = Vec::new();
            for pt in &series.points {
                let Some((lo, hi)) = pt.range else { continue };
                if let (Some(x), Some(lo), Some(hi)) = (
                    axis_value(pt.x, fig.log_x),
                    axis_value(lo, fig.log_y),
                    axis_value(hi, fig.log_y),
                ) {
                    lower.push((x, lo));
                    upper.push((x, hi));
                }
            }
            lower.extend(upper.into_iter().rev());
            let ribbon = chart
                .draw_series(std::iter::once(Polygon::new(lower, color.mix(0.25).filled())))
                .context("Failed to draw range")?;
            if !range_labeled {
                let fill = color.mix(0.25);
                ribbon
                    .label(format!("{}% confidence", fmt_g(fig.confidence * 100.0)))
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled()));
                range_labeled = true;
            }
        }

        let line: Vec<(f64, f64)> = series
            .points
            .iter()
            .filter_map(|pt| Some((axis_value(pt.x, fig.log_x)?, axis_value(pt.y, fig.log_y)?)))
            .collect();
        let drawn = chart
            .draw_series(LineSeries::new(line.clone(), color.stroke_width(2)))
            .context("Failed to draw line series")?;
        if !series.title.is_empty() {
            drawn
                .label(series.title.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
        chart
            .draw_series(line.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
            .context("Failed to draw point series")?;
    }

    // 4. Legend
    if range_labeled || panel.series.iter().any(|s| !s.title.is_empty()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .context("Failed to draw legend")?;
    }

    Ok(())
}

/// Map a data value onto a possibly logarithmic axis. Values a log axis
/// cannot show are dropped.
fn axis_value(v: f64, log_base: u32) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    if log_base == 0 {
        return Some(v);
    }
    if v <= 0.0 {
        return None;
    }
    Some(match log_base {
        2 => v.log2(),
        10 => v.log10(),
        base => v.log(base as f64),
    })
}

fn tick_label(v: f64, log_base: u32) -> String {
    if log_base == 0 {
        fmt_g(v)
    } else {
        fmt_g((log_base as f64).powf(v))
    }
}

/// Bounds of `values` widened by 5% on each side, or by 1 for a single value.
fn padded_range(values: &[f64]) -> Option<Range<f64>> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Some((min - 1.0)..(max + 1.0));
    }
    let padding = (max - min) * 0.05;
    Some((min - padding)..(max + padding))
}
