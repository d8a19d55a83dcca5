// Runtime: from parsed benchmark input to rendered output

use crate::compiler::{compile_figure, FigureOptions};
use crate::config::PlotOptions;
use crate::gnuplot;
use crate::graph;
use crate::parser::bench::BenchFile;
use crate::plot::Plot;
use crate::{OutputFormat, RenderOptions};
use anyhow::{bail, Result};

/// Build a plot from `input`, applying the unit filter and then the
/// configured transforms.
pub fn build_plot(options: &PlotOptions, input: &BenchFile) -> Result<Plot> {
    let config = options.to_config()?;
    let confidence = options.confidence()?;
    let transforms = options.transforms()?;

    let mut plot = Plot::new(&config)?;
    plot.set_units(input.units.clone());

    // 1. Records, minus the metrics in other units
    let keep = options.unit_filter();
    let mut n_parsed = 0;
    let mut n_unit_filtered = 0;
    for rec in &input.records {
        n_parsed += 1;
        match &keep {
            Some(keep) => {
                let mut rec = rec.clone();
                if !rec.retain_units(keep) {
                    n_unit_filtered += 1;
                    continue;
                }
                plot.add(&rec);
            }
            None => plot.add(rec),
        }
    }

    if n_parsed == 0 {
        bail!("no data");
    }
    if n_unit_filtered == n_parsed {
        bail!("no data has units {}", options.units.join(","));
    }
    if n_unit_filtered > 0 {
        tracing::warn!("{} records did not match -unit", n_unit_filtered);
    }
    tracing::debug!(records = n_parsed, points = plot.points().len(), "built plot");

    // 2. Transforms, in order
    for transform in transforms {
        plot.apply(transform, confidence)?;
        tracing::debug!(transform = transform.name(), points = plot.points().len(), "applied transform");
    }

    Ok(plot)
}

/// Render `plot` in the requested format.
pub fn render_plot(plot: &Plot, options: &RenderOptions, confidence: f64) -> Result<Vec<u8>> {
    // gnuplot scales ticks itself; the plotters renderers want prefixed units.
    let figure_options = FigureOptions {
        confidence,
        rescale: !matches!(options.format, OutputFormat::Gnuplot),
    };
    let figure = compile_figure(plot, &figure_options)?;

    match options.format {
        OutputFormat::Gnuplot => Ok(gnuplot::gnuplot_script(&figure).into_bytes()),
        OutputFormat::Png => graph::render_png(&figure, options.width, options.height),
        OutputFormat::Svg => Ok(graph::render_svg(&figure, options.width, options.height)?.into_bytes()),
    }
}
