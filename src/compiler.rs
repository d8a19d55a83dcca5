use crate::aes::Aes;
use crate::ir::{Cell, Figure, Panel, Series, SeriesPoint};
use crate::plot::{point_kinds, Plot, Point};
use crate::scale::{ordinal_scale, OrdinalScale};
use crate::transform::{group_by, summarize};
use crate::value::Kinds;
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Options that shape how a plot is laid out as a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureOptions {
    /// Confidence level for each series' ranges
    pub confidence: f64,
    /// Divide values by a unit prefix. Off for renderers that format their
    /// own ticks.
    pub rescale: bool,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            rescale: false,
        }
    }
}

/// Compile the points of `plot` into a faceted figure.
pub fn compile_figure(plot: &Plot, options: &FigureOptions) -> Result<Figure> {
    let points = plot.points();

    // 1. Only XY line plots are supported
    if points.is_empty() {
        bail!("no data");
    }
    if !point_kinds(points, Aes::X).contains(Kinds::CONTINUOUS) {
        bail!("non-numeric X data not supported");
    }
    if !point_kinds(points, Aes::Y).contains(Kinds::CONTINUOUS) {
        bail!("non-numeric Y data not supported");
    }

    // 2. Facet and color scales
    let rows = ordinal_scale(points, Aes::Row);
    let cols = ordinal_scale(points, Aes::Col);
    let colors = ordinal_scale(points, Aes::Color);

    // 3. Emission order. Lines need X sorted numerically.
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        a.get(Aes::Col)
            .compare(b.get(Aes::Col))
            .then_with(|| a.get(Aes::Row).compare(b.get(Aes::Row)))
            .then_with(|| a.get(Aes::Color).compare(b.get(Aes::Color)))
            .then_with(|| a.get(Aes::X).val.total_cmp(&b.get(Aes::X).val))
    });

    let mut by_cell: HashMap<(usize, usize), Vec<Point>> =
        group_by(&sorted, |pt| (rows.index_of(pt), cols.index_of(pt)))
            .into_iter()
            .collect();

    // 4. Cells, column by column
    let mut cells = Vec::with_capacity(rows.bound() * cols.bound());
    for col in 0..cols.bound() {
        for row in 0..rows.bound() {
            let panel = match by_cell.remove(&(row, col)) {
                Some(pts) => Some(compile_panel(plot, &pts, &colors, options)?),
                None => None,
            };
            cells.push(Cell { row, col, panel });
        }
    }

    tracing::debug!(
        rows = rows.bound(),
        cols = cols.bound(),
        colors = colors.bound(),
        "compiled figure"
    );

    Ok(Figure {
        n_rows: rows.bound(),
        n_cols: cols.bound(),
        log_x: plot.log_scale(Aes::X),
        log_y: plot.log_scale(Aes::Y),
        confidence: options.confidence,
        cells,
    })
}

/// Compile the points of one facet cell. `pts` must be sorted by color.
fn compile_panel(plot: &Plot, pts: &[Point], colors: &OrdinalScale, options: &FigureOptions) -> Result<Panel> {
    let x_scale = plot.continuous_scale(pts, Aes::X, options.rescale)?;
    let y_scale = plot.continuous_scale(pts, Aes::Y, options.rescale)?;

    let mut series = Vec::new();
    for (color, run) in group_by(pts, |pt| pt.get(Aes::Color).clone()) {
        let summarized = summarize(&run, Aes::Y, options.confidence)?;
        let points = summarized
            .iter()
            .map(|pt| {
                let y = pt.get(Aes::Y);
                let range = y
                    .summary
                    .filter(|s| s.has_range())
                    .map(|s| (y_scale.apply(s.lo), y_scale.apply(s.hi)));
                SeriesPoint {
                    x: x_scale.apply(pt.get(Aes::X).val),
                    y: y_scale.apply(y.val),
                    range,
                }
            })
            .collect();
        series.push(Series {
            color: colors.index(&color) + 1,
            title: color.values_string(),
            points,
        });
    }

    Ok(Panel {
        row_label: pts[0].get(Aes::Row).values_string(),
        col_label: pts[0].get(Aes::Col).values_string(),
        x_label: x_scale.label,
        y_label: y_scale.label,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Config;
    use crate::projection::{Field, Projection};
    use crate::record::{Measurement, Record};

    fn make_record(name: &str, goos: &str, metrics: &[(&str, f64)]) -> Record {
        Record {
            config: vec![("goos".to_string(), goos.to_string())],
            full_name: name.to_string(),
            iters: 1,
            values: metrics
                .iter()
                .map(|(u, v)| Measurement {
                    value: *v,
                    unit: u.to_string(),
                    orig_unit: u.to_string(),
                })
                .collect(),
        }
    }

    fn make_plot() -> Plot {
        let mut c = Config::new();
        c.set_iv(Aes::X, Projection::fields(vec![Field::NameKey("/n".into())]));
        c.set_dv(Aes::Y);
        c.set_iv(Aes::Color, Projection::fields(vec![Field::ConfigKey("goos".into())]));
        c.set_iv(Aes::Row, Projection::fields(vec![Field::Unit]));
        Plot::new(&c).unwrap()
    }

    #[test]
    fn test_compile_figure_layout() {
        let mut plot = make_plot();
        for (n, v) in [(2, 20.0), (1, 10.0), (1, 12.0)] {
            plot.add(&make_record(&format!("F/n={}", n), "linux", &[("sec/op", v), ("B/op", 8.0)]));
        }
        plot.add(&make_record("F/n=1", "darwin", &[("sec/op", 30.0)]));

        let fig = compile_figure(&plot, &FigureOptions::default()).unwrap();
        assert_eq!((fig.n_rows, fig.n_cols), (2, 1));
        assert!(fig.is_multiplot());
        assert_eq!(fig.cells.len(), 2);

        // Rows sort by unit: "B/op" < "sec/op".
        let panel = fig.cells[1].panel.as_ref().unwrap();
        assert_eq!(panel.row_label, "sec/op");
        assert_eq!(panel.y_label, "sec/op");
        assert_eq!(panel.x_label, "/n");

        // Colors sort by key: darwin, linux.
        assert_eq!(panel.series.len(), 2);
        assert_eq!(panel.series[0].title, "darwin");
        assert_eq!(panel.series[0].color, 1);
        let linux = &panel.series[1];
        assert_eq!(linux.color, 2);
        let xs: Vec<f64> = linux.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
        assert_eq!(linux.points[0].y, 11.0);
        assert_eq!(linux.points[0].range, None);

        // The B/op row has only linux, but keeps linux's color slot.
        let panel = fig.cells[0].panel.as_ref().unwrap();
        assert_eq!(panel.series.len(), 1);
        assert_eq!(panel.series[0].color, 2);
    }

    #[test]
    fn test_compile_figure_ranges() {
        let mut plot = make_plot();
        for v in [5.0, 1.0, 4.0, 2.0, 3.0, 6.0] {
            plot.add(&make_record("F/n=1", "linux", &[("sec/op", v)]));
        }
        let fig = compile_figure(&plot, &FigureOptions::default()).unwrap();
        assert!(!fig.is_multiplot());
        let panel = fig.cells[0].panel.as_ref().unwrap();
        assert!(panel.any_range());
        assert_eq!(panel.series[0].points[0].range, Some((1.0, 6.0)));
    }

    #[test]
    fn test_compile_figure_empty_cells() {
        let mut c = Config::new();
        c.set_iv(Aes::X, Projection::fields(vec![Field::NameKey("/n".into())]));
        c.set_dv(Aes::Y);
        c.set_iv(Aes::Row, Projection::fields(vec![Field::Unit]));
        c.set_iv(Aes::Col, Projection::fields(vec![Field::ConfigKey("goos".into())]));
        let mut plot = Plot::new(&c).unwrap();
        plot.add(&make_record("F/n=1", "linux", &[("sec/op", 1.0)]));
        plot.add(&make_record("F/n=1", "darwin", &[("B/op", 1.0)]));

        let fig = compile_figure(&plot, &FigureOptions::default()).unwrap();
        assert_eq!((fig.n_rows, fig.n_cols), (2, 2));
        let present: Vec<(usize, usize)> = fig
            .cells
            .iter()
            .filter(|c| c.panel.is_some())
            .map(|c| (c.row, c.col))
            .collect();
        // darwin is column 0 with B/op in row 0; linux is column 1 with sec/op.
        assert_eq!(present, vec![(0, 0), (1, 1)]);
        assert_eq!(fig.panels().count(), 2);
    }

    #[test]
    fn test_compile_figure_errors() {
        let plot = make_plot();
        let err = compile_figure(&plot, &FigureOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "no data");

        let mut c = Config::new();
        c.set_iv(Aes::X, Projection::fields(vec![Field::Name]));
        c.set_dv(Aes::Y);
        c.set_iv(Aes::Row, Projection::fields(vec![Field::Unit]));
        let mut plot = Plot::new(&c).unwrap();
        plot.add(&make_record("F", "linux", &[("sec/op", 1.0)]));
        let err = compile_figure(&plot, &FigureOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "non-numeric X data not supported");
    }

    #[test]
    fn test_compile_figure_rescales() {
        let mut plot = make_plot();
        plot.add(&make_record("F/n=1", "linux", &[("sec/op", 2e-6)]));
        let options = FigureOptions {
            confidence: 0.95,
            rescale: true,
        };
        let fig = compile_figure(&plot, &options).unwrap();
        let panel = fig.cells[0].panel.as_ref().unwrap();
        assert_eq!(panel.y_label, "µsec/op");
        assert!((panel.series[0].points[0].y - 2.0).abs() < 1e-9);
    }
}
