// Gnuplot script emission

use crate::ir::{Figure, Panel};
use std::fmt;

/// A figure rendered as a gnuplot script.
pub struct GnuplotScript<'a>(pub &'a Figure);

/// Render `fig` as a self-contained gnuplot script with inline data.
pub fn gnuplot_script(fig: &Figure) -> String {
    GnuplotScript(fig).to_string()
}

impl fmt::Display for GnuplotScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fig = self.0;
        let multiplot = fig.is_multiplot();

        // 1. Preamble
        if multiplot {
            writeln!(
                f,
                "set multiplot layout {},{} columnsfirst margins char 12,1.0,char 4,char 2 spacing char 10, char 4",
                fig.n_rows, fig.n_cols
            )?;
        }
        if fig.log_x != 0 {
            writeln!(f, "set logscale x {}", fig.log_x)?;
        }
        if fig.log_y != 0 {
            writeln!(f, "set logscale y {}", fig.log_y)?;
        }
        // gnuplot puts SI prefixes on the ticks itself.
        writeln!(f, "set format xy '%.0s%c'")?;

        // 2. Cells
        for cell in &fig.cells {
            if let Some(panel) = &cell.panel {
                if multiplot && cell.col == 0 {
                    writeln!(
                        f,
                        "set label 1 {:?} at char 2, graph 0.5 center rotate by 90",
                        panel.row_label
                    )?;
                }
                if multiplot && cell.row == 0 {
                    writeln!(f, "set title {:?}", panel.col_label)?;
                }
                write_panel(f, panel, fig.confidence)?;
            } else {
                writeln!(f, "set multiplot next")?;
            }
            writeln!(f, "unset label 1")?;
            writeln!(f, "unset title")?;
        }

        if multiplot {
            writeln!(f, "unset multiplot")?;
        }
        Ok(())
    }
}

fn write_panel(f: &mut fmt::Formatter<'_>, panel: &Panel, confidence: f64) -> fmt::Result {
    writeln!(f, "set xlabel {:?}", panel.x_label)?;
    writeln!(f, "set ylabel {:?}", panel.y_label)?;

    let mut args = Vec::new();
    let mut data = String::new();
    for series in &panel.series {
        if series.has_range() {
            args.push(format!(
                "'-' using 1:2:3 with filledcurves title '' fc linetype {} fs transparent solid 0.25",
                series.color
            ));
            for pt in &series.points {
                if let Some((lo, hi)) = pt.range {
                    data.push_str(&format!("{} {} {}\n", fmt_g(pt.x), fmt_g(lo), fmt_g(hi)));
                }
            }
            data.push_str("e\n");
        }

        args.push(format!(
            "'-' using 1:2 with lp title {:?} linecolor {}",
            series.title, series.color
        ));
        for pt in &series.points {
            data.push_str(&format!("{} {}\n", fmt_g(pt.x), fmt_g(pt.y)));
        }
        data.push_str("e\n");
    }

    if panel.any_range() {
        args.push(format!(
            "1/0 with filledcurves title '{}% confidence' fc linetype 0 fs transparent solid 0.25",
            fmt_g(confidence * 100.0)
        ));
    }

    writeln!(f, "plot {}", args.join(", "))?;
    f.write_str(&data)
}

/// Shortest `%g` formatting: plain notation for exponents in [-4, 6),
/// otherwise `d.ddde±XX`.
pub fn fmt_g(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:e}", v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..6).contains(&exp) {
        return v.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}
