use anyhow::{Context, Result};
use benchplot::config::{split_list, PlotOptions};
use benchplot::parser::BenchReader;
use benchplot::runtime::{build_plot, render_plot};
use benchplot::transform::Transform;
use benchplot::{OutputFormat, RenderOptions};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "benchplot")]
#[command(about = "Plot Go benchmark results", long_about = None)]
struct Args {
    /// Benchmark result files ("-" reads stdin)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Map values of PROJECTION to the X axis
    #[arg(short = 'x', value_name = "PROJECTION", default_value = ".fullname")]
    x: String,

    /// Map values of PROJECTION to the Y axis
    #[arg(short = 'y', value_name = "PROJECTION", default_value = ".value")]
    y: String,

    /// Map values of PROJECTION to color
    #[arg(long, value_name = "PROJECTION", default_value = ".residue")]
    color: String,

    /// Map values of PROJECTION to facet rows
    #[arg(long, value_name = "PROJECTION", default_value = ".unit")]
    row: String,

    /// Map values of PROJECTION to facet columns
    #[arg(long, value_name = "PROJECTION", default_value = "")]
    col: String,

    /// Ignore variations in KEYS
    #[arg(long, value_name = "KEYS", default_value = "")]
    ignore: String,

    /// Comma-separated list of UNITS to show
    #[arg(long = "unit", value_name = "UNITS", default_value = "")]
    units: String,

    /// Comma-separated LIST of aesthetics to plot on a log scale; use name:base for a base other than 10
    #[arg(long = "log-scale", value_name = "LIST", default_value = "")]
    log_scale: String,

    /// Comma-separated LIST of data transformations
    #[arg(long = "transform", value_name = "LIST", default_value = "")]
    transforms: String,

    /// Confidence level of plotted ranges
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// JSON file of plot options; replaces the projection and transform flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Gnuplot)]
    format: OutputFormat,

    /// Width of each facet cell in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Height of each facet cell in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Args {
    fn plot_options(&self) -> Result<PlotOptions> {
        if let Some(path) = &self.config {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return PlotOptions::from_json(&json)
                .with_context(|| format!("Failed to parse {}", path.display()));
        }
        Ok(PlotOptions {
            x: self.x.clone(),
            y: self.y.clone(),
            color: self.color.clone(),
            row: self.row.clone(),
            col: self.col.clone(),
            ignore: self.ignore.clone(),
            units: split_list(&self.units),
            log_scale: self.log_scale.clone(),
            transforms: split_list(&self.transforms),
            confidence: self.confidence,
        })
    }
}

fn extra_help() -> String {
    let mut help = String::from(
        "In addition to .name, .fullname, .config, /key and configuration keys,
a projection may be one of:

  .unit      The unit of each benchmark-reported metric
  .value     The value of the metric corresponding to .unit
  .residue   All fields that were not in some other projection

Transformations:
",
    );
    for t in Transform::ALL {
        help.push_str(&format!("  {:<10} {}\n", t.name(), t.doc()));
    }
    help
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("benchplot=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Args::command().after_help(extra_help()).get_matches();
    let args = Args::from_arg_matches(&matches)?;

    let options = args.plot_options()?;
    let render = RenderOptions {
        width: args.width,
        height: args.height,
        format: args.format,
    };

    // Read every input; syntax errors are reported and skipped
    let mut reader = BenchReader::new();
    for input in &args.inputs {
        if input == "-" {
            reader.read("<stdin>", io::stdin().lock())?;
        } else {
            let file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
            reader.read(input, BufReader::new(file))?;
        }
    }
    let input = reader.finish();

    let plot = build_plot(&options, &input)?;
    let bytes = render_plot(&plot, &render, options.confidence()?).context("Failed to render plot")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
