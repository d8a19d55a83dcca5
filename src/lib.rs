// Library exports for benchplot

pub mod aes;
pub mod config;
pub mod error;
pub mod parser;
pub mod plot;
pub mod projection;
pub mod record;
pub mod stats;
pub mod units;
pub mod value;

// Point pipeline
pub mod transform;
pub mod scale;

// Rendering
pub mod ir;
pub mod compiler;
pub mod gnuplot;
pub mod graph;
pub mod runtime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Gnuplot,
    Png,
    Svg,
}

/// Output options. Sizes are per facet cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 640 }
fn default_height() -> u32 { 480 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Gnuplot,
        }
    }
}
